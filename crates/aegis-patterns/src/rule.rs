use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use crate::builtin::hidden_unicode_rules;
use crate::detect::Detection;

/// A single matchable pattern inside a [`Rule`]: either a regular
/// expression or a literal keyword. Matching is case-insensitive unless
/// `case_sensitive` is set.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pattern {
    pub source: String,
    #[serde(default)]
    pub is_regex: bool,
    #[serde(default)]
    pub case_sensitive: bool,
}

impl Pattern {
    pub fn keyword(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            is_regex: false,
            case_sensitive: false,
        }
    }

    pub fn regex(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            is_regex: true,
            case_sensitive: false,
        }
    }

    /// Compile this pattern, falling back to a literal substring search if
    /// it is marked as a regex but fails to compile. The engine must never
    /// throw on a malformed rule.
    fn compiled(&self) -> CompiledPattern {
        if self.is_regex {
            match RegexBuilder::new(&self.source)
                .case_insensitive(!self.case_sensitive)
                .build()
            {
                Ok(re) => CompiledPattern::Regex(re),
                Err(_) => CompiledPattern::Literal {
                    needle: normalize(&self.source, self.case_sensitive),
                    case_sensitive: self.case_sensitive,
                },
            }
        } else {
            CompiledPattern::Literal {
                needle: normalize(&self.source, self.case_sensitive),
                case_sensitive: self.case_sensitive,
            }
        }
    }
}

fn normalize(s: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        s.to_string()
    } else {
        s.to_lowercase()
    }
}

enum CompiledPattern {
    Regex(regex::Regex),
    Literal { needle: String, case_sensitive: bool },
}

impl CompiledPattern {
    /// Returns every non-overlapping match's byte range in `text`.
    fn find_all(&self, text: &str) -> Vec<(usize, usize)> {
        match self {
            CompiledPattern::Regex(re) => re.find_iter(text).map(|m| (m.start(), m.end())).collect(),
            CompiledPattern::Literal {
                needle,
                case_sensitive,
            } => {
                if needle.is_empty() {
                    return Vec::new();
                }
                let hay = if *case_sensitive {
                    text.to_string()
                } else {
                    text.to_lowercase()
                };
                let mut out = Vec::new();
                let mut start = 0;
                while let Some(pos) = hay[start..].find(needle.as_str()) {
                    let s = start + pos;
                    let e = s + needle.len();
                    out.push((s, e));
                    start = e.max(s + 1);
                    if start >= hay.len() {
                        break;
                    }
                }
                out
            }
        }
    }
}

/// A named detection rule: a category, a risk weight (1=low..4=critical),
/// and a set of patterns that, if any fire, count as a match for this rule.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub name: String,
    pub category: String,
    /// 1 (low) ..= 4 (critical)
    pub weight: u8,
    pub patterns: Vec<Pattern>,
}

impl Rule {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        weight: u8,
        patterns: Vec<Pattern>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            weight: weight.clamp(1, 4),
            patterns,
        }
    }

    fn compiled(&self) -> Vec<CompiledPattern> {
        self.patterns.iter().map(Pattern::compiled).collect()
    }
}

/// A named, immutable collection of [`Rule`]s loaded at startup.
///
/// Two hidden-unicode rules (tag characters, zero-width characters) are
/// always active regardless of what is passed to [`RuleSet::with_builtins`]
/// or loaded from disk, per the engine contract.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Construct a rule set, appending the always-on hidden-unicode rules.
    pub fn with_builtins(mut rules: Vec<Rule>) -> Self {
        rules.extend(hidden_unicode_rules());
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Parse additional rules from a YAML document and merge them in,
    /// appended after any existing rules (evaluation order is preserved).
    pub fn merge_yaml(&mut self, yaml: &str) -> Result<(), serde_yaml::Error> {
        let extra: Vec<Rule> = serde_yaml::from_str(yaml)?;
        self.rules.extend(extra);
        Ok(())
    }

    /// Scan `text` against every rule in the set. Deterministic,
    /// side-effect free, O(|text| * |rules|).
    pub fn scan(&self, text: &str) -> Detection {
        crate::detect::run(&self.rules, text)
    }
}

impl Rule {
    pub(crate) fn eval(&self, text: &str) -> Vec<(usize, usize)> {
        let compiled = self.compiled();
        let mut hits = Vec::new();
        for pattern in &compiled {
            hits.extend(pattern.find_all(text));
        }
        hits
    }
}
