use serde::Serialize;

use crate::rule::Rule;

/// Aggregate risk derived from all rules that matched during a scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RiskLevel::None => "none",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// A single rule that fired during a scan, with its own match count and
/// per-rule confidence.
#[derive(Clone, Debug, Serialize)]
pub struct RuleMatch {
    pub rule_id: String,
    pub rule_name: String,
    pub category: String,
    pub weight: u8,
    pub match_count: usize,
    pub confidence: f64,
}

/// The result of scanning a text against a [`crate::RuleSet`].
#[derive(Clone, Debug, Serialize)]
pub struct Detection {
    pub matches: Vec<RuleMatch>,
    pub risk_level: RiskLevel,
}

impl Detection {
    pub fn detected(&self) -> bool {
        !self.matches.is_empty()
    }

    pub fn max_confidence(&self) -> f64 {
        self.matches
            .iter()
            .map(|m| m.confidence)
            .fold(0.0_f64, f64::max)
    }

    pub fn max_weight(&self) -> u8 {
        self.matches.iter().map(|m| m.weight).max().unwrap_or(0)
    }
}

/// Per-rule confidence: `min(1, 0.3 * match_count + 0.15 * weight)`.
fn confidence(match_count: usize, weight: u8) -> f64 {
    (0.3 * match_count as f64 + 0.15 * weight as f64).min(1.0)
}

/// Evaluate every rule against `text` and derive the aggregate risk level.
///
/// Risk cascade (highest first):
/// - any matched rule at weight 4, or weight >= 3 with >= 2 rules fired: critical
/// - weight >= 3, or max confidence > 0.6: high
/// - weight >= 2, or max confidence > 0.4: medium
/// - otherwise (any match at all): low
/// - no rule fired: none
pub(crate) fn run(rules: &[Rule], text: &str) -> Detection {
    let mut matches = Vec::new();

    for rule in rules {
        let hits = rule.eval(text);
        if hits.is_empty() {
            continue;
        }
        matches.push(RuleMatch {
            rule_id: rule.id.clone(),
            rule_name: rule.name.clone(),
            category: rule.category.clone(),
            weight: rule.weight,
            match_count: hits.len(),
            confidence: confidence(hits.len(), rule.weight),
        });
    }

    let risk_level = derive_risk_level(&matches);

    Detection {
        matches,
        risk_level,
    }
}

fn derive_risk_level(matches: &[RuleMatch]) -> RiskLevel {
    if matches.is_empty() {
        return RiskLevel::None;
    }

    let max_weight = matches.iter().map(|m| m.weight).max().unwrap_or(0);
    let max_confidence = matches
        .iter()
        .map(|m| m.confidence)
        .fold(0.0_f64, f64::max);
    let at_least_weight_3 = matches.iter().filter(|m| m.weight >= 3).count();

    if max_weight >= 4 || (max_weight >= 3 && at_least_weight_3 >= 2) {
        RiskLevel::Critical
    } else if max_weight >= 3 || max_confidence > 0.6 {
        RiskLevel::High
    } else if max_weight >= 2 || max_confidence > 0.4 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}
