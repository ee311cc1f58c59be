//! Named rule sets and risk scoring for text pattern detection.
//!
//! A [`RuleSet`] is a named collection of [`Rule`]s, each carrying a risk
//! weight (1=low .. 4=critical). [`RuleSet::scan`] evaluates a text against
//! the set and returns a [`Detection`]: the matched rules plus an aggregate
//! [`RiskLevel`].
//!
//! The engine never panics on malformed input: a rule whose regex fails to
//! compile degrades to a literal substring search instead of being dropped.

mod builtin;
mod detect;
mod rule;

pub use builtin::{hidden_unicode_rules, injection_keyword_rules};
pub use detect::{Detection, RiskLevel, RuleMatch};
pub use rule::{Pattern, Rule, RuleSet};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_never_detects() {
        let rules = RuleSet::with_builtins(vec![Rule::new(
            "r1",
            "Test Rule",
            "test",
            2,
            vec![Pattern::keyword("danger")],
        )]);
        let d = rules.scan("");
        assert!(!d.detected());
        assert_eq!(d.risk_level, RiskLevel::None);
    }

    #[test]
    fn detected_iff_matches_nonempty() {
        let rules = RuleSet::with_builtins(vec![Rule::new(
            "r1",
            "Danger Word",
            "test",
            2,
            vec![Pattern::keyword("danger")],
        )]);
        let hit = rules.scan("this is danger zone");
        assert!(hit.detected());
        assert!(!hit.matches.is_empty());

        let miss = rules.scan("this is a safe zone");
        assert!(!miss.detected());
        assert!(miss.matches.is_empty());
    }
}
