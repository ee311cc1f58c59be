use regex::Regex;
use std::sync::OnceLock;

/// Which tier a criterion's text falls into, decided purely syntactically
/// — no transcript is involved at this stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CriterionClass {
    Unverifiable,
    Deterministic(Family),
    Semantic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Family {
    FileExists,
    TestsPass,
    StatusCode,
    ContainsText,
}

const UNVERIFIABLE_PHRASES: &[&str] = &[
    "feels right",
    "feels good",
    "feels natural",
    "looks good",
    "looks nice",
    "seems right",
    "is elegant",
    "is clean",
    "is intuitive",
    "makes sense",
    "good enough",
    "is nice",
    "is pretty",
    "is readable",
];

fn deterministic_patterns() -> &'static [(Family, Regex)] {
    static PATTERNS: OnceLock<Vec<(Family, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            (Family::FileExists, Regex::new(r"(?i)\bfile\b.*\bexists?\b|\bpath\b.*\bexists?\b").unwrap()),
            (Family::TestsPass, Regex::new(r"(?i)\btests?\b.*\bpass(es|ing)?\b|\ball tests pass\b").unwrap()),
            (Family::StatusCode, Regex::new(r"(?i)status\s*code\s*\d{3}|\breturns?\s*\d{3}\b").unwrap()),
            (Family::ContainsText, Regex::new(r#"(?i)\bcontains?\b\s*["“]"#).unwrap()),
        ]
    })
}

fn is_unverifiable(text: &str) -> bool {
    let lower = text.to_lowercase();
    UNVERIFIABLE_PHRASES.iter().any(|p| lower.contains(p))
}

/// Classify a criterion's free text. Checked in priority order:
/// unverifiable-phrase match first (since a criterion can superficially
/// resemble a deterministic family while still being a subjective
/// judgment, e.g. "the error message looks clean"), then deterministic
/// families, else semantic.
pub fn classify(text: &str) -> CriterionClass {
    if is_unverifiable(text) {
        return CriterionClass::Unverifiable;
    }
    for (family, pattern) in deterministic_patterns() {
        if pattern.is_match(text) {
            return CriterionClass::Deterministic(*family);
        }
    }
    CriterionClass::Semantic
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subjective_adjective_is_unverifiable() {
        assert_eq!(classify("the new onboarding flow feels right"), CriterionClass::Unverifiable);
    }

    #[test]
    fn file_exists_is_deterministic() {
        assert_eq!(
            classify("config.toml file exists in the repo root"),
            CriterionClass::Deterministic(Family::FileExists)
        );
    }

    #[test]
    fn tests_pass_is_deterministic() {
        assert_eq!(classify("all unit tests pass"), CriterionClass::Deterministic(Family::TestsPass));
    }

    #[test]
    fn status_code_is_deterministic() {
        assert_eq!(
            classify("the endpoint returns status code 200"),
            CriterionClass::Deterministic(Family::StatusCode)
        );
    }

    #[test]
    fn contains_x_is_deterministic() {
        assert_eq!(
            classify(r#"the output contains "license accepted""#),
            CriterionClass::Deterministic(Family::ContainsText)
        );
    }

    #[test]
    fn everything_else_is_semantic() {
        assert_eq!(
            classify("the new rate limiter correctly throttles bursty consumers"),
            CriterionClass::Semantic
        );
    }

    #[test]
    fn unverifiable_phrasing_wins_over_deterministic_shape() {
        // superficially resembles a deterministic claim but is a judgment.
        assert_eq!(
            classify("the test output feels right even though it technically passes"),
            CriterionClass::Unverifiable
        );
    }
}
