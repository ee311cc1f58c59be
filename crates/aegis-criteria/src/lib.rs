//! Syntactic classification and transcript-grounded scoring of free-text
//! acceptance criteria.
//!
//! [`classify`] decides a criterion's tier from its text alone
//! (unverifiable-phrase match, then a deterministic family, else
//! semantic). [`score_criterion`] then scores the criterion against a
//! transcript using whichever tier it landed in. The scorer never calls
//! the network: the semantic tier is purely lexical term-presence
//! scoring, and the deterministic families scan the transcript text for
//! confirmed markers rather than re-executing anything.

mod classify;
mod deterministic;
mod score;
mod semantic;

pub use classify::{classify, CriterionClass, Family};
pub use score::{CriterionScore, ScoreVerdict};

/// A single acceptance criterion: free text plus whether it's an
/// anti-criterion (a "must not" statement, where a hit in the transcript
/// is the failure mode rather than the success mode). Anti-criterion
/// status is supplied by the caller — it isn't syntactically derived —
/// since the proposal author is the one who knows whether a criterion is
/// phrased as a prohibition.
#[derive(Clone, Debug)]
pub struct Criterion {
    pub text: String,
    pub is_anti: bool,
}

impl Criterion {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_anti: false }
    }

    pub fn anti(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_anti: true }
    }
}

/// Classify and score one criterion against a transcript, applying the
/// anti-criterion inversion (if any) after scoring.
pub fn score_criterion(criterion: &Criterion, transcript: &str) -> CriterionScore {
    let raw = match classify(&criterion.text) {
        CriterionClass::Unverifiable => CriterionScore::new(ScoreVerdict::NeedsHuman, "unverifiable", None),
        CriterionClass::Deterministic(family) => deterministic::check(family, &criterion.text, transcript),
        CriterionClass::Semantic => semantic::score(&criterion.text, transcript),
    };

    if criterion.is_anti {
        raw.invert()
    } else {
        raw
    }
}

/// Fraction of `criteria` that scored `Satisfied` against `transcript`.
/// Criteria needing human judgment and failures both count against the
/// rate; only a clean `Satisfied` counts for it.
pub fn pass_rate(criteria: &[Criterion], transcript: &str) -> f64 {
    if criteria.is_empty() {
        return 1.0;
    }
    let satisfied = criteria
        .iter()
        .filter(|c| score_criterion(c, transcript).verdict == ScoreVerdict::Satisfied)
        .count();
    satisfied as f64 / criteria.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unverifiable_criterion_always_needs_human() {
        let criterion = Criterion::new("the UI feels right");
        let score = score_criterion(&criterion, "the UI was shipped and users like it");
        assert_eq!(score.verdict, ScoreVerdict::NeedsHuman);
        assert_eq!(score.method, "unverifiable");
    }

    #[test]
    fn anti_criterion_hit_becomes_failed() {
        let criterion = Criterion::anti(r#"output contains "DEBUG MODE ENABLED""#);
        let score = score_criterion(&criterion, "startup log: DEBUG MODE ENABLED");
        assert_eq!(score.verdict, ScoreVerdict::Failed);
    }

    #[test]
    fn anti_criterion_miss_becomes_satisfied() {
        let criterion = Criterion::anti(r#"output contains "DEBUG MODE ENABLED""#);
        let score = score_criterion(&criterion, "startup log: ready to serve");
        assert_eq!(score.verdict, ScoreVerdict::Satisfied);
    }

    #[test]
    fn pass_rate_counts_only_satisfied() {
        let criteria = vec![
            Criterion::new(r#"output contains "ready""#),
            Criterion::new(r#"output contains "nonexistent-marker""#),
        ];
        let rate = pass_rate(&criteria, "server log: ready to serve traffic");
        assert_eq!(rate, 0.5);
    }

    #[test]
    fn empty_criteria_list_passes_vacuously() {
        assert_eq!(pass_rate(&[], "anything"), 1.0);
    }
}
