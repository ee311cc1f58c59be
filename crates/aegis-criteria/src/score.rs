use serde::Serialize;

/// The outcome of scoring one criterion against a transcript.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreVerdict {
    Satisfied,
    Partial,
    Failed,
    NeedsHuman,
}

/// A verdict plus the method that produced it and, where available, the
/// transcript snippet that justifies it.
#[derive(Clone, Debug, Serialize)]
pub struct CriterionScore {
    pub verdict: ScoreVerdict,
    pub method: &'static str,
    pub evidence: Option<String>,
}

impl CriterionScore {
    pub fn new(verdict: ScoreVerdict, method: &'static str, evidence: Option<String>) -> Self {
        Self { verdict, method, evidence }
    }

    /// Anti-criteria invert the verdict: a hit becomes failed, a miss
    /// becomes satisfied. `Partial` and `NeedsHuman` pass through
    /// unchanged — there is no sensible inversion of "half confirmed" or
    /// "couldn't tell".
    pub fn invert(self) -> Self {
        let verdict = match self.verdict {
            ScoreVerdict::Satisfied => ScoreVerdict::Failed,
            ScoreVerdict::Failed => ScoreVerdict::Satisfied,
            other => other,
        };
        Self { verdict, ..self }
    }
}
