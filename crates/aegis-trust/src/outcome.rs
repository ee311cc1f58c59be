use serde::{Deserialize, Serialize};

/// The result of executing (or rejecting) a self-modification proposal,
/// as recorded against the category's trust score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    ApprovedClean,
    ApprovedMinor,
    ApprovedMajor,
    Rejected,
    Executed,
}

impl Outcome {
    /// Score delta applied on `record`. `Executed` alone carries no score
    /// change: it is logged for the audit trail but isn't itself a verdict.
    pub fn delta(&self) -> i16 {
        match self {
            Outcome::ApprovedClean => 10,
            Outcome::ApprovedMinor => 5,
            Outcome::ApprovedMajor => 2,
            Outcome::Rejected => -15,
            Outcome::Executed => 0,
        }
    }
}
