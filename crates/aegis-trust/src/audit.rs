use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::outcome::Outcome;

/// One line of `trust-history.jsonl`. Append-only: never rewritten or
/// deleted, even when the score it records later gets superseded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub task_id: String,
    pub category: Category,
    pub outcome: Outcome,
    pub score_before: u8,
    pub score_after: u8,
    pub graduated: bool,
}
