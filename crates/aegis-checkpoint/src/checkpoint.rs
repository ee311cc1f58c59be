use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::health::HealthSignals;

/// A pre-execution snapshot: VCS position, content hashes of the files a
/// self-modification is allowed to touch, and the health signals observed
/// at snapshot time. Written once per task and never mutated afterward —
/// rollback reads it, it never rewrites it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Checkpoint {
    pub task_id: String,
    pub created_at: DateTime<Utc>,
    pub vcs_commit: String,
    pub vcs_branch: String,
    pub file_hashes: BTreeMap<String, String>,
    pub health_before: HealthSignals,
}

/// Result of `verify(task_id)`: a fresh health read plus the derived score
/// and poisoned flag.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct VerifyResult {
    pub score: u8,
    pub poisoned: bool,
    pub details: HealthSignals,
}

/// Result of a completed rollback. Restoring the proposal's own lifecycle
/// state (`PENDING` / `status=rolled_back`) is the self-modification
/// pipeline's job, not this crate's — this crate only owns the VCS/health
/// side of rollback and hands the caller what it needs to make that
/// transition itself.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RollbackOutcome {
    pub task_id: String,
    pub restored_commit: String,
    pub verify: VerifyResult,
    pub reason: String,
}
