//! Pre-execution repository snapshots and post-execution health scoring
//! for self-modification tasks.
//!
//! A [`CheckpointManager`] writes one immutable checkpoint file per task
//! (`checkpoint`), re-derives a [`HealthSignals`] reading against that
//! checkpoint's file set on demand (`verify`), and can hard-reset the
//! repository back to the checkpoint's commit when a verify comes back
//! poisoned (`rollback`). VCS access shells out to `git` directly rather
//! than linking a git library, since the only operations needed are a
//! handful of plumbing commands.

mod checkpoint;
mod checks;
mod error;
mod git;
mod hash;
mod health;
mod manager;

pub use checkpoint::{Checkpoint, RollbackOutcome, VerifyResult};
pub use error::CheckpointError;
pub use git::GitError;
pub use health::HealthSignals;
pub use manager::CheckpointManager;
