use std::path::PathBuf;

use thiserror::Error;

use crate::git::GitError;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse checkpoint at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no checkpoint recorded for task {task_id}")]
    NotFound { task_id: String },

    #[error("rollback of task {task_id} left the tree poisoned")]
    RollbackFailed { task_id: String },
}
