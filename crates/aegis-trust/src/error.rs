use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrustError {
    #[error("failed to read trust ledger at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse trust ledger at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
