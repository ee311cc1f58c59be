use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced while loading a config table. Every call site that
/// reaches this error is expected to fall back to [`crate::Cascade::fallback`]
/// rather than propagate it to the caller — config load failure is
/// fail-closed, never fail-stop.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine home directory")]
    NoHomeDir,

    #[error("failed to read config from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
