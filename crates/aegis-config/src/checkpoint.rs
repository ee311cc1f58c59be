use serde::{Deserialize, Serialize};

use crate::loader::Cascade;

/// Repo-specific knobs for the checkpoint/health subsystem. Every path is
/// relative to the repository root the checkpointer operates on.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CheckpointConfig {
    /// Files whose existence and content hash are always part of a
    /// checkpoint, regardless of which proposal triggered it.
    #[serde(default)]
    pub critical_files: Vec<String>,

    /// Config files checked for parseability by extension
    /// (`.yaml`/`.yml`, `.toml`, `.json`). A missing file is tolerated; a
    /// present-but-corrupt one fails the `config_parseable` signal.
    #[serde(default)]
    pub config_files: Vec<String>,

    /// A single manifest-like file (e.g. a skill or capability index)
    /// whose parseability backs the `index_valid` signal. Unset means the
    /// signal is vacuously healthy — not every repo has one.
    #[serde(default)]
    pub index_file: Option<String>,

    /// Literal substrings that must never appear in critical or config
    /// files after a self-modification.
    #[serde(default)]
    pub forbidden_patterns: Vec<String>,
}

impl Cascade for CheckpointConfig {
    fn fallback() -> Self {
        CheckpointConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_configured_paths() {
        let cfg = CheckpointConfig::default();
        assert!(cfg.critical_files.is_empty());
        assert!(cfg.index_file.is_none());
    }

    #[test]
    fn parses_full_table() {
        let toml_src = r#"
            critical_files = ["Cargo.toml", "src/lib.rs"]
            config_files = ["aegis.toml"]
            index_file = "skills/index.yaml"
            forbidden_patterns = ["curl | sh", "rm -rf /"]
        "#;
        let cfg: CheckpointConfig = toml::from_str(toml_src).unwrap();
        assert_eq!(cfg.critical_files.len(), 2);
        assert_eq!(cfg.index_file.as_deref(), Some("skills/index.yaml"));
        assert_eq!(cfg.forbidden_patterns.len(), 2);
    }
}
