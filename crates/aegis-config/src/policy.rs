use serde::{Deserialize, Serialize};

use crate::loader::Cascade;

/// `{version, philosophy, bash:{blocked,confirm,alert}, paths:
/// {zero_access,read_only,confirm_write,no_delete,edit_only}}`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub philosophy: String,
    #[serde(default)]
    pub bash: BashRules,
    #[serde(default)]
    pub paths: PathRules,
}

fn default_version() -> String {
    "1".to_string()
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BashRules {
    #[serde(default)]
    pub blocked: Vec<String>,
    #[serde(default)]
    pub confirm: Vec<String>,
    #[serde(default)]
    pub alert: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PathRules {
    #[serde(default)]
    pub zero_access: Vec<String>,
    #[serde(default)]
    pub read_only: Vec<String>,
    #[serde(default)]
    pub confirm_write: Vec<String>,
    #[serde(default)]
    pub no_delete: Vec<String>,
    #[serde(default)]
    pub edit_only: Vec<String>,
}

impl Cascade for PolicyConfig {
    /// Fail-closed minimal deny set: destructive shell commands and the
    /// paths that would leak credentials if read.
    fn fallback() -> Self {
        PolicyConfig {
            version: default_version(),
            philosophy: "fail-closed built-in default".to_string(),
            bash: BashRules {
                blocked: vec![
                    r"^rm\s+-rf\s+/\s*$".to_string(),
                    r"^rm\s+-rf\s+~\s*$".to_string(),
                    r"\bmkfs(\.\w+)?\b".to_string(),
                    r"\bdd\b.*\bof=/dev/(sd|nvme|disk)".to_string(),
                ],
                confirm: Vec::new(),
                alert: Vec::new(),
            },
            paths: PathRules {
                zero_access: vec![
                    r"\.ssh/id_(rsa|ed25519|ecdsa|dsa)$".to_string(),
                    r"\.aws/credentials$".to_string(),
                    r"\.config/gcloud/.*credentials.*".to_string(),
                    r"(^|/)\.env(\.\w+)?$".to_string(),
                ],
                read_only: Vec::new(),
                confirm_write: Vec::new(),
                no_delete: Vec::new(),
                edit_only: Vec::new(),
            },
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self::fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_blocks_rm_rf_root_and_home() {
        let cfg = PolicyConfig::fallback();
        assert!(cfg.bash.blocked.iter().any(|r| r.contains("rm")));
        assert_eq!(cfg.bash.blocked.len(), 4);
    }

    #[test]
    fn fallback_protects_ssh_and_env_paths() {
        let cfg = PolicyConfig::fallback();
        assert!(cfg.paths.zero_access.iter().any(|r| r.contains("ssh")));
        assert!(cfg.paths.zero_access.iter().any(|r| r.contains("env")));
    }

    #[test]
    fn parses_from_toml() {
        let toml_src = r#"
            version = "2"
            philosophy = "strict"

            [bash]
            blocked = ["rm -rf /"]
            confirm = ["curl .*"]
            alert = []

            [paths]
            zero_access = ["~/.ssh/"]
            read_only = []
            confirm_write = []
            no_delete = []
            edit_only = []
        "#;
        let cfg: PolicyConfig = toml::from_str(toml_src).unwrap();
        assert_eq!(cfg.version, "2");
        assert_eq!(cfg.bash.blocked, vec!["rm -rf /".to_string()]);
    }
}
