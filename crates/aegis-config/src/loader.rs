use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::{ConfigError, Result};

/// A config table that can be cascade-loaded from disk and that defines its
/// own fail-closed fallback for when no file is found or parsing fails.
///
/// Per the design notes this loader is the single place process-wide config
/// is read; every component receives the parsed, immutable value rather than
/// reading files itself.
pub trait Cascade: DeserializeOwned {
    /// The value used when neither the user nor the system path yields a
    /// parseable file. Security-relevant tables override this with a
    /// minimal deny set; non-critical tables may just use `Default::default`.
    fn fallback() -> Self;
}

/// Load `path` as TOML into `T`, returning `Ok(None)` if the file does not
/// exist (not an error) and `Err` only on an IO or parse failure.
fn try_load<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let parsed = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(Some(parsed))
}

/// Load a cascading config: user path first, then system path, then the
/// type's fail-closed fallback. Absence and parse failure are both logged
/// and treated identically — neither is allowed to propagate.
pub fn load_cascading<T: Cascade>(user_path: &Path, system_path: &Path) -> T {
    match try_load::<T>(user_path) {
        Ok(Some(cfg)) => return cfg,
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(path = %user_path.display(), error = %e, "config load failed, falling back to system path");
        }
    }

    match try_load::<T>(system_path) {
        Ok(Some(cfg)) => return cfg,
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(path = %system_path.display(), error = %e, "config load failed, falling back to built-in defaults");
        }
    }

    tracing::warn!("no config found at user or system path, using fail-closed fallback");
    T::fallback()
}

/// `~/.aegis/<name>.toml`
pub fn user_config_path(name: &str) -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".aegis").join(format!("{name}.toml")))
}

/// `/etc/aegis/<name>.toml`
pub fn system_config_path(name: &str) -> PathBuf {
    PathBuf::from("/etc/aegis").join(format!("{name}.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        value: u32,
    }

    impl Cascade for Sample {
        fn fallback() -> Self {
            Sample { value: 0 }
        }
    }

    #[test]
    fn missing_files_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("user.toml");
        let system = dir.path().join("system.toml");
        let cfg = load_cascading::<Sample>(&user, &system);
        assert_eq!(cfg, Sample { value: 0 });
    }

    #[test]
    fn user_path_wins_over_system_path() {
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("user.toml");
        let system = dir.path().join("system.toml");
        std::fs::write(&user, "value = 7").unwrap();
        std::fs::write(&system, "value = 9").unwrap();
        let cfg = load_cascading::<Sample>(&user, &system);
        assert_eq!(cfg, Sample { value: 7 });
    }

    #[test]
    fn system_path_used_when_user_path_missing() {
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("user.toml");
        let system = dir.path().join("system.toml");
        std::fs::write(&system, "value = 9").unwrap();
        let cfg = load_cascading::<Sample>(&user, &system);
        assert_eq!(cfg, Sample { value: 9 });
    }

    #[test]
    fn unparseable_user_file_falls_through_to_system() {
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("user.toml");
        let system = dir.path().join("system.toml");
        std::fs::write(&user, "not valid toml {{{").unwrap();
        std::fs::write(&system, "value = 9").unwrap();
        let cfg = load_cascading::<Sample>(&user, &system);
        assert_eq!(cfg, Sample { value: 9 });
    }
}
