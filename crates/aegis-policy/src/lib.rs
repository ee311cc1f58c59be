//! Per-tool validators for shell commands and file paths.
//!
//! Both validators are pure functions over a loaded [`PolicyConfig`]: the
//! config is read once at process startup (see [`load_policy`]) and passed
//! explicitly into every call, per the "no singletons" design note.

mod decision;
mod matcher;
mod path;
mod safe_commands;
mod shell;

pub use decision::{Decision, RuleOutcome};
pub use path::{normalize_path, validate_path, FileAction};
pub use shell::{normalize_command, validate_shell};

use aegis_config::{load_cascading, system_config_path, user_config_path, Cascade, PolicyConfig};

/// Load the policy config via the standard user-then-system cascade,
/// falling back to the fail-closed built-in deny set on absence or parse
/// failure.
pub fn load_policy() -> PolicyConfig {
    match user_config_path("policy") {
        Ok(user_path) => load_cascading(&user_path, &system_config_path("policy")),
        Err(_) => {
            tracing::warn!("could not resolve user config path, using fail-closed policy fallback");
            PolicyConfig::fallback()
        }
    }
}
