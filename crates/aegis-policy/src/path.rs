use std::path::{Path, PathBuf};

use aegis_config::PolicyConfig;

use crate::decision::RuleOutcome;
use crate::matcher::first_match;

/// The filesystem action a tool call is attempting. `Write` distinguishes
/// whether it arrived via the Write tool or the Edit tool, since
/// `edit_only` rules deny the former but allow the latter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileAction {
    Read,
    Write { via_edit_tool: bool },
    Delete,
}

/// Expands a leading `~` to the user's home directory, then symlink-
/// resolves the path if it exists; otherwise lexically normalizes it
/// (collapsing `.` and `..` components without touching the filesystem).
pub fn normalize_path(raw: &Path) -> PathBuf {
    let expanded = expand_home(raw);

    if let Ok(canonical) = std::fs::canonicalize(&expanded) {
        return canonical;
    }

    lexically_normalize(&expanded)
}

fn expand_home(raw: &Path) -> PathBuf {
    let raw_str = raw.to_string_lossy();
    if let Some(rest) = raw_str.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if raw_str == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    raw.to_path_buf()
}

fn lexically_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            std::path::Component::CurDir => {}
            std::path::Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Validate a filesystem action against the policy's path rule lists.
/// `zero_access` is checked first and denies every action outright.
pub fn validate_path(config: &PolicyConfig, raw_path: &Path, action: FileAction) -> RuleOutcome {
    let normalized = normalize_path(raw_path);
    let path_str = normalized.to_string_lossy();

    if let Some(rule) = first_match(&config.paths.zero_access, &path_str) {
        return RuleOutcome::block(rule, "Zero access path");
    }

    match action {
        FileAction::Read => RuleOutcome::allow(),
        FileAction::Delete => {
            if let Some(rule) = first_match(&config.paths.read_only, &path_str) {
                return RuleOutcome::block(rule, "Read-only path: delete denied");
            }
            if let Some(rule) = first_match(&config.paths.no_delete, &path_str) {
                return RuleOutcome::block(rule, "Delete denied by no_delete rule");
            }
            RuleOutcome::allow()
        }
        FileAction::Write { via_edit_tool } => {
            if let Some(rule) = first_match(&config.paths.read_only, &path_str) {
                return RuleOutcome::block(rule, "Read-only path: write denied");
            }
            if !via_edit_tool {
                if let Some(rule) = first_match(&config.paths.edit_only, &path_str) {
                    return RuleOutcome::block(rule, "Edit-only path: Write tool denied, use Edit");
                }
            }
            if let Some(rule) = first_match(&config.paths.confirm_write, &path_str) {
                return RuleOutcome::confirm(rule, "Write requires confirmation");
            }
            RuleOutcome::allow()
        }
    }
}
