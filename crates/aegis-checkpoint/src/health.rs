use serde::{Deserialize, Serialize};

/// Seven boolean post-execution signals, each backing one weighted term of
/// the overall health score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSignals {
    pub vcs_clean: bool,
    pub syntax_valid: bool,
    pub config_parseable: bool,
    pub no_forbidden_patterns: bool,
    pub index_valid: bool,
    pub critical_files_exist: bool,
    pub no_unexpected_deletions: bool,
}

impl HealthSignals {
    /// Weighted sum out of 100: forbidden-patterns 25, syntax 20,
    /// config-parseable 15, index-valid 15, critical-files-exist 15,
    /// vcs-clean 5, no-unexpected-deletions 5.
    pub fn score(&self) -> u8 {
        let mut total: u16 = 0;
        if self.no_forbidden_patterns {
            total += 25;
        }
        if self.syntax_valid {
            total += 20;
        }
        if self.config_parseable {
            total += 15;
        }
        if self.index_valid {
            total += 15;
        }
        if self.critical_files_exist {
            total += 15;
        }
        if self.vcs_clean {
            total += 5;
        }
        if self.no_unexpected_deletions {
            total += 5;
        }
        total as u8
    }

    /// A failure in any of the four critical signals poisons the state
    /// regardless of the overall score — a clean tree with a deleted
    /// critical file still scores 85 but must trigger rollback.
    pub fn poisoned(&self) -> bool {
        !self.no_forbidden_patterns || !self.critical_files_exist || !self.index_valid || !self.config_parseable
    }
}
