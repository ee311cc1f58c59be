use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::loader::Cascade;

/// Self-modification pipeline tuning: the hard daily token cap, the
/// generate-phase target-path allow-list, and the extract-phase forbidden
/// patterns. Per-phase token budgets are policy, not contract, per
/// spec.md — they're recorded here only so an operator can tune them
/// without a code change.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SelfModConfig {
    #[serde(default = "default_daily_token_cap")]
    pub daily_token_cap: u64,

    /// A proposal's target path must start with one of these prefixes to
    /// pass Generate's safety validation. Empty means nothing is allowed —
    /// the same fail-closed posture as the other security-relevant tables.
    #[serde(default)]
    pub allowed_target_prefixes: Vec<String>,

    #[serde(default)]
    pub forbidden_patterns: Vec<String>,

    #[serde(default)]
    pub phase_token_budgets: HashMap<String, u64>,
}

fn default_daily_token_cap() -> u64 {
    50_000
}

impl Default for SelfModConfig {
    fn default() -> Self {
        Self {
            daily_token_cap: default_daily_token_cap(),
            allowed_target_prefixes: Vec::new(),
            forbidden_patterns: Vec::new(),
            phase_token_budgets: HashMap::new(),
        }
    }
}

impl Cascade for SelfModConfig {
    fn fallback() -> Self {
        SelfModConfig::default()
    }
}
