use serde::{Deserialize, Serialize};

use crate::loader::Cascade;

/// Governs whether graduated categories may execute proposals without a
/// human in the loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GateMode {
    /// Every proposal, regardless of category graduation, goes to PENDING.
    MorningBrief,
    /// Non-HIGH-risk proposals from graduated categories may go straight
    /// to APPROVED.
    Autonomous,
}

impl Default for GateMode {
    fn default() -> Self {
        GateMode::MorningBrief
    }
}

/// `{gate_mode, threshold}` — the two knobs [`crate::BudgetConfig`]-adjacent
/// components read to decide graduation eligibility.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TrustConfig {
    #[serde(default)]
    pub gate_mode: GateMode,
    #[serde(default = "default_threshold")]
    pub threshold: u8,
}

fn default_threshold() -> u8 {
    80
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            gate_mode: GateMode::default(),
            threshold: default_threshold(),
        }
    }
}

impl Cascade for TrustConfig {
    /// Absent config means the most conservative gate: everything requires
    /// human approval, nothing graduates.
    fn fallback() -> Self {
        TrustConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_gate_mode_requires_human_review() {
        assert_eq!(TrustConfig::default().gate_mode, GateMode::MorningBrief);
    }

    #[test]
    fn default_threshold_is_eighty() {
        assert_eq!(TrustConfig::default().threshold, 80);
    }

    #[test]
    fn parses_autonomous_gate_mode() {
        let cfg: TrustConfig = toml::from_str("gate_mode = \"autonomous\"\nthreshold = 75").unwrap();
        assert_eq!(cfg.gate_mode, GateMode::Autonomous);
        assert_eq!(cfg.threshold, 75);
    }
}
