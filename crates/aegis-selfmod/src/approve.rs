use aegis_config::GateMode;
use aegis_trust::{CheckResult, RiskTier};

use crate::proposal::{Proposal, ProposalStatus};

/// Route a proposal to `Approved` or leave it `Pending`, per gate mode and
/// the proposing category's current graduation state. `morning-brief`
/// always defers to a human; `autonomous` only auto-approves a
/// non-HIGH-risk proposal from an already-graduated category.
pub fn approve(mut proposal: Proposal, gate_mode: GateMode, check: CheckResult) -> Proposal {
    let auto_approved = gate_mode == GateMode::Autonomous
        && check.graduated
        && proposal.risk_tier != RiskTier::High;

    proposal.status = if auto_approved { ProposalStatus::Approved } else { ProposalStatus::Pending };
    proposal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{Decision, ValidationRecord};
    use aegis_trust::{Category, RiskTier};

    fn proposal(category: Category) -> Proposal {
        let action = crate::proposal::ProposedAction { target_path: "docs/x.md".into(), description: "d".into() };
        let validation = ValidationRecord { scores: vec![], overall: 0.9, injection_score: 0.95, decision: Decision::Passed };
        Proposal::new("autolearn-2026-07-28-001".into(), category, action, validation)
    }

    #[test]
    fn morning_brief_always_stays_pending_even_when_graduated() {
        let check = CheckResult { score: 90, risk_tier: RiskTier::Low, graduated: true };
        let p = approve(proposal(Category::Documentation), GateMode::MorningBrief, check);
        assert_eq!(p.status, ProposalStatus::Pending);
    }

    #[test]
    fn autonomous_and_graduated_and_non_high_risk_auto_approves() {
        let check = CheckResult { score: 90, risk_tier: RiskTier::Low, graduated: true };
        let p = approve(proposal(Category::Documentation), GateMode::Autonomous, check);
        assert_eq!(p.status, ProposalStatus::Approved);
    }

    #[test]
    fn autonomous_but_not_graduated_stays_pending() {
        let check = CheckResult { score: 40, risk_tier: RiskTier::Low, graduated: false };
        let p = approve(proposal(Category::Documentation), GateMode::Autonomous, check);
        assert_eq!(p.status, ProposalStatus::Pending);
    }

    #[test]
    fn high_risk_category_never_auto_approves_even_when_graduated() {
        let check = CheckResult { score: 90, risk_tier: RiskTier::High, graduated: false };
        let p = approve(proposal(Category::Security), GateMode::Autonomous, check);
        assert_eq!(p.status, ProposalStatus::Pending);
    }
}
