use serde_json::{json, Value};

use aegis_injection::Action;
use aegis_policy::Decision;

/// The hook-facing JSON shape on stdout, plus the exit code it maps to.
/// Only `Block` is a hard-block (exit 2); everything else exits 0.
#[derive(Clone, Debug, PartialEq)]
pub enum HookOutput {
    Allow,
    AllowWithContext(String),
    Ask(String),
    Block(String),
}

impl HookOutput {
    pub fn to_json(&self) -> Value {
        match self {
            HookOutput::Allow => json!({ "continue": true }),
            HookOutput::AllowWithContext(context) => {
                json!({ "continue": true, "additionalContext": context })
            }
            HookOutput::Ask(message) => json!({ "decision": "ask", "message": message }),
            HookOutput::Block(reason) => json!({ "continue": false, "stopReason": reason }),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            HookOutput::Block(_) => 2,
            _ => 0,
        }
    }

    /// Writes the JSON record to stdout and, on a hard block, a
    /// human-readable `BLOCKED: <reason>` line to stderr.
    pub fn emit(&self) {
        println!("{}", self.to_json());
        if let HookOutput::Block(reason) = self {
            eprintln!("BLOCKED: {reason}");
        }
    }
}

/// Maps a Policy Engine outcome to the hook's output contract per
/// spec.md's state machine: allow/alert both continue silently, confirm
/// asks, block hard-blocks.
pub fn from_policy_outcome(outcome: &aegis_policy::RuleOutcome) -> HookOutput {
    match outcome.decision {
        Decision::Allow | Decision::Alert => HookOutput::Allow,
        Decision::Confirm => HookOutput::Ask(
            outcome
                .reason
                .clone()
                .unwrap_or_else(|| "confirmation required".to_string()),
        ),
        Decision::Block => HookOutput::Block(
            outcome
                .reason
                .clone()
                .unwrap_or_else(|| "blocked by policy".to_string()),
        ),
    }
}

pub fn from_injection_action(action: &Action) -> HookOutput {
    let contract = action.to_output();
    if !contract.cont {
        return HookOutput::Block(contract.stop_reason.unwrap_or_default());
    }
    match contract.context {
        Some(context) => HookOutput::AllowWithContext(context),
        None => HookOutput::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_policy::RuleOutcome;

    #[test]
    fn allow_serializes_to_bare_continue() {
        assert_eq!(HookOutput::Allow.to_json(), json!({ "continue": true }));
        assert_eq!(HookOutput::Allow.exit_code(), 0);
    }

    #[test]
    fn block_exits_with_code_two_and_prints_stop_reason() {
        let output = HookOutput::Block("zero access path".to_string());
        assert_eq!(output.exit_code(), 2);
        assert_eq!(
            output.to_json(),
            json!({ "continue": false, "stopReason": "zero access path" })
        );
    }

    #[test]
    fn ask_maps_to_decision_ask_with_message() {
        let output = HookOutput::Ask("confirm this write".to_string());
        assert_eq!(
            output.to_json(),
            json!({ "decision": "ask", "message": "confirm this write" })
        );
        assert_eq!(output.exit_code(), 0);
    }

    #[test]
    fn policy_block_outcome_becomes_hard_block() {
        let outcome = RuleOutcome::block("rule-1", "Zero access path");
        let output = from_policy_outcome(&outcome);
        assert_eq!(output, HookOutput::Block("Zero access path".to_string()));
    }

    #[test]
    fn policy_confirm_outcome_becomes_ask() {
        let outcome = RuleOutcome::confirm("rule-2", "Write requires confirmation");
        let output = from_policy_outcome(&outcome);
        assert_eq!(
            output,
            HookOutput::Ask("Write requires confirmation".to_string())
        );
    }

    #[test]
    fn policy_alert_outcome_still_continues() {
        let outcome = RuleOutcome::alert("rule-3", "matched alert shell rule");
        assert_eq!(from_policy_outcome(&outcome), HookOutput::Allow);
    }

    #[test]
    fn injection_log_action_becomes_allow() {
        assert_eq!(from_injection_action(&Action::Log), HookOutput::Allow);
    }

    #[test]
    fn injection_warn_action_becomes_allow_with_context() {
        let action = Action::Warn {
            context: "external risk=high".to_string(),
            degraded: false,
        };
        assert_eq!(
            from_injection_action(&action),
            HookOutput::AllowWithContext("external risk=high".to_string())
        );
    }

    #[test]
    fn injection_block_action_becomes_hard_block() {
        let action = Action::Block {
            stop_reason: "dual-confirmed critical injection".to_string(),
        };
        assert_eq!(
            from_injection_action(&action),
            HookOutput::Block("dual-confirmed critical injection".to_string())
        );
    }
}
