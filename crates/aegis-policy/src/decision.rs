use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Allow,
    Block,
    Confirm,
    Alert,
}

/// The outcome of validating a single shell command or path action.
#[derive(Clone, Debug, Serialize)]
pub struct RuleOutcome {
    pub decision: Decision,
    pub matched_rule: Option<String>,
    pub reason: Option<String>,
}

impl RuleOutcome {
    pub fn allow() -> Self {
        Self { decision: Decision::Allow, matched_rule: None, reason: None }
    }

    pub fn block(matched_rule: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            decision: Decision::Block,
            matched_rule: Some(matched_rule.into()),
            reason: Some(reason.into()),
        }
    }

    pub fn confirm(matched_rule: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            decision: Decision::Confirm,
            matched_rule: Some(matched_rule.into()),
            reason: Some(reason.into()),
        }
    }

    pub fn alert(matched_rule: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            decision: Decision::Alert,
            matched_rule: Some(matched_rule.into()),
            reason: Some(reason.into()),
        }
    }
}
