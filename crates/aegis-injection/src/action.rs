use serde::Serialize;

/// What the detector decided to do with a scanned piece of content.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Record the detection for audit; never surface anything downstream.
    Log,
    /// Surface a short, non-leaking context string to the downstream LLM.
    /// `degraded` marks a critical-risk external detection that could not
    /// be dual-confirmed (single-signal or semantic timeout).
    Warn { context: String, degraded: bool },
    /// Stop the turn outright.
    Block { stop_reason: String },
}

impl Action {
    pub fn to_output(&self) -> OutputContract {
        match self {
            Action::Log => OutputContract {
                cont: true,
                context: None,
                stop_reason: None,
            },
            Action::Warn { context, .. } => OutputContract {
                cont: true,
                context: Some(context.clone()),
                stop_reason: None,
            },
            Action::Block { stop_reason } => OutputContract {
                cont: false,
                context: None,
                stop_reason: Some(stop_reason.clone()),
            },
        }
    }
}

/// The hook-facing JSON shape: `{continue:true}`, `{continue:true,
/// context:<string>}`, or `{continue:false, stopReason:<string>}`.
#[derive(Serialize, Debug, PartialEq)]
pub struct OutputContract {
    #[serde(rename = "continue")]
    pub cont: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "stopReason")]
    pub stop_reason: Option<String>,
}
