use std::io::Read;
use std::time::Duration;

use serde::Deserialize;

/// Hard budget for reading the hook's stdin record. Absence of input by
/// this deadline (a host that never writes, or a slow pipe) degrades to
/// "no input" rather than blocking the hook indefinitely.
const STDIN_TIMEOUT: Duration = Duration::from_millis(200);

/// The union of fields a hook record may carry, keyed by `hook_event_name`.
#[derive(Clone, Debug, Deserialize)]
pub struct HookInput {
    pub session_id: String,
    pub hook_event_name: String,
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub tool_input: Option<serde_json::Value>,
    #[serde(default)]
    pub tool_output: Option<String>,
    #[serde(default)]
    pub user_prompt: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub transcript_path: Option<String>,
}

impl HookInput {
    /// `user_prompt` and `prompt` are aliases for the same field across
    /// host versions; callers only ever want "the prompt text, if any".
    pub fn prompt_text(&self) -> Option<&str> {
        self.user_prompt
            .as_deref()
            .or(self.prompt.as_deref())
    }
}

/// Read one JSON record from stdin on a blocking thread, racing it against
/// [`STDIN_TIMEOUT`]. Returns `None` on timeout, empty input, or a parse
/// failure — all three are fail-open conditions at the transport layer.
pub async fn read_input_with_timeout() -> Option<HookInput> {
    let read = tokio::task::spawn_blocking(|| {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).ok()?;
        Some(buf)
    });

    let raw = match tokio::time::timeout(STDIN_TIMEOUT, read).await {
        Ok(Ok(Some(raw))) => raw,
        Ok(Ok(None)) | Ok(Err(_)) | Err(_) => return None,
    };

    if raw.trim().is_empty() {
        return None;
    }

    serde_json::from_str(&raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_text_prefers_user_prompt_over_prompt_alias() {
        let input = HookInput {
            session_id: "s1".to_string(),
            hook_event_name: "user-prompt-submit".to_string(),
            tool_name: None,
            tool_input: None,
            tool_output: None,
            user_prompt: Some("from user_prompt".to_string()),
            prompt: Some("from prompt".to_string()),
            transcript_path: None,
        };
        assert_eq!(input.prompt_text(), Some("from user_prompt"));
    }

    #[test]
    fn prompt_text_falls_back_to_prompt_alias() {
        let input = HookInput {
            session_id: "s1".to_string(),
            hook_event_name: "user-prompt-submit".to_string(),
            tool_name: None,
            tool_input: None,
            tool_output: None,
            user_prompt: None,
            prompt: Some("from prompt".to_string()),
            transcript_path: None,
        };
        assert_eq!(input.prompt_text(), Some("from prompt"));
    }

    #[test]
    fn deserializes_minimal_record() {
        let raw = r#"{"session_id":"s1","hook_event_name":"session-start"}"#;
        let input: HookInput = serde_json::from_str(raw).unwrap();
        assert_eq!(input.session_id, "s1");
        assert!(input.tool_name.is_none());
    }
}
