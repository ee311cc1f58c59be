use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
    Critical,
}

/// `{kind, severity, timestamp, …payload}`. `kind` doubles as the category
/// used in filenames (e.g. `policy-block`, `injection-block`,
/// `trust-transition`). `summary` feeds the filename slug and is also kept
/// in the payload for readers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    pub kind: String,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
    pub summary: String,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl Event {
    pub fn new(kind: impl Into<String>, severity: Severity, summary: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            severity,
            timestamp: Utc::now(),
            summary: summary.into(),
            payload: serde_json::Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// Truncates to 500 chars, per the contract that block/confirm target
    /// strings recorded to the event log are length-bounded.
    pub fn with_truncated_target(self, key: impl Into<String>, target: &str) -> Self {
        let truncated: String = target.chars().take(500).collect();
        self.with_field(key, truncated)
    }

    pub(crate) fn summary_source(&self) -> String {
        self.summary.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_target_caps_at_500_chars() {
        let long = "x".repeat(1000);
        let event = Event::new("policy-block", Severity::Warn, "blocked")
            .with_truncated_target("target", &long);
        let stored = event.payload.get("target").unwrap().as_str().unwrap();
        assert_eq!(stored.chars().count(), 500);
    }

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
    }
}
