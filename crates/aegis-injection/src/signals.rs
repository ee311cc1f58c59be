use std::time::Duration;

use async_trait::async_trait;

/// Output of an independent semantic classifier over a piece of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SemanticResult {
    pub confidence: f64,
}

/// An opaque semantic signal collaborator. Implementations may call out to
/// a model; this crate only ever awaits them behind [`semantic_signal`]'s
/// hard timeout and never depends on their internals.
#[async_trait]
pub trait Inference: Send + Sync {
    async fn scan(&self, text: &str) -> SemanticResult;
}

/// Hard 100ms budget for a semantic scan. A timeout degrades to "no
/// semantic signal" rather than propagating an error: the caller always
/// has a regex-only detection to fall back on.
const SEMANTIC_TIMEOUT: Duration = Duration::from_millis(100);

pub async fn semantic_signal(inference: &dyn Inference, text: &str) -> Option<SemanticResult> {
    match tokio::time::timeout(SEMANTIC_TIMEOUT, inference.scan(text)).await {
        Ok(result) => Some(result),
        Err(_) => None,
    }
}

/// Everything [`crate::decide`] needs beyond the pattern-engine [`crate::Detection`]
/// and the [`crate::TrustMode`].
#[derive(Clone, Debug, Default)]
pub struct ExtraSignals {
    /// Result of an independent semantic scan, or `None` if it timed out
    /// or was never run (e.g. regex risk didn't warrant one).
    pub semantic: Option<SemanticResult>,
    /// Session id or keyword allowlist hit; short-circuits to allow.
    pub allowlisted: bool,
    /// Research-context heuristic already evaluated by the caller.
    pub research_context: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Slow;
    #[async_trait]
    impl Inference for Slow {
        async fn scan(&self, _text: &str) -> SemanticResult {
            tokio::time::sleep(Duration::from_millis(500)).await;
            SemanticResult { confidence: 0.9 }
        }
    }

    struct Fast;
    #[async_trait]
    impl Inference for Fast {
        async fn scan(&self, _text: &str) -> SemanticResult {
            SemanticResult { confidence: 0.42 }
        }
    }

    #[tokio::test]
    async fn slow_inference_times_out_to_none() {
        let result = semantic_signal(&Slow, "text").await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn fast_inference_returns_its_confidence() {
        let result = semantic_signal(&Fast, "text").await;
        assert_eq!(result, Some(SemanticResult { confidence: 0.42 }));
    }
}
