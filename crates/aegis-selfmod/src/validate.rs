use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::extract::ExtractedInsight;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Passed,
    Flagged,
    Rejected,
}

/// One scorer's verdict on an insight. `is_injection_hunter` marks the
/// scorer whose score feeds the dedicated injection gate rather than the
/// general weighted average.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScorerResult {
    pub name: String,
    pub weight: f64,
    pub score: f64,
    pub is_injection_hunter: bool,
}

/// An adversarial scorer: an independent judge of whether an insight is
/// safe to act on. Concrete scorers (an LLM-backed injection hunter, a
/// policy-compliance checker, …) are out of scope here; this is the seam.
#[async_trait]
pub trait AdversarialScorer: Send + Sync {
    fn name(&self) -> &str;
    fn weight(&self) -> f64;
    fn is_injection_hunter(&self) -> bool {
        false
    }
    async fn score(&self, insight: &ExtractedInsight) -> f64;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub scores: Vec<ScorerResult>,
    pub overall: f64,
    pub injection_score: f64,
    pub decision: Decision,
}

/// Weighted average of every scorer's score, and the injection hunter's
/// own score surfaced separately. Decision:
/// `injection < 0.7 → rejected; overall < 0.5 → rejected;
/// overall ≥ 0.6 AND injection ≥ 0.7 → passed; otherwise flagged`.
pub async fn validate(insight: &ExtractedInsight, scorers: &[Box<dyn AdversarialScorer>]) -> ValidationRecord {
    let mut results = Vec::with_capacity(scorers.len());
    for scorer in scorers {
        let score = scorer.score(insight).await;
        results.push(ScorerResult {
            name: scorer.name().to_string(),
            weight: scorer.weight(),
            score,
            is_injection_hunter: scorer.is_injection_hunter(),
        });
    }

    let total_weight: f64 = results.iter().map(|r| r.weight).sum();
    let overall = if total_weight > 0.0 {
        results.iter().map(|r| r.score * r.weight).sum::<f64>() / total_weight
    } else {
        0.0
    };

    let injection_score = results
        .iter()
        .find(|r| r.is_injection_hunter)
        .map(|r| r.score)
        .unwrap_or(0.0);

    let decision = decide(overall, injection_score);

    ValidationRecord { scores: results, overall, injection_score, decision }
}

fn decide(overall: f64, injection_score: f64) -> Decision {
    if injection_score < 0.7 {
        Decision::Rejected
    } else if overall < 0.5 {
        Decision::Rejected
    } else if overall >= 0.6 && injection_score >= 0.7 {
        Decision::Passed
    } else {
        Decision::Flagged
    }
}

/// A rejection is routed to the security-audit stream specifically when
/// the injection hunter itself is what failed it, rather than a low
/// overall score from unrelated scorers.
pub fn is_injection_rejection(record: &ValidationRecord) -> bool {
    record.decision == Decision::Rejected && record.injection_score < 0.7
}
