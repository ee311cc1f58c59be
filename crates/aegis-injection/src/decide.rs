use aegis_patterns::{Detection, RiskLevel, RuleMatch};

use crate::action::Action;
use crate::mode::TrustMode;
use crate::signals::ExtraSignals;

/// Confidence threshold both the regex and semantic signal must clear for
/// a dual-confirmed block on external critical-risk content.
const DUAL_SIGNAL_THRESHOLD: f64 = 0.70;

/// Pure decision function: no I/O, no config lookups. `extra_signals`
/// carries everything context-dependent (allowlist membership, the
/// research-context heuristic, and the semantic scan result) so this
/// function stays trivially testable.
pub fn decide(detection: &Detection, trust_mode: TrustMode, extra: &ExtraSignals) -> Action {
    if extra.allowlisted {
        return Action::Log;
    }

    match trust_mode {
        TrustMode::PrincipalFull => Action::Log,
        TrustMode::PrincipalVerify => decide_principal_verify(detection, extra),
        TrustMode::External => decide_external(detection, extra),
        TrustMode::MemoryWrite { protected } => decide_memory_write(detection, protected),
    }
}

fn decide_principal_verify(detection: &Detection, extra: &ExtraSignals) -> Action {
    if extra.research_context {
        return Action::Log;
    }
    if detection.risk_level == RiskLevel::Critical {
        warn(detection, "principal_verify", false)
    } else {
        Action::Log
    }
}

fn decide_external(detection: &Detection, extra: &ExtraSignals) -> Action {
    match detection.risk_level {
        RiskLevel::Critical => {
            let regex_confident = detection.max_confidence() >= DUAL_SIGNAL_THRESHOLD;
            let semantic_confident = extra
                .semantic
                .map(|s| s.confidence >= DUAL_SIGNAL_THRESHOLD)
                .unwrap_or(false);

            if regex_confident && semantic_confident {
                block(detection, "external", "Dual-confirmed critical injection detected.")
            } else {
                warn(detection, "external", true)
            }
        }
        RiskLevel::High => warn(detection, "external", false),
        RiskLevel::Medium | RiskLevel::Low | RiskLevel::None => Action::Log,
    }
}

fn decide_memory_write(detection: &Detection, protected: bool) -> Action {
    if protected {
        match detection.risk_level {
            RiskLevel::Critical => block(detection, "memory_write", "Critical injection detected in a protected memory path."),
            RiskLevel::High => warn(detection, "memory_write", false),
            _ => Action::Log,
        }
    } else {
        // warn-only paths (the core's own security/state logs) never block.
        match detection.risk_level {
            RiskLevel::Critical | RiskLevel::High => warn(detection, "memory_write", false),
            _ => Action::Log,
        }
    }
}

fn top_match(detection: &Detection) -> Option<&RuleMatch> {
    detection
        .matches
        .iter()
        .max_by(|a, b| a.confidence.partial_cmp(&b.confidence).unwrap())
}

/// Context text naming source, risk level, top technique, and its
/// confidence. Never includes the matched content itself.
fn describe(detection: &Detection, source: &str, label: &str) -> String {
    match top_match(detection) {
        Some(m) => format!(
            "[{label}] source={source} risk={} technique={} confidence={:.2}",
            detection.risk_level, m.rule_name, m.confidence
        ),
        None => format!("[{label}] source={source} risk={}", detection.risk_level),
    }
}

fn warn(detection: &Detection, source: &str, degraded: bool) -> Action {
    let label = if degraded { "degraded-critical" } else { "warn" };
    Action::Warn {
        context: describe(detection, source, label),
        degraded,
    }
}

/// `headline` is the mandatory lead sentence callers must keep stable since
/// downstream consumers (and spec.md's worked scenarios) match on it; the
/// generic `describe` tail is appended for the technique/confidence detail.
fn block(detection: &Detection, source: &str, headline: &str) -> Action {
    Action::Block {
        stop_reason: format!("[SECURITY BLOCK] {headline} {}", describe(detection, source, "blocked")),
    }
}
