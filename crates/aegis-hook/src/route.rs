use std::path::Path;

use aegis_checkpoint::CheckpointManager;
use aegis_config::PolicyConfig;
use aegis_eventlog::{Event, EventLog, Severity};
use aegis_injection::{
    decide, looks_like_research_context, semantic_signal, Allowlist, ExtraSignals, Inference,
    TrustMode,
};
use aegis_patterns::RuleSet;
use aegis_policy::{normalize_path, validate_path, validate_shell, Decision, FileAction, RuleOutcome};

use crate::input::HookInput;
use crate::output::{from_injection_action, from_policy_outcome, HookOutput};

/// Everything a single dispatch needs that isn't carried on the input
/// record itself: loaded config, the injection rule set, the allowlist,
/// an optional semantic collaborator, and whether user-prompt-submit
/// should run in `principal_full` or `principal_verify` mode.
pub struct RouteContext<'a> {
    pub policy: &'a PolicyConfig,
    pub injection_rules: &'a RuleSet,
    pub allowlist: &'a Allowlist,
    pub inference: Option<&'a dyn Inference>,
    pub verify_user_prompts: bool,
    pub checkpoints: &'a CheckpointManager,
    pub events: &'a EventLog,
}

/// Per spec.md 4.6: every block/confirm Policy Engine decision is recorded
/// with its (truncated) target, matched rule, and reason.
fn log_policy_decision(events: &EventLog, kind: &str, target: &str, outcome: &RuleOutcome) {
    let severity = match outcome.decision {
        Decision::Block => Severity::Critical,
        Decision::Confirm => Severity::Warn,
        Decision::Allow | Decision::Alert => return,
    };
    let reason = outcome.reason.clone().unwrap_or_default();
    let event = Event::new(format!("policy-{kind}"), severity, reason.clone())
        .with_truncated_target("target", target)
        .with_field("decision", format!("{:?}", outcome.decision).to_lowercase())
        .with_field(
            "matched_rule",
            outcome.matched_rule.clone().unwrap_or_default(),
        )
        .with_field("reason", reason);
    events.emit(&event);
}

/// Dispatches by `hook_event_name` (and, for pre-tool events, `tool_name`)
/// to the Policy Engine or Injection Detector, per spec.md 4.12.
pub async fn route(input: &HookInput, ctx: &RouteContext<'_>) -> HookOutput {
    match input.hook_event_name.as_str() {
        "pre-tool-use" | "PreToolUse" => route_pre_tool(input, ctx).await,
        "post-tool-use" | "PostToolUse" => route_post_tool(input, ctx).await,
        "user-prompt-submit" | "UserPromptSubmit" => route_user_prompt(input, ctx).await,
        "session-start" | "SessionStart" => route_session_start(ctx).await,
        other => {
            tracing::warn!(hook_event_name = other, "unrecognized hook event, allowing");
            HookOutput::Allow
        }
    }
}

fn is_shell_tool(tool_name: &str) -> bool {
    matches!(tool_name, "Bash" | "Shell" | "Exec")
}

/// Path fragments identifying the core's own security/state logs, the
/// `warn-only` memory sub-tier that never blocks per spec.md 4.7. Anything
/// under `memory/` that doesn't match one of these is treated as a
/// protected learning-corpus/synthesis/harvested-content path.
const WARN_ONLY_MEMORY_MARKERS: &[&str] = &["memory/security", "memory/state", "memory/audit", "memory/events"];

fn is_memory_write(tool_name: &str, normalized_path: &str) -> bool {
    (tool_name == "Write" || tool_name == "Edit") && normalized_path.contains("memory")
}

/// Classifies an already-normalized memory path by prefix, per spec.md
/// 4.7's "path classification is by prefix after symlink resolution."
fn is_protected_memory_path(normalized_path: &str) -> bool {
    !WARN_ONLY_MEMORY_MARKERS.iter().any(|marker| normalized_path.contains(marker))
}

async fn route_pre_tool(input: &HookInput, ctx: &RouteContext<'_>) -> HookOutput {
    let Some(tool_name) = input.tool_name.as_deref() else {
        return HookOutput::Allow;
    };
    let Some(tool_input) = &input.tool_input else {
        return HookOutput::Allow;
    };

    if is_shell_tool(tool_name) {
        let Some(command) = tool_input.get("command").and_then(|v| v.as_str()) else {
            return HookOutput::Allow;
        };
        let outcome = validate_shell(ctx.policy, command);
        log_policy_decision(ctx.events, "shell", command, &outcome);
        return from_policy_outcome(&outcome);
    }

    let Some(file_path) = tool_input.get("file_path").and_then(|v| v.as_str()) else {
        return HookOutput::Allow;
    };

    let normalized_path = normalize_path(Path::new(file_path)).to_string_lossy().to_lowercase();
    if is_memory_write(tool_name, &normalized_path) {
        let content = tool_input
            .get("content")
            .or_else(|| tool_input.get("new_string"))
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let protected = is_protected_memory_path(&normalized_path);
        return scan_injection(
            content,
            &input.session_id,
            TrustMode::MemoryWrite { protected },
            ctx,
        )
        .await;
    }

    let action = match tool_name {
        "Read" => FileAction::Read,
        "Write" => FileAction::Write { via_edit_tool: false },
        "Edit" => FileAction::Write { via_edit_tool: true },
        "Delete" | "Remove" => FileAction::Delete,
        _ => return HookOutput::Allow,
    };
    let outcome = validate_path(ctx.policy, Path::new(file_path), action);
    log_policy_decision(ctx.events, "path", file_path, &outcome);
    from_policy_outcome(&outcome)
}

async fn route_post_tool(input: &HookInput, ctx: &RouteContext<'_>) -> HookOutput {
    let Some(output) = input.tool_output.as_deref() else {
        return HookOutput::Allow;
    };
    scan_injection(output, &input.session_id, TrustMode::External, ctx).await
}

async fn route_user_prompt(input: &HookInput, ctx: &RouteContext<'_>) -> HookOutput {
    let Some(prompt) = input.prompt_text() else {
        return HookOutput::Allow;
    };
    let mode = if ctx.verify_user_prompts {
        TrustMode::PrincipalVerify
    } else {
        TrustMode::PrincipalFull
    };
    scan_injection(prompt, &input.session_id, mode, ctx).await
}

async fn route_session_start(ctx: &RouteContext<'_>) -> HookOutput {
    match ctx.checkpoints.checkpoint("session-start", None).await {
        Ok(checkpoint) if checkpoint.health_before.poisoned() => HookOutput::AllowWithContext(
            format!(
                "session-start health check found a poisoned state (score {})",
                checkpoint.health_before.score()
            ),
        ),
        Ok(_) => HookOutput::Allow,
        Err(e) => {
            tracing::warn!(error = %e, "session-start health check failed, allowing");
            HookOutput::Allow
        }
    }
}

async fn scan_injection(
    text: &str,
    session_id: &str,
    mode: TrustMode,
    ctx: &RouteContext<'_>,
) -> HookOutput {
    let detection = ctx.injection_rules.scan(text);

    let semantic = match ctx.inference {
        Some(inference) if detection.detected() => semantic_signal(inference, text).await,
        _ => None,
    };

    let extra = ExtraSignals {
        semantic,
        allowlisted: ctx.allowlist.is_allowlisted(session_id, text),
        research_context: matches!(mode, TrustMode::PrincipalVerify) && looks_like_research_context(text),
    };

    from_injection_action(&decide(&detection, mode, &extra))
}
