//! Per-tool-call hook dispatcher.
//!
//! Reads exactly one JSON record from stdin (200ms hard timeout), routes it
//! to the Policy Engine or Injection Detector, and writes exactly one JSON
//! record to stdout. Exit code 2 is the hard-block signal; 0 otherwise.
//! Any internal failure degrades to `{"continue":true}` on stdout with
//! exit 0 — fail-open at the transport layer, even though the policy and
//! injection decisions it reports are themselves fail-closed.

mod hardening;
mod input;
mod output;
mod route;

use std::path::PathBuf;

use aegis_checkpoint::CheckpointManager;
use aegis_eventlog::EventLog;
use aegis_injection::Allowlist;
use aegis_patterns::RuleSet;
use clap::Parser;

use crate::input::read_input_with_timeout;
use crate::output::HookOutput;
use crate::route::{route, RouteContext};

#[derive(Parser, Debug)]
#[command(name = "aegis-hook", about = "Trust & safety hook dispatcher")]
struct Args {
    /// Control plane state directory (checkpoints, events). Defaults to
    /// `~/.aegis/state`.
    #[arg(long)]
    state_root: Option<PathBuf>,

    /// Repository root the checkpointer operates against. Defaults to the
    /// current working directory.
    #[arg(long)]
    repo_root: Option<PathBuf>,

    /// Run user-prompt-submit in `principal_verify` mode instead of the
    /// default `principal_full`. There is no dedicated config table for
    /// this single knob; it is a deliberate CLI-level decision.
    #[arg(long)]
    verify_user_prompts: bool,
}

fn default_state_root() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".aegis")
        .join("state")
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let output = run(&args).await;
    output.emit();
    std::process::exit(output.exit_code());
}

async fn run(args: &Args) -> HookOutput {
    let input = match read_input_with_timeout().await {
        Some(input) => input,
        None => return HookOutput::Allow,
    };

    let state_root = args.state_root.clone().unwrap_or_else(default_state_root);
    let repo_root = args
        .repo_root
        .clone()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let config = match aegis_config::load_all() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "config load failed, using fail-closed fallback");
            return HookOutput::Allow;
        }
    };

    let injection_rules = RuleSet::with_builtins(aegis_patterns::injection_keyword_rules());
    let allowlist = Allowlist::default();
    let checkpoints = CheckpointManager::new(state_root.clone(), repo_root, config.checkpoint.clone());
    let events = EventLog::new(state_root);

    let ctx = RouteContext {
        policy: &config.policy,
        injection_rules: &injection_rules,
        allowlist: &allowlist,
        inference: None,
        verify_user_prompts: args.verify_user_prompts,
        checkpoints: &checkpoints,
        events: &events,
    };

    route(&input, &ctx).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_root_ends_in_aegis_state() {
        let root = default_state_root();
        assert!(root.ends_with(".aegis/state"));
    }
}
