use std::path::PathBuf;

use aegis_budget::RateBudget;
use aegis_checkpoint::CheckpointManager;
use aegis_config::{GateMode, SelfModConfig};
use aegis_criteria::Criterion;
use aegis_eventlog::{Event, EventLog, Severity};
use aegis_trust::TrustManager;
use chrono::{DateTime, Utc};

use crate::approve::approve;
use crate::breaker::TokenBreaker;
use crate::error::SelfModError;
use crate::execute::{execute_and_verify, ExecuteOutcome, ProposalExecutor};
use crate::extract::{extract, forbidden_ruleset};
use crate::generate::generate;
use crate::harvest::{harvest, CreatorRegistry};
use crate::proposal::{proposal_id, today, Proposal, ProposalStatus};
use crate::validate::{is_injection_rejection, validate, AdversarialScorer};

const MIN_HARVEST_PRIORITY: u8 = 5;
const SELFMOD_CONSUMER: &str = "selfmod";

/// Wires the six self-modification phases (harvest, extract, validate,
/// generate, approve, execute) over a single repository's state, gated by
/// the rate budget and the hard token breaker between every phase.
pub struct SelfModPipeline {
    repo_root: PathBuf,
    config: SelfModConfig,
    gate_mode: GateMode,
    trust: TrustManager,
    budget: RateBudget,
    checkpoints: CheckpointManager,
    breaker: TokenBreaker,
    events: EventLog,
}

impl SelfModPipeline {
    pub fn new(
        state_root: impl Into<PathBuf>,
        repo_root: impl Into<PathBuf>,
        config: SelfModConfig,
        gate_mode: GateMode,
        trust: TrustManager,
        budget: RateBudget,
        checkpoints: CheckpointManager,
    ) -> Self {
        let state_root = state_root.into();
        Self {
            repo_root: repo_root.into(),
            breaker: TokenBreaker::new(&state_root, config.daily_token_cap),
            events: EventLog::new(&state_root),
            config,
            gate_mode,
            trust,
            budget,
            checkpoints,
        }
    }

    fn guard(&self, phase: &str) -> Result<(), SelfModError> {
        if let Some(reason) = self.load_trip_reason() {
            tracing::warn!(phase, reason, "self-mod phase blocked by tripped token breaker");
            return Err(SelfModError::BreakerTripped { reason });
        }
        let check = self.budget.check_budget(SELFMOD_CONSUMER, phase)?;
        if !check.allowed {
            let reason = check.reason.unwrap_or_else(|| "rate budget exhausted".to_string());
            tracing::warn!(phase, reason, "self-mod phase blocked by rate budget");
            return Err(SelfModError::BreakerTripped { reason });
        }
        Ok(())
    }

    fn load_trip_reason(&self) -> Option<String> {
        if self.breaker.is_tripped() {
            Some("self-modification token breaker is tripped".to_string())
        } else {
            None
        }
    }

    fn record_phase_tokens(&self, phase: &str, tokens: u64, now: DateTime<Utc>) -> Result<(), SelfModError> {
        self.budget.record_request(SELFMOD_CONSUMER, phase, None)?;
        let state = self.breaker.record_tokens(tokens, now)?;
        if state.tripped {
            self.events.emit(&Event::new(
                "selfmod-breaker-trip",
                Severity::Critical,
                state.trip_reason.clone().unwrap_or_default(),
            ));
        }
        Ok(())
    }

    /// Harvest, extract, validate, generate, and approve one cycle's worth
    /// of proposals. Returns every proposal that made it through
    /// generation, whatever status approval left it in. Rejections never
    /// become proposals — they're only recorded to the event log.
    pub async fn run_cycle(
        &self,
        registry: &dyn CreatorRegistry,
        scorers: &[Box<dyn AdversarialScorer>],
        now: DateTime<Utc>,
    ) -> Result<Vec<Proposal>, SelfModError> {
        self.guard("harvest")?;
        let artifacts = harvest(registry, MIN_HARVEST_PRIORITY).await;
        self.record_phase_tokens("harvest", 0, now)?;

        let forbidden = forbidden_ruleset(&self.config.forbidden_patterns);
        let mut proposals = Vec::new();
        let mut seq = 1u32;

        for artifact in &artifacts {
            self.guard("extract")?;
            let Some(insight) = extract(artifact, &forbidden) else {
                self.events.emit(&Event::new("selfmod-extract-rejected", Severity::Warn, artifact.label.clone()));
                continue;
            };

            self.guard("validate")?;
            let validation = validate(&insight, scorers).await;
            if validation.decision == crate::validate::Decision::Rejected {
                let severity = if is_injection_rejection(&validation) { Severity::Critical } else { Severity::Warn };
                self.events.emit(&Event::new("selfmod-validation-rejected", severity, insight.topic.clone()));
                continue;
            }

            self.guard("generate")?;
            let Ok(proposal) = generate(&insight, validation, &forbidden, &self.config.allowed_target_prefixes, now, seq) else {
                self.events.emit(&Event::new("selfmod-generate-rejected", Severity::Warn, insight.topic.clone()));
                continue;
            };
            seq += 1;

            self.guard("approve")?;
            let check = self.trust.check(proposal.category)?;
            let approved = approve(proposal, self.gate_mode, check);
            self.events.emit(
                &Event::new("selfmod-proposal-routed", Severity::Info, approved.id.clone())
                    .with_field("status", approved.status_str())
                    .with_field("category", approved.category.as_str()),
            );
            proposals.push(approved);
        }

        Ok(proposals)
    }

    /// Execute every `Approved` proposal in `proposals`, in order,
    /// checkpointing and verifying each one individually so a poisoned
    /// tree from one proposal never blocks evaluation of the next.
    pub async fn execute_approved(
        &self,
        proposals: &mut [Proposal],
        executor: &dyn ProposalExecutor,
        criteria_for: impl Fn(&Proposal) -> Vec<Criterion>,
    ) -> Result<Vec<ExecuteOutcome>, SelfModError> {
        let mut outcomes = Vec::new();
        for proposal in proposals.iter_mut() {
            if proposal.status != ProposalStatus::Approved {
                continue;
            }
            self.guard("execute")?;
            let criteria = criteria_for(proposal);
            let outcome = execute_and_verify(proposal, executor, &self.checkpoints, &self.trust, &criteria).await?;
            self.events.emit(
                &Event::new("selfmod-proposal-executed", Severity::Info, proposal.id.clone())
                    .with_field("status", proposal.status_str()),
            );
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    pub fn repo_root(&self) -> &std::path::Path {
        &self.repo_root
    }

    pub fn next_proposal_id(&self, now: DateTime<Utc>, seq: u32) -> String {
        proposal_id(today(now), seq)
    }
}
