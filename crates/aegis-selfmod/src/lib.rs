//! Self-modification pipeline: harvest candidate insights, extract and
//! bound their content, adversarially validate them, generate proposals,
//! route them per gate mode and category trust, and execute the approved
//! ones under a checkpoint/rollback safety net.
//!
//! Each phase is a thin, independently-testable function; [`pipeline::SelfModPipeline`]
//! is the only piece that wires them together end to end, consulting
//! [`aegis_budget::RateBudget`] and its own hard [`breaker::TokenBreaker`]
//! between phases. The three genuinely external concerns — where insights
//! come from, who judges them, and what actually executes a proposal —
//! are traits ([`harvest::CreatorRegistry`], [`validate::AdversarialScorer`],
//! [`execute::ProposalExecutor`]) rather than anything concrete here.

mod approve;
mod breaker;
mod error;
mod execute;
mod extract;
mod generate;
mod harvest;
mod pipeline;
mod proposal;
mod validate;

pub use approve::approve;
pub use breaker::{BreakerError, BreakerState, TokenBreaker};
pub use error::SelfModError;
pub use execute::{execute_and_verify, ExecuteOutcome, ExecutionOutput, ProposalExecutor};
pub use extract::{extract, forbidden_ruleset, ExtractedInsight};
pub use generate::{classify_category, generate, GenerateRejection};
pub use harvest::{harvest, CreatorRegistry, HarvestedArtifact, RawArtifact};
pub use pipeline::SelfModPipeline;
pub use proposal::{proposal_id, today, Proposal, ProposalStatus, ProposedAction};
pub use validate::{is_injection_rejection, validate, AdversarialScorer, Decision, ScorerResult, ValidationRecord};
