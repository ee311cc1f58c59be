//! Trust-mode-aware decision layer over [`aegis_patterns`] detections.
//!
//! [`decide`] is a pure function: everything context-dependent (allowlist
//! membership, the research-context heuristic, the semantic scan result)
//! is threaded in explicitly via [`ExtraSignals`] rather than looked up.
//! Callers own the I/O — running the [`Inference`] collaborator behind
//! [`semantic_signal`]'s 100ms timeout, checking the [`Allowlist`], and
//! evaluating [`looks_like_research_context`] — before calling `decide`.

mod action;
mod allowlist;
mod decide;
mod mode;
mod research;
mod signals;

pub use action::{Action, OutputContract};
pub use allowlist::Allowlist;
pub use decide::decide;
pub use mode::TrustMode;
pub use research::looks_like_research_context;
pub use signals::{semantic_signal, ExtraSignals, Inference, SemanticResult};
