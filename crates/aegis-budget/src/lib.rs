//! Persistent, multi-dimensional rate budget.
//!
//! `rate-state.json` under the configured root holds daily/hourly/monthly
//! counters, per-consumer and per-endpoint counters, the circuit breaker,
//! and the last-seen upstream rate-limit snapshot. A single `.lock` file
//! in the same directory serializes writers across processes — reads take
//! the lock too, since a stale read immediately followed by a write would
//! otherwise race.

mod breaker;
mod burst;
mod check;
mod state;

pub use breaker::{is_tripped, record_error as record_breaker_error, record_success as record_breaker_success};
pub use burst::{burst_outcome, BurstOutcome, BURST_GAP_MS, MAX_BURST_WAIT_MS};
pub use check::CheckResult;
pub use state::{daily_key, hourly_key, monthly_key, BreakerState, Counter, RateState, UpstreamSnapshot};

use std::path::PathBuf;

use aegis_config::BudgetConfig;
use chrono::Utc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BudgetError {
    #[error("failed to read rate state from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse rate state at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub struct RateBudget {
    root: PathBuf,
    config: BudgetConfig,
}

impl RateBudget {
    pub fn new(root: impl Into<PathBuf>, config: BudgetConfig) -> Self {
        Self { root: root.into(), config }
    }

    fn state_path(&self) -> PathBuf {
        self.root.join("rate-state.json")
    }

    /// A corrupt or missing state file starts fresh rather than erroring —
    /// losing in-flight counters is preferable to refusing all traffic.
    fn load(&self) -> RateState {
        let path = self.state_path();
        let Ok(content) = std::fs::read_to_string(&path) else {
            return RateState::default();
        };
        match serde_json::from_str(&content) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "corrupt rate state, starting fresh");
                RateState::default()
            }
        }
    }

    fn save(&self, state: &RateState) -> Result<(), BudgetError> {
        let path = self.state_path();
        let bytes = serde_json::to_vec_pretty(state).map_err(|e| BudgetError::Parse { path: path.clone(), source: e })?;
        aegis_fsutil::atomic_write(&path, &bytes).map_err(|e| BudgetError::Io { path, source: e })
    }

    /// Run `f` against the current state under the directory lock,
    /// persisting whatever `f` leaves behind. Serializes concurrent
    /// writers (and readers, since a stale read racing a concurrent write
    /// would be just as wrong) to a single rate-state file per process
    /// group.
    fn with_locked_state<R>(&self, f: impl FnOnce(&mut RateState) -> R) -> Result<R, BudgetError> {
        let _lock = aegis_fsutil::DirLock::acquire(&self.root)
            .map_err(|e| BudgetError::Io { path: self.root.clone(), source: e })?;
        let mut state = self.load();
        let result = f(&mut state);
        self.save(&state)?;
        Ok(result)
    }

    pub fn check_budget(&self, consumer: &str, endpoint_path: &str) -> Result<CheckResult, BudgetError> {
        self.with_locked_state(|state| check::check_budget(state, &self.config, consumer, endpoint_path, Utc::now()))
    }

    /// Returns whether the burst gate is clear, and if not, how the caller
    /// should proceed (sleep-and-retry vs. deny).
    pub fn burst_gate(&self) -> Result<BurstOutcome, BudgetError> {
        self.with_locked_state(|state| burst::burst_outcome(state.last_request_ts, Utc::now()))
    }

    /// Increments every counter atomically with respect to the next
    /// `check_budget`/`record_request` call. Updates the upstream snapshot
    /// when provided and newer than what's stored.
    pub fn record_request(&self, consumer: &str, endpoint: &str, header_snapshot: Option<UpstreamSnapshot>) -> Result<(), BudgetError> {
        self.with_locked_state(|state| {
            let now = Utc::now();
            state.daily.roll_and_increment(&daily_key(now));
            state.hourly.roll_and_increment(&hourly_key(now));
            state.monthly.roll_and_increment(&monthly_key(now));

            let consumer_counters = state.per_consumer.entry(consumer.to_string()).or_default();
            consumer_counters.daily.roll_and_increment(&daily_key(now));
            consumer_counters.hourly.roll_and_increment(&hourly_key(now));

            let endpoint_counter = state.per_endpoint.entry(endpoint.to_string()).or_default();
            endpoint_counter.roll_and_increment(&daily_key(now));

            state.last_request_ts = Some(now);
            breaker::record_success(&mut state.breaker);

            if let Some(snapshot) = header_snapshot {
                apply_newer_snapshot(state, snapshot);
            }
        })
    }

    pub fn record_error(&self) -> Result<(), BudgetError> {
        self.with_locked_state(|state| {
            breaker::record_error(&mut state.breaker, &self.config.circuit_breaker, Utc::now());
        })
    }

    /// Updates the stored upstream rate-limit snapshot without touching
    /// the breaker or any request counter. Use this for a rejected
    /// request (e.g. an upstream 429) that still carries a fresh
    /// `X-Ratelimit-*` header: the snapshot is worth keeping, but the
    /// request itself was never served and must not count toward usage,
    /// and `record_request`'s `breaker::record_success` must not run —
    /// that would wipe the error `record_error` just recorded for the
    /// same response.
    pub fn record_snapshot(&self, snapshot: UpstreamSnapshot) -> Result<(), BudgetError> {
        self.with_locked_state(|state| apply_newer_snapshot(state, snapshot))
    }
}

/// Replaces the stored upstream snapshot only if `snapshot` is at least as
/// recent as whatever's already there (or nothing is stored yet).
fn apply_newer_snapshot(state: &mut RateState, snapshot: UpstreamSnapshot) {
    let is_newer = state
        .upstream_snapshot
        .and_then(|existing| existing.observed_at)
        .zip(snapshot.observed_at)
        .map(|(existing_ts, new_ts)| new_ts >= existing_ts)
        .unwrap_or(true);
    if is_newer {
        state.upstream_snapshot = Some(snapshot);
    }
}
