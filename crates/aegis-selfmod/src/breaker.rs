use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BreakerError {
    #[error("failed to access breaker state at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse breaker state at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Unlike [`aegis_budget`]'s breaker, this one never untrips itself on a
/// cooldown timer: a self-modification pipeline that burns through its
/// daily token cap, or trips on a terminal error, stays stopped until an
/// operator explicitly resets it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BreakerState {
    pub tripped: bool,
    pub trip_reason: Option<String>,
    pub tokens_used_today: u64,
    pub day: Option<NaiveDate>,
}

pub struct TokenBreaker {
    root: PathBuf,
    daily_cap: u64,
}

impl TokenBreaker {
    pub fn new(root: impl Into<PathBuf>, daily_cap: u64) -> Self {
        Self { root: root.into(), daily_cap }
    }

    fn state_path(&self) -> PathBuf {
        self.root.join("selfmod-breaker.json")
    }

    fn load(&self) -> BreakerState {
        let path = self.state_path();
        let Ok(content) = std::fs::read_to_string(&path) else {
            return BreakerState::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    fn save(&self, state: &BreakerState) -> Result<(), BreakerError> {
        let path = self.state_path();
        let bytes = serde_json::to_vec_pretty(state).map_err(|e| BreakerError::Parse { path: path.clone(), source: e })?;
        aegis_fsutil::atomic_write(&path, &bytes).map_err(|e| BreakerError::Io { path, source: e })
    }

    /// Resets the per-day token counter at UTC midnight, but never resets
    /// `tripped` — only `reset` does that.
    fn rolled(&self, mut state: BreakerState, now: DateTime<Utc>) -> BreakerState {
        let today = now.date_naive();
        if state.day != Some(today) {
            state.day = Some(today);
            state.tokens_used_today = 0;
        }
        state
    }

    pub fn is_tripped(&self) -> bool {
        self.load().tripped
    }

    /// Record token usage, tripping the breaker if it pushes the day's
    /// total over the configured cap.
    pub fn record_tokens(&self, tokens: u64, now: DateTime<Utc>) -> Result<BreakerState, BreakerError> {
        let mut state = self.rolled(self.load(), now);
        state.tokens_used_today += tokens;
        if state.tokens_used_today > self.daily_cap {
            state.tripped = true;
            state.trip_reason = Some(format!(
                "daily token cap of {} exceeded ({} used)",
                self.daily_cap, state.tokens_used_today
            ));
        }
        self.save(&state)?;
        Ok(state)
    }

    pub fn trip(&self, reason: &str) -> Result<(), BreakerError> {
        let mut state = self.load();
        state.tripped = true;
        state.trip_reason = Some(reason.to_string());
        self.save(&state)
    }

    /// Explicit operator action. There is no automatic path back from
    /// tripped to untripped.
    pub fn reset(&self) -> Result<(), BreakerError> {
        let mut state = self.load();
        state.tripped = false;
        state.trip_reason = None;
        self.save(&state)
    }
}
