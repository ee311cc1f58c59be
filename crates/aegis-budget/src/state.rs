use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A counter keyed by the current rollover period (`YYYY-MM-DD`,
/// `YYYY-MM-DDTHH`, or `YYYY-MM`). Rollover is detected on every access by
/// comparing the stored key to the current one; on mismatch the counter is
/// zeroed before the access proceeds, so no read ever observes a count
/// carried over from a prior period.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Counter {
    pub key: String,
    pub count: u64,
}

impl Counter {
    pub fn roll_and_get(&mut self, current_key: &str) -> u64 {
        if self.key != current_key {
            self.key = current_key.to_string();
            self.count = 0;
        }
        self.count
    }

    pub fn roll_and_increment(&mut self, current_key: &str) {
        self.roll_and_get(current_key);
        self.count += 1;
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConsumerCounters {
    pub daily: Counter,
    pub hourly: Counter,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct UpstreamSnapshot {
    pub count: u64,
    pub limit: u64,
    /// Unix epoch seconds at which the upstream window resets, taken
    /// verbatim from `X-Ratelimit-Reset`.
    #[serde(default)]
    pub reset: Option<i64>,
    pub observed_at: Option<DateTime<Utc>>,
}

impl UpstreamSnapshot {
    pub fn percent(&self) -> f64 {
        if self.limit == 0 {
            0.0
        } else {
            self.count as f64 / self.limit as f64
        }
    }

    /// The snapshot is authoritative only while it is the most recent
    /// signal available; a stale one (older than `max_age`) is ignored in
    /// favor of the local counter.
    pub fn is_fresh(&self, now: DateTime<Utc>, max_age: chrono::Duration) -> bool {
        match self.observed_at {
            Some(ts) => now - ts <= max_age,
            None => false,
        }
    }

    /// Whether the upstream's own reset epoch has already passed, in which
    /// case `count`/`percent` describe a window that no longer applies.
    pub fn reset_has_elapsed(&self, now: DateTime<Utc>) -> bool {
        match self.reset {
            Some(epoch) => now.timestamp() >= epoch,
            None => false,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BreakerState {
    /// Error timestamps within the trip-detection window, oldest first.
    pub error_timestamps: Vec<DateTime<Utc>>,
    pub consecutive_errors: u32,
    pub tripped_until: Option<DateTime<Utc>>,
    pub extended: bool,
}

/// The full persistent state backing `rate-state.json`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RateState {
    pub daily: Counter,
    pub hourly: Counter,
    pub monthly: Counter,
    #[serde(default)]
    pub per_consumer: HashMap<String, ConsumerCounters>,
    #[serde(default)]
    pub per_endpoint: HashMap<String, Counter>,
    #[serde(default)]
    pub breaker: BreakerState,
    #[serde(default)]
    pub last_request_ts: Option<DateTime<Utc>>,
    #[serde(default)]
    pub upstream_snapshot: Option<UpstreamSnapshot>,
}

pub fn daily_key(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

pub fn hourly_key(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H").to_string()
}

pub fn monthly_key(at: DateTime<Utc>) -> String {
    at.format("%Y-%m").to_string()
}
