use chrono::{DateTime, Utc};
use serde::Serialize;

use aegis_config::BudgetConfig;

use crate::breaker;
use crate::state::{daily_key, hourly_key, RateState};

#[derive(Clone, Debug, Serialize)]
pub struct CheckResult {
    pub allowed: bool,
    pub cache_only: bool,
    pub wait_ms: Option<u64>,
    pub reason: Option<String>,
    pub remaining_daily: i64,
    pub remaining_hourly: i64,
}

impl CheckResult {
    fn deny(reason: &str, remaining_daily: i64, remaining_hourly: i64) -> Self {
        Self {
            allowed: false,
            cache_only: false,
            wait_ms: None,
            reason: Some(reason.to_string()),
            remaining_daily,
            remaining_hourly,
        }
    }

    fn allow(cache_only: bool, reason: Option<String>, remaining_daily: i64, remaining_hourly: i64) -> Self {
        Self {
            allowed: true,
            cache_only,
            wait_ms: None,
            reason,
            remaining_daily,
            remaining_hourly,
        }
    }
}

const HARD_CAP_PCT: f64 = 0.90;
const SOFT_CAP_PCT: f64 = 0.85;
const UPSTREAM_SNAPSHOT_MAX_AGE_SECS: i64 = 120;

/// Evaluate whether `consumer` may proceed, per the documented
/// short-circuiting order: breaker, upstream hard-cap, global cap, global
/// soft-cap, then the consumer's own allocation (with borrowing if
/// configured).
pub fn check_budget(state: &mut RateState, config: &BudgetConfig, consumer: &str, endpoint_path: &str, now: DateTime<Utc>) -> CheckResult {
    let daily_key_now = daily_key(now);
    let hourly_key_now = hourly_key(now);

    let daily_count = state.daily.roll_and_get(&daily_key_now);
    let hourly_count = state.hourly.roll_and_get(&hourly_key_now);

    let remaining_daily = config.global.daily as i64 - daily_count as i64;
    let remaining_hourly = config.global.hourly as i64 - hourly_count as i64;

    if breaker::is_tripped(&state.breaker, now) {
        return CheckResult::deny("breaker", remaining_daily, remaining_hourly);
    }

    if let Some(snapshot) = state.upstream_snapshot {
        let max_age = chrono::Duration::seconds(UPSTREAM_SNAPSHOT_MAX_AGE_SECS);
        if snapshot.is_fresh(now, max_age)
            && !snapshot.reset_has_elapsed(now)
            && snapshot.percent() >= HARD_CAP_PCT
            && endpoint_path != "/profile"
        {
            return CheckResult::deny("hard-cap", remaining_daily, remaining_hourly);
        }
    }

    if config.global.daily > 0 && daily_count >= config.global.daily {
        return CheckResult::deny("global-daily-cap", remaining_daily, remaining_hourly);
    }

    if config.global.daily > 0 && (daily_count as f64) >= config.global.daily as f64 * SOFT_CAP_PCT {
        let pct = ((daily_count as f64 / config.global.daily as f64) * 100.0).round() as u32;
        return CheckResult::allow(
            true,
            Some(format!("~{pct}% global usage \u{2013} cache-only")),
            remaining_daily,
            remaining_hourly,
        );
    }

    let consumer_counters = state.per_consumer.entry(consumer.to_string()).or_default();
    let consumer_daily = consumer_counters.daily.roll_and_get(&daily_key_now);

    let Some(consumer_cfg) = config.consumers.get(consumer) else {
        // No explicit allocation: treated as unrestricted beyond the global caps
        // already checked above.
        return CheckResult::allow(false, None, remaining_daily, remaining_hourly);
    };

    if consumer_cfg.daily == 0 || consumer_daily < consumer_cfg.daily {
        return CheckResult::allow(false, None, remaining_daily, remaining_hourly);
    }

    if consumer_cfg.may_borrow {
        let mut effective_limit = consumer_cfg.daily;
        let unused_reserve: u64 = config
            .consumers
            .iter()
            .filter(|(name, _)| name.as_str() != consumer)
            .map(|(name, other_cfg)| {
                let used = state
                    .per_consumer
                    .get(name)
                    .map(|c| c.daily.count)
                    .unwrap_or(0);
                other_cfg.daily.saturating_sub(used)
            })
            .sum();

        if consumer_cfg.priority == 1 {
            let non_priority_one_unused: u64 = config
                .consumers
                .iter()
                .filter(|(name, cfg)| name.as_str() != consumer && cfg.priority != 1)
                .map(|(name, other_cfg)| {
                    let used = state
                        .per_consumer
                        .get(name)
                        .map(|c| c.daily.count)
                        .unwrap_or(0);
                    other_cfg.daily.saturating_sub(used)
                })
                .sum();
            effective_limit += non_priority_one_unused;
        } else {
            effective_limit += unused_reserve;
        }

        if consumer_daily < effective_limit {
            return CheckResult::allow(false, Some("borrowed-capacity".to_string()), remaining_daily, remaining_hourly);
        }
    }

    CheckResult::deny("consumer-daily-cap", remaining_daily, remaining_hourly)
}
