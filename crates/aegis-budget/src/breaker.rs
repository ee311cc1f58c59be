use chrono::{DateTime, Utc};

use aegis_config::CircuitBreakerConfig;

use crate::state::BreakerState;

/// `true` while the breaker denies all requests.
pub fn is_tripped(state: &BreakerState, now: DateTime<Utc>) -> bool {
    matches!(state.tripped_until, Some(until) if now < until)
}

/// Record an upstream error. Trips the breaker once `threshold` errors
/// have landed within `window_min`; a trip that fires again while still in
/// cooldown extends the cooldown to `extended_cooldown_min` instead of the
/// normal `cooldown_min`.
pub fn record_error(state: &mut BreakerState, config: &CircuitBreakerConfig, now: DateTime<Utc>) {
    state.consecutive_errors += 1;
    state.error_timestamps.push(now);

    let window = chrono::Duration::minutes(config.window_min as i64);
    state.error_timestamps.retain(|ts| now - *ts <= window);

    if state.error_timestamps.len() as u32 >= config.threshold {
        let already_tripped = is_tripped(state, now);
        let cooldown_min = if already_tripped {
            state.extended = true;
            config.extended_cooldown_min
        } else {
            config.cooldown_min
        };
        state.tripped_until = Some(now + chrono::Duration::minutes(cooldown_min as i64));
        if !already_tripped {
            state.extended = false;
        }
        state.error_timestamps.clear();
    }
}

/// A successful request in closed state resets the consecutive-error
/// counter. It does not clear an active trip.
pub fn record_success(state: &mut BreakerState) {
    state.consecutive_errors = 0;
    state.error_timestamps.clear();
}
