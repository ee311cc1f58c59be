use chrono::{DateTime, Utc};

/// Minimum gap enforced between outbound requests.
pub const BURST_GAP_MS: i64 = 2000;

/// Beyond this required wait the Gateway denies instead of sleeping.
pub const MAX_BURST_WAIT_MS: i64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstOutcome {
    /// The 2-second gap has already elapsed; proceed immediately.
    Ready,
    /// Sleep this many milliseconds, then proceed.
    Wait(u64),
    /// The wait would exceed 5 seconds; the caller should deny instead.
    Deny(u64),
}

pub fn burst_outcome(last_request_ts: Option<DateTime<Utc>>, now: DateTime<Utc>) -> BurstOutcome {
    let Some(last) = last_request_ts else {
        return BurstOutcome::Ready;
    };

    let elapsed_ms = (now - last).num_milliseconds();
    if elapsed_ms >= BURST_GAP_MS {
        return BurstOutcome::Ready;
    }

    let needed = (BURST_GAP_MS - elapsed_ms).max(0) as u64;
    if needed as i64 <= MAX_BURST_WAIT_MS {
        BurstOutcome::Wait(needed)
    } else {
        BurstOutcome::Deny(needed)
    }
}
