//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

use crate::config::RetryConfig;

/// Delay to wait before the given retry attempt (1-based).
///
/// Grows exponentially from `base_delay_ms`, capped at `max_delay_ms`, with
/// up to 10% jitter so concurrent callers do not retry in lockstep.
pub fn delay_for_attempt(attempt: u32, retry: &RetryConfig) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponent = 2u64.saturating_pow(attempt - 1);
    let delay_ms = retry.base_delay_ms.saturating_mul(exponent);
    let capped = delay_ms.min(retry.max_delay_ms);

    let jitter_range = capped / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped + jitter)
}
