//! Exponential backoff with optional jitter.

use rand::Rng;
use std::time::Duration;

/// Delay before retry number `retry` (0-based): `base_ms * 2^retry`, capped at `max_ms`.
///
/// `jitter_ratio` adds up to that fraction of the capped delay at random;
/// 0.0 yields exact delays.
pub fn calculate_backoff(retry: u32, base_ms: u64, max_ms: u64, jitter_ratio: f64) -> Duration {
    let exponential_base = 2u64.saturating_pow(retry);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    let jitter_range = (capped_delay as f64 * jitter_ratio) as u64;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay.saturating_add(jitter))
}
