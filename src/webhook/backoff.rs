//! Exponential backoff state for retrying a single webhook message.

use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::config::BackoffPolicy;

const MIN_SLEEP_MS: u64 = 10;

/// Tracks retry attempts for one message and produces jittered delays.
pub struct BackoffState {
    policy: BackoffPolicy,
    current: Duration,
    failure_since: Option<Instant>,
    rng: StdRng,
}

impl BackoffState {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            current: policy.base,
            failure_since: None,
            rng: StdRng::from_entropy(),
            policy,
        }
    }

    /// Calculate the next jittered sleep following a failure at `now`.
    ///
    /// `floor` is a server-provided minimum (e.g. `retry_after`). Returns
    /// `None` once sleeping would cross the policy deadline.
    pub fn next_sleep(&mut self, now: Instant, floor: Option<Duration>) -> Option<Duration> {
        let start = *self.failure_since.get_or_insert(now);
        let elapsed = now.duration_since(start);
        if elapsed >= self.policy.deadline {
            return None;
        }

        if now != start {
            self.current = self.current.saturating_mul(2).min(self.policy.cap);
        }

        let max_ms = u64::try_from(self.current.as_millis()).unwrap_or(u64::MAX);
        let jittered = match max_ms {
            0 => MIN_SLEEP_MS,
            1..=MIN_SLEEP_MS => max_ms,
            _ => self.rng.gen_range(MIN_SLEEP_MS..=max_ms),
        };
        let sleep = Duration::from_millis(jittered).max(floor.unwrap_or_default());

        if elapsed.saturating_add(sleep) > self.policy.deadline {
            return None;
        }
        Some(sleep)
    }
}
