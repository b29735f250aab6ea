//! Configuration consumed by [`UreqWebhookClient`](super::UreqWebhookClient).

use std::time::Duration;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Default base delay for exponential backoff retries.
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(250);
/// Default maximum delay for exponential backoff retries.
pub const DEFAULT_BACKOFF_CAP: Duration = Duration::from_secs(5);
/// Default absolute deadline for retrying one message.
pub const DEFAULT_BACKOFF_DEADLINE: Duration = DEFAULT_TIMEOUT;

/// Exponential backoff policy for retrying one message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub base: Duration,
    pub cap: Duration,
    /// Time after the first failure beyond which no retry is attempted.
    pub deadline: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base: DEFAULT_BACKOFF_BASE,
            cap: DEFAULT_BACKOFF_CAP,
            deadline: DEFAULT_BACKOFF_DEADLINE,
        }
    }
}

impl BackoffPolicy {
    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self {
            deadline: Duration::ZERO,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug)]
pub struct WebhookClientConfig {
    /// Budget for delivering one message: every attempt and backoff sleep
    /// must finish within it.
    pub timeout: Duration,
    pub backoff: BackoffPolicy,
    /// Ask Discord to reply with the created message (`?wait=true`).
    pub wait: bool,
    /// Post into a thread of a forum or text channel.
    pub thread_id: Option<String>,
    /// Override the webhook's display name.
    pub username: Option<String>,
    /// Override the webhook's avatar.
    pub avatar_url: Option<String>,
}

impl Default for WebhookClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            backoff: BackoffPolicy::default(),
            wait: false,
            thread_id: None,
            username: None,
            avatar_url: None,
        }
    }
}

impl WebhookClientConfig {
    /// Use `timeout` as the delivery budget and as the retry deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.backoff.deadline = timeout;
        self
    }

    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }
}
