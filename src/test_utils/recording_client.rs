//! In-memory webhook client recording every message it is asked to send.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::{
    embed::{Embed, WebhookMessage},
    webhook::{DeliveryError, DeliveryReceipt, WebhookClient},
};

#[derive(Default)]
struct Inner {
    messages: Mutex<Vec<WebhookMessage>>,
    arrived: Condvar,
}

/// Webhook client double.
///
/// Clones share the same message log. A failing client still records each
/// attempt before returning an error.
#[derive(Clone, Default)]
pub struct RecordingClient {
    inner: Arc<Inner>,
    fail: bool,
    delay: Duration,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client whose every delivery fails with a 500 status.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Sleep for `delay` before recording each message.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// All messages received so far.
    pub fn messages(&self) -> Vec<WebhookMessage> {
        self.inner.messages.lock().clone()
    }

    /// The first embed of every message received so far.
    pub fn embeds(&self) -> Vec<Embed> {
        self.messages()
            .into_iter()
            .filter_map(|m| m.embeds.into_iter().next())
            .collect()
    }

    /// Block until at least `count` messages arrived or `timeout` elapsed.
    pub fn wait_for(&self, count: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut messages = self.inner.messages.lock();
        while messages.len() < count {
            if self
                .inner
                .arrived
                .wait_until(&mut messages, deadline)
                .timed_out()
            {
                return messages.len() >= count;
            }
        }
        true
    }
}

impl WebhookClient for RecordingClient {
    fn create_message(&self, message: &WebhookMessage) -> Result<DeliveryReceipt, DeliveryError> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        self.inner.messages.lock().push(message.clone());
        self.inner.arrived.notify_all();
        if self.fail {
            return Err(DeliveryError::Status {
                code: 500,
                body: "recording client configured to fail".into(),
            });
        }
        Ok(DeliveryReceipt {
            status: 204,
            attempts: 1,
            message_id: None,
        })
    }
}
