//! Delivery of rendered messages to a chat webhook.
//!
//! [`WebhookClient`] is the seam between the handler and the network. The
//! crate ships [`UreqWebhookClient`], which posts JSON to a Discord-style
//! execute-webhook endpoint.
//!
//! # Retry Semantics
//!
//! The client classifies HTTP responses for retry decisions:
//!
//! - **2xx**: Success.
//! - **429 (Too Many Requests)**: Retryable - sleep at least the server's
//!   `retry_after`, then retry.
//! - **5xx**: Retryable - apply backoff and retry.
//! - **4xx (except 429)**: Permanent failure - give up immediately.
//! - **Network errors**: Retryable - apply backoff and retry.
//!
//! Retries stop once the backoff deadline would be crossed. Every attempt
//! gets only what is left of the configured timeout, so one message never
//! takes longer than that timeout in total. The handler itself never
//! retries; a message that fails here is lost.

use std::sync::Arc;

use thiserror::Error;

use crate::embed::WebhookMessage;

mod backoff;
mod client;
mod config;
mod url;


pub use client::UreqWebhookClient;
pub use config::{BackoffPolicy, DEFAULT_TIMEOUT, WebhookClientConfig};
pub use url::WebhookUrl;

/// Errors raised while constructing a webhook client.
#[derive(Debug, Error)]
pub enum WebhookClientError {
    #[error("webhook URL must use http or https: {0}")]
    UnsupportedScheme(String),
    #[error("webhook URL has no host")]
    MissingHost,
    #[error("webhook URL must end in /webhooks/<id>/<token>")]
    MissingCredentials,
    #[error("invalid webhook id: {0}")]
    InvalidId(String),
    #[error("failed to initialise TLS: {0}")]
    Tls(#[from] native_tls::Error),
}

/// Errors raised while delivering one message.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("failed to serialise webhook message: {0}")]
    Serialise(#[from] serde_json::Error),
    #[error("webhook transport error: {0}")]
    Transport(String),
    #[error("webhook rejected message with status {code}: {body}")]
    Status { code: u16, body: String },
    #[error("webhook delivery gave up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },
}

/// Outcome of a successful delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub status: u16,
    pub attempts: u32,
    /// Id of the created message, when the endpoint was asked to wait.
    pub message_id: Option<String>,
}

/// Sends messages to a webhook endpoint.
///
/// Implementations must be thread-safe: the handler calls them from the
/// logging thread in synchronous mode and from worker threads otherwise.
pub trait WebhookClient: Send + Sync {
    fn create_message(&self, message: &WebhookMessage) -> Result<DeliveryReceipt, DeliveryError>;
}

/// Shared, thread-safe webhook client trait object.
pub type SharedClient = Arc<dyn WebhookClient>;
