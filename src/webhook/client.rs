//! HTTP webhook client built on `ureq`.

use std::{
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use log::debug;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use ureq::{Agent, AgentBuilder};

use crate::{
    embed::WebhookMessage,
    handler::SharedHandler,
    level::FemtoLevel,
    log_record::FemtoLogRecord,
};

use super::{
    DeliveryError, DeliveryReceipt, WebhookClient, WebhookClientError,
    backoff::BackoffState,
    config::WebhookClientConfig,
    url::WebhookUrl,
};

/// Logger name used for diagnostic records sent to the diagnostic handler.
pub const DIAGNOSTIC_LOGGER: &str = "femtologging_discord.webhook";

/// Classification of HTTP response for retry logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    /// 2xx responses - request succeeded.
    Success,
    /// 5xx, 429, or network errors - retry with backoff.
    Retryable,
    /// 4xx (except 429) - permanent failure, do not retry.
    Permanent,
}

/// Classifies an HTTP status code for retry logic.
pub(crate) fn classify_status(status: u16) -> ResponseClass {
    match status {
        200..=299 => ResponseClass::Success,
        429 | 500..=599 => ResponseClass::Retryable,
        _ => ResponseClass::Permanent,
    }
}

enum Attempt {
    Delivered { status: u16, body: String },
    Retry { reason: String, floor: Option<Duration> },
    Rejected { code: u16, body: String },
}

/// Webhook client posting JSON with a pooled `ureq` agent.
///
/// When a diagnostic handler is attached, every message that is finally
/// given up on is reported to it as a `WARN` record.
pub struct UreqWebhookClient {
    url: WebhookUrl,
    agent: Agent,
    config: WebhookClientConfig,
    diagnostics: Option<SharedHandler>,
}

impl UreqWebhookClient {
    /// Validate `raw_url` and build the HTTP agent.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookClientError`] if the URL is malformed or the TLS
    /// connector cannot be created.
    pub fn new(raw_url: &str, config: WebhookClientConfig) -> Result<Self, WebhookClientError> {
        let url = WebhookUrl::parse(raw_url)?;
        let tls = native_tls::TlsConnector::new()?;
        let agent = AgentBuilder::new()
            .tls_connector(Arc::new(tls))
            .timeout(config.timeout)
            .build();
        Ok(Self {
            url,
            agent,
            config,
            diagnostics: None,
        })
    }

    /// Report delivery failures to `handler`.
    pub fn with_diagnostics(mut self, handler: SharedHandler) -> Self {
        self.diagnostics = Some(handler);
        self
    }

    pub fn url(&self) -> &WebhookUrl {
        &self.url
    }

    pub fn config(&self) -> &WebhookClientConfig {
        &self.config
    }

    fn request_url(&self) -> String {
        let mut params = Vec::new();
        if self.config.wait {
            params.push("wait=true".to_owned());
        }
        if let Some(thread_id) = &self.config.thread_id {
            params.push(format!(
                "thread_id={}",
                utf8_percent_encode(thread_id, NON_ALPHANUMERIC)
            ));
        }
        if params.is_empty() {
            self.url.endpoint().to_owned()
        } else {
            format!("{}?{}", self.url.endpoint(), params.join("&"))
        }
    }

    fn payload(&self, message: &WebhookMessage) -> Result<String, DeliveryError> {
        if self.config.username.is_none() && self.config.avatar_url.is_none() {
            return Ok(serde_json::to_string(message)?);
        }
        let mut message = message.clone();
        if message.username.is_none() {
            message.username.clone_from(&self.config.username);
        }
        if message.avatar_url.is_none() {
            message.avatar_url.clone_from(&self.config.avatar_url);
        }
        Ok(serde_json::to_string(&message)?)
    }

    fn execute(&self, url: &str, body: &str, timeout: Duration) -> Attempt {
        let result = self
            .agent
            .post(url)
            .timeout(timeout)
            .set("Content-Type", "application/json")
            .send_string(body);
        match result {
            Ok(response) => {
                let status = response.status();
                let body = response.into_string().unwrap_or_default();
                match classify_status(status) {
                    ResponseClass::Success => Attempt::Delivered { status, body },
                    _ => Attempt::Rejected { code: status, body },
                }
            }
            Err(ureq::Error::Status(code, response)) => {
                let header_floor = response.header("Retry-After").and_then(parse_retry_after);
                let body = response.into_string().unwrap_or_default();
                match classify_status(code) {
                    ResponseClass::Retryable => Attempt::Retry {
                        reason: format!("server returned status {code}"),
                        floor: header_floor.or_else(|| body_retry_after(&body)),
                    },
                    _ => Attempt::Rejected { code, body },
                }
            }
            Err(ureq::Error::Transport(err)) => Attempt::Retry {
                reason: err.to_string(),
                floor: None,
            },
        }
    }

    fn report_failure(&self, err: &DeliveryError) {
        let Some(handler) = &self.diagnostics else {
            return;
        };
        if !handler.enabled(FemtoLevel::Warn) {
            return;
        }
        let record = FemtoLogRecord::new(DIAGNOSTIC_LOGGER, FemtoLevel::Warn, "webhook delivery failed")
            .with_attr("webhook_id", self.url.id())
            .with_attr("error", err.to_string());
        // The diagnostic path is best-effort; its own failure has nowhere to go.
        let _ = handler.handle(&record);
    }
}

impl WebhookClient for UreqWebhookClient {
    fn create_message(&self, message: &WebhookMessage) -> Result<DeliveryReceipt, DeliveryError> {
        let body = self.payload(message)?;
        let url = self.request_url();
        let timeout = self.config.timeout;
        let deadline = Instant::now().checked_add(timeout);
        let mut backoff = BackoffState::new(self.config.backoff.clone());
        let mut attempts = 0;
        loop {
            attempts += 1;
            let now = Instant::now();
            let remaining = deadline.map_or(timeout, |d| d.saturating_duration_since(now));
            match self.execute(&url, &body, remaining) {
                Attempt::Delivered { status, body } => {
                    return Ok(DeliveryReceipt {
                        status,
                        attempts,
                        message_id: message_id(&body),
                    });
                }
                Attempt::Rejected { code, body } => {
                    let err = DeliveryError::Status { code, body };
                    self.report_failure(&err);
                    return Err(err);
                }
                Attempt::Retry { reason, floor } => {
                    debug!("webhook {} attempt {attempts} failed: {reason}", self.url);
                    let Some(delay) = backoff
                        .next_sleep(now, floor)
                        .filter(|delay| fits_before(*delay, deadline))
                    else {
                        let err = DeliveryError::RetriesExhausted {
                            attempts,
                            last: reason,
                        };
                        self.report_failure(&err);
                        return Err(err);
                    };
                    thread::sleep(delay);
                }
            }
        }
    }
}

impl std::fmt::Debug for UreqWebhookClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqWebhookClient")
            .field("url", &self.url)
            .field("timeout", &self.config.timeout)
            .field("diagnostics", &self.diagnostics.is_some())
            .finish()
    }
}

/// True when sleeping `delay` still leaves time for another request.
fn fits_before(delay: Duration, deadline: Option<Instant>) -> bool {
    let Some(deadline) = deadline else {
        return true;
    };
    Instant::now()
        .checked_add(delay)
        .is_some_and(|wake| wake < deadline)
}

/// `Retry-After` is either delta-seconds or an HTTP-date.
fn parse_retry_after(raw: &str) -> Option<Duration> {
    parse_seconds(raw).or_else(|| parse_http_date(raw))
}

/// Parse a non-negative number of seconds, fractional values allowed.
/// Values too large for a [`Duration`] are rejected.
fn parse_seconds(raw: &str) -> Option<Duration> {
    let secs = raw.trim().parse::<f64>().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}

/// Time until an IMF-fixdate such as `Wed, 21 Oct 2015 07:28:00 GMT`.
/// Dates in the past yield zero.
fn parse_http_date(raw: &str) -> Option<Duration> {
    let at = DateTime::parse_from_rfc2822(raw.trim()).ok()?;
    let delta = at.with_timezone(&Utc) - Utc::now();
    Some(delta.to_std().unwrap_or(Duration::ZERO))
}

/// Discord puts `retry_after` (seconds) in the 429 body.
fn body_retry_after(body: &str) -> Option<Duration> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("retry_after")?
        .as_f64()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}

fn message_id(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("id")?.as_str().map(str::to_owned)
}
