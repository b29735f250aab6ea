//! Webhook URL parsing.
//!
//! Discord webhook URLs look like
//! `https://discord.com/api/webhooks/<id>/<token>`, optionally with an API
//! version segment (`/api/v10/webhooks/...`). The id must be a numeric
//! snowflake and the token must be present.

use std::fmt;

use super::WebhookClientError;

/// A validated webhook endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookUrl {
    endpoint: String,
    id: u64,
    token: String,
}

impl WebhookUrl {
    /// Parse and validate `raw`, discarding any query string or fragment.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookClientError`] when the scheme is not HTTP(S), the
    /// host is missing, or the path lacks a `webhooks/<id>/<token>` suffix.
    pub fn parse(raw: &str) -> Result<Self, WebhookClientError> {
        let raw = raw.trim();
        let (scheme, rest) = raw
            .split_once("://")
            .ok_or_else(|| WebhookClientError::UnsupportedScheme(raw.to_owned()))?;
        let scheme = scheme.to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(WebhookClientError::UnsupportedScheme(scheme));
        }

        let rest = rest.split(['?', '#']).next().unwrap_or(rest);
        let (host, path) = rest.split_once('/').unwrap_or((rest, ""));
        if host.is_empty() {
            return Err(WebhookClientError::MissingHost);
        }

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let pos = segments
            .iter()
            .position(|s| *s == "webhooks")
            .ok_or(WebhookClientError::MissingCredentials)?;
        let (Some(id), Some(token)) = (segments.get(pos + 1), segments.get(pos + 2)) else {
            return Err(WebhookClientError::MissingCredentials);
        };
        let id = id
            .parse::<u64>()
            .map_err(|_| WebhookClientError::InvalidId((*id).to_owned()))?;

        Ok(Self {
            endpoint: format!("{scheme}://{host}/{}", segments[..=pos + 2].join("/")),
            id,
            token: (*token).to_owned(),
        })
    }

    /// Normalised endpoint including the token.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

// The token is a credential; keep it out of logs.
impl fmt::Debug for WebhookUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookUrl")
            .field("id", &self.id)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for WebhookUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = self
            .endpoint
            .strip_suffix(self.token.as_str())
            .unwrap_or(&self.endpoint);
        write!(f, "{base}<redacted>")
    }
}
