//! Builder for [`FemtoDiscordHandler`].
//!
//! Exposes the webhook URL, delivery mode, filtering and rendering options,
//! plus the webhook client's identity and retry settings. Options may also
//! be supplied as an ordered list of [`HandlerOption`] values; later values
//! override earlier ones.

use std::{fmt, sync::Arc, time::Duration};

use crate::{
    color::ColorMap,
    discord_handler::{DiscordHandlerConfig, FemtoDiscordHandler, HandlerOption},
    embed::SharedMessageBuilder,
    handler::SharedHandler,
    level::FemtoLevel,
    webhook::{BackoffPolicy, SharedClient, UreqWebhookClient, WebhookClientConfig},
};

use super::{HandlerBuildError, HandlerBuilderTrait, ensure_positive};

/// Builder for constructing [`FemtoDiscordHandler`] instances.
#[derive(Clone, Default)]
pub struct DiscordHandlerBuilder {
    url: Option<String>,
    config: DiscordHandlerConfig,
    secondary: Option<SharedHandler>,
    client: Option<SharedClient>,
    client_config: WebhookClientConfig,
    backoff: Option<BackoffPolicy>,
}

impl DiscordHandlerBuilder {
    /// Create a new builder with no URL configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the webhook URL (required).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Forward every record to `handler` as well.
    ///
    /// The handler also receives a `WARN` record for each message the
    /// webhook client finally gives up on.
    pub fn with_handler(mut self, handler: SharedHandler) -> Self {
        self.secondary = Some(handler);
        self
    }

    /// Minimum level for remote delivery.
    pub fn with_min_level(mut self, level: FemtoLevel) -> Self {
        self.config.min_level = level;
        self
    }

    /// Send on the logging thread instead of the worker pool.
    pub fn with_sync_mode(mut self, sync: bool) -> Self {
        self.config.sync_mode = sync;
        self
    }

    /// Timeout for a single webhook request.
    ///
    /// # Validation
    ///
    /// Must be non-zero; `build` errors otherwise.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn with_color_map(mut self, color_map: ColorMap) -> Self {
        self.config.color_map = color_map;
        self
    }

    pub fn with_message_builder(mut self, builder: SharedMessageBuilder) -> Self {
        self.config.message_builder = builder;
        self
    }

    /// Deliver through `client` instead of building one from the URL.
    pub fn with_client(mut self, client: SharedClient) -> Self {
        self.client = Some(client);
        self
    }

    /// Number of asynchronous delivery workers. Must be non-zero.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Bound the queue in front of the workers, dropping records that
    /// arrive while it is full. Must be non-zero. Unbounded by default.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = Some(capacity);
        self
    }

    /// Interval between rate-limited delivery warnings.
    pub fn with_warn_interval(mut self, interval: Duration) -> Self {
        self.config.warn_interval = interval;
        self
    }

    /// Post into the given thread of the webhook's channel.
    pub fn with_thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.client_config.thread_id = Some(thread_id.into());
        self
    }

    /// Override the webhook's display name.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.client_config.username = Some(username.into());
        self
    }

    /// Override the webhook's avatar.
    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.client_config.avatar_url = Some(avatar_url.into());
        self
    }

    /// Ask the endpoint to confirm each message.
    pub fn with_wait(mut self, wait: bool) -> Self {
        self.client_config.wait = wait;
        self
    }

    /// Override the client's retry policy. By default retries stop once the
    /// request timeout has elapsed since the first failure.
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = Some(backoff);
        self
    }

    /// Apply a single option.
    pub fn option(self, option: HandlerOption) -> Self {
        match option {
            HandlerOption::Handler(handler) => self.with_handler(handler),
            HandlerOption::MinLevel(level) => self.with_min_level(level),
            HandlerOption::SyncMode(sync) => self.with_sync_mode(sync),
            HandlerOption::Timeout(timeout) => self.with_timeout(timeout),
            HandlerOption::ColorMap(map) => self.with_color_map(map),
            HandlerOption::MessageBuilder(builder) => self.with_message_builder(builder),
            HandlerOption::Client(client) => self.with_client(client),
            HandlerOption::Workers(workers) => self.with_workers(workers),
            HandlerOption::Capacity(capacity) => self.with_capacity(capacity),
        }
    }

    /// Apply `options` in order.
    pub fn options(self, options: impl IntoIterator<Item = HandlerOption>) -> Self {
        options.into_iter().fold(self, Self::option)
    }

    fn validate(&self) -> Result<&str, HandlerBuildError> {
        let url = match self.url.as_deref() {
            None => {
                return Err(HandlerBuildError::InvalidConfig(
                    "Discord handler requires a webhook URL".into(),
                ));
            }
            Some(url) if url.trim().is_empty() => {
                return Err(HandlerBuildError::InvalidConfig(
                    "webhook URL must not be empty".into(),
                ));
            }
            Some(url) => url,
        };
        ensure_positive(self.config.timeout, "timeout")?;
        ensure_positive(self.config.workers, "workers")?;
        if let Some(capacity) = self.config.capacity {
            ensure_positive(capacity, "capacity")?;
        }
        Ok(url)
    }

    fn build_client(&self, url: &str) -> Result<SharedClient, HandlerBuildError> {
        let mut config = self.client_config.clone().with_timeout(self.config.timeout);
        if let Some(backoff) = &self.backoff {
            config = config.with_backoff(backoff.clone());
        }
        let mut client = UreqWebhookClient::new(url.trim(), config)?;
        if let Some(handler) = &self.secondary {
            client = client.with_diagnostics(Arc::clone(handler));
        }
        Ok(Arc::new(client))
    }
}

impl HandlerBuilderTrait for DiscordHandlerBuilder {
    type Handler = FemtoDiscordHandler;

    fn build_inner(&self) -> Result<Self::Handler, HandlerBuildError> {
        let url = self.validate()?;
        let client = match &self.client {
            Some(client) => Arc::clone(client),
            None => self.build_client(url)?,
        };
        FemtoDiscordHandler::from_parts(self.config.clone(), client, self.secondary.clone())
    }
}

impl fmt::Debug for DiscordHandlerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordHandlerBuilder")
            .field("url_set", &self.url.is_some())
            .field("config", &self.config)
            .field("secondary", &self.secondary.is_some())
            .field("client", &self.client.is_some())
            .field("client_config", &self.client_config)
            .field("backoff", &self.backoff)
            .finish()
    }
}
