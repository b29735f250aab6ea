//! [`FemtoDiscordHandler`]: renders records as embeds and posts them to a
//! webhook, forwarding every record to an optional secondary handler.

use std::{fmt, sync::Arc, time::Duration};

use crate::{
    attr::Attr,
    embed::WebhookMessage,
    flatten::append_attrs_to_group,
    handler::{FemtoHandlerTrait, HandlerError, SharedHandler},
    handlers::{DiscordHandlerBuilder, HandlerBuildError, HandlerBuilderTrait},
    level::FemtoLevel,
    log_record::FemtoLogRecord,
    rate_limited_warner::RateLimitedWarner,
    webhook::SharedClient,
};

use super::{
    config::{DEFAULT_FLUSH_TIMEOUT, DiscordHandlerConfig, HandlerOption},
    dispatch::{Delivery, Dispatcher, Job},
};

/// State shared by a handler and everything derived from it.
struct Shared {
    config: DiscordHandlerConfig,
    delivery: Arc<Delivery>,
    dispatcher: Option<Dispatcher>,
}

/// Handler posting records at or above its minimum level to a webhook.
///
/// Cloning is cheap. [`with_attrs`](Self::with_attrs) and
/// [`with_group`](Self::with_group) return new handlers sharing the same
/// configuration, client and worker pool while owning fresh attribute and
/// group lists; the receiver is never modified.
///
/// Remote delivery is best-effort. A failed or dropped message is reported
/// through a rate-limited `log::warn!` and never returned from
/// [`handle`](FemtoHandlerTrait::handle), whose result is the secondary
/// handler's.
#[derive(Clone)]
pub struct FemtoDiscordHandler {
    shared: Arc<Shared>,
    secondary: Option<SharedHandler>,
    attrs: Arc<[Attr]>,
    groups: Arc<[String]>,
}

impl FemtoDiscordHandler {
    /// Build a handler for the webhook at `url`, applying `options` in
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerBuildError::InvalidConfig`] for an empty URL or a
    /// zero worker count, capacity or timeout, and
    /// [`HandlerBuildError::ClientInit`] when no client was supplied and
    /// the webhook client cannot be created from `url`.
    pub fn new(
        url: &str,
        options: impl IntoIterator<Item = HandlerOption>,
    ) -> Result<Self, HandlerBuildError> {
        DiscordHandlerBuilder::new()
            .with_url(url)
            .options(options)
            .build_inner()
    }

    /// Assemble a handler from validated parts, starting the worker pool
    /// unless `config.sync_mode` is set.
    pub(crate) fn from_parts(
        config: DiscordHandlerConfig,
        client: SharedClient,
        secondary: Option<SharedHandler>,
    ) -> Result<Self, HandlerBuildError> {
        let delivery = Arc::new(Delivery::new(
            client,
            config.color_map.clone(),
            config.message_builder.clone(),
            RateLimitedWarner::new(config.warn_interval),
        ));
        let dispatcher = if config.sync_mode {
            None
        } else {
            Some(Dispatcher::spawn(
                Arc::clone(&delivery),
                config.workers,
                config.capacity,
            )?)
        };
        Ok(Self {
            shared: Arc::new(Shared {
                config,
                delivery,
                dispatcher,
            }),
            secondary,
            attrs: Arc::from(Vec::new()),
            groups: Arc::from(Vec::new()),
        })
    }

    pub fn config(&self) -> &DiscordHandlerConfig {
        &self.shared.config
    }

    pub fn min_level(&self) -> FemtoLevel {
        self.shared.config.min_level
    }

    pub fn is_sync(&self) -> bool {
        self.shared.dispatcher.is_none()
    }

    pub fn secondary(&self) -> Option<&SharedHandler> {
        self.secondary.as_ref()
    }

    /// Attributes accumulated through [`with_attrs`](Self::with_attrs).
    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    /// Groups opened through [`with_group`](Self::with_group), outermost
    /// first.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// The message this handler would send for `record`.
    pub fn render(&self, record: &FemtoLogRecord) -> WebhookMessage {
        self.shared
            .delivery
            .render(record, &self.groups, &self.attrs)
    }

    /// Return a handler that also carries `attrs`, nested under the open
    /// groups. The secondary handler is derived the same way.
    pub fn with_attrs(&self, attrs: &[Attr]) -> Self {
        let merged = append_attrs_to_group(&self.groups, &self.attrs, attrs);
        Self {
            shared: Arc::clone(&self.shared),
            secondary: self.secondary.as_ref().map(|h| h.with_attrs(attrs)),
            attrs: Arc::from(merged),
            groups: Arc::clone(&self.groups),
        }
    }

    /// Return a handler nesting later attributes under `name`. An empty
    /// name yields an unchanged clone.
    pub fn with_group(&self, name: &str) -> Self {
        if name.is_empty() {
            return self.clone();
        }
        let mut groups = self.groups.to_vec();
        groups.push(name.to_owned());
        Self {
            shared: Arc::clone(&self.shared),
            secondary: self.secondary.as_ref().map(|h| h.with_group(name)),
            attrs: Arc::from(self.attrs.to_vec()),
            groups: Arc::from(groups),
        }
    }

    /// Wait up to `timeout` for queued deliveries to finish, then report
    /// any failures still waiting on the warning interval.
    ///
    /// Always `true` in synchronous mode.
    pub fn flush_timeout(&self, timeout: Duration) -> bool {
        let drained = self
            .shared
            .dispatcher
            .as_ref()
            .is_none_or(|d| d.flush(timeout));
        self.shared.delivery.report_pending();
        drained
    }

    fn dispatch(&self, record: &FemtoLogRecord) {
        match &self.shared.dispatcher {
            Some(dispatcher) => {
                dispatcher.submit(Job {
                    record: record.clone(),
                    groups: Arc::clone(&self.groups),
                    attrs: Arc::clone(&self.attrs),
                });
            }
            None => {
                self.shared
                    .delivery
                    .deliver(record, &self.groups, &self.attrs);
            }
        }
    }
}

impl FemtoHandlerTrait for FemtoDiscordHandler {
    fn enabled(&self, level: FemtoLevel) -> bool {
        level >= self.shared.config.min_level
            || self.secondary.as_ref().is_some_and(|h| h.enabled(level))
    }

    fn handle(&self, record: &FemtoLogRecord) -> Result<(), HandlerError> {
        if record.level >= self.shared.config.min_level {
            self.dispatch(record);
        }
        match &self.secondary {
            Some(handler) => handler.handle(record),
            None => Ok(()),
        }
    }

    fn with_attrs(&self, attrs: &[Attr]) -> SharedHandler {
        Arc::new(FemtoDiscordHandler::with_attrs(self, attrs))
    }

    fn with_group(&self, name: &str) -> SharedHandler {
        Arc::new(FemtoDiscordHandler::with_group(self, name))
    }

    fn flush(&self) -> bool {
        let local = self.flush_timeout(DEFAULT_FLUSH_TIMEOUT);
        let secondary = self.secondary.as_ref().is_none_or(|h| h.flush());
        local && secondary
    }
}

impl fmt::Debug for FemtoDiscordHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FemtoDiscordHandler")
            .field("min_level", &self.shared.config.min_level)
            .field("sync_mode", &self.is_sync())
            .field("groups", &self.groups)
            .field("attrs", &self.attrs.len())
            .field("secondary", &self.secondary.is_some())
            .finish()
    }
}
