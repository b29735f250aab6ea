//! Configuration structures consumed by the Discord handler lifecycle.
//!
//! [`DiscordHandlerBuilder`](crate::handlers::DiscordHandlerBuilder) fills a
//! [`DiscordHandlerConfig`] from its options before constructing a
//! [`FemtoDiscordHandler`](super::FemtoDiscordHandler).

use std::time::Duration;

use crate::{
    color::{ColorMap, default_color_map},
    embed::SharedMessageBuilder,
    handler::SharedHandler,
    level::FemtoLevel,
    rate_limited_warner::DEFAULT_WARN_INTERVAL,
    webhook::{self, SharedClient},
};

/// Default minimum level for remote delivery: everything.
pub const DEFAULT_MIN_LEVEL: FemtoLevel = FemtoLevel::LOWEST;
/// Default request timeout for the webhook client.
pub const DEFAULT_TIMEOUT: Duration = webhook::DEFAULT_TIMEOUT;
/// Default number of asynchronous delivery workers.
pub const DEFAULT_WORKERS: usize = 4;
/// Default time `flush` waits for queued deliveries.
pub const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

/// Settings fixed at construction and shared by every derived handler.
#[derive(Clone, Debug)]
pub struct DiscordHandlerConfig {
    /// Minimum level for remote delivery.
    pub min_level: FemtoLevel,
    /// Send on the logging thread instead of the worker pool.
    pub sync_mode: bool,
    /// Timeout for a single webhook request.
    pub timeout: Duration,
    pub color_map: ColorMap,
    pub message_builder: SharedMessageBuilder,
    /// Worker threads serving asynchronous deliveries.
    pub workers: usize,
    /// Queue capacity in front of the workers. `None` queues without
    /// limit; with a limit, records arriving at a full queue are dropped.
    pub capacity: Option<usize>,
    /// Interval between rate-limited delivery warnings.
    pub warn_interval: Duration,
}

impl Default for DiscordHandlerConfig {
    fn default() -> Self {
        Self {
            min_level: DEFAULT_MIN_LEVEL,
            sync_mode: false,
            timeout: DEFAULT_TIMEOUT,
            color_map: default_color_map(),
            message_builder: SharedMessageBuilder::default(),
            workers: DEFAULT_WORKERS,
            capacity: None,
            warn_interval: DEFAULT_WARN_INTERVAL,
        }
    }
}

/// A single construction option, applied in the order given.
///
/// Later options override earlier ones for the same setting.
#[derive(Clone)]
pub enum HandlerOption {
    /// Secondary handler receiving every record.
    Handler(SharedHandler),
    MinLevel(FemtoLevel),
    SyncMode(bool),
    Timeout(Duration),
    ColorMap(ColorMap),
    MessageBuilder(SharedMessageBuilder),
    /// Use this client instead of building one from the URL.
    Client(SharedClient),
    Workers(usize),
    Capacity(usize),
}
