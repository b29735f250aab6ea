//! Structured logging handler that posts records to a Discord webhook.
//!
//! Build a [`FemtoDiscordHandler`] with [`DiscordHandlerBuilder`] (or
//! [`FemtoDiscordHandler::new`] and a list of [`HandlerOption`]s), wrap it
//! in a [`FemtoLogger`] or install it behind the `log` crate with
//! [`log_compat::install`], and records at or above the minimum level are
//! rendered as embeds and delivered in the background. A secondary handler
//! such as [`FemtoStreamHandler`] receives every record regardless.

pub mod attr;
pub mod color;
pub mod discord_handler;
pub mod embed;
pub mod flatten;
pub mod formatter;
pub mod handler;
pub mod handlers;
pub mod level;
pub mod log_compat;
pub mod log_record;
pub mod logger;
pub mod rate_limited_warner;
pub mod stream_handler;
pub mod webhook;

#[cfg(any(test, feature = "test-util"))]
pub mod test_utils;

pub use attr::{Attr, Value};
pub use color::{ColorMap, DEFAULT_COLOR_MAPPINGS, default_color_map};
pub use discord_handler::{DiscordHandlerConfig, FemtoDiscordHandler, HandlerOption};
pub use embed::{
    DefaultMessageBuilder, Embed, EmbedBuilder, EmbedField, MessageBuilder, SharedMessageBuilder,
    WebhookMessage,
};
pub use flatten::FlatAttr;
pub use formatter::{DefaultFormatter, FemtoFormatter, SharedFormatter};
pub use handler::{FemtoHandlerTrait, HandlerError, SharedHandler};
pub use handlers::{
    DiscordHandlerBuilder, HandlerBuildError, HandlerBuilderTrait, StreamHandlerBuilder,
};
pub use level::FemtoLevel;
pub use log_compat::FemtoLogBridge;
pub use log_record::{FemtoLogRecord, RecordMetadata};
pub use logger::FemtoLogger;
pub use stream_handler::FemtoStreamHandler;
pub use webhook::{
    BackoffPolicy, DeliveryError, DeliveryReceipt, UreqWebhookClient, WebhookClient,
    WebhookClientConfig, WebhookClientError, WebhookUrl,
};
