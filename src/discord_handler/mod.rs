//! Discord webhook handler.
//!
//! Records at or above the configured minimum level are flattened, turned
//! into an embed by the configured [`MessageBuilder`](crate::embed::MessageBuilder)
//! and posted through a [`WebhookClient`](crate::webhook::WebhookClient),
//! either inline or on a bounded worker pool. Every record, delivered or
//! not, is then passed to the optional secondary handler.

mod config;
mod dispatch;
mod handler;

#[cfg(test)]
mod tests;

pub use config::{
    DEFAULT_FLUSH_TIMEOUT, DEFAULT_MIN_LEVEL, DEFAULT_TIMEOUT, DEFAULT_WORKERS,
    DiscordHandlerConfig, HandlerOption,
};
pub use handler::FemtoDiscordHandler;
