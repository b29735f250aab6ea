//! Handler builders and associated traits.
//!
//! Provides a minimal builder API for constructing handlers in a
//! type-safe manner. Each builder implements [`HandlerBuilderTrait`], which
//! yields either the concrete handler or a [`SharedHandler`] ready to be
//! attached to a logger or used as another handler's secondary.

use std::{io, sync::Arc};

use thiserror::Error;

use crate::{
    handler::{FemtoHandlerTrait, SharedHandler},
    webhook::WebhookClientError,
};

pub mod discord_builder;
pub mod stream_builder;

pub use discord_builder::DiscordHandlerBuilder;
pub use stream_builder::StreamHandlerBuilder;

/// Errors that may occur while building a handler.
#[derive(Debug, Error)]
pub enum HandlerBuildError {
    /// Invalid user supplied configuration.
    #[error("invalid handler configuration: {0}")]
    InvalidConfig(String),
    /// The webhook client could not be created.
    #[error("failed to initialise webhook client: {0}")]
    ClientInit(#[from] WebhookClientError),
    /// Underlying I/O error whilst creating the handler, such as a worker
    /// thread failing to spawn.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Trait implemented by all handler builders.
pub trait HandlerBuilderTrait: Send + Sync {
    /// Concrete handler produced by this builder.
    type Handler: FemtoHandlerTrait + 'static;

    /// Build the concrete handler.
    fn build_inner(&self) -> Result<Self::Handler, HandlerBuildError>;

    /// Build the handler as a shared trait object.
    fn build(&self) -> Result<SharedHandler, HandlerBuildError> {
        Ok(Arc::new(self.build_inner()?))
    }
}

/// Return `value` or an `InvalidConfig` error naming `field` when zero.
pub(crate) fn ensure_positive<T>(value: T, field: &str) -> Result<T, HandlerBuildError>
where
    T: Default + PartialEq,
{
    if value == T::default() {
        Err(HandlerBuildError::InvalidConfig(format!(
            "{field} must be greater than zero"
        )))
    } else {
        Ok(value)
    }
}
