//! Handler trait shared by every femtologging sink.
//!
//! A handler decides whether a level is enabled, consumes records, and can
//! derive new handlers carrying extra attributes or an attribute group.
//! Derivation never mutates the receiver.

use std::io;
use std::sync::Arc;

use thiserror::Error;

use crate::{attr::Attr, level::FemtoLevel, log_record::FemtoLogRecord};

/// Errors returned from [`FemtoHandlerTrait::handle`].
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The handler's queue was full and the record was dropped.
    #[error("handler queue full")]
    QueueFull,
    /// The handler has shut down.
    #[error("handler closed")]
    Closed,
    /// Writing the record failed.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Any other handler-specific failure.
    #[error("{0}")]
    Message(String),
}

/// Shared, thread-safe handler trait object.
pub type SharedHandler = Arc<dyn FemtoHandlerTrait>;

/// Trait implemented by all log handlers.
///
/// Handlers are `Send + Sync` so a single value can be used from many
/// threads at once.
pub trait FemtoHandlerTrait: Send + Sync {
    /// Return `true` if records at `level` would be processed.
    fn enabled(&self, level: FemtoLevel) -> bool;

    /// Dispatch a log record for handling.
    fn handle(&self, record: &FemtoLogRecord) -> Result<(), HandlerError>;

    /// Return a handler that also carries `attrs`.
    fn with_attrs(&self, attrs: &[Attr]) -> SharedHandler;

    /// Return a handler that nests subsequent attributes under `name`.
    fn with_group(&self, name: &str) -> SharedHandler;

    /// Flush any pending records. Returns `true` when everything queued so
    /// far has been processed.
    fn flush(&self) -> bool {
        true
    }
}
