//! Thin named logger over a handler.
//!
//! `FemtoLogger` builds records, checks the handler's level filter first,
//! and swallows handler errors in the convenience methods so logging never
//! fails the caller. Use [`FemtoLogger::log_record`] to observe the result.

use std::fmt;

use log::debug;

use crate::{
    attr::Attr,
    handler::{HandlerError, SharedHandler},
    level::FemtoLevel,
    log_record::FemtoLogRecord,
};

/// Named logger dispatching to a single handler.
///
/// Cloning is cheap; [`with_attrs`](Self::with_attrs) and
/// [`with_group`](Self::with_group) return new loggers over derived
/// handlers.
#[derive(Clone)]
pub struct FemtoLogger {
    name: String,
    handler: SharedHandler,
}

impl FemtoLogger {
    pub fn new(name: impl Into<String>, handler: SharedHandler) -> Self {
        Self {
            name: name.into(),
            handler,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handler(&self) -> &SharedHandler {
        &self.handler
    }

    /// Return a logger whose handler also carries `attrs`.
    pub fn with_attrs(&self, attrs: &[Attr]) -> Self {
        Self {
            name: self.name.clone(),
            handler: self.handler.with_attrs(attrs),
        }
    }

    /// Shorthand for a single attribute.
    pub fn with(&self, key: impl Into<String>, value: impl Into<crate::attr::Value>) -> Self {
        self.with_attrs(&[Attr::new(key, value)])
    }

    /// Return a logger nesting later attributes under `name`.
    pub fn with_group(&self, name: &str) -> Self {
        Self {
            name: self.name.clone(),
            handler: self.handler.with_group(name),
        }
    }

    pub fn enabled(&self, level: FemtoLevel) -> bool {
        self.handler.enabled(level)
    }

    /// Hand `record` to the handler if its level is enabled.
    ///
    /// # Errors
    ///
    /// Propagates the handler's error.
    pub fn log_record(&self, record: &FemtoLogRecord) -> Result<(), HandlerError> {
        if !self.enabled(record.level) {
            return Ok(());
        }
        self.handler.handle(record)
    }

    /// Log `message` at `level` with per-call attributes.
    pub fn log(&self, level: FemtoLevel, message: &str, attrs: impl IntoIterator<Item = Attr>) {
        if !self.enabled(level) {
            return;
        }
        let record = FemtoLogRecord::new(&self.name, level, message).with_attrs(attrs);
        if let Err(err) = self.handler.handle(&record) {
            debug!("FemtoLogger {}: handler error: {err}", self.name);
        }
    }

    pub fn debug(&self, message: &str, attrs: impl IntoIterator<Item = Attr>) {
        self.log(FemtoLevel::Debug, message, attrs);
    }

    pub fn info(&self, message: &str, attrs: impl IntoIterator<Item = Attr>) {
        self.log(FemtoLevel::Info, message, attrs);
    }

    pub fn warn(&self, message: &str, attrs: impl IntoIterator<Item = Attr>) {
        self.log(FemtoLevel::Warn, message, attrs);
    }

    pub fn error(&self, message: &str, attrs: impl IntoIterator<Item = Attr>) {
        self.log(FemtoLevel::Error, message, attrs);
    }

    /// Flush the handler.
    pub fn flush(&self) -> bool {
        self.handler.flush()
    }
}

impl fmt::Debug for FemtoLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FemtoLogger")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
