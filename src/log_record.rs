//! Log record representation for femtologging handlers.
//!
//! This module defines the `FemtoLogRecord` struct that captures log events
//! along with their contextual metadata such as timestamps, source location,
//! thread information, and structured attributes.

use std::fmt;
use std::thread::{self, ThreadId};
use std::time::SystemTime;

use crate::attr::{Attr, Value};
use crate::level::FemtoLevel;

/// Additional context associated with a log record.
#[derive(Clone, Debug)]
pub struct RecordMetadata {
    /// Rust module path where the log call originated.
    pub module_path: String,
    /// Source file name for the log call.
    pub filename: String,
    /// Line number in the source file.
    pub line_number: u32,
    /// Time the record was created.
    pub timestamp: SystemTime,
    /// ID of the thread that created the record.
    pub thread_id: ThreadId,
    /// Name of the thread that created the record (if any).
    pub thread_name: Option<String>,
}

impl RecordMetadata {
    /// Capture timestamp and thread info from the current execution context.
    fn capture_runtime() -> (SystemTime, ThreadId, Option<String>) {
        let current = thread::current();
        (
            SystemTime::now(),
            current.id(),
            current.name().map(ToString::to_string),
        )
    }
}

impl Default for RecordMetadata {
    fn default() -> Self {
        let (timestamp, thread_id, thread_name) = Self::capture_runtime();
        Self {
            module_path: String::new(),
            filename: String::new(),
            line_number: 0,
            timestamp,
            thread_id,
            thread_name,
        }
    }
}

/// A single structured log event.
///
/// Handlers treat records as read-only input; the Discord handler clones a
/// record only when it must hand it to a worker thread.
#[derive(Clone, Debug)]
pub struct FemtoLogRecord {
    /// Name of the logger that created this record.
    pub logger: String,
    /// Severity of the record.
    pub level: FemtoLevel,
    /// The log message content.
    pub message: String,
    /// Attributes supplied with this particular call.
    pub attrs: Vec<Attr>,
    /// Contextual metadata for the record.
    pub metadata: RecordMetadata,
}

impl FemtoLogRecord {
    /// Construct a new log record from logger `name`, `level`, and `message`.
    pub fn new(logger: &str, level: FemtoLevel, message: &str) -> Self {
        Self::with_metadata(logger, level, message, RecordMetadata::default())
    }

    /// Construct a log record with explicit source location.
    ///
    /// The timestamp and thread fields are captured at call time, overriding
    /// whatever `metadata` carried.
    pub fn with_metadata(
        logger: &str,
        level: FemtoLevel,
        message: &str,
        mut metadata: RecordMetadata,
    ) -> Self {
        let (timestamp, thread_id, thread_name) = RecordMetadata::capture_runtime();
        metadata.timestamp = timestamp;
        metadata.thread_id = thread_id;
        metadata.thread_name = thread_name;
        Self {
            logger: logger.to_owned(),
            level,
            message: message.to_owned(),
            attrs: Vec::new(),
            metadata,
        }
    }

    /// Append one attribute and return the record.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.push(Attr::new(key, value));
        self
    }

    /// Append several attributes and return the record.
    pub fn with_attrs(mut self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        self.attrs.extend(attrs);
        self
    }

    /// Override the creation time, mostly useful in tests.
    pub fn at(mut self, timestamp: SystemTime) -> Self {
        self.metadata.timestamp = timestamp;
        self
    }

    pub fn logger(&self) -> &str {
        &self.logger
    }

    pub fn level_str(&self) -> &'static str {
        self.level.as_str()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> SystemTime {
        self.metadata.timestamp
    }
}

impl fmt::Display for FemtoLogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.level, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::time::Duration;

    #[rstest]
    fn builds_record_with_attrs() {
        let record = FemtoLogRecord::new("core", FemtoLevel::Error, "failed")
            .with_attr("error", "boom")
            .with_attrs([Attr::new("code", 7_i64)]);
        assert_eq!(record.level_str(), "ERROR");
        assert_eq!(record.to_string(), "ERROR - failed");
        assert_eq!(record.attrs.len(), 2);
        assert_eq!(record.attrs[0], Attr::new("error", "boom"));
    }

    #[rstest]
    fn with_metadata_captures_runtime_fields() {
        let metadata = RecordMetadata {
            module_path: "app::db".into(),
            line_number: 12,
            timestamp: SystemTime::UNIX_EPOCH,
            ..RecordMetadata::default()
        };
        let record = FemtoLogRecord::with_metadata("db", FemtoLevel::Info, "ok", metadata);
        assert_eq!(record.metadata.module_path, "app::db");
        assert_eq!(record.metadata.line_number, 12);
        assert!(record.timestamp() > SystemTime::UNIX_EPOCH);
        assert_eq!(record.metadata.thread_id, thread::current().id());
    }

    #[rstest]
    fn at_overrides_timestamp() {
        let t = SystemTime::UNIX_EPOCH + Duration::from_secs(5);
        let record = FemtoLogRecord::new("core", FemtoLevel::Info, "x").at(t);
        assert_eq!(record.timestamp(), t);
    }
}
