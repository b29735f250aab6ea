//! Line formatters for text handlers.
//!
//! Provides the [`FemtoFormatter`] trait, the [`DefaultFormatter`] used by
//! [`FemtoStreamHandler`](crate::stream_handler::FemtoStreamHandler), and a
//! shared trait-object wrapper.

use std::{fmt, sync::Arc};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::{flatten::FlatAttr, log_record::FemtoLogRecord};

/// Trait for formatting log records into strings.
///
/// Implementors must be thread-safe (`Send + Sync`) so formatters can be
/// shared across threads in a logging system. `attrs` are the record's
/// attributes merged with the handler's context and already flattened.
pub trait FemtoFormatter: Send + Sync {
    /// Format a log record into a single line, without a trailing newline.
    fn format(&self, record: &FemtoLogRecord, attrs: &[FlatAttr]) -> String;
}

impl<F> FemtoFormatter for F
where
    F: Fn(&FemtoLogRecord, &[FlatAttr]) -> String + Send + Sync,
{
    fn format(&self, record: &FemtoLogRecord, attrs: &[FlatAttr]) -> String {
        self(record, attrs)
    }
}

/// Shared formatter trait object used across handlers.
#[derive(Clone)]
pub struct SharedFormatter {
    inner: Arc<dyn FemtoFormatter>,
}

impl SharedFormatter {
    /// Create a shared formatter from an owned formatter implementation.
    pub fn new<F>(formatter: F) -> Self
    where
        F: FemtoFormatter + 'static,
    {
        Self {
            inner: Arc::new(formatter),
        }
    }

    pub fn format(&self, record: &FemtoLogRecord, attrs: &[FlatAttr]) -> String {
        self.inner.format(record, attrs)
    }
}

impl FemtoFormatter for SharedFormatter {
    fn format(&self, record: &FemtoLogRecord, attrs: &[FlatAttr]) -> String {
        self.inner.format(record, attrs)
    }
}

impl Default for SharedFormatter {
    fn default() -> Self {
        Self::new(DefaultFormatter)
    }
}

impl fmt::Debug for SharedFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedFormatter(<dyn FemtoFormatter>)")
    }
}

/// `2024-05-01T12:00:00.000Z [LEVEL] logger: message key=value ...`
///
/// Values containing whitespace, quotes or `=` are written as quoted,
/// escaped strings.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultFormatter;

impl FemtoFormatter for DefaultFormatter {
    fn format(&self, record: &FemtoLogRecord, attrs: &[FlatAttr]) -> String {
        let ts: DateTime<Utc> = record.timestamp().into();
        let mut output = format!(
            "{} [{}] {}: {}",
            ts.to_rfc3339_opts(SecondsFormat::Millis, true),
            record.level_str(),
            record.logger(),
            record.message()
        );
        for attr in attrs {
            output.push(' ');
            output.push_str(&attr.key);
            output.push('=');
            push_value(&mut output, &attr.value.to_text());
        }
        output
    }
}

fn push_value(out: &mut String, value: &str) {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '=');
    if needs_quotes {
        out.push_str(&format!("{value:?}"));
    } else {
        out.push_str(value);
    }
}
