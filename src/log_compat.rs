//! Compatibility bridge for the Rust `log` crate.
//!
//! [`FemtoLogBridge`] implements `log::Log` and forwards each record to a
//! femtologging handler, converting structured key-values into attributes.
//! [`install`] registers a bridge as the global logger.
//!
//! Records emitted by this crate itself are not forwarded: a warning about
//! a failed webhook delivery must not turn into another webhook delivery.

use std::borrow::Cow;
use std::fmt;

use log::kv::{self, Key, VisitSource};
use log::{LevelFilter, Metadata, Record, SetLoggerError};

use crate::{
    attr::{Attr, Value},
    handler::SharedHandler,
    level::FemtoLevel,
    log_record::{FemtoLogRecord, RecordMetadata},
    rate_limited_warner::RateLimitedWarner,
};

const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Adapter implementing the Rust `log::Log` trait on top of a handler.
pub struct FemtoLogBridge {
    handler: SharedHandler,
    max_level: LevelFilter,
    warner: RateLimitedWarner,
}

impl FemtoLogBridge {
    pub fn new(handler: SharedHandler, max_level: LevelFilter) -> Self {
        Self {
            handler,
            max_level,
            warner: RateLimitedWarner::default(),
        }
    }

    fn convert(&self, record: &Record<'_>) -> FemtoLogRecord {
        let metadata = RecordMetadata {
            module_path: record.module_path().unwrap_or_default().to_owned(),
            filename: record.file().unwrap_or_default().to_owned(),
            line_number: record.line().unwrap_or(0),
            ..Default::default()
        };
        let mut collector = AttrCollector::default();
        // The visitor never fails, so neither can the walk.
        let _ = record.key_values().visit(&mut collector);
        FemtoLogRecord::with_metadata(
            &normalise_target(record.target()),
            FemtoLevel::from(record.level()),
            &record.args().to_string(),
            metadata,
        )
        .with_attrs(collector.attrs)
    }
}

impl fmt::Debug for FemtoLogBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FemtoLogBridge")
            .field("max_level", &self.max_level)
            .finish_non_exhaustive()
    }
}

fn normalise_target(target: &str) -> Cow<'_, str> {
    if target.contains("::") {
        Cow::Owned(target.replace("::", "."))
    } else {
        Cow::Borrowed(target)
    }
}

fn is_own_target(target: &str) -> bool {
    target
        .strip_prefix(OWN_TARGET)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

impl log::Log for FemtoLogBridge {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.max_level
            && !is_own_target(metadata.target())
            && self.handler.enabled(metadata.level().into())
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Err(err) = self.handler.handle(&self.convert(record)) {
            // Reporting through `log` would re-enter this bridge.
            self.warner.record_drop();
            self.warner.warn_if_due(|count| {
                eprintln!("femtologging: {count} records failed in the log bridge; last error: {err}");
            });
        }
    }

    fn flush(&self) {
        self.handler.flush();
    }
}

/// Install a bridge to `handler` as the global `log` logger.
///
/// # Errors
///
/// Fails when another global logger is already set.
pub fn install(handler: SharedHandler, max_level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(FemtoLogBridge::new(handler, max_level)))?;
    log::set_max_level(max_level);
    Ok(())
}

#[derive(Default)]
struct AttrCollector {
    attrs: Vec<Attr>,
}

impl<'kvs> VisitSource<'kvs> for AttrCollector {
    fn visit_pair(&mut self, key: Key<'kvs>, value: kv::Value<'kvs>) -> Result<(), kv::Error> {
        self.attrs.push(Attr::new(key.as_str(), convert_value(&value)));
        Ok(())
    }
}

fn convert_value(value: &kv::Value<'_>) -> Value {
    if let Some(v) = value.to_bool() {
        Value::Bool(v)
    } else if let Some(v) = value.to_i64() {
        Value::Int(v)
    } else if let Some(v) = value.to_u64() {
        Value::Uint(v)
    } else if let Some(v) = value.to_f64() {
        Value::Float(v)
    } else {
        Value::Str(value.to_string())
    }
}
