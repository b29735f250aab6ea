//! Stream-based logging handler implementation.
//!
//! `FemtoStreamHandler` formats records as text lines and writes them to an
//! `io::Write` stream on the caller's thread. It is the usual secondary
//! handler behind [`FemtoDiscordHandler`](crate::discord_handler::FemtoDiscordHandler):
//! every record reaches the local stream whether or not the webhook
//! delivery succeeds.

use std::{
    fmt,
    io::{self, Write},
    sync::Arc,
};

use parking_lot::Mutex;

use crate::{
    attr::Attr,
    flatten::{append_attrs_to_group, flatten_record_attrs},
    formatter::{FemtoFormatter, SharedFormatter},
    handler::{FemtoHandlerTrait, HandlerError, SharedHandler},
    level::FemtoLevel,
    log_record::FemtoLogRecord,
};

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Handler that writes formatted log records to an `io::Write` stream.
///
/// Clones and derived handlers share the writer, so lines from different
/// contexts never interleave mid-line.
#[derive(Clone)]
pub struct FemtoStreamHandler {
    writer: SharedWriter,
    formatter: SharedFormatter,
    min_level: FemtoLevel,
    attrs: Arc<[Attr]>,
    groups: Arc<[String]>,
}

impl FemtoStreamHandler {
    /// Create a new handler writing to `stdout` with a `DefaultFormatter`.
    pub fn stdout() -> Self {
        Self::new(io::stdout(), SharedFormatter::default())
    }

    /// Create a new handler writing to `stderr` with a `DefaultFormatter`.
    pub fn stderr() -> Self {
        Self::new(io::stderr(), SharedFormatter::default())
    }

    /// Create a handler from an arbitrary writer and formatter, accepting
    /// every level.
    pub fn new<W, F>(writer: W, formatter: F) -> Self
    where
        W: Write + Send + 'static,
        F: FemtoFormatter + 'static,
    {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
            formatter: SharedFormatter::new(formatter),
            min_level: FemtoLevel::LOWEST,
            attrs: Arc::from(Vec::new()),
            groups: Arc::from(Vec::new()),
        }
    }

    /// Drop records below `level`.
    pub fn with_min_level(mut self, level: FemtoLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn min_level(&self) -> FemtoLevel {
        self.min_level
    }

    fn derive(&self, attrs: Vec<Attr>, groups: Arc<[String]>) -> Self {
        Self {
            writer: Arc::clone(&self.writer),
            formatter: self.formatter.clone(),
            min_level: self.min_level,
            attrs: Arc::from(attrs),
            groups,
        }
    }
}

impl FemtoHandlerTrait for FemtoStreamHandler {
    fn enabled(&self, level: FemtoLevel) -> bool {
        level >= self.min_level
    }

    fn handle(&self, record: &FemtoLogRecord) -> Result<(), HandlerError> {
        if !self.enabled(record.level) {
            return Ok(());
        }
        let flat = flatten_record_attrs(&self.groups, &self.attrs, &record.attrs);
        let line = self.formatter.format(record, &flat);
        let mut writer = self.writer.lock();
        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }

    fn with_attrs(&self, attrs: &[Attr]) -> SharedHandler {
        let merged = append_attrs_to_group(&self.groups, &self.attrs, attrs);
        Arc::new(self.derive(merged, Arc::clone(&self.groups)))
    }

    fn with_group(&self, name: &str) -> SharedHandler {
        if name.is_empty() {
            return Arc::new(self.clone());
        }
        let mut groups = self.groups.to_vec();
        groups.push(name.to_owned());
        Arc::new(self.derive(self.attrs.to_vec(), Arc::from(groups)))
    }

    fn flush(&self) -> bool {
        self.writer.lock().flush().is_ok()
    }
}

impl fmt::Debug for FemtoStreamHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FemtoStreamHandler")
            .field("min_level", &self.min_level)
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}
