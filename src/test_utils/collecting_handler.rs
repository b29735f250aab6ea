//! A simple handler that accumulates records in memory for test assertions.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    attr::Attr,
    flatten::{FlatAttr, append_attrs_to_group, flatten_record_attrs},
    handler::{FemtoHandlerTrait, HandlerError, SharedHandler},
    level::FemtoLevel,
    log_record::FemtoLogRecord,
};

type Entries = Arc<Mutex<Vec<(FemtoLogRecord, Vec<FlatAttr>)>>>;

/// Handler that stores every record it receives for later inspection.
///
/// Derived handlers share the same store, so a test can hold the root
/// handler and still see records handled by values produced through
/// `with_attrs` / `with_group`. Each entry keeps the attributes as the
/// receiving handler would render them.
#[derive(Clone, Default)]
pub struct CollectingHandler {
    entries: Entries,
    min_level: FemtoLevel,
    attrs: Vec<Attr>,
    groups: Vec<String>,
}

impl CollectingHandler {
    /// Create a new empty handler accepting every level.
    pub fn new() -> Self {
        Self::with_min_level(FemtoLevel::Trace)
    }

    /// Create a handler that only reports itself enabled from `level` up.
    pub fn with_min_level(level: FemtoLevel) -> Self {
        Self {
            min_level: level,
            ..Self::default()
        }
    }

    /// Return a snapshot of all records received so far.
    pub fn collected(&self) -> Vec<FemtoLogRecord> {
        self.entries.lock().iter().map(|(r, _)| r.clone()).collect()
    }

    /// Flattened attributes for each received record, in arrival order.
    pub fn collected_attrs(&self) -> Vec<Vec<FlatAttr>> {
        self.entries.lock().iter().map(|(_, a)| a.clone()).collect()
    }

    fn derive(&self, attrs: Vec<Attr>, groups: Vec<String>) -> SharedHandler {
        Arc::new(Self {
            entries: Arc::clone(&self.entries),
            min_level: self.min_level,
            attrs,
            groups,
        })
    }
}

impl FemtoHandlerTrait for CollectingHandler {
    fn enabled(&self, level: FemtoLevel) -> bool {
        level >= self.min_level
    }

    fn handle(&self, record: &FemtoLogRecord) -> Result<(), HandlerError> {
        let flat = flatten_record_attrs(&self.groups, &self.attrs, &record.attrs);
        self.entries.lock().push((record.clone(), flat));
        Ok(())
    }

    fn with_attrs(&self, attrs: &[Attr]) -> SharedHandler {
        let merged = append_attrs_to_group(&self.groups, &self.attrs, attrs);
        self.derive(merged, self.groups.clone())
    }

    fn with_group(&self, name: &str) -> SharedHandler {
        let mut groups = self.groups.clone();
        if !name.is_empty() {
            groups.push(name.to_owned());
        }
        self.derive(self.attrs.clone(), groups)
    }
}
