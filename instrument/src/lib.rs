//! Event log capture for storage bookkeeping.
//!
//! Uses the `tracing` crate with a custom subscriber that files every
//! INFO-level event under its target and builds columns from the event
//! fields as they arrive. A table's schema is whatever its events carried.
//!
//! # Usage
//!
//! ```ignore
//! // In storage code:
//! tracing::info!(target: "storage_add", cereal = "rice", amount, remainder);
//!
//! // In test:
//! let mut rec = instrument::ScopedRecorder::new();
//! // ... exercise storage ...
//! let adds = &rec.get().tables["storage_add"];
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Once;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Record};
use tracing::{Event, Id, Metadata, Subscriber};

/// A column of typed values.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedColumn {
    U64(Vec<u64>),
    I64(Vec<i64>),
    F64(Vec<f64>),
    Bool(Vec<bool>),
    Str(Vec<String>),
}

impl TypedColumn {
    pub fn len(&self) -> usize {
        match self {
            TypedColumn::U64(v) => v.len(),
            TypedColumn::I64(v) => v.len(),
            TypedColumn::F64(v) => v.len(),
            TypedColumn::Bool(v) => v.len(),
            TypedColumn::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn pad_to(&mut self, rows: usize) {
        let missing = rows.saturating_sub(self.len());
        if missing == 0 {
            return;
        }
        match self {
            TypedColumn::U64(v) => v.extend(std::iter::repeat_n(0, missing)),
            TypedColumn::I64(v) => v.extend(std::iter::repeat_n(0, missing)),
            TypedColumn::F64(v) => v.extend(std::iter::repeat_n(0.0, missing)),
            TypedColumn::Bool(v) => v.extend(std::iter::repeat_n(false, missing)),
            TypedColumn::Str(v) => v.extend(std::iter::repeat_n(String::new(), missing)),
        }
    }
}

/// One target's events, one row per event.
#[derive(Debug, Clone, Default)]
pub struct EventTable {
    pub columns: HashMap<String, TypedColumn>,
    pub row_count: usize,
}

impl EventTable {
    /// Pad every column up to the current row count.
    /// Columns an event didn't mention get a default in that row.
    fn align(&mut self) {
        let rows = self.row_count;
        for col in self.columns.values_mut() {
            col.pad_to(rows);
        }
    }

    pub fn f64s(&self, name: &str) -> Option<&[f64]> {
        match self.columns.get(name)? {
            TypedColumn::F64(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn u64s(&self, name: &str) -> Option<&[u64]> {
        match self.columns.get(name)? {
            TypedColumn::U64(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn bools(&self, name: &str) -> Option<&[bool]> {
        match self.columns.get(name)? {
            TypedColumn::Bool(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn strs(&self, name: &str) -> Option<&[String]> {
        match self.columns.get(name)? {
            TypedColumn::Str(v) => Some(v.as_slice()),
            _ => None,
        }
    }
}

/// Collection of tables, keyed by tracing target.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub tables: HashMap<String, EventTable>,
}

impl Recorder {
    /// Number of events recorded under `target`, zero if none were.
    pub fn count(&self, target: &str) -> usize {
        self.tables.get(target).map_or(0, |t| t.row_count)
    }
}

thread_local! {
    static RECORDER: RefCell<Recorder> = RefCell::default();
}

/// Visitor that appends one event's fields to a table.
struct ColumnVisitor<'a> {
    table: &'a mut EventTable,
    /// Rows already in the table; a column first seen now is back-filled to this length
    row_count: usize,
}

impl ColumnVisitor<'_> {
    fn column(&mut self, field: &Field, empty: fn(usize) -> TypedColumn) -> &mut TypedColumn {
        let rows = self.row_count;
        self.table
            .columns
            .entry(field.name().to_string())
            .or_insert_with(|| empty(rows))
    }
}

impl Visit for ColumnVisitor<'_> {
    fn record_u64(&mut self, field: &Field, value: u64) {
        if let TypedColumn::U64(v) = self.column(field, |n| TypedColumn::U64(vec![0; n])) {
            v.push(value);
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        if let TypedColumn::I64(v) = self.column(field, |n| TypedColumn::I64(vec![0; n])) {
            v.push(value);
        }
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if let TypedColumn::F64(v) = self.column(field, |n| TypedColumn::F64(vec![0.0; n])) {
            v.push(value);
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if let TypedColumn::Bool(v) = self.column(field, |n| TypedColumn::Bool(vec![false; n])) {
            v.push(value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if let TypedColumn::Str(v) =
            self.column(field, |n| TypedColumn::Str(vec![String::new(); n]))
        {
            v.push(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        // `%value` fields arrive here too, already formatted with Display
        self.record_str(field, &format!("{:?}", value));
    }
}

/// Tracing subscriber that collects events into per-target tables.
pub struct TableSubscriber;

impl Subscriber for TableSubscriber {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        // Events only, INFO and above
        metadata.is_event() && *metadata.level() <= tracing::Level::INFO
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let target = event.metadata().target().to_string();

        RECORDER.with(|r| {
            let mut recorder = r.borrow_mut();
            let table = recorder.tables.entry(target).or_default();

            table.align();
            let row_count = table.row_count;
            event.record(&mut ColumnVisitor { table, row_count });
            table.row_count += 1;
            table.align();
        });
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}

static INSTALL: Once = Once::new();

/// Install the TableSubscriber as the global default.
/// Concurrent callers block until the first install has finished.
pub fn install_subscriber() {
    INSTALL.call_once(|| {
        let _ = tracing::subscriber::set_global_default(TableSubscriber);
    });
}

/// Drain all recorded data from this thread's recorder.
pub fn drain() -> Recorder {
    RECORDER.with(|r| std::mem::take(&mut *r.borrow_mut()))
}

/// Clear all recorded data without returning it.
pub fn clear() {
    RECORDER.with(|r| *r.borrow_mut() = Recorder::default());
}

/// Guard that starts a clean recording on creation.
///
/// Call `.get()` once the code under observation has run; the first call
/// drains this thread's recorder and later calls return the same tables.
///
/// ```ignore
/// let mut rec = instrument::ScopedRecorder::new();
/// storage.add_good(Cereal::Rice, 4.0)?;
/// assert_eq!(rec.get().count("storage_add"), 1);
/// ```
pub struct ScopedRecorder {
    drained: Option<Recorder>,
}

impl ScopedRecorder {
    pub fn new() -> Self {
        install_subscriber();
        clear();
        Self { drained: None }
    }

    pub fn get(&mut self) -> &Recorder {
        self.drained.get_or_insert_with(drain)
    }
}

impl Default for ScopedRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ScopedRecorder {
    fn drop(&mut self) {
        if self.drained.is_none() {
            clear();
        }
    }
}
