//! Module: db::executor::head
//! Responsibility: first-match-per-key retrieval over a bucket index.
//! Does not own: bucket derivation (`db::index::bucket`) or key extraction policy.
//! Boundary: one prepare-cursor call borrows one opened partition and retains nothing from it.

mod int;
mod text;

#[cfg(test)]
mod tests;

pub use int::IntHeadRowSource;
pub use text::TextHeadRowSource;

use crate::{
    RowId,
    db::{
        cancel::CancellationSignal,
        context::StorageContext,
        executor::{
            ExecutorError, ExplainRowSource,
            trace::{RowSourceTraceEvent, RowSourceTraceSink, TracePhase},
        },
        filter::RowFilter,
        index::IndexCursor,
        partition::{Partition, SliceBounds},
        record::{Record, RecordSource},
        schema::{ColumnModel, StoreMetadata},
    },
    error::{ErrorOrigin, InternalError},
    obs::sink::{MetricsEvent, record},
};

///
/// HeadRows
///
/// Result buffer of one slice: unsorted while accumulating, sorted ascending
/// once sealed, then drained front to back.
///

#[derive(Debug, Default)]
pub(crate) struct HeadRows {
    rows: Vec<RowId>,
    pos: usize,
}

impl HeadRows {
    fn clear(&mut self) {
        self.rows.clear();
        self.pos = 0;
    }

    fn push(&mut self, row: RowId) {
        self.rows.push(row);
    }

    fn seal(&mut self) {
        self.rows.sort_unstable();
        self.pos = 0;
    }

    const fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) const fn has_next(&self) -> bool {
        self.pos < self.rows.len()
    }

    pub(crate) fn next_row(&mut self) -> Option<RowId> {
        let row = self.rows.get(self.pos).copied()?;
        self.pos += 1;

        Some(row)
    }
}

///
/// IndexTarget
/// Indexed column resolved at configure time.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct IndexTarget {
    column: usize,
    hint: u32,
}

///
/// ScanStats
///

#[derive(Clone, Copy, Debug)]
pub(crate) struct ScanStats {
    bounds: SliceBounds,
    candidates: u64,
}

impl ScanStats {
    const fn new(bounds: SliceBounds) -> Self {
        Self {
            bounds,
            candidates: 0,
        }
    }
}

///
/// HeadCore
///
/// State and lifecycle shared by the integer- and text-keyed variants:
/// driving source, optional filter, configured target, result buffer and
/// the instrumentation hooks.
///

pub(crate) struct HeadCore {
    op: &'static str,
    column: String,
    source: Box<dyn RecordSource>,
    source_column: usize,
    filter: Option<Box<dyn RowFilter>>,
    target: Option<IndexTarget>,
    prepared: bool,
    rows: HeadRows,
    trace: Option<&'static dyn RowSourceTraceSink>,
    debug: bool,
}

impl HeadCore {
    fn new(
        op: &'static str,
        column: String,
        source: Box<dyn RecordSource>,
        source_column: usize,
    ) -> Self {
        Self {
            op,
            column,
            source,
            source_column,
            filter: None,
            target: None,
            prepared: false,
            rows: HeadRows::default(),
            trace: None,
            debug: false,
        }
    }

    fn debug_log(&self, s: impl AsRef<str>) {
        if self.debug {
            println!("[debug] {}", s.as_ref());
        }
    }

    fn emit(&self, event: RowSourceTraceEvent) {
        if let Some(trace) = self.trace {
            trace.on_event(event);
        }
    }

    /// Resolve the keyed column; `check` applies the variant's kind and hint rules.
    fn configure(
        &mut self,
        metadata: &StoreMetadata,
        check: impl FnOnce(&ColumnModel) -> Result<(), ExecutorError>,
    ) -> Result<(), InternalError> {
        self.target = None;
        self.prepared = false;

        let column = metadata.column_index(&self.column)?;
        let model = metadata.column(column)?;
        check(model)?;
        if !model.indexed {
            return Err(ExecutorError::NotIndexed {
                op: self.op,
                column: model.name.clone(),
            }
            .into());
        }

        self.target = Some(IndexTarget {
            column,
            hint: model.distinct_count_hint,
        });
        self.debug_log(format!(
            "{} configured on '{}.{}' (column {column}, hint {})",
            self.op,
            metadata.name(),
            self.column,
            model.distinct_count_hint
        ));

        Ok(())
    }

    fn target(&self) -> Result<IndexTarget, InternalError> {
        self.target
            .ok_or_else(|| ExecutorError::NotConfigured { op: self.op }.into())
    }

    /// Bind the filter, then feed every driving record to `consume`.
    /// Cancellation is polled before each record is pulled.
    fn drive(
        &mut self,
        ctx: &StorageContext,
        cancel: &dyn CancellationSignal,
        mut consume: impl FnMut(&dyn Record, usize) -> Result<(), InternalError>,
    ) -> Result<u64, InternalError> {
        self.prepared = false;
        self.target()?;

        if let Some(filter) = self.filter.as_deref_mut() {
            filter.prepare(ctx)?;
        }

        let mut cursor = self.source.prepare_cursor(ctx, cancel)?;
        let mut consumed = 0u64;
        loop {
            cancel.check(ErrorOrigin::Executor)?;
            let Some(record) = cursor.next_record()? else {
                break;
            };
            consume(record, self.source_column)?;
            consumed += 1;
        }

        Ok(consumed)
    }

    /// Account for a finished prepare and pass its outcome through.
    fn finish_prepare(
        &mut self,
        driven: Result<u64, InternalError>,
        keys: usize,
    ) -> Result<(), InternalError> {
        match driven {
            Ok(driving_rows) => {
                let keys = keys as u64;
                self.prepared = true;
                record(MetricsEvent::Prepare {
                    source: self.op,
                    driving_rows,
                    keys,
                });
                self.emit(RowSourceTraceEvent::Prepared {
                    op: self.op,
                    driving_rows,
                    keys,
                });
                self.debug_log(format!(
                    "{} prepared: {driving_rows} driving rows, {keys} distinct keys",
                    self.op
                ));

                Ok(())
            }
            Err(err) => {
                self.fail(TracePhase::Prepare, &err);
                Err(err)
            }
        }
    }

    /// Clear the buffer and check that the source is ready to scan a slice.
    fn begin_slice(&mut self) -> Result<IndexTarget, InternalError> {
        self.rows.clear();
        let target = self.target()?;
        if !self.prepared {
            return Err(ExecutorError::NotPrepared { op: self.op }.into());
        }

        Ok(target)
    }

    /// Seal the buffer after a successful scan; a failed scan leaves it empty.
    fn finish_slice(
        &mut self,
        scanned: Result<ScanStats, InternalError>,
    ) -> Result<(), InternalError> {
        match scanned {
            Ok(stats) => {
                self.rows.seal();
                let rows = self.rows.len() as u64;
                record(MetricsEvent::SliceScan {
                    source: self.op,
                    candidates: stats.candidates,
                    rows_selected: rows,
                });
                self.emit(RowSourceTraceEvent::SliceScanned {
                    op: self.op,
                    lo: stats.bounds.lo(),
                    hi: stats.bounds.hi(),
                    candidates: stats.candidates,
                    rows,
                });
                self.debug_log(format!(
                    "{} slice ({}, {}): {} candidates, {rows} rows",
                    self.op,
                    stats.bounds.lo(),
                    stats.bounds.hi(),
                    stats.candidates
                ));

                Ok(())
            }
            Err(err) => {
                self.rows.clear();
                self.fail(TracePhase::PrepareCursor, &err);
                Err(err)
            }
        }
    }

    fn fail(&self, phase: TracePhase, err: &InternalError) {
        if err.is_cancelled() {
            record(MetricsEvent::Cancelled { source: self.op });
        } else if err.is_storage_failure() {
            record(MetricsEvent::StorageFailure { source: self.op });
        }
        self.emit(RowSourceTraceEvent::error(self.op, phase, err));
        self.debug_log(format!("{} failed: {}", self.op, err.display_with_class()));
    }

    fn explain(&self, extractor: Option<&'static str>) -> ExplainRowSource {
        ExplainRowSource {
            op: self.op,
            column: self.column.clone(),
            src: self.source.explain(),
            extractor,
        }
    }
}

/// Walk one bucket and return the first candidate that lies inside `bounds`,
/// holds the key, and passes `filter`. Checks run in that order and the walk
/// stops at the first qualifying row.
pub(crate) fn first_match(
    mut cursor: IndexCursor<'_>,
    partition: &Partition,
    filter: Option<&dyn RowFilter>,
    stats: &mut ScanStats,
    mut holds_key: impl FnMut(RowId) -> Result<bool, InternalError>,
) -> Result<Option<RowId>, InternalError> {
    while cursor.has_next() {
        let Some(row) = cursor.next_row() else {
            break;
        };
        stats.candidates += 1;

        if !stats.bounds.contains(row) || !holds_key(row)? {
            continue;
        }
        if let Some(filter) = filter
            && !filter.matches(&partition.row(row))?
        {
            continue;
        }

        return Ok(Some(row));
    }

    Ok(None)
}
