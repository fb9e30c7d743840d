use crate::{
    RowId,
    db::{
        cancel::CancellationSignal,
        context::StorageContext,
        executor::{
            ExecutorError, ExplainRowSource, IntKeySet, RowCursor, RowSource,
            head::{HeadCore, IndexTarget, ScanStats, first_match},
            trace::RowSourceTraceSink,
        },
        filter::RowFilter,
        index::int_bucket,
        partition::{PartitionSlice, SliceBounds},
        record::RecordSource,
        schema::{ColumnKind, StoreMetadata},
    },
    error::InternalError,
};

///
/// IntHeadRowSource
///
/// For every distinct `i32` key produced by the driving sub-query, selects
/// the first row of the slice whose indexed `Int` column holds that key (and
/// that passes the optional filter). Buckets are `key & hint`, matching the
/// mask the population path applies.
///

pub struct IntHeadRowSource {
    core: HeadCore,
    keys: IntKeySet,
}

impl IntHeadRowSource {
    pub const OP: &'static str = "IntHeadRowSource";

    /// Key on `column`, reading driving keys from `source_column` of `source`.
    #[must_use]
    pub fn new(
        column: impl Into<String>,
        source: Box<dyn RecordSource>,
        source_column: usize,
    ) -> Self {
        Self {
            core: HeadCore::new(Self::OP, column.into(), source, source_column),
            keys: IntKeySet::new(),
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Box<dyn RowFilter>) -> Self {
        self.core.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn with_trace(mut self, trace: &'static dyn RowSourceTraceSink) -> Self {
        self.core.trace = Some(trace);
        self
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.core.debug = debug;
        self
    }

    /// Keys materialized by the last successful prepare.
    #[must_use]
    pub const fn keys(&self) -> &IntKeySet {
        &self.keys
    }

    fn scan(
        &mut self,
        slice: &PartitionSlice<'_>,
        target: IndexTarget,
    ) -> Result<ScanStats, InternalError> {
        let partition = slice.partition.open()?;
        let index = partition.index_for_column(target.column)?;
        let values = partition.fixed_column(target.column)?;
        let mut stats = ScanStats::new(SliceBounds::resolve(slice, partition));

        let filter = self.core.filter.as_deref();
        for &key in self.keys.iter() {
            let cursor = index.cursor(int_bucket(key, target.hint));
            let hit = first_match(cursor, partition, filter, &mut stats, |row| {
                Ok(values.get_int(row)? == key)
            })?;
            if let Some(row) = hit {
                self.core.rows.push(row);
            }
        }

        Ok(stats)
    }
}

impl RowCursor for IntHeadRowSource {
    fn has_next(&self) -> bool {
        self.core.rows.has_next()
    }

    fn next_row(&mut self) -> Option<RowId> {
        self.core.rows.next_row()
    }
}

impl RowSource for IntHeadRowSource {
    fn configure(&mut self, metadata: &StoreMetadata) -> Result<(), InternalError> {
        self.core.configure(metadata, |model| {
            if model.kind != ColumnKind::Int {
                return Err(ExecutorError::ColumnKind {
                    op: Self::OP,
                    column: model.name.clone(),
                    kind: model.kind,
                });
            }
            Ok(())
        })
    }

    fn prepare(
        &mut self,
        ctx: &StorageContext,
        cancel: &dyn CancellationSignal,
    ) -> Result<(), InternalError> {
        self.keys.clear();
        let keys = &mut self.keys;
        let driven = self.core.drive(ctx, cancel, |record, column| {
            keys.insert(record.get_int(column)?);
            Ok(())
        });
        if driven.is_err() {
            self.keys.clear();
        }

        self.core.finish_prepare(driven, self.keys.len())
    }

    fn prepare_cursor(
        &mut self,
        slice: &PartitionSlice<'_>,
    ) -> Result<&mut dyn RowCursor, InternalError> {
        let target = self.core.begin_slice()?;
        let scanned = self.scan(slice, target);
        self.core.finish_slice(scanned)?;

        Ok(self)
    }

    fn reset(&mut self) {}

    fn explain(&self) -> ExplainRowSource {
        self.core.explain(None)
    }
}
