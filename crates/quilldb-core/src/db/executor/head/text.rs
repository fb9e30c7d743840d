use crate::{
    RowId,
    db::{
        cancel::CancellationSignal,
        context::StorageContext,
        executor::{
            ExecutorError, ExplainRowSource, RowCursor, RowSource, TextKeyExtractor, TextKeySet,
            head::{HeadCore, IndexTarget, ScanStats, first_match},
            trace::RowSourceTraceSink,
        },
        filter::RowFilter,
        partition::{PartitionSlice, SliceBounds},
        record::RecordSource,
        schema::StoreMetadata,
    },
    error::InternalError,
};

///
/// TextHeadRowSource
///
/// Text-keyed counterpart of [`super::IntHeadRowSource`]. The extractor `X`
/// decides how a key is read out of each driving record; buckets are the
/// bounded hash of the key into `hint` buckets, computed once per distinct
/// key during prepare. Candidates are confirmed by comparing the stored text
/// with the key by content.
///

pub struct TextHeadRowSource<X> {
    core: HeadCore,
    extractor: X,
    keys: TextKeySet,
}

impl<X: TextKeyExtractor> TextHeadRowSource<X> {
    pub const OP: &'static str = "TextHeadRowSource";

    /// Key on `column`, extracting driving keys from `source_column` of `source`.
    #[must_use]
    pub fn new(
        column: impl Into<String>,
        source: Box<dyn RecordSource>,
        source_column: usize,
        extractor: X,
    ) -> Self {
        Self {
            core: HeadCore::new(Self::OP, column.into(), source, source_column),
            extractor,
            keys: TextKeySet::new(),
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
    pub const fn keys(&self) -> &TextKeySet {
        &self.keys
    }

    fn scan(
        &mut self,
        slice: &PartitionSlice<'_>,
        target: IndexTarget,
    ) -> Result<ScanStats, InternalError> {
        let partition = slice.partition.open()?;
        let index = partition.index_for_column(target.column)?;
        let mut view = partition.variable_column(target.column)?.flyweight();
        let mut stats = ScanStats::new(SliceBounds::resolve(slice, partition));

        let filter = self.core.filter.as_deref();
        for (key, bucket) in self.keys.iter() {
            let cursor = index.cursor(bucket);
            let hit = first_match(cursor, partition, filter, &mut stats, |row| {
                Ok(view.get_str(row)? == key)
            })?;
            if let Some(row) = hit {
                self.core.rows.push(row);
            }
        }

        Ok(stats)
    }
}

impl<X: TextKeyExtractor> RowCursor for TextHeadRowSource<X> {
    fn has_next(&self) -> bool {
        self.core.rows.has_next()
    }

    fn next_row(&mut self) -> Option<RowId> {
        self.core.rows.next_row()
    }
}

impl<X: TextKeyExtractor> RowSource for TextHeadRowSource<X> {
    fn configure(&mut self, metadata: &StoreMetadata) -> Result<(), InternalError> {
        self.core.configure(metadata, |model| {
            if !model.kind.is_text() {
                return Err(ExecutorError::ColumnKind {
                    op: Self::OP,
                    column: model.name.clone(),
                    kind: model.kind,
                });
            }
            if model.indexed && model.distinct_count_hint == 0 {
                return Err(ExecutorError::InvalidHint {
                    column: model.name.clone(),
                    hint: model.distinct_count_hint,
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
        let hint = self.core.target.map_or(0, |target| target.hint);
        let keys = &mut self.keys;
        let extractor = &self.extractor;
        let driven = self.core.drive(ctx, cancel, |record, column| {
            let key = extractor.extract(record, column)?;
            keys.insert(&key, hint);
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
        self.core.explain(Some(self.extractor.name()))
    }
}
