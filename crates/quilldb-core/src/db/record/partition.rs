use crate::{
    RowId,
    db::{
        cancel::CancellationSignal,
        context::{Store, StorageContext},
        partition::Partition,
        record::{MemoryRecord, Record, RecordCursor, RecordSource},
        schema::ColumnKind,
        value::Value,
    },
    error::{ErrorOrigin, InternalError},
};
use serde_json::json;

///
/// PartitionRecordSource
///
/// Driving sub-query that scans every row of a registered store, partition by
/// partition in store order. Partitions are opened as the scan reaches them,
/// and cancellation is checked before each open.
///

#[derive(Clone, Debug)]
pub struct PartitionRecordSource {
    store: String,
}

impl PartitionRecordSource {
    #[must_use]
    pub fn new(store: impl Into<String>) -> Self {
        Self {
            store: store.into(),
        }
    }
}

impl RecordSource for PartitionRecordSource {
    fn prepare_cursor<'a>(
        &'a self,
        ctx: &'a StorageContext,
        cancel: &'a dyn CancellationSignal,
    ) -> Result<Box<dyn RecordCursor + 'a>, InternalError> {
        let store = ctx.store(&self.store)?;

        Ok(Box::new(PartitionRecordCursor {
            store,
            cancel,
            next_partition: 0,
            current: None,
            next_row: 0,
            record: MemoryRecord::default(),
        }))
    }

    fn explain(&self) -> serde_json::Value {
        json!({
            "op": "PartitionRecordSource",
            "store": self.store,
        })
    }
}

struct PartitionRecordCursor<'a> {
    store: &'a Store,
    cancel: &'a dyn CancellationSignal,
    next_partition: usize,
    current: Option<&'a Partition>,
    next_row: RowId,
    record: MemoryRecord,
}

impl PartitionRecordCursor<'_> {
    // Copy the row's cells into the reusable record buffer.
    fn materialize(&mut self, partition: &Partition, row: RowId) -> Result<(), InternalError> {
        let values = self.record.values_mut();
        values.clear();

        for (column, model) in self.store.metadata().columns().iter().enumerate() {
            let value = match model.kind {
                ColumnKind::Int => Value::Int(partition.fixed_column(column)?.get_int(row)?),
                ColumnKind::Long => Value::Long(partition.fixed_column(column)?.get_long(row)?),
                ColumnKind::Str | ColumnKind::Symbol => {
                    let col = partition.variable_column(column)?;
                    let text = col.flyweight().get_str(row)?.to_string();

                    if model.kind == ColumnKind::Str {
                        Value::Str(text)
                    } else {
                        Value::Symbol(text)
                    }
                }
            };
            values.push(value);
        }

        Ok(())
    }
}

impl RecordCursor for PartitionRecordCursor<'_> {
    fn next_record(&mut self) -> Result<Option<&dyn Record>, InternalError> {
        loop {
            if let Some(partition) = self.current
                && self.next_row < partition.size()
            {
                let row = self.next_row;
                self.next_row += 1;
                self.materialize(partition, row)?;

                return Ok(Some(&self.record));
            }

            let Some(handle) = self.store.partitions().get(self.next_partition) else {
                return Ok(None);
            };
            self.cancel.check(ErrorOrigin::Store)?;

            self.current = Some(handle.open()?);
            self.next_partition += 1;
            self.next_row = 0;
        }
    }
}
