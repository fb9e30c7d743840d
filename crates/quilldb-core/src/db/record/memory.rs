use crate::{
    db::{
        cancel::CancellationSignal,
        context::StorageContext,
        record::{Record, RecordCursor, RecordSource, kind_mismatch, missing_column},
        schema::ColumnKind,
        value::Value,
    },
    error::InternalError,
};
use serde_json::json;

///
/// MemoryRecord
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MemoryRecord {
    values: Vec<Value>,
}

impl MemoryRecord {
    #[must_use]
    pub const fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut Vec<Value> {
        &mut self.values
    }

    fn value(&self, column: usize) -> Result<&Value, InternalError> {
        self.values
            .get(column)
            .ok_or_else(|| missing_column(column, self.values.len()))
    }
}

impl From<Vec<Value>> for MemoryRecord {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

impl Record for MemoryRecord {
    fn get_int(&self, column: usize) -> Result<i32, InternalError> {
        match self.value(column)? {
            Value::Int(v) => Ok(*v),
            other => Err(kind_mismatch(column, ColumnKind::Int, other.kind())),
        }
    }

    fn get_long(&self, column: usize) -> Result<i64, InternalError> {
        match self.value(column)? {
            Value::Long(v) => Ok(*v),
            other => Err(kind_mismatch(column, ColumnKind::Long, other.kind())),
        }
    }

    fn get_str(&self, column: usize) -> Result<&str, InternalError> {
        match self.value(column)? {
            Value::Str(v) => Ok(v),
            other => Err(kind_mismatch(column, ColumnKind::Str, other.kind())),
        }
    }

    fn get_sym(&self, column: usize) -> Result<&str, InternalError> {
        match self.value(column)? {
            Value::Symbol(v) => Ok(v),
            other => Err(kind_mismatch(column, ColumnKind::Symbol, other.kind())),
        }
    }
}

///
/// MemoryRecordSource
///
/// Driving sub-query over rows held in memory.
///

#[derive(Clone, Debug)]
pub struct MemoryRecordSource {
    name: String,
    rows: Vec<MemoryRecord>,
}

impl MemoryRecordSource {
    #[must_use]
    pub fn new(name: impl Into<String>, rows: Vec<MemoryRecord>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Single-column source, one row per value.
    #[must_use]
    pub fn column(name: impl Into<String>, values: impl IntoIterator<Item = Value>) -> Self {
        Self::new(
            name,
            values
                .into_iter()
                .map(|v| MemoryRecord::new(vec![v]))
                .collect(),
        )
    }
}

impl RecordSource for MemoryRecordSource {
    fn prepare_cursor<'a>(
        &'a self,
        _ctx: &'a StorageContext,
        _cancel: &'a dyn CancellationSignal,
    ) -> Result<Box<dyn RecordCursor + 'a>, InternalError> {
        Ok(Box::new(MemoryRecordCursor {
            rows: &self.rows,
            pos: 0,
        }))
    }

    fn explain(&self) -> serde_json::Value {
        json!({
            "op": "MemoryRecordSource",
            "name": self.name,
            "rows": self.rows.len(),
        })
    }
}

struct MemoryRecordCursor<'a> {
    rows: &'a [MemoryRecord],
    pos: usize,
}

impl RecordCursor for MemoryRecordCursor<'_> {
    fn next_record(&mut self) -> Result<Option<&dyn Record>, InternalError> {
        let Some(row) = self.rows.get(self.pos) else {
            return Ok(None);
        };
        self.pos += 1;

        Ok(Some(row))
    }
}
