use crate::{
    RowId,
    db::{
        column::{ColumnData, FixedColumn, VariableColumn},
        index::{BucketIndex, bucket},
        partition::Partition,
        schema::{ColumnKind, StoreMetadata},
        value::Value,
    },
    error::{ErrorClass, ErrorOrigin, InternalError},
};
use thiserror::Error as ThisError;

///
/// BuildError
///

#[derive(Debug, ThisError)]
pub enum BuildError {
    #[error("row has {found} values, store '{store}' has {expected} columns")]
    RowArity {
        store: String,
        expected: usize,
        found: usize,
    },

    #[error("column '{column}' is {expected}, got a {found} value")]
    ValueKind {
        column: String,
        expected: ColumnKind,
        found: ColumnKind,
    },
}

impl From<BuildError> for InternalError {
    fn from(err: BuildError) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Store, err.to_string())
    }
}

///
/// PartitionBuilder
///
/// Append-only population path for one partition. Maintains every indexed
/// column's bucket index as rows arrive, deriving buckets through
/// `db::index::bucket` exactly as the lookup path does.
///

pub struct PartitionBuilder {
    name: String,
    metadata: StoreMetadata,
    columns: Vec<ColumnData>,
    indexes: Vec<Option<BucketIndex>>,
    next_row: RowId,
}

impl PartitionBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>, metadata: &StoreMetadata) -> Self {
        let columns = metadata
            .columns()
            .iter()
            .map(|col| match col.kind {
                ColumnKind::Int => ColumnData::Fixed(FixedColumn::int()),
                ColumnKind::Long => ColumnData::Fixed(FixedColumn::long()),
                ColumnKind::Str | ColumnKind::Symbol => {
                    ColumnData::Variable(VariableColumn::new())
                }
            })
            .collect();
        let indexes = metadata
            .columns()
            .iter()
            .map(|col| col.indexed.then(BucketIndex::new))
            .collect();

        Self {
            name: name.into(),
            metadata: metadata.clone(),
            columns,
            indexes,
            next_row: 0,
        }
    }

    /// Append one row; returns its row id.
    pub fn append(&mut self, values: &[Value]) -> Result<RowId, InternalError> {
        let models = self.metadata.columns();
        if values.len() != models.len() {
            return Err(BuildError::RowArity {
                store: self.metadata.name().to_string(),
                expected: models.len(),
                found: values.len(),
            }
            .into());
        }

        // whole row is validated before any column is written
        for (model, value) in models.iter().zip(values) {
            let compatible = match value {
                Value::Int(_) => model.kind == ColumnKind::Int,
                Value::Long(_) => model.kind == ColumnKind::Long,
                Value::Str(_) | Value::Symbol(_) => model.kind.is_text(),
            };
            if !compatible {
                return Err(BuildError::ValueKind {
                    column: model.name.clone(),
                    expected: model.kind,
                    found: value.kind(),
                }
                .into());
            }
        }

        let row = self.next_row;
        for (((model, value), column), index) in models
            .iter()
            .zip(values)
            .zip(&mut self.columns)
            .zip(&mut self.indexes)
        {
            let hint = model.distinct_count_hint;
            match (value, column) {
                (Value::Int(v), ColumnData::Fixed(col)) => {
                    col.push_int(*v)?;
                    if let Some(index) = index {
                        index.add(bucket::int_bucket(*v, hint), row);
                    }
                }
                (Value::Long(v), ColumnData::Fixed(col)) => col.push_long(*v)?,
                (Value::Str(s) | Value::Symbol(s), ColumnData::Variable(col)) => {
                    col.push_str(s);
                    if let Some(index) = index {
                        index.add(bucket::text_bucket(s, hint), row);
                    }
                }
                _ => {
                    return Err(InternalError::store_corruption(format!(
                        "column storage for '{}' does not match its kind {}",
                        model.name, model.kind
                    )));
                }
            }
        }
        self.next_row += 1;

        Ok(row)
    }

    /// Rows appended so far.
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.next_row
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.next_row == 0
    }

    pub fn build(self) -> Result<Partition, InternalError> {
        Ok(Partition::from_parts(self.name, self.columns, self.indexes)?)
    }
}
