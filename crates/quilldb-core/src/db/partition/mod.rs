//! Module: db::partition
//! Responsibility: immutable, lazily-opened row segments and the slices scanned over them.
//! Does not own: partition file lifecycle beyond the open-once cache.
//! Boundary: structural lookups (columns, indexes) fail as store-origin errors.

mod builder;
mod row;
mod slice;


pub use builder::PartitionBuilder;
pub use row::PartitionRow;
pub use slice::{PartitionSlice, SliceBounds};

use crate::{
    RowId,
    db::{
        column::{ColumnData, FixedColumn, VariableColumn},
        index::BucketIndex,
    },
    error::InternalError,
};
use std::{cell::OnceCell, fmt};
use thiserror::Error as ThisError;

///
/// PartitionError
///

#[derive(Debug, ThisError)]
pub enum PartitionError {
    #[error("partition '{partition}' has no column {column}")]
    MissingColumn { partition: String, column: usize },

    #[error("partition '{partition}' column {column} is not a {expected} column")]
    ColumnShape {
        partition: String,
        column: usize,
        expected: &'static str,
    },

    #[error("partition '{partition}' has no index for column {column}")]
    MissingIndex { partition: String, column: usize },

    #[error("partition '{partition}' column {column} holds {found} rows, expected {expected}")]
    RaggedColumns {
        partition: String,
        column: usize,
        found: u64,
        expected: u64,
    },
}

impl From<PartitionError> for InternalError {
    fn from(err: PartitionError) -> Self {
        match err {
            PartitionError::RaggedColumns { .. } => Self::store_corruption(err.to_string()),
            _ => Self::store_internal(err.to_string()),
        }
    }
}

///
/// Partition
///
/// Ordered, append-only row segment. Row ids are dense, stable and assigned
/// in append order. Owns its column storage and per-column bucket indexes.
///

#[derive(Clone, Debug)]
pub struct Partition {
    name: String,
    size: u64,
    columns: Vec<ColumnData>,
    indexes: Vec<Option<BucketIndex>>,
}

impl Partition {
    /// Assemble a partition from already-materialized storage.
    ///
    /// Every column must hold exactly `size` rows, and `indexes` is aligned
    /// with `columns` (`None` for unindexed columns).
    pub fn from_parts(
        name: impl Into<String>,
        columns: Vec<ColumnData>,
        mut indexes: Vec<Option<BucketIndex>>,
    ) -> Result<Self, PartitionError> {
        let name = name.into();
        let size = columns.first().map_or(0, ColumnData::len);

        for (column, data) in columns.iter().enumerate() {
            if data.len() != size {
                return Err(PartitionError::RaggedColumns {
                    partition: name,
                    column,
                    found: data.len(),
                    expected: size,
                });
            }
        }
        indexes.resize_with(columns.len(), || None);

        Ok(Self {
            name,
            size,
            columns,
            indexes,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows currently in the partition.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    pub fn fixed_column(&self, column: usize) -> Result<&FixedColumn, PartitionError> {
        match self.column(column)? {
            ColumnData::Fixed(col) => Ok(col),
            ColumnData::Variable(_) => Err(self.shape_error(column, "fixed")),
        }
    }

    pub fn variable_column(&self, column: usize) -> Result<&VariableColumn, PartitionError> {
        match self.column(column)? {
            ColumnData::Variable(col) => Ok(col),
            ColumnData::Fixed(_) => Err(self.shape_error(column, "variable")),
        }
    }

    pub fn index_for_column(&self, column: usize) -> Result<&BucketIndex, PartitionError> {
        self.indexes
            .get(column)
            .and_then(Option::as_ref)
            .ok_or_else(|| PartitionError::MissingIndex {
                partition: self.name.clone(),
                column,
            })
    }

    /// Row view positioned at `row`.
    #[must_use]
    pub const fn row(&self, row: RowId) -> PartitionRow<'_> {
        PartitionRow::new(self, row)
    }

    fn column(&self, column: usize) -> Result<&ColumnData, PartitionError> {
        self.columns
            .get(column)
            .ok_or_else(|| PartitionError::MissingColumn {
                partition: self.name.clone(),
                column,
            })
    }

    fn shape_error(&self, column: usize, expected: &'static str) -> PartitionError {
        PartitionError::ColumnShape {
            partition: self.name.clone(),
            column,
            expected,
        }
    }
}

///
/// PartitionLoader
///

pub type PartitionLoader = Box<dyn Fn() -> Result<Partition, InternalError>>;

///
/// PartitionHandle
///
/// Store-owned reference to a partition that is opened on first use and
/// cached for every later open. A failed open is not cached; the next call
/// retries the loader.
///

pub struct PartitionHandle {
    name: String,
    loader: Option<PartitionLoader>,
    opened: OnceCell<Partition>,
}

impl PartitionHandle {
    /// Handle that opens through `loader` on first access.
    #[must_use]
    pub fn lazy(name: impl Into<String>, loader: PartitionLoader) -> Self {
        Self {
            name: name.into(),
            loader: Some(loader),
            opened: OnceCell::new(),
        }
    }

    /// Handle over a partition that is already open.
    #[must_use]
    pub fn opened(partition: Partition) -> Self {
        Self {
            name: partition.name.clone(),
            loader: None,
            opened: OnceCell::from(partition),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.opened.get().is_some()
    }

    pub fn open(&self) -> Result<&Partition, InternalError> {
        if let Some(partition) = self.opened.get() {
            return Ok(partition);
        }

        let loader = self.loader.as_ref().ok_or_else(|| {
            InternalError::store_internal(format!("partition '{}' has no loader", self.name))
        })?;
        let partition = loader()?;

        Ok(self.opened.get_or_init(|| partition))
    }
}

impl fmt::Debug for PartitionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartitionHandle")
            .field("name", &self.name)
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}
