//! Module: db::column
//! Responsibility: typed, zero-copy row access over partition column storage.
//! Does not own: bucket indexes or partition lifecycle.
//! Boundary: every read is bounds-checked and reports failures as column-origin errors.

mod fixed;
mod variable;

#[cfg(test)]
mod tests;

pub use fixed::FixedColumn;
pub use variable::{FlyweightText, VariableColumn};

use crate::{RowId, error::InternalError};
use thiserror::Error as ThisError;

///
/// ColumnError
///

#[derive(Debug, ThisError)]
pub enum ColumnError {
    #[error("row {row} out of range for column of {len} rows")]
    RowOutOfRange { row: RowId, len: u64 },

    #[error("fixed column width {found} cannot be read as {expected}-byte values")]
    WidthMismatch { expected: usize, found: usize },

    #[error("fixed column buffer of {len} bytes is not a multiple of width {width}")]
    RaggedBuffer { len: usize, width: usize },

    #[error("variable column offsets are broken at row {row}")]
    BrokenOffsets { row: RowId },

    #[error("variable column value at row {row} is not valid utf-8")]
    InvalidUtf8 { row: RowId },
}

impl From<ColumnError> for InternalError {
    fn from(err: ColumnError) -> Self {
        Self::column_corruption(err.to_string())
    }
}

///
/// ColumnData
///
/// Physical storage of one partition column.
///

#[derive(Clone, Debug)]
pub enum ColumnData {
    Fixed(FixedColumn),
    Variable(VariableColumn),
}

impl ColumnData {
    /// Number of rows stored in this column.
    #[must_use]
    pub fn len(&self) -> u64 {
        match self {
            Self::Fixed(col) => col.len(),
            Self::Variable(col) => col.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
