use crate::error::InternalError;
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// ColumnKind
///
/// Physical column type. `Str` and `Symbol` are both text, stored in a
/// variable column; they differ only in how upstream records expose them.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Int,
    Long,
    Str,
    Symbol,
}

impl ColumnKind {
    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(self, Self::Str | Self::Symbol)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Int => "int",
            Self::Long => "long",
            Self::Str => "str",
            Self::Symbol => "symbol",
        };
        write!(f, "{label}")
    }
}

///
/// ColumnModel
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnModel {
    pub name: String,
    pub kind: ColumnKind,
    pub indexed: bool,

    /// Schema-time estimate of the column's distinct-value cardinality.
    /// Integer indexes use it as a bucket mask, text indexes as a bucket count.
    pub distinct_count_hint: u32,
}

impl ColumnModel {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
            indexed: false,
            distinct_count_hint: 0,
        }
    }

    #[must_use]
    pub const fn indexed(mut self, distinct_count_hint: u32) -> Self {
        self.indexed = true;
        self.distinct_count_hint = distinct_count_hint;
        self
    }
}

///
/// StoreMetadata
///
/// Column layout of one store, shared by all of its partitions.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StoreMetadata {
    name: String,
    columns: Vec<ColumnModel>,
}

impl StoreMetadata {
    #[must_use]
    pub fn new(name: impl Into<String>, columns: Vec<ColumnModel>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnModel] {
        &self.columns
    }

    /// Resolve a column name to its position.
    pub fn column_index(&self, name: &str) -> Result<usize, InternalError> {
        self.columns
            .iter()
            .position(|col| col.name == name)
            .ok_or_else(|| {
                InternalError::query_unsupported(format!(
                    "unknown column '{name}' in store '{}'",
                    self.name
                ))
            })
    }

    /// Column at a position previously returned by [`Self::column_index`].
    pub fn column(&self, index: usize) -> Result<&ColumnModel, InternalError> {
        self.columns.get(index).ok_or_else(|| {
            InternalError::query_invariant(format!(
                "column position {index} out of range for store '{}' ({} columns)",
                self.name,
                self.columns.len()
            ))
        })
    }
}
