use crate::db::schema::ColumnKind;
use serde::{Deserialize, Serialize};

///
/// Value
///
/// Owned cell value used by in-memory records and the partition builder.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Value {
    Int(i32),
    Long(i64),
    Str(String),
    Symbol(String),
}

impl Value {
    #[must_use]
    pub const fn kind(&self) -> ColumnKind {
        match self {
            Self::Int(_) => ColumnKind::Int,
            Self::Long(_) => ColumnKind::Long,
            Self::Str(_) => ColumnKind::Str,
            Self::Symbol(_) => ColumnKind::Symbol,
        }
    }

    #[must_use]
    pub fn str(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    #[must_use]
    pub fn symbol(value: impl Into<String>) -> Self {
        Self::Symbol(value.into())
    }
}
