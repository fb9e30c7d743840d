//! Row filters applied to bucket-scan candidates.

use crate::{
    db::{
        context::StorageContext, partition::PartitionRow, schema::ColumnKind, value::Value,
    },
    error::InternalError,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

///
/// RowFilter
///
/// Optional predicate of a row source. `prepare` binds it to the execution's
/// storage before any slice is scanned; `matches` is then evaluated against
/// the candidate row.
///

pub trait RowFilter {
    fn prepare(&mut self, ctx: &StorageContext) -> Result<(), InternalError>;

    fn matches(&self, row: &PartitionRow<'_>) -> Result<bool, InternalError>;
}

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    #[must_use]
    pub const fn eval(self, ord: Ordering) -> bool {
        match self {
            Self::Eq => ord.is_eq(),
            Self::Ne => ord.is_ne(),
            Self::Lt => ord.is_lt(),
            Self::Le => ord.is_le(),
            Self::Gt => ord.is_gt(),
            Self::Ge => ord.is_ge(),
        }
    }
}

///
/// ColumnPredicate
///
/// `<column> <op> <constant>` over one column of the scanned store. The
/// column is resolved by name when the filter is prepared.
///

#[derive(Clone, Debug)]
pub struct ColumnPredicate {
    store: String,
    column: String,
    op: CompareOp,
    value: Value,
    slot: Option<usize>,
}

impl ColumnPredicate {
    #[must_use]
    pub fn new(
        store: impl Into<String>,
        column: impl Into<String>,
        op: CompareOp,
        value: Value,
    ) -> Self {
        Self {
            store: store.into(),
            column: column.into(),
            op,
            value,
            slot: None,
        }
    }
}

impl RowFilter for ColumnPredicate {
    fn prepare(&mut self, ctx: &StorageContext) -> Result<(), InternalError> {
        let metadata = ctx.store(&self.store)?.metadata();
        let slot = metadata.column_index(&self.column)?;
        let kind = metadata.column(slot)?.kind;

        let compatible = match &self.value {
            Value::Int(_) => kind == ColumnKind::Int,
            Value::Long(_) => kind == ColumnKind::Long,
            Value::Str(_) | Value::Symbol(_) => kind.is_text(),
        };
        if !compatible {
            return Err(InternalError::query_unsupported(format!(
                "filter on '{}' ({kind}) cannot compare against a {} constant",
                self.column,
                self.value.kind()
            )));
        }
        self.slot = Some(slot);

        Ok(())
    }

    fn matches(&self, row: &PartitionRow<'_>) -> Result<bool, InternalError> {
        let slot = self.slot.ok_or_else(|| {
            InternalError::query_invariant(format!(
                "filter on '{}' evaluated before prepare",
                self.column
            ))
        })?;

        let ord = match &self.value {
            Value::Int(v) => row.get_int(slot)?.cmp(v),
            Value::Long(v) => row.get_long(slot)?.cmp(v),
            Value::Str(v) | Value::Symbol(v) => row.with_str(slot, |s| s.cmp(v.as_str()))?,
        };

        Ok(self.op.eval(ord))
    }
}

///
/// FnFilter
///
/// Adapter turning a closure into a [`RowFilter`] with nothing to bind.
///

pub struct FnFilter<F>(pub F);

impl<F> RowFilter for FnFilter<F>
where
    F: Fn(&PartitionRow<'_>) -> Result<bool, InternalError>,
{
    fn prepare(&mut self, _ctx: &StorageContext) -> Result<(), InternalError> {
        Ok(())
    }

    fn matches(&self, row: &PartitionRow<'_>) -> Result<bool, InternalError> {
        (self.0)(row)
    }
}

///
/// TESTS
///
