//! Module: db::executor
//! Responsibility: indexed head-row sources driven by sub-query key sets.
//! Does not own: partition storage, index population, or driving sub-query semantics.
//! Boundary: configure once, prepare once per execution, prepare_cursor once per slice.

mod explain;
mod extract;
mod head;
mod keys;
pub mod trace;


pub use explain::ExplainRowSource;
pub use extract::{FnKey, StrKey, SymKey, TextKeyExtractor};
pub use head::{IntHeadRowSource, TextHeadRowSource};
pub use keys::{IntKeySet, TextKeySet};

// Design notes:
// - Row sources are not reentrant; key sets and result buffers are scratch
//   state rebuilt every execution and every slice.
// - Ascending row-id order holds within one slice only.
// - Prepare-cursor polls no cancellation signal; its work is bounded by the
//   key set fixed during prepare.

use crate::{
    RowId,
    db::{
        cancel::CancellationSignal, context::StorageContext, partition::PartitionSlice,
        schema::{ColumnKind, StoreMetadata},
    },
    error::{ErrorClass, ErrorOrigin, InternalError},
};
use thiserror::Error as ThisError;

///
/// RowCursor
///
/// Forward-only cursor over the row ids selected for the current slice.
///

pub trait RowCursor {
    fn has_next(&self) -> bool;

    fn next_row(&mut self) -> Option<RowId>;
}

///
/// RowSource
///
/// Operator producing row ids per partition slice.
///
/// Lifecycle: `configure` once against the store layout, `prepare` once per
/// execution, then `prepare_cursor` once per slice. The returned cursor is the
/// source itself and is invalidated by the next `prepare_cursor`.
///

pub trait RowSource: RowCursor {
    fn configure(&mut self, metadata: &StoreMetadata) -> Result<(), InternalError>;

    fn prepare(
        &mut self,
        ctx: &StorageContext,
        cancel: &dyn CancellationSignal,
    ) -> Result<(), InternalError>;

    fn prepare_cursor(
        &mut self,
        slice: &PartitionSlice<'_>,
    ) -> Result<&mut dyn RowCursor, InternalError>;

    /// Nothing to release between executions; buffers are rebuilt on use.
    fn reset(&mut self);

    fn explain(&self) -> ExplainRowSource;
}

///
/// ExecutorError
///

#[derive(Debug, ThisError)]
pub(crate) enum ExecutorError {
    #[error("{op} used before configure")]
    NotConfigured { op: &'static str },

    #[error("{op} prepare_cursor called before a successful prepare")]
    NotPrepared { op: &'static str },

    #[error("{op} cannot key on column '{column}' of kind {kind}")]
    ColumnKind {
        op: &'static str,
        column: String,
        kind: ColumnKind,
    },

    #[error("{op} requires an index on column '{column}'")]
    NotIndexed { op: &'static str, column: String },

    #[error("column '{column}' has unusable distinct_count_hint {hint}")]
    InvalidHint { column: String, hint: u32 },
}

impl ExecutorError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::NotConfigured { .. } | Self::NotPrepared { .. } => {
                ErrorClass::InvariantViolation
            }
            Self::ColumnKind { .. } | Self::NotIndexed { .. } | Self::InvalidHint { .. } => {
                ErrorClass::Unsupported
            }
        }
    }

    pub(crate) const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::NotConfigured { .. } | Self::NotPrepared { .. } => ErrorOrigin::Executor,
            Self::ColumnKind { .. } | Self::NotIndexed { .. } | Self::InvalidHint { .. } => {
                ErrorOrigin::Query
            }
        }
    }
}

impl From<ExecutorError> for InternalError {
    fn from(err: ExecutorError) -> Self {
        Self::new(err.class(), err.origin(), err.to_string())
    }
}
