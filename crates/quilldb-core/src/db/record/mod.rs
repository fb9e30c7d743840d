//! Module: db::record
//! Responsibility: driving sub-query contracts (records, cursors, sources).
//! Does not own: key extraction policy; row sources decide which column they read.
//! Boundary: sources are consumed once per execution through a lending cursor.

mod memory;
mod partition;


pub use memory::{MemoryRecord, MemoryRecordSource};
pub use partition::PartitionRecordSource;

use crate::{
    db::{cancel::CancellationSignal, context::StorageContext, schema::ColumnKind},
    error::InternalError,
};

///
/// Record
///
/// One row produced by a driving sub-query, read by column position.
/// `Str` and `Symbol` are distinct physical text representations; reading
/// one through the other's accessor is an error.
///

pub trait Record {
    fn get_int(&self, column: usize) -> Result<i32, InternalError>;

    fn get_long(&self, column: usize) -> Result<i64, InternalError>;

    fn get_str(&self, column: usize) -> Result<&str, InternalError>;

    fn get_sym(&self, column: usize) -> Result<&str, InternalError>;
}

///
/// RecordCursor
///
/// Lending cursor: the returned record is valid until the next call.
///

pub trait RecordCursor {
    fn next_record(&mut self) -> Result<Option<&dyn Record>, InternalError>;
}

///
/// RecordSource
///
/// Upstream sub-query producing the driving rows of a row source.
///

pub trait RecordSource {
    fn prepare_cursor<'a>(
        &'a self,
        ctx: &'a StorageContext,
        cancel: &'a dyn CancellationSignal,
    ) -> Result<Box<dyn RecordCursor + 'a>, InternalError>;

    /// Self-description for plan introspection.
    fn explain(&self) -> serde_json::Value;
}

pub(crate) fn kind_mismatch(
    column: usize,
    expected: ColumnKind,
    found: ColumnKind,
) -> InternalError {
    InternalError::query_unsupported(format!(
        "record column {column} holds a {found} value, read as {expected}"
    ))
}

pub(crate) fn missing_column(column: usize, width: usize) -> InternalError {
    InternalError::query_invariant(format!(
        "record column {column} out of range for record of {width} columns"
    ))
}
