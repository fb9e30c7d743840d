//! Core runtime for QuillDB: partitioned column storage, hash-bucket
//! secondary indexes, and the indexed head-row sources that read them.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod db;
pub mod error;
pub mod hash;
pub mod obs;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// RowId
///
/// Dense, stable position of a row inside its partition, assigned in append order.
///

pub type RowId = u64;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, or storage internals are re-exported here.
///

pub mod prelude {
    pub use crate::{
        RowId,
        db::{
            executor::{
                IntHeadRowSource, RowCursor, RowSource, StrKey, SymKey, TextHeadRowSource,
                TextKeyExtractor,
            },
            partition::{PartitionHandle, PartitionSlice},
            record::{Record, RecordCursor, RecordSource},
            schema::{ColumnKind, StoreMetadata},
            value::Value,
        },
    };
}
