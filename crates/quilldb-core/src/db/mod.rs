//! Storage read path: column storage, bucket indexes, partitions, driving
//! sub-queries and the head row sources built on top of them.

pub mod cancel;
pub mod column;
pub mod context;
pub mod executor;
pub mod filter;
pub mod index;
pub mod partition;
pub mod record;
pub mod schema;
pub mod value;

pub use cancel::{CancellationSignal, CancellationToken, NeverCancelled};
pub use context::{StorageContext, Store};
pub use executor::{IntHeadRowSource, RowCursor, RowSource, TextHeadRowSource};
pub use partition::{Partition, PartitionHandle, PartitionSlice};
pub use schema::{ColumnKind, ColumnModel, StoreMetadata};
