//! Shared partition fixtures for unit tests.

use crate::db::{
    context::{StorageContext, Store},
    partition::{Partition, PartitionBuilder, PartitionHandle},
    schema::{ColumnKind, ColumnModel, StoreMetadata},
    value::Value,
};

/// `trades`: `id` int indexed with mask `hint`, `price` long.
pub(crate) fn trades_metadata(hint: u32) -> StoreMetadata {
    StoreMetadata::new(
        "trades",
        vec![
            ColumnModel::new("id", ColumnKind::Int).indexed(hint),
            ColumnModel::new("price", ColumnKind::Long),
        ],
    )
}

/// `quotes`: `sym` text of `kind` indexed into `hint` buckets, `size` int.
pub(crate) fn quotes_metadata(kind: ColumnKind, hint: u32) -> StoreMetadata {
    StoreMetadata::new(
        "quotes",
        vec![
            ColumnModel::new("sym", kind).indexed(hint),
            ColumnModel::new("size", ColumnKind::Int),
        ],
    )
}

/// Trades partition with one row per id; `price` is `row * 10`.
pub(crate) fn trades_partition(name: &str, hint: u32, ids: &[i32]) -> Partition {
    let mut builder = PartitionBuilder::new(name, &trades_metadata(hint));
    for (row, id) in (0i64..).zip(ids) {
        builder
            .append(&[Value::Int(*id), Value::Long(row * 10)])
            .expect("fixture row");
    }

    builder.build().expect("fixture partition")
}

/// Quotes partition with one row per symbol; `size` is the row id.
pub(crate) fn quotes_partition(
    name: &str,
    kind: ColumnKind,
    hint: u32,
    syms: &[&str],
) -> Partition {
    let mut builder = PartitionBuilder::new(name, &quotes_metadata(kind, hint));
    for (row, sym) in (0i32..).zip(syms) {
        let sym = match kind {
            ColumnKind::Symbol => Value::symbol(*sym),
            _ => Value::str(*sym),
        };
        builder
            .append(&[sym, Value::Int(row)])
            .expect("fixture row");
    }

    builder.build().expect("fixture partition")
}

/// Context holding one store over already-open partitions.
pub(crate) fn context_with(metadata: StoreMetadata, partitions: Vec<Partition>) -> StorageContext {
    let mut ctx = StorageContext::new();
    let handles = partitions.into_iter().map(PartitionHandle::opened).collect();
    ctx.register(Store::new(metadata, handles))
        .expect("fixture store registers");

    ctx
}
