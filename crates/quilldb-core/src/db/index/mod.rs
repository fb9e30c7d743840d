//! Module: db::index
//! Responsibility: hash-bucket secondary index over column values.
//! Does not own: bucket derivation policy beyond `bucket`, or value equality checks.
//! Boundary: read path exposes cursors only; population appends in row order.

pub(crate) mod bucket;
mod cursor;
mod raw;


pub use bucket::{int_bucket, is_mask_hint, text_bucket};
pub use cursor::IndexCursor;
pub use raw::{RawBucketIndex, RawIndexError};

use crate::RowId;
use std::collections::BTreeMap;

///
/// BucketIndex
///
/// Sparse map from bucket id to the row ids inserted under it, in insertion
/// order. Only written buckets take space, so a wide mask hint costs nothing
/// until rows land in it; a cursor over a bucket never written is empty.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BucketIndex {
    buckets: BTreeMap<u32, Vec<RowId>>,
}

impl BucketIndex {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buckets: BTreeMap::new(),
        }
    }

    /// Record `row` under `bucket`.
    pub fn add(&mut self, bucket: u32, row: RowId) {
        self.buckets.entry(bucket).or_default().push(row);
    }

    /// Cursor over the row ids recorded under `bucket`.
    #[must_use]
    pub fn cursor(&self, bucket: u32) -> IndexCursor<'_> {
        self.buckets
            .get(&bucket)
            .map_or_else(IndexCursor::empty, |rows| IndexCursor::new(rows))
    }

    /// Number of buckets holding at least one row.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Total number of row ids across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Written buckets in ascending bucket order.
    pub(crate) fn buckets(&self) -> impl Iterator<Item = (u32, &[RowId])> {
        self.buckets
            .iter()
            .map(|(bucket, rows)| (*bucket, rows.as_slice()))
    }
}
