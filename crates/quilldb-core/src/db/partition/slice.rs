use crate::{
    RowId,
    db::partition::{Partition, PartitionHandle},
};

///
/// PartitionSlice
///
/// Row-id range of one partition that a row source scans in a single
/// prepare-cursor call. `lo` and `hi` are both inclusive. With `calc_hi`
/// set, `hi` is ignored and the range runs to the partition's size at open
/// time (the partition may still be growing).
///

#[derive(Clone, Copy, Debug)]
pub struct PartitionSlice<'a> {
    pub partition: &'a PartitionHandle,
    pub lo: RowId,
    pub hi: RowId,
    pub calc_hi: bool,
}

impl<'a> PartitionSlice<'a> {
    #[must_use]
    pub const fn new(partition: &'a PartitionHandle, lo: RowId, hi: RowId) -> Self {
        Self {
            partition,
            lo,
            hi,
            calc_hi: false,
        }
    }

    /// Slice from `lo` to whatever the partition holds when it is opened.
    #[must_use]
    pub const fn open_ended(partition: &'a PartitionHandle, lo: RowId) -> Self {
        Self {
            partition,
            lo,
            hi: 0,
            calc_hi: true,
        }
    }

    /// Whole partition.
    #[must_use]
    pub const fn full(partition: &'a PartitionHandle) -> Self {
        Self::open_ended(partition, 0)
    }
}

///
/// SliceBounds
///
/// Exclusive row bounds resolved against an opened partition:
/// `lo = slice.lo - 1`, `hi = calc_hi ? size : slice.hi + 1`, and a row
/// qualifies when `lo < row < hi`.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SliceBounds {
    lo: i64,
    hi: i64,
}

impl SliceBounds {
    #[must_use]
    pub fn resolve(slice: &PartitionSlice<'_>, partition: &Partition) -> Self {
        let lo = to_signed(slice.lo).saturating_sub(1);
        let hi = if slice.calc_hi {
            to_signed(partition.size())
        } else {
            to_signed(slice.hi).saturating_add(1)
        };

        Self { lo, hi }
    }

    #[must_use]
    pub const fn lo(&self) -> i64 {
        self.lo
    }

    #[must_use]
    pub const fn hi(&self) -> i64 {
        self.hi
    }

    #[must_use]
    pub fn contains(&self, row: RowId) -> bool {
        let row = to_signed(row);

        row > self.lo && row < self.hi
    }
}

fn to_signed(row: RowId) -> i64 {
    i64::try_from(row).unwrap_or(i64::MAX)
}
