use crate::{
    RowId,
    db::partition::Partition,
    error::InternalError,
};

///
/// PartitionRow
///
/// Read view of one partition row, handed to filters during a bucket scan.
///

#[derive(Clone, Copy, Debug)]
pub struct PartitionRow<'a> {
    partition: &'a Partition,
    row: RowId,
}

impl<'a> PartitionRow<'a> {
    #[must_use]
    pub(crate) const fn new(partition: &'a Partition, row: RowId) -> Self {
        Self { partition, row }
    }

    #[must_use]
    pub const fn row_id(&self) -> RowId {
        self.row
    }

    #[must_use]
    pub const fn partition(&self) -> &'a Partition {
        self.partition
    }

    pub fn get_int(&self, column: usize) -> Result<i32, InternalError> {
        Ok(self.partition.fixed_column(column)?.get_int(self.row)?)
    }

    pub fn get_long(&self, column: usize) -> Result<i64, InternalError> {
        Ok(self.partition.fixed_column(column)?.get_long(self.row)?)
    }

    /// Run `f` over the text at this row without copying it out.
    pub fn with_str<R>(
        &self,
        column: usize,
        f: impl FnOnce(&str) -> R,
    ) -> Result<R, InternalError> {
        let col = self.partition.variable_column(column)?;
        let mut view = col.flyweight();

        Ok(f(view.get_str(self.row)?))
    }
}
