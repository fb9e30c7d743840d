use crate::RowId;

///
/// IndexCursor
///
/// Forward-only cursor over the row ids recorded under one bucket, in the
/// index's storage order. Callers that need row-id order sort after
/// collection.
///

#[derive(Clone, Debug)]
pub struct IndexCursor<'a> {
    rows: &'a [RowId],
    pos: usize,
}

impl<'a> IndexCursor<'a> {
    #[must_use]
    pub(crate) const fn new(rows: &'a [RowId]) -> Self {
        Self { rows, pos: 0 }
    }

    #[must_use]
    pub(crate) const fn empty() -> Self {
        Self::new(&[])
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.pos < self.rows.len()
    }

    /// Advance and return the next row id, or `None` once exhausted.
    pub fn next_row(&mut self) -> Option<RowId> {
        let row = self.rows.get(self.pos).copied()?;
        self.pos += 1;

        Some(row)
    }

    /// Row ids left to visit.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.rows.len() - self.pos
    }
}

impl Iterator for IndexCursor<'_> {
    type Item = RowId;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for IndexCursor<'_> {}
