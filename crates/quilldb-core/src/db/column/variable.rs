use super::ColumnError;
use crate::RowId;

///
/// VariableColumn
///
/// Variable-length UTF-8 values addressed by row id.
///
/// Layout: an offset table with one `u64` entry per row plus a trailing
/// terminator, over a contiguous data buffer. Row `r` spans
/// `data[offsets[r]..offsets[r + 1]]`.
///

#[derive(Clone, Debug)]
pub struct VariableColumn {
    offsets: Vec<u64>,
    data: Vec<u8>,
}

impl VariableColumn {
    #[must_use]
    pub fn new() -> Self {
        Self {
            offsets: vec![0],
            data: Vec::new(),
        }
    }

    /// Adopt an existing offset table and data buffer.
    /// Structural damage is reported lazily, on the first read that hits it.
    #[must_use]
    pub const fn from_parts(offsets: Vec<u64>, data: Vec<u8>) -> Self {
        Self { offsets, data }
    }

    #[must_use]
    pub const fn len(&self) -> u64 {
        self.offsets.len().saturating_sub(1) as u64
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn push_str(&mut self, value: &str) {
        self.data.extend_from_slice(value.as_bytes());
        self.offsets.push(self.data.len() as u64);
    }

    /// Open a flyweight reader over this column.
    #[must_use]
    pub const fn flyweight(&self) -> FlyweightText<'_> {
        FlyweightText { column: self }
    }

    fn bytes_at(&self, row: RowId) -> Result<&[u8], ColumnError> {
        let idx = usize::try_from(row)
            .ok()
            .filter(|r| r.saturating_add(1) < self.offsets.len())
            .ok_or(ColumnError::RowOutOfRange {
                row,
                len: self.len(),
            })?;

        let broken = || ColumnError::BrokenOffsets { row };
        let start = usize::try_from(self.offsets[idx]).map_err(|_| broken())?;
        let end = usize::try_from(self.offsets[idx + 1]).map_err(|_| broken())?;

        self.data.get(start..end).ok_or_else(broken)
    }
}

impl Default for VariableColumn {
    fn default() -> Self {
        Self::new()
    }
}

///
/// FlyweightText
///
/// Reusable text view over a [`VariableColumn`].
///
/// The `&str` handed out by [`FlyweightText::get_str`] aliases column storage
/// and borrows the flyweight mutably, so it must be consumed before the next
/// read through the same view.
///

pub struct FlyweightText<'a> {
    column: &'a VariableColumn,
}

impl FlyweightText<'_> {
    pub fn get_str(&mut self, row: RowId) -> Result<&str, ColumnError> {
        let bytes = self.column.bytes_at(row)?;

        std::str::from_utf8(bytes).map_err(|_| ColumnError::InvalidUtf8 { row })
    }
}
