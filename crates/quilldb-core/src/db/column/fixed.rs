use super::ColumnError;
use crate::RowId;

const INT_WIDTH: usize = 4;
const LONG_WIDTH: usize = 8;

///
/// FixedColumn
///
/// Dense little-endian buffer of fixed-width values addressed by row id.
/// Reads decode straight out of the buffer without allocating.
///

#[derive(Clone, Debug)]
pub struct FixedColumn {
    width: usize,
    data: Vec<u8>,
}

impl FixedColumn {
    pub const INT_WIDTH: usize = INT_WIDTH;
    pub const LONG_WIDTH: usize = LONG_WIDTH;

    /// Empty column of 32-bit integers.
    #[must_use]
    pub const fn int() -> Self {
        Self {
            width: Self::INT_WIDTH,
            data: Vec::new(),
        }
    }

    /// Empty column of 64-bit integers.
    #[must_use]
    pub const fn long() -> Self {
        Self {
            width: Self::LONG_WIDTH,
            data: Vec::new(),
        }
    }

    /// Adopt an existing value buffer (e.g. a mapped column file).
    pub fn from_bytes(width: usize, data: Vec<u8>) -> Result<Self, ColumnError> {
        if width == 0 || data.len() % width != 0 {
            return Err(ColumnError::RaggedBuffer {
                len: data.len(),
                width,
            });
        }

        Ok(Self { width, data })
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn len(&self) -> u64 {
        (self.data.len() / self.width) as u64
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub(crate) fn push_int(&mut self, value: i32) -> Result<(), ColumnError> {
        self.expect_width(Self::INT_WIDTH)?;
        self.data.extend_from_slice(&value.to_le_bytes());

        Ok(())
    }

    pub(crate) fn push_long(&mut self, value: i64) -> Result<(), ColumnError> {
        self.expect_width(Self::LONG_WIDTH)?;
        self.data.extend_from_slice(&value.to_le_bytes());

        Ok(())
    }

    /// Read the 32-bit value stored at `row`.
    pub fn get_int(&self, row: RowId) -> Result<i32, ColumnError> {
        self.expect_width(Self::INT_WIDTH)?;
        let bytes = self.slot::<INT_WIDTH>(row)?;

        Ok(i32::from_le_bytes(bytes))
    }

    /// Read the 64-bit value stored at `row`.
    pub fn get_long(&self, row: RowId) -> Result<i64, ColumnError> {
        self.expect_width(Self::LONG_WIDTH)?;
        let bytes = self.slot::<LONG_WIDTH>(row)?;

        Ok(i64::from_le_bytes(bytes))
    }

    const fn expect_width(&self, expected: usize) -> Result<(), ColumnError> {
        if self.width != expected {
            return Err(ColumnError::WidthMismatch {
                expected,
                found: self.width,
            });
        }

        Ok(())
    }

    fn slot<const N: usize>(&self, row: RowId) -> Result<[u8; N], ColumnError> {
        let out_of_range = || ColumnError::RowOutOfRange {
            row,
            len: self.len(),
        };

        let start = usize::try_from(row)
            .ok()
            .and_then(|r| r.checked_mul(N))
            .ok_or_else(out_of_range)?;
        let bytes = self
            .data
            .get(start..start.saturating_add(N))
            .ok_or_else(out_of_range)?;

        let mut out = [0u8; N];
        out.copy_from_slice(bytes);

        Ok(out)
    }
}
