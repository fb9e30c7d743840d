use crate::{RowId, db::index::BucketIndex, error::InternalError};
use thiserror::Error as ThisError;

// Layout (all little-endian):
//   header      bucket_count: u32 (written buckets only)
//   key block   bucket_count x (bucket: u32, offset: u32, len: u32), ascending
//               by bucket, offset/len in row-id units
//   value block row ids as u64
const HEADER_BYTES: usize = 4;
const KEY_ENTRY_BYTES: usize = 12;
const ROW_ID_BYTES: usize = 8;

///
/// RawIndexError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum RawIndexError {
    #[error("index image truncated: {len} bytes, header needs {HEADER_BYTES}")]
    TruncatedHeader { len: usize },

    #[error("index key block truncated: {buckets} buckets need {needed} bytes, found {len}")]
    TruncatedKeyBlock {
        buckets: u32,
        needed: usize,
        len: usize,
    },

    #[error("bucket {bucket} follows bucket {previous} in the key block")]
    UnorderedBucket { bucket: u32, previous: u32 },

    #[error("index value block is not a whole number of row ids ({len} bytes)")]
    RaggedValueBlock { len: usize },

    #[error("bucket {bucket} spans rows {offset}..{end} past value block of {rows} rows")]
    BucketOutOfRange {
        bucket: u32,
        offset: u32,
        end: u64,
        rows: usize,
    },

    #[error("index has too many entries to encode: {0}")]
    TooLarge(usize),
}

impl From<RawIndexError> for InternalError {
    fn from(err: RawIndexError) -> Self {
        match err {
            RawIndexError::TooLarge(_) => Self::index_unsupported(err.to_string()),
            _ => Self::index_corruption(err.to_string()),
        }
    }
}

///
/// RawBucketIndex
///
/// Flat byte image of a [`BucketIndex`], suitable for writing to a file or
/// mapping back in.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawBucketIndex(Vec<u8>);

impl RawBucketIndex {
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn encode(index: &BucketIndex) -> Result<Self, RawIndexError> {
        let bucket_count = u32::try_from(index.bucket_count())
            .map_err(|_| RawIndexError::TooLarge(index.bucket_count()))?;
        let total = index.len();

        let mut out = Vec::with_capacity(
            HEADER_BYTES + index.bucket_count() * KEY_ENTRY_BYTES + total * ROW_ID_BYTES,
        );
        out.extend_from_slice(&bucket_count.to_le_bytes());

        let mut offset = 0u32;
        for (bucket, rows) in index.buckets() {
            let len = u32::try_from(rows.len()).map_err(|_| RawIndexError::TooLarge(total))?;
            out.extend_from_slice(&bucket.to_le_bytes());
            out.extend_from_slice(&offset.to_le_bytes());
            out.extend_from_slice(&len.to_le_bytes());
            offset = offset
                .checked_add(len)
                .ok_or(RawIndexError::TooLarge(total))?;
        }

        for (_, rows) in index.buckets() {
            for row in rows {
                out.extend_from_slice(&row.to_le_bytes());
            }
        }

        Ok(Self(out))
    }

    pub fn decode(&self) -> Result<BucketIndex, RawIndexError> {
        let bytes = self.0.as_slice();
        let header = bytes
            .get(..HEADER_BYTES)
            .ok_or(RawIndexError::TruncatedHeader { len: bytes.len() })?;
        let bucket_count = read_u32(header);

        let key_block_len = bucket_count as usize * KEY_ENTRY_BYTES;
        let values_start = HEADER_BYTES + key_block_len;
        let key_block =
            bytes
                .get(HEADER_BYTES..values_start)
                .ok_or(RawIndexError::TruncatedKeyBlock {
                    buckets: bucket_count,
                    needed: values_start,
                    len: bytes.len(),
                })?;

        let values = &bytes[values_start..];
        if values.len() % ROW_ID_BYTES != 0 {
            return Err(RawIndexError::RaggedValueBlock { len: values.len() });
        }
        let rows: Vec<RowId> = values
            .chunks_exact(ROW_ID_BYTES)
            .map(|chunk| {
                let mut buf = [0u8; ROW_ID_BYTES];
                buf.copy_from_slice(chunk);
                RowId::from_le_bytes(buf)
            })
            .collect();

        let mut index = BucketIndex::new();
        let mut previous: Option<u32> = None;
        for entry in key_block.chunks_exact(KEY_ENTRY_BYTES) {
            let bucket = read_u32(&entry[..4]);
            let offset = read_u32(&entry[4..8]);
            let len = read_u32(&entry[8..]);

            if let Some(previous) = previous
                && bucket <= previous
            {
                return Err(RawIndexError::UnorderedBucket { bucket, previous });
            }
            previous = Some(bucket);

            let end = u64::from(offset) + u64::from(len);
            let span = rows
                .get(offset as usize..end as usize)
                .ok_or(RawIndexError::BucketOutOfRange {
                    bucket,
                    offset,
                    end,
                    rows: rows.len(),
                })?;

            for row in span {
                index.add(bucket, *row);
            }
        }

        Ok(index)
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);

    u32::from_le_bytes(buf)
}
