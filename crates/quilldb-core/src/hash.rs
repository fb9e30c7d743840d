use xxhash_rust::xxh3::xxh3_64;

///
/// Bounded text hash.
///
/// Maps `text` into `[0, buckets)` using XXH3-64 over the UTF-8 bytes.
///
/// - **Deterministic** across platforms and process restarts; bucket ids are
///   persisted in indexes, so the seed and byte encoding must never change
/// - **Not cryptographically secure**
///
/// `buckets == 0` maps everything to bucket `0`.
///
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn bounded_hash(text: &str, buckets: u32) -> u32 {
    if buckets == 0 {
        return 0;
    }

    (xxh3_64(text.as_bytes()) % u64::from(buckets)) as u32
}

///
/// TESTS
///
