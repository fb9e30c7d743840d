//! Bucket derivation shared by the index population path and the lookup path.
//!
//! Both sides MUST derive bucket ids through these functions. A lookup that
//! buckets differently from the writer that populated the index never finds
//! a row.

use crate::hash::bounded_hash;

/// Bucket for an integer key: the raw key masked with the column's
/// distinct-count hint (`key & hint`, not modulo).
///
/// The hint is expected to be `2^n - 1`; any other value leaves some buckets
/// permanently unused.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub const fn int_bucket(key: i32, hint: u32) -> u32 {
    (key as u32) & hint
}

/// Bucket for a text key: bounded hash into `[0, hint)`.
#[must_use]
pub fn text_bucket(key: &str, hint: u32) -> u32 {
    bounded_hash(key, hint)
}

/// True when `hint` has the `2^n - 1` shape required for mask bucketing.
#[must_use]
pub const fn is_mask_hint(hint: u32) -> bool {
    hint != 0 && (hint & hint.wrapping_add(1)) == 0
}
