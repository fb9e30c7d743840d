use crate::db::index::text_bucket;
use derive_more::Deref;
use std::collections::HashSet;

///
/// IntKeySet
///
/// Distinct integer keys materialized from the driving sub-query.
///

#[derive(Clone, Debug, Default, Deref)]
pub struct IntKeySet(HashSet<i32>);

impl IntKeySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `key`; returns false when it was already present.
    pub fn insert(&mut self, key: i32) -> bool {
        self.0.insert(key)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

///
/// TextKeySet
///
/// Distinct text keys with their bucket ids computed once on insertion.
/// `keys[i]` always hashes to `buckets[i]`.
///

#[derive(Clone, Debug, Default)]
pub struct TextKeySet {
    keys: Vec<String>,
    buckets: Vec<u32>,
    seen: HashSet<String>,
}

impl TextKeySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `key` bucketed into `hint` buckets; returns false when it was
    /// already present, in which case nothing is hashed or pushed.
    pub fn insert(&mut self, key: &str, hint: u32) -> bool {
        if self.seen.contains(key) {
            return false;
        }

        self.seen.insert(key.to_string());
        self.keys.push(key.to_string());
        self.buckets.push(text_bucket(key, hint));

        true
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys paired with their bucket ids, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.keys
            .iter()
            .map(String::as_str)
            .zip(self.buckets.iter().copied())
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.buckets.clear();
        self.seen.clear();
    }
}
