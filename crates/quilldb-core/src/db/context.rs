use crate::{
    db::{partition::PartitionHandle, schema::StoreMetadata},
    error::{ErrorClass, ErrorOrigin, InternalError},
};
use derive_more::Deref;
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// StorageContextError
///

#[derive(Debug, ThisError)]
pub enum StorageContextError {
    #[error("store '{0}' already registered")]
    StoreAlreadyRegistered(String),
}

impl From<StorageContextError> for InternalError {
    fn from(err: StorageContextError) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Store,
            err.to_string(),
        )
    }
}

///
/// Store
///
/// One store: its column layout plus its partitions in scan order.
///

#[derive(Debug)]
pub struct Store {
    metadata: StoreMetadata,
    partitions: Vec<PartitionHandle>,
}

impl Store {
    #[must_use]
    pub const fn new(metadata: StoreMetadata, partitions: Vec<PartitionHandle>) -> Self {
        Self {
            metadata,
            partitions,
        }
    }

    #[must_use]
    pub const fn metadata(&self) -> &StoreMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn partitions(&self) -> &[PartitionHandle] {
        &self.partitions
    }
}

///
/// StorageContext
///
/// Read-side view of every registered store, handed to `prepare` so that
/// driving sub-queries and filters can resolve what they read.
///

#[derive(Debug, Default, Deref)]
pub struct StorageContext(BTreeMap<String, Store>);

impl StorageContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, store: Store) -> Result<(), InternalError> {
        let name = store.metadata.name().to_string();
        if self.0.contains_key(&name) {
            return Err(StorageContextError::StoreAlreadyRegistered(name).into());
        }
        self.0.insert(name, store);

        Ok(())
    }

    pub fn store(&self, name: &str) -> Result<&Store, InternalError> {
        self.0
            .get(name)
            .ok_or_else(|| InternalError::store_not_found(name))
    }
}
