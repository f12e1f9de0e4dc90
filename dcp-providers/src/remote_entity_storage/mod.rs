//! Storage backing the [caching loader](crate::caching_loader) for remotely fetched entities.

use std::cmp::Ordering;

use thiserror::Error;
use time::OffsetDateTime;

pub mod in_memory;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait RemoteEntityStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<RemoteEntity>, RemoteEntityStorageError>;

    /// Inserts `entity`, replacing any entry with the same key.
    async fn upsert(&self, entity: RemoteEntity) -> Result<(), RemoteEntityStorageError>;

    async fn count(&self, entity_type: RemoteEntityType) -> Result<usize, RemoteEntityStorageError>;

    /// Removes the entry of `entity_type` that sorts first by [`RemoteEntity`]'s ordering.
    async fn evict_least_used(
        &self,
        entity_type: RemoteEntityType,
    ) -> Result<(), RemoteEntityStorageError>;
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RemoteEntity {
    pub key: String,
    pub entity_type: RemoteEntityType,
    pub value: Vec<u8>,
    pub last_modified: OffsetDateTime,
    pub hit_counter: u32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum RemoteEntityType {
    DidDocument,
}

#[derive(Clone, Error, Debug)]
#[error("Remote entity storage unavailable: {0}")]
pub struct RemoteEntityStorageError(pub String);

impl PartialOrd for RemoteEntity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Least used first, then least recently refreshed.
impl Ord for RemoteEntity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hit_counter
            .cmp(&other.hit_counter)
            .then_with(|| self.last_modified.cmp(&other.last_modified))
    }
}
