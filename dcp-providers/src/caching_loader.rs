//! Size-bounded cache in front of a remote [`Resolver`].
//!
//! Entries younger than `refresh_after` are served directly. Older entries are refetched;
//! if that fails the stale value is still served until `cache_refresh_timeout` is exceeded.

use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::{
    remote_entity_storage::{
        RemoteEntity, RemoteEntityStorage, RemoteEntityStorageError, RemoteEntityType,
    },
    util::caching::{entry_requires_update, EntryRequiresUpdate},
};


#[async_trait]
pub trait Resolver: Send + Sync {
    type Error: From<RemoteEntityStorageError>;

    async fn do_resolve(&self, key: &str) -> Result<Vec<u8>, Self::Error>;
}

pub struct CachingLoader<E> {
    pub resolver: Arc<dyn Resolver<Error = E>>,
    pub remote_entity_type: RemoteEntityType,
    pub storage: Arc<dyn RemoteEntityStorage>,

    pub cache_size: usize,
    pub cache_refresh_timeout: time::Duration,
    pub refresh_after: time::Duration,

    eviction: Mutex<()>,
}

impl<E: From<RemoteEntityStorageError> + std::fmt::Display> CachingLoader<E> {
    pub fn new(
        resolver: Arc<dyn Resolver<Error = E>>,
        remote_entity_type: RemoteEntityType,
        storage: Arc<dyn RemoteEntityStorage>,
        cache_size: usize,
        cache_refresh_timeout: time::Duration,
        refresh_after: time::Duration,
    ) -> Self {
        Self {
            resolver,
            remote_entity_type,
            storage,
            cache_size,
            cache_refresh_timeout,
            refresh_after,
            eviction: Mutex::new(()),
        }
    }

    pub async fn resolve(&self, key: &str) -> Result<Vec<u8>, E> {
        let value = match self.storage.get(key).await? {
            None => {
                tracing::debug!(key, entity_type = ?self.remote_entity_type, "cache miss");
                let value = self.resolver.do_resolve(key).await?;

                self.storage
                    .upsert(RemoteEntity {
                        key: key.to_owned(),
                        entity_type: self.remote_entity_type,
                        value: value.clone(),
                        last_modified: OffsetDateTime::now_utc(),
                        hit_counter: 0,
                    })
                    .await?;

                value
            }
            Some(mut entry) => {
                let requires_update = entry_requires_update(
                    entry.last_modified,
                    self.cache_refresh_timeout,
                    self.refresh_after,
                );

                if requires_update == EntryRequiresUpdate::IsRecent {
                    tracing::debug!(key, entity_type = ?self.remote_entity_type, "cache hit");
                } else {
                    match self.resolver.do_resolve(key).await {
                        Ok(value) => {
                            entry.last_modified = OffsetDateTime::now_utc();
                            entry.value = value;
                        }
                        Err(error) if requires_update == EntryRequiresUpdate::MustBeUpdated => {
                            return Err(error);
                        }
                        Err(error) => {
                            tracing::warn!(key, %error, "refresh failed, serving cached entry");
                        }
                    }
                }
                entry.hit_counter += 1;

                self.storage.upsert(entry.clone()).await?;

                entry.value
            }
        };

        self.enforce_cache_size().await?;

        Ok(value)
    }

    async fn enforce_cache_size(&self) -> Result<(), RemoteEntityStorageError> {
        let _guard = self.eviction.lock().await;

        if self.storage.count(self.remote_entity_type).await? > self.cache_size {
            self.storage.evict_least_used(self.remote_entity_type).await?;
        }

        Ok(())
    }
}
