use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::remote_entity_storage::{
    RemoteEntity, RemoteEntityStorage, RemoteEntityStorageError, RemoteEntityType,
};

/// Process-local cache storage; entries are lost on restart.
#[derive(Default)]
pub struct InMemoryStorage {
    entries: Mutex<HashMap<String, RemoteEntity>>,
}

impl InMemoryStorage {
    pub fn with_entries(entries: impl IntoIterator<Item = RemoteEntity>) -> Self {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|entity| (entity.key.clone(), entity))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl RemoteEntityStorage for InMemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<RemoteEntity>, RemoteEntityStorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn upsert(&self, entity: RemoteEntity) -> Result<(), RemoteEntityStorageError> {
        self.entries.lock().insert(entity.key.clone(), entity);
        Ok(())
    }

    async fn count(&self, entity_type: RemoteEntityType) -> Result<usize, RemoteEntityStorageError> {
        Ok(self
            .entries
            .lock()
            .values()
            .filter(|entity| entity.entity_type == entity_type)
            .count())
    }

    async fn evict_least_used(
        &self,
        entity_type: RemoteEntityType,
    ) -> Result<(), RemoteEntityStorageError> {
        let mut entries = self.entries.lock();

        let victim = entries
            .values()
            .filter(|entity| entity.entity_type == entity_type)
            .min()
            .map(|entity| entity.key.clone());
        if let Some(key) = victim {
            entries.remove(&key);
        }

        Ok(())
    }
}
