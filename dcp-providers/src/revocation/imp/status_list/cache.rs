use std::{collections::HashMap, sync::Arc};

use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;

use super::model::CachedStatusList;

pub const DEFAULT_MAX_ENTRIES: usize = 256;

/// Status lists keyed by URL. The lock is only held for map access, never while fetching.
/// Stale entries are dropped on insert; past `max_entries` the oldest fetch goes first.
pub struct StatusListCache {
    ttl: Duration,
    max_entries: usize,
    entries: RwLock<HashMap<String, Arc<CachedStatusList>>>,
}

impl StatusListCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries: max_entries.max(1),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the entry for `url` unless it is missing or older than the TTL.
    pub async fn get_fresh(&self, url: &str, now: OffsetDateTime) -> Option<Arc<CachedStatusList>> {
        let entries = self.entries.read().await;

        entries
            .get(url)
            .filter(|entry| !entry.is_stale(now, self.ttl))
            .cloned()
    }

    pub async fn insert(&self, url: &str, entry: CachedStatusList) -> Arc<CachedStatusList> {
        let now = entry.fetched_at;
        let entry = Arc::new(entry);
        let mut entries = self.entries.write().await;

        entries.retain(|_, cached| !cached.is_stale(now, self.ttl));
        entries.remove(url);
        while entries.len() >= self.max_entries {
            let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, cached)| cached.fetched_at)
                .map(|(url, _)| url.to_owned())
            else {
                break;
            };
            tracing::debug!(url = %oldest, "evicting status list");
            entries.remove(&oldest);
        }

        entries.insert(url.to_owned(), entry.clone());
        entry
    }

    #[cfg(test)]
    pub(crate) async fn get(&self, url: &str) -> Option<Arc<CachedStatusList>> {
        self.entries.read().await.get(url).cloned()
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
