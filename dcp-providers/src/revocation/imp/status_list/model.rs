use bit_vec::BitVec;
use time::{Duration, OffsetDateTime};

/// A fetched and decoded status list.
#[derive(Debug, Clone)]
pub struct CachedStatusList {
    /// The status list credential as published.
    pub credential: serde_json::Value,
    pub bits: BitVec,
    pub fetched_at: OffsetDateTime,
}

impl CachedStatusList {
    /// Indices past the end of the list are not set.
    pub fn is_set(&self, index: usize) -> bool {
        self.bits.get(index).unwrap_or(false)
    }

    pub fn is_stale(&self, now: OffsetDateTime, ttl: Duration) -> bool {
        now - self.fetched_at > ttl
    }
}

/// The parts of a `credentialStatus` entry needed for a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct StatusEntry {
    pub status_list_credential: String,
    pub index: Option<usize>,
}
