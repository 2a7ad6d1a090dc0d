//! TTL Cache Store
//!
//! Expiring cache over two persisted records: the single-slot posts cache
//! and the multi-key social namespace. Entries move
//! `Absent -> Present(fresh) -> Present(stale) -> Absent` purely as a
//! function of wall-clock time; staleness is computed lazily at read time
//! and there is no eviction thread. Stale reads purge the physical record
//! opportunistically, best effort.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::models::{Post, PostsCacheRecord, SocialCacheEntry, SocialCacheMap};
use crate::persist::KeyValueBackend;
use crate::store::{
    is_fresh, read_record, write_record, CacheStats, CacheStatsSnapshot, Clock, LockMap,
    POSTS_CACHE_KEY, SOCIAL_CACHE_KEY,
};

// == Cache Store ==
/// Posts and social caches with lazy TTL expiry.
pub struct CacheStore<B: KeyValueBackend> {
    backend: Arc<B>,
    clock: Arc<dyn Clock>,
    config: StoreConfig,
    locks: Arc<LockMap>,
    posts_stats: CacheStats,
    social_stats: CacheStats,
}

impl<B: KeyValueBackend> CacheStore<B> {
    // == Constructor ==
    /// Creates a cache store over a shared backend, clock, and lock map.
    pub(crate) fn new(
        backend: Arc<B>,
        clock: Arc<dyn Clock>,
        config: StoreConfig,
        locks: Arc<LockMap>,
    ) -> Self {
        Self {
            backend,
            clock,
            config,
            locks,
            posts_stats: CacheStats::new(),
            social_stats: CacheStats::new(),
        }
    }

    // == Posts Slot ==
    /// Overwrites the posts slot with a fresh timestamp.
    pub async fn save_posts(&self, posts: Vec<Post>, page: u32) -> Result<()> {
        let record = PostsCacheRecord {
            posts,
            timestamp: self.clock.now_ms(),
            page,
        };
        // The slot is written whole, but the lock keeps a concurrent stale
        // purge from deleting this fresh write.
        let _guard = self.locks.lock(POSTS_CACHE_KEY).await;
        write_record(self.backend.as_ref(), POSTS_CACHE_KEY, &record).await
    }

    /// Returns the cached posts page while it is within the posts TTL.
    ///
    /// A record older than the TTL is a cache miss; the caller is expected
    /// to refetch and write back through [`save_posts`](Self::save_posts).
    pub async fn posts(&self) -> Option<PostsCacheRecord> {
        let record: PostsCacheRecord =
            match read_record(self.backend.as_ref(), POSTS_CACHE_KEY).await {
                Some(record) => record,
                None => {
                    self.posts_stats.record_miss();
                    return None;
                }
            };

        if !is_fresh(self.clock.now_ms(), record.timestamp, self.config.posts_ttl_ms()) {
            self.posts_stats.record_stale_miss();
            self.purge_stale_posts(record.timestamp).await;
            return None;
        }

        self.posts_stats.record_hit();
        Some(record)
    }

    /// Removes the posts slot.
    pub async fn clear_posts(&self) -> Result<()> {
        self.backend.remove(POSTS_CACHE_KEY).await?;
        Ok(())
    }

    // == Social Namespace ==
    /// Upserts one entry in the social namespace, replacing any existing
    /// entry and its timestamp. Sibling keys are untouched.
    pub async fn save_social<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let data = serde_json::to_value(value).map_err(|source| StoreError::Serialize {
            key: SOCIAL_CACHE_KEY,
            source,
        })?;

        let _guard = self.locks.lock(SOCIAL_CACHE_KEY).await;
        let mut namespace: SocialCacheMap =
            read_record(self.backend.as_ref(), SOCIAL_CACHE_KEY)
                .await
                .unwrap_or_default();
        namespace.insert(
            key.to_string(),
            SocialCacheEntry {
                data,
                timestamp: self.clock.now_ms(),
            },
        );
        write_record(self.backend.as_ref(), SOCIAL_CACHE_KEY, &namespace).await
    }

    /// Reads, transforms, and writes back one entry under a single lock
    /// acquisition, so the whole cycle is one atomic update.
    ///
    /// `update` receives the current fresh value (stale or unreadable
    /// entries come through as None) and returns the value to store. The
    /// entry's timestamp is reset to now.
    pub async fn update_social<T, F>(&self, key: &str, update: F) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(Option<T>) -> T,
    {
        let _guard = self.locks.lock(SOCIAL_CACHE_KEY).await;
        let mut namespace: SocialCacheMap =
            read_record(self.backend.as_ref(), SOCIAL_CACHE_KEY)
                .await
                .unwrap_or_default();

        let now = self.clock.now_ms();
        let existing = namespace
            .get(key)
            .filter(|entry| is_fresh(now, entry.timestamp, self.config.social_ttl_ms()))
            .and_then(|entry| decode_entry(key, entry));

        let next = update(existing);
        let data = serde_json::to_value(&next).map_err(|source| StoreError::Serialize {
            key: SOCIAL_CACHE_KEY,
            source,
        })?;
        namespace.insert(key.to_string(), SocialCacheEntry { data, timestamp: now });
        write_record(self.backend.as_ref(), SOCIAL_CACHE_KEY, &namespace).await
    }

    /// Returns the entry under `key` while it is within the social TTL.
    ///
    /// Staleness is evaluated per entry, not per namespace: one expired key
    /// says nothing about its siblings.
    pub async fn social<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let namespace: SocialCacheMap =
            match read_record(self.backend.as_ref(), SOCIAL_CACHE_KEY).await {
                Some(namespace) => namespace,
                None => {
                    self.social_stats.record_miss();
                    return None;
                }
            };

        let entry = match namespace.get(key) {
            Some(entry) => entry,
            None => {
                self.social_stats.record_miss();
                return None;
            }
        };

        if !is_fresh(self.clock.now_ms(), entry.timestamp, self.config.social_ttl_ms()) {
            self.social_stats.record_stale_miss();
            self.purge_stale_social(key, entry.timestamp).await;
            return None;
        }

        match decode_entry(key, entry) {
            Some(value) => {
                self.social_stats.record_hit();
                Some(value)
            }
            None => {
                self.social_stats.record_miss();
                None
            }
        }
    }

    /// Returns the whole raw namespace without staleness filtering.
    ///
    /// Diagnostics affordance: callers must not rely on the freshness of
    /// this view.
    pub async fn social_all(&self) -> SocialCacheMap {
        read_record(self.backend.as_ref(), SOCIAL_CACHE_KEY)
            .await
            .unwrap_or_default()
    }

    /// Removes one entry from the social namespace, leaving siblings alone.
    pub async fn clear_social(&self, key: &str) -> Result<()> {
        let _guard = self.locks.lock(SOCIAL_CACHE_KEY).await;
        let mut namespace: SocialCacheMap =
            match read_record(self.backend.as_ref(), SOCIAL_CACHE_KEY).await {
                Some(namespace) => namespace,
                None => return Ok(()),
            };

        if namespace.remove(key).is_some() {
            write_record(self.backend.as_ref(), SOCIAL_CACHE_KEY, &namespace).await?;
        }
        Ok(())
    }

    /// Removes the entire social namespace in one operation.
    pub async fn clear_social_all(&self) -> Result<()> {
        let _guard = self.locks.lock(SOCIAL_CACHE_KEY).await;
        self.backend.remove(SOCIAL_CACHE_KEY).await?;
        Ok(())
    }

    // == Stats ==
    /// Snapshot of the posts-slot counters.
    pub fn posts_stats(&self) -> CacheStatsSnapshot {
        self.posts_stats.snapshot()
    }

    /// Snapshot of the social-namespace counters.
    pub fn social_stats(&self) -> CacheStatsSnapshot {
        self.social_stats.snapshot()
    }

    // == Stale Purge ==
    /// Best-effort removal of a stale posts record. Re-checks the timestamp
    /// under the lock so a concurrent fresh write is never deleted.
    async fn purge_stale_posts(&self, seen_timestamp: u64) {
        let _guard = self.locks.lock(POSTS_CACHE_KEY).await;
        let current: Option<PostsCacheRecord> =
            read_record(self.backend.as_ref(), POSTS_CACHE_KEY).await;
        let Some(record) = current else { return };
        if record.timestamp != seen_timestamp {
            return;
        }
        if let Err(err) = self.backend.remove(POSTS_CACHE_KEY).await {
            debug!(error = %err, "stale posts purge failed");
        } else {
            debug!("purged stale posts record");
        }
    }

    /// Best-effort removal of one stale social entry, with the same
    /// timestamp re-check.
    async fn purge_stale_social(&self, key: &str, seen_timestamp: u64) {
        let _guard = self.locks.lock(SOCIAL_CACHE_KEY).await;
        let mut namespace: SocialCacheMap =
            match read_record(self.backend.as_ref(), SOCIAL_CACHE_KEY).await {
                Some(namespace) => namespace,
                None => return,
            };
        match namespace.get(key) {
            Some(entry) if entry.timestamp == seen_timestamp => {
                namespace.remove(key);
                if let Err(err) =
                    write_record(self.backend.as_ref(), SOCIAL_CACHE_KEY, &namespace).await
                {
                    debug!(key, error = %err, "stale social purge failed");
                } else {
                    debug!(key, "purged stale social entry");
                }
            }
            _ => {}
        }
    }
}

/// Decodes an entry payload, logging and reporting absent on a shape the
/// caller's type cannot represent.
fn decode_entry<T: DeserializeOwned>(key: &str, entry: &SocialCacheEntry) -> Option<T> {
    match serde_json::from_value(entry.data.clone()) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, error = %err, "undecodable social entry, treating as absent");
            None
        }
    }
}
