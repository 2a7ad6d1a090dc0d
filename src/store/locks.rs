//! Per-key write locks
//!
//! The persistence port gives no read-modify-write guarantee, and the stores
//! suspend between their read and their write. Two interleaved cycles on the
//! same physical record would let the later write clobber the earlier one,
//! so every read-modify-write cycle holds the key's lock for its full
//! duration. The map is keyed by physical record key: all social entries
//! share the `social_cache` record, so they serialize on that one key.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

// == Lock Map ==
/// Lazily populated map of one async mutex per physical key.
#[derive(Debug, Default)]
pub struct LockMap {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl LockMap {
    /// Creates an empty lock map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for `key`, creating it on first use.
    ///
    /// The guard is owned, so it can be held across await points for the
    /// whole read+write cycle.
    pub async fn lock(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
