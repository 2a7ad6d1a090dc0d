//! Store Module
//!
//! The three storage layers exposed to the API access layer:
//! session (token + user record), TTL cache (posts slot + social namespace),
//! and the interaction overlay naming layer on top of the social namespace.

mod cache;
mod clock;
mod local;
mod locks;
mod overlay;
mod session;
mod stats;


// Re-export public types
pub use cache::CacheStore;
pub use clock::{Clock, ManualClock, SystemClock};
pub use local::LocalStore;
pub use locks::LockMap;
pub use overlay::OverlayStore;
pub use session::SessionStore;
pub use stats::{CacheStats, CacheStatsSnapshot};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::{Result, StoreError};
use crate::persist::KeyValueBackend;

// == Persisted Keys ==
/// Key holding the opaque auth token (raw string, no TTL)
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Key holding the user record (JSON, no TTL)
pub const USER_DATA_KEY: &str = "user_data";

/// Key holding the single-slot posts cache record (JSON)
pub const POSTS_CACHE_KEY: &str = "posts_cache";

/// Key holding the social cache namespace mapping (JSON)
pub const SOCIAL_CACHE_KEY: &str = "social_cache";

// == Freshness Rule ==
/// True while an entry written at `written_ms` is within `ttl_ms` of `now_ms`.
///
/// An entry is stale only once its age strictly exceeds the TTL, so a read
/// at exactly `written + ttl` still hits. Clocks that move backwards yield
/// age zero rather than wrapping.
pub(crate) fn is_fresh(now_ms: u64, written_ms: u64, ttl_ms: u64) -> bool {
    now_ms.saturating_sub(written_ms) <= ttl_ms
}

// == Shared Record I/O ==
/// Reads and deserializes the record under `key`.
///
/// Backend read failures and corrupt JSON are logged and reported as absent:
/// everything persisted here can be re-derived from the network, so a read
/// path must never fail hard.
pub(crate) async fn read_record<T, B>(backend: &B, key: &'static str) -> Option<T>
where
    T: DeserializeOwned,
    B: KeyValueBackend,
{
    let raw = match backend.get(key).await {
        Ok(raw) => raw?,
        Err(err) => {
            warn!(key, error = %err, "storage read failed, treating as absent");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, error = %err, "corrupt stored record, treating as absent");
            None
        }
    }
}

/// Serializes `value` and writes it under `key`.
///
/// Unlike reads, write failures are surfaced to the caller.
pub(crate) async fn write_record<T, B>(backend: &B, key: &'static str, value: &T) -> Result<()>
where
    T: Serialize,
    B: KeyValueBackend,
{
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialize { key, source })?;
    backend.set(key, &raw).await?;
    Ok(())
}
