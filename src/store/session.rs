//! Session Store
//!
//! Durable single-slot storage of the auth token and user record. The token
//! has no TTL; its lifetime ends only at logout or explicit clear. Write
//! failures here are surfaced because silently dropping a session write
//! would strand the user in a half-authenticated state.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::models::{merge_user, UserRecord};
use crate::persist::KeyValueBackend;
use crate::store::{
    read_record, write_record, LockMap, AUTH_TOKEN_KEY, POSTS_CACHE_KEY, SOCIAL_CACHE_KEY,
    USER_DATA_KEY,
};

// == Session Store ==
/// Token and user-record persistence across process restarts.
#[derive(Debug)]
pub struct SessionStore<B: KeyValueBackend> {
    backend: Arc<B>,
    locks: Arc<LockMap>,
}

impl<B: KeyValueBackend> SessionStore<B> {
    // == Constructor ==
    /// Creates a session store over a shared backend and lock map.
    ///
    /// The lock map must be the same instance the cache store uses, so that
    /// [`clear_session`](Self::clear_session) cannot interleave with an
    /// in-flight cache read-modify-write cycle.
    pub(crate) fn new(backend: Arc<B>, locks: Arc<LockMap>) -> Self {
        Self { backend, locks }
    }

    // == Token ==
    /// Stores the auth token, overwriting any previous one.
    ///
    /// Rejects empty tokens; propagates backend write failures.
    pub async fn save_token(&self, token: &str) -> Result<()> {
        if token.is_empty() {
            return Err(StoreError::InvalidInput("token must be non-empty".into()));
        }
        self.backend.set(AUTH_TOKEN_KEY, token).await?;
        Ok(())
    }

    /// Returns the stored token, or None if never set or cleared.
    pub async fn token(&self) -> Option<String> {
        match self.backend.get(AUTH_TOKEN_KEY).await {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "token read failed, treating as absent");
                None
            }
        }
    }

    // == User Record ==
    /// Applies a profile patch over the stored record (merge-on-write).
    ///
    /// Admin flags the patch omits are carried over from the stored record
    /// instead of resetting to false; every other field is taken from the
    /// patch as-is. The read+write cycle holds the `user_data` lock so
    /// concurrent patches cannot lose each other's writes.
    pub async fn save_user(&self, patch: UserRecord) -> Result<()> {
        let _guard = self.locks.lock(USER_DATA_KEY).await;

        let stored: Option<UserRecord> = read_record(self.backend.as_ref(), USER_DATA_KEY).await;
        let merged = merge_user(stored.as_ref(), patch);
        write_record(self.backend.as_ref(), USER_DATA_KEY, &merged).await
    }

    /// Returns the stored user record, or None if absent or unreadable.
    pub async fn user(&self) -> Option<UserRecord> {
        read_record(self.backend.as_ref(), USER_DATA_KEY).await
    }

    /// True iff the stored record carries both admin flags as true.
    ///
    /// A record with only one flag set (for example an unconfirmed admin
    /// grant from a stale response) is not an admin.
    pub async fn is_admin(&self) -> bool {
        self.user()
            .await
            .map(|record| record.has_confirmed_admin())
            .unwrap_or(false)
    }

    // == Clear ==
    /// Removes the token, user record, and both cache namespaces in one
    /// logical operation.
    ///
    /// Logout must not leave cached content attributable to the previous
    /// identity. Idempotent: clearing an already-empty session succeeds.
    pub async fn clear_session(&self) -> Result<()> {
        // Hold both read-modify-write locks so an in-flight user or social
        // update cannot resurrect data after the removal.
        let _user_guard = self.locks.lock(USER_DATA_KEY).await;
        let _social_guard = self.locks.lock(SOCIAL_CACHE_KEY).await;

        self.backend
            .remove_many(&[
                AUTH_TOKEN_KEY,
                USER_DATA_KEY,
                POSTS_CACHE_KEY,
                SOCIAL_CACHE_KEY,
            ])
            .await?;
        debug!("session cleared");
        Ok(())
    }
}
