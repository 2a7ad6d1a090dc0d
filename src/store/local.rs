//! Local Store Facade
//!
//! Wires one backend, clock, config, and lock map into the three store
//! layers. The API access layer holds a single `LocalStore` and reaches the
//! layers through it, which also guarantees they share the lock map that
//! keeps cross-layer operations (logout vs. in-flight cache writes) ordered.

use std::sync::Arc;

use crate::config::StoreConfig;
use crate::persist::KeyValueBackend;
use crate::store::{CacheStore, Clock, LockMap, OverlayStore, SessionStore, SystemClock};

// == Local Store ==
/// The complete session + cache store over one persistence backend.
pub struct LocalStore<B: KeyValueBackend> {
    session: SessionStore<B>,
    cache: Arc<CacheStore<B>>,
    overlay: OverlayStore<B>,
}

impl<B: KeyValueBackend> LocalStore<B> {
    // == Constructors ==
    /// Creates a store over `backend` using the system wall clock.
    pub fn new(backend: B, config: StoreConfig) -> Self {
        Self::with_clock(backend, config, Arc::new(SystemClock))
    }

    /// Creates a store with an injected clock (tests use a manual clock to
    /// drive TTL expiry without sleeping).
    pub fn with_clock(backend: B, config: StoreConfig, clock: Arc<dyn Clock>) -> Self {
        let backend = Arc::new(backend);
        let locks = Arc::new(LockMap::new());

        let session = SessionStore::new(backend.clone(), locks.clone());
        let cache = Arc::new(CacheStore::new(backend, clock.clone(), config, locks));
        let overlay = OverlayStore::new(cache.clone(), clock);

        Self {
            session,
            cache,
            overlay,
        }
    }

    // == Layer Access ==
    /// Session layer: token and user record.
    pub fn session(&self) -> &SessionStore<B> {
        &self.session
    }

    /// TTL cache layer: posts slot and social namespace.
    pub fn cache(&self) -> &CacheStore<B> {
        &self.cache
    }

    /// Interaction overlay layer: per-post and per-follow patches.
    pub fn overlay(&self) -> &OverlayStore<B> {
        &self.overlay
    }
}
