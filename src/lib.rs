//! Session Cache - client-side session and TTL cache store
//!
//! Persists an auth token and user record across process restarts, and
//! layers an expiring cache (posts slot + social namespace) with an
//! interaction overlay on top of an injected key-value backend.

pub mod config;
pub mod error;
pub mod models;
pub mod persist;
pub mod store;

pub use config::StoreConfig;
pub use error::{BackendError, Result, StoreError};
pub use persist::{KeyValueBackend, MemoryBackend};
pub use store::{Clock, LocalStore, ManualClock, SystemClock};
