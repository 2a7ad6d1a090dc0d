//! Persistence Module
//!
//! Defines the key-value port the stores are built on, plus the in-memory
//! implementation used in tests and on hosts without durable storage.
//!
//! Each port call is independently atomic, but the port gives no multi-key
//! or read-modify-write guarantee; serializing those cycles is the store's
//! responsibility (see [`crate::store::LockMap`]).

mod memory;

pub use memory::MemoryBackend;

use crate::error::BackendError;

// == Key-Value Port ==
/// Asynchronous key-value persistence primitive.
///
/// This is the only seam between the stores and the host platform's storage
/// (device key-value storage in production, [`MemoryBackend`] in tests).
/// External code must not write the store's keys through this port directly,
/// or the stores' merge invariants can be violated.
pub trait KeyValueBackend: Send + Sync {
    /// Reads the raw string stored under `key`, if any.
    fn get(&self, key: &str) -> impl std::future::Future<Output = Result<Option<String>, BackendError>> + Send;

    /// Writes `value` under `key`, replacing any existing value.
    fn set(&self, key: &str, value: &str) -> impl std::future::Future<Output = Result<(), BackendError>> + Send;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> impl std::future::Future<Output = Result<(), BackendError>> + Send;

    /// Removes every key in `keys`. Absent keys are skipped silently.
    fn remove_many(&self, keys: &[&str]) -> impl std::future::Future<Output = Result<(), BackendError>> + Send;
}
