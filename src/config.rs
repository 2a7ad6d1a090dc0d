//! Configuration Module
//!
//! Handles loading and managing store configuration from environment variables.

use std::env;
use std::time::Duration;

/// Store configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// TTL for the single-slot posts cache
    pub posts_ttl: Duration,
    /// TTL applied per entry inside the social cache namespace
    pub social_ttl: Duration,
}

impl StoreConfig {
    /// Creates a new StoreConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `POSTS_TTL_SECS` - Posts cache TTL in seconds (default: 300)
    /// - `SOCIAL_TTL_SECS` - Social cache per-entry TTL in seconds (default: 600)
    pub fn from_env() -> Self {
        Self {
            posts_ttl: Duration::from_secs(
                env::var("POSTS_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(300),
            ),
            social_ttl: Duration::from_secs(
                env::var("SOCIAL_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(600),
            ),
        }
    }

    /// Posts TTL in milliseconds, for comparison against entry timestamps.
    pub fn posts_ttl_ms(&self) -> u64 {
        self.posts_ttl.as_millis() as u64
    }

    /// Social per-entry TTL in milliseconds.
    pub fn social_ttl_ms(&self) -> u64 {
        self.social_ttl.as_millis() as u64
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            posts_ttl: Duration::from_secs(300),
            social_ttl: Duration::from_secs(600),
        }
    }
}
