//! Cache statistics
//!
//! Tracks hit/miss counters per cache namespace. Counters are atomics so the
//! stores can record through a shared reference.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Live counters for one cache namespace.
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Reads that returned a fresh value
    hits: AtomicU64,
    /// Reads that found nothing (or unreadable data)
    misses: AtomicU64,
    /// Reads that found a value past its TTL
    stale_misses: AtomicU64,
}

impl CacheStats {
    /// Creates stats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a fresh read.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an absent read.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a read that found only an expired value.
    pub fn record_stale_miss(&self) {
        self.stale_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Takes a point-in-time snapshot of the counters.
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let stale_misses = self.stale_misses.load(Ordering::Relaxed);
        CacheStatsSnapshot {
            hits,
            misses,
            stale_misses,
            hit_rate: hit_rate(hits, misses + stale_misses),
        }
    }
}

/// Serializable snapshot of one namespace's counters.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CacheStatsSnapshot {
    /// Number of fresh reads
    pub hits: u64,
    /// Number of absent reads
    pub misses: u64,
    /// Number of expired reads
    pub stale_misses: u64,
    /// hits / (hits + all misses), 0.0 before any read
    pub hit_rate: f64,
}

fn hit_rate(hits: u64, missed: u64) -> f64 {
    let total = hits + missed;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_start_at_zero() {
        let snapshot = CacheStats::new().snapshot();
        assert_eq!(snapshot.hits, 0);
        assert_eq!(snapshot.misses, 0);
        assert_eq!(snapshot.stale_misses, 0);
        assert_eq!(snapshot.hit_rate, 0.0);
    }

    #[test]
    fn test_stats_counts_each_kind() {
        let stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        stats.record_stale_miss();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.hits, 2);
        assert_eq!(snapshot.misses, 1);
        assert_eq!(snapshot.stale_misses, 1);
        assert!((snapshot.hit_rate - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_snapshot_serializes() {
        let stats = CacheStats::new();
        stats.record_hit();
        let json = serde_json::to_string(&stats.snapshot()).unwrap();
        assert!(json.contains("\"hits\":1"));
    }
}
