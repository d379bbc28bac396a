//! Report DTOs
//!
//! Defines the JSON shape of the snapshots printed by the demo driver.

use std::fmt::Display;

use serde::Serialize;

use crate::cache::CacheStats;

/// Outcome of a single lookup
#[derive(Debug, Clone, Serialize)]
pub struct LookupReport {
    /// The requested key
    pub key: String,
    /// The stored value, None on a miss
    pub value: Option<String>,
    /// Whether the lookup hit
    pub hit: bool,
}

impl LookupReport {
    /// Creates a LookupReport from a `get` result
    pub fn new<V: Display>(key: impl Into<String>, value: Option<V>) -> Self {
        Self {
            key: key.into(),
            hit: value.is_some(),
            value: value.map(|v| v.to_string()),
        }
    }
}

/// Point-in-time view of the cache counters
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of capacity-driven evictions
    pub evictions: u64,
    /// Number of expired entries removed
    pub expirations: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Configured capacity
    pub capacity: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Snapshot time in RFC 3339 format
    pub timestamp: String,
}

impl StatsReport {
    /// Creates a StatsReport from cache statistics
    pub fn new(stats: &CacheStats, capacity: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            capacity,
            hit_rate: stats.hit_rate(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
