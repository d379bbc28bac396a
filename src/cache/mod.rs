//! Cache Module
//!
//! Provides a fixed-capacity in-memory cache with TTL expiration and LRU eviction.

mod clock;
mod engine;
mod entry;
mod lru;
mod stats;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use engine::CacheEngine;
pub use entry::Entry;
pub use lru::{RecencyList, SlotId};
pub use stats::CacheStats;
