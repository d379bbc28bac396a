//! LRU TTL - A fixed-capacity in-memory cache
//!
//! Combines least-recently-used ordering with per-entry time-to-live expiration.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use cache::{CacheEngine, CacheStats, Clock, ManualClock, MonotonicClock};
pub use config::Config;
pub use error::{CacheError, Result};
