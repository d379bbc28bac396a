//! Configuration Module
//!
//! Handles loading and validating cache configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Pause in seconds between the demo driver's phases
    pub pause_secs: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 2)
    /// - `DEMO_PAUSE_SECS` - Demo pause in seconds (default: 3)
    pub fn from_env() -> Self {
        Self {
            capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            pause_secs: env::var("DEMO_PAUSE_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
        }
    }

    /// Checks that the configuration can build a cache.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::Configuration(
                "capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Demo pause as a `Duration`.
    pub fn pause(&self) -> Duration {
        Duration::from_secs(self.pause_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 2,
            pause_secs: 3,
        }
    }
}
