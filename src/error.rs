//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.
//!
//! A lookup miss is not an error: `get` reports it as `None`. The only
//! failure surface is invalid configuration at construction time.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Invalid construction parameters (e.g. zero capacity)
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;
