//! Report models for hosts of the cache engine
//!
//! Serializable snapshots a host program can log or print as JSON.

pub mod report;

// Re-export commonly used types
pub use report::{LookupReport, StatsReport};
