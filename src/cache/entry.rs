//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cache entry: key, value and absolute expiry.
#[derive(Debug, Clone)]
pub struct Entry<K, V> {
    /// Owning key, kept so eviction from the list can clean the index
    pub key: K,
    /// The stored value
    pub value: V,
    /// Expiration instant, None = past the clock's range (never expires)
    pub expires_at: Option<Instant>,
}

impl<K, V> Entry<K, V> {
    // == Constructor ==
    /// Creates an entry expiring `ttl` after `now`.
    pub fn new(key: K, value: V, now: Instant, ttl: Duration) -> Self {
        Self {
            key,
            value,
            expires_at: expiry_after(now, ttl),
        }
    }

    // == Refresh ==
    /// Replaces the value and restarts the TTL from `now`.
    pub fn refresh(&mut self, value: V, now: Instant, ttl: Duration) {
        self.value = value;
        self.expires_at = expiry_after(now, ttl);
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// Boundary condition: an entry is expired once `now >= expires_at`, so a
    /// zero TTL expires immediately.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining lifetime at `now`.
    ///
    /// # Returns
    /// - `Duration::ZERO` if the entry has expired
    /// - `Duration::MAX` if the entry never expires
    pub fn ttl_remaining_at(&self, now: Instant) -> Duration {
        match self.expires_at {
            Some(expires) => expires.saturating_duration_since(now),
            None => Duration::MAX,
        }
    }
}

/// `now + ttl`, or None when that overflows `Instant`.
fn expiry_after(now: Instant, ttl: Duration) -> Option<Instant> {
    now.checked_add(ttl)
}
