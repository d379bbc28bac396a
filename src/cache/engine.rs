//! Cache Engine Module
//!
//! Main cache engine combining a key index with an arena-backed recency list
//! and per-entry TTL expiration.
//!
//! Expired entries are never swept in the background. They are removed when
//! an operation touches them, when a full cache needs a slot, or when the
//! caller asks for [`CacheEngine::purge_expired`].

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::cache::lru::{RecencyList, SlotId};
use crate::cache::{CacheStats, Clock, Entry, MonotonicClock};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Cache Engine ==
/// Fixed-capacity cache with LRU eviction and per-entry TTL.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use lru_ttl::cache::CacheEngine;
///
/// let mut cache = CacheEngine::new(2).unwrap();
/// cache.put("a", "apple", Duration::from_secs(2));
/// cache.put("b", "banana", Duration::from_secs(4));
/// assert_eq!(cache.get("a"), Some("apple"));
///
/// // "b" is now least recently used and makes room for "c"
/// cache.put("c", "cherry", Duration::from_secs(3));
/// assert_eq!(cache.get("b"), None);
/// ```
#[derive(Debug)]
pub struct CacheEngine<K, V, C = MonotonicClock> {
    /// Key to list handle
    index: HashMap<K, SlotId>,
    /// Entries ordered from most to least recently used
    list: RecencyList<Entry<K, V>>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    clock: C,
}

impl<K, V> CacheEngine<K, V, MonotonicClock>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates an engine holding at most `capacity` entries.
    ///
    /// # Errors
    /// `CacheError::Configuration` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_clock(capacity, MonotonicClock)
    }

    /// Creates an engine from a validated [`Config`].
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Self::new(config.capacity)
    }
}

impl<K, V, C> CacheEngine<K, V, C>
where
    K: Hash + Eq + Clone,
    V: Clone,
    C: Clock,
{
    /// Creates an engine reading time from `clock`.
    pub fn with_clock(capacity: usize, clock: C) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::Configuration(
                "capacity must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            index: HashMap::new(),
            list: RecencyList::new(),
            stats: CacheStats::new(),
            capacity,
            clock,
        })
    }

    // == Get ==
    /// Retrieves a copy of the value stored under `key`.
    ///
    /// A hit moves the entry to the most recently used position. An expired
    /// entry is removed and reported as a miss.
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        self.expire_if_stale(key, now);

        let Some(&id) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        self.list.move_to_front(id);
        match self.list.get(id) {
            Some(entry) => {
                self.stats.record_hit();
                Some(entry.value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Put ==
    /// Stores `value` under `key`, expiring `ttl` from now.
    ///
    /// An existing live key is updated in place: value and expiry refresh and
    /// the entry becomes most recently used. A new key on a full cache first
    /// reclaims expired entries from the tail; only if none were found is the
    /// least recently used entry evicted. A zero `ttl` is accepted and expires
    /// on the next access.
    pub fn put(&mut self, key: K, value: V, ttl: Duration) {
        let now = self.clock.now();
        self.expire_if_stale(&key, now);

        if let Some(&id) = self.index.get(&key) {
            if let Some(entry) = self.list.get_mut(id) {
                entry.refresh(value, now, ttl);
            }
            self.list.move_to_front(id);
            return;
        }

        if self.list.len() >= self.capacity {
            self.make_room(now);
        }

        let id = self.list.push_front(Entry::new(key.clone(), value, now, ttl));
        self.index.insert(key, id);
    }

    // == Remove ==
    /// Removes `key`, returning its value if the entry was still live.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        let id = *self.index.get(key)?;
        let entry = self.unlink(id)?;

        if entry.is_expired_at(now) {
            self.stats.record_expirations(1);
            None
        } else {
            Some(entry.value)
        }
    }

    // == Peek ==
    /// Reads a live value without touching recency or removing anything.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.live_entry(key).map(|entry| entry.value.clone())
    }

    /// Returns true if `key` maps to a live entry. Does not touch recency.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.live_entry(key).is_some()
    }

    // == Time To Live ==
    /// Remaining lifetime of a live entry, `Duration::MAX` if it never expires.
    pub fn ttl_remaining<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        self.live_entry(key)
            .map(|entry| entry.ttl_remaining_at(now))
    }

    // == Purge Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        let mut expired = Vec::new();
        let mut current = self.list.back_id();
        while let Some(id) = current {
            if self.is_expired(id, now) {
                expired.push(id);
            }
            current = self.list.prev_id(id);
        }

        for &id in &expired {
            self.unlink(id);
        }

        let count = expired.len();
        if count > 0 {
            self.stats.record_expirations(count);
            debug!(removed = count, "purged expired entries");
        }
        count
    }

    // == Clear ==
    /// Drops every entry. Capacity and statistics are kept.
    pub fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }

    /// Keys from most to least recently used, including expired entries not
    /// yet discovered.
    pub fn keys(&self) -> Vec<K> {
        self.list.iter().map(|entry| entry.key.clone()).collect()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.list.len());
        stats
    }

    // == Length ==
    /// Returns the number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Frees exactly one slot on a full cache.
    fn make_room(&mut self, now: Instant) {
        let mut reclaimed = 0;
        while let Some(id) = self.list.back_id() {
            if !self.is_expired(id, now) {
                break;
            }
            self.unlink(id);
            reclaimed += 1;
        }

        if reclaimed > 0 {
            self.stats.record_expirations(reclaimed);
            debug!(reclaimed, "reclaimed expired entries from the tail");
        }

        if self.list.len() >= self.capacity {
            if let Some(id) = self.list.back_id() {
                if self.unlink(id).is_some() {
                    self.stats.record_eviction();
                    debug!("evicted least recently used entry");
                }
            }
        }
    }

    /// Drops the entry for `key` if it exists and has expired.
    fn expire_if_stale<Q>(&mut self, key: &Q, now: Instant)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(&id) = self.index.get(key) else {
            return;
        };
        if self.is_expired(id, now) {
            self.unlink(id);
            self.stats.record_expirations(1);
            trace!("lazily expired entry");
        }
    }

    fn live_entry<Q>(&self, key: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        let id = *self.index.get(key)?;
        self.list
            .get(id)
            .filter(|entry| !entry.is_expired_at(now))
    }

    fn is_expired(&self, id: SlotId, now: Instant) -> bool {
        self.list
            .get(id)
            .map_or(false, |entry| entry.is_expired_at(now))
    }

    /// Removes a node from both the list and the index.
    fn unlink(&mut self, id: SlotId) -> Option<Entry<K, V>> {
        let entry = self.list.remove(id)?;
        self.index.remove(&entry.key);
        Some(entry)
    }

    /// Index and list describe the same set of entries.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> bool {
        self.index.len() == self.list.len()
            && self.list.len() <= self.capacity
            && self.index.iter().all(|(key, &id)| {
                self.list
                    .get(id)
                    .map_or(false, |entry| entry.key == *key)
            })
    }
}
