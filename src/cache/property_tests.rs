//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the engine against a plain `Vec` model and to verify
//! the capacity, recency and TTL properties under arbitrary operation sequences.

use proptest::prelude::*;
use std::time::Duration;

use crate::cache::{CacheEngine, ManualClock};

// == Test Configuration ==
const KEY_SPACE: u8 = 8;
const MAX_TTL_SECS: u64 = 5;

type TestEngine = CacheEngine<u8, u32, ManualClock>;

fn engine(capacity: usize) -> (TestEngine, ManualClock) {
    let clock = ManualClock::new();
    let engine = CacheEngine::with_clock(capacity, clock.clone()).unwrap();
    (engine, clock)
}

// == Strategies ==
#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: u8, value: u32, ttl: u64 },
    Get { key: u8 },
    Remove { key: u8 },
    Advance { secs: u64 },
    Purge,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (0..KEY_SPACE, any::<u32>(), 0..=MAX_TTL_SECS)
            .prop_map(|(key, value, ttl)| CacheOp::Put { key, value, ttl }),
        3 => (0..KEY_SPACE).prop_map(|key| CacheOp::Get { key }),
        1 => (0..KEY_SPACE).prop_map(|key| CacheOp::Remove { key }),
        2 => (0..3u64).prop_map(|secs| CacheOp::Advance { secs }),
        1 => Just(CacheOp::Purge),
    ]
}

// == Reference Model ==
/// Straightforward O(n) rendition of the eviction rules.
/// Entries are `(key, value, expires_at_secs)`, front = most recently used.
struct Model {
    capacity: usize,
    now: u64,
    entries: Vec<(u8, u32, u64)>,
}

impl Model {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            now: 0,
            entries: Vec::new(),
        }
    }

    fn position(&self, key: u8) -> Option<usize> {
        self.entries.iter().position(|(k, _, _)| *k == key)
    }

    fn expired(&self, index: usize) -> bool {
        self.now >= self.entries[index].2
    }

    fn drop_if_expired(&mut self, key: u8) {
        if let Some(index) = self.position(key) {
            if self.expired(index) {
                self.entries.remove(index);
            }
        }
    }

    fn get(&mut self, key: u8) -> Option<u32> {
        self.drop_if_expired(key);
        let index = self.position(key)?;
        let entry = self.entries.remove(index);
        self.entries.insert(0, entry);
        Some(entry.1)
    }

    fn put(&mut self, key: u8, value: u32, ttl: u64) {
        self.drop_if_expired(key);
        let expires_at = self.now + ttl;
        if let Some(index) = self.position(key) {
            self.entries.remove(index);
        } else if self.entries.len() >= self.capacity {
            while !self.entries.is_empty() && self.expired(self.entries.len() - 1) {
                self.entries.pop();
            }
            if self.entries.len() >= self.capacity {
                self.entries.pop();
            }
        }
        self.entries.insert(0, (key, value, expires_at));
    }

    fn remove(&mut self, key: u8) -> Option<u32> {
        let index = self.position(key)?;
        let expired = self.expired(index);
        let entry = self.entries.remove(index);
        if expired {
            None
        } else {
            Some(entry.1)
        }
    }

    fn purge(&mut self) -> usize {
        let now = self.now;
        let before = self.entries.len();
        self.entries.retain(|(_, _, expires_at)| now < *expires_at);
        before - self.entries.len()
    }

    fn keys(&self) -> Vec<u8> {
        self.entries.iter().map(|(k, _, _)| *k).collect()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    // *For any* sequence of operations, the engine SHALL agree with the model on
    // every returned value and on the full recency order.
    #[test]
    fn prop_matches_reference_model(
        capacity in 1usize..6,
        ops in prop::collection::vec(cache_op_strategy(), 1..80)
    ) {
        let (mut engine, clock) = engine(capacity);
        let mut model = Model::new(capacity);

        for op in ops {
            match op {
                CacheOp::Put { key, value, ttl } => {
                    engine.put(key, value, Duration::from_secs(ttl));
                    model.put(key, value, ttl);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(engine.get(&key), model.get(key), "get({}) mismatch", key);
                }
                CacheOp::Remove { key } => {
                    prop_assert_eq!(engine.remove(&key), model.remove(key), "remove({}) mismatch", key);
                }
                CacheOp::Advance { secs } => {
                    clock.advance(Duration::from_secs(secs));
                    model.now += secs;
                }
                CacheOp::Purge => {
                    prop_assert_eq!(engine.purge_expired(), model.purge());
                }
            }

            prop_assert_eq!(engine.keys(), model.keys());
            prop_assert!(engine.check_invariants(), "index and list diverged");
        }
    }

    // *For any* sequence of puts, the number of entries SHALL never exceed capacity.
    #[test]
    fn prop_capacity_enforcement(
        capacity in 1usize..10,
        entries in prop::collection::vec((any::<u16>(), 0..=MAX_TTL_SECS), 1..200)
    ) {
        let (mut engine, clock) = engine(capacity);

        for (key, ttl) in entries {
            engine.put(key as u8, key as u32, Duration::from_secs(ttl));
            clock.advance(Duration::from_millis(250));
            prop_assert!(
                engine.len() <= capacity,
                "Cache size {} exceeds capacity {}",
                engine.len(),
                capacity
            );
        }
    }

    // *For any* full cache of live entries, a key read by `get` SHALL NOT be the
    // next eviction victim.
    #[test]
    fn prop_recency_touch(
        capacity in 2usize..KEY_SPACE as usize,
        touched in 0u8..KEY_SPACE
    ) {
        let (mut engine, _) = engine(capacity);
        for key in 0..capacity as u8 {
            engine.put(key, key as u32, Duration::from_secs(60));
        }
        let touched = touched % capacity as u8;

        prop_assert_eq!(engine.get(&touched), Some(touched as u32));
        engine.put(KEY_SPACE, 0, Duration::from_secs(60));

        prop_assert!(engine.contains(&touched), "touched key {} was evicted", touched);
        prop_assert_eq!(engine.len(), capacity);
    }

    // *For any* TTL, an entry SHALL be found strictly before expiry and not at or after it.
    #[test]
    fn prop_ttl_correctness(ttl_ms in 0u64..10_000, probe_ms in 0u64..20_000) {
        let (mut engine, clock) = engine(4);

        engine.put(1, 42, Duration::from_millis(ttl_ms));
        clock.advance(Duration::from_millis(probe_ms));

        let expected = if probe_ms < ttl_ms { Some(42) } else { None };
        prop_assert_eq!(engine.get(&1), expected);
    }

    // *For any* full cache whose tail has expired, a put SHALL NOT evict a live entry.
    #[test]
    fn prop_expired_entries_evicted_first(
        ttls in prop::collection::vec(1u64..=MAX_TTL_SECS, 2..8),
        elapsed in 0u64..=MAX_TTL_SECS
    ) {
        let capacity = ttls.len();
        let (mut engine, clock) = engine(capacity);
        for (key, ttl) in ttls.iter().enumerate() {
            engine.put(key as u8, 0, Duration::from_secs(*ttl));
        }
        clock.advance(Duration::from_secs(elapsed));

        let live_before: Vec<u8> = engine
            .keys()
            .into_iter()
            .filter(|key| engine.contains(key))
            .collect();
        // keys() is MRU first, key 0 is the tail
        let tail_expired = !engine.contains(&0);

        engine.put(KEY_SPACE, 0, Duration::from_secs(60));

        if tail_expired {
            prop_assert_eq!(engine.stats().evictions, 0);
            for key in &live_before {
                prop_assert!(engine.contains(key), "live key {} was evicted", key);
            }
        } else {
            prop_assert_eq!(engine.stats().evictions, 1);
        }
    }

    // *For any* existing live key, put SHALL keep the size and refresh value and TTL.
    #[test]
    fn prop_update_semantics(
        keys in prop::collection::vec(0u8..KEY_SPACE, 1..10),
        target in 0u8..KEY_SPACE,
        value in any::<u32>()
    ) {
        let (mut engine, clock) = engine(KEY_SPACE as usize);
        for key in &keys {
            engine.put(*key, 0, Duration::from_secs(2));
        }
        engine.put(target, 0, Duration::from_secs(2));
        let size = engine.len();

        clock.advance(Duration::from_secs(1));
        engine.put(target, value, Duration::from_secs(2));
        prop_assert_eq!(engine.len(), size);

        // Everyone else expires, the refreshed key does not
        clock.advance(Duration::from_secs(1));
        prop_assert_eq!(engine.get(&target), Some(value));
        prop_assert_eq!(engine.purge_expired(), size - 1);
    }
}

// == Additional Unit Tests for Edge Cases ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_matches_reference_scenario() {
        let mut model = Model::new(2);

        model.put(1, 10, 2);
        model.put(2, 20, 4);
        assert_eq!(model.get(1), Some(10));
        model.now += 3;
        assert_eq!(model.get(1), None);
        model.put(3, 30, 3);
        assert_eq!(model.keys(), vec![3, 2]);
    }
}
