//! Lock-striped accumulator map used by parallel scoring.
//!
//! Keys are spread over a fixed number of shards by `key mod shard_count`; each
//! shard is an ordered map behind its own mutex. Callers never see a lock guard:
//! every operation takes and releases its locks internally, and [`ConcurrentMap::drain`]
//! takes all of them in ascending shard order.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::ops::AddAssign;

/// Integer keys that can pick a shard.
pub trait ShardKey: Copy + Ord {
    fn shard_hash(self) -> u64;
}

macro_rules! impl_shard_key {
    ($($t:ty),*) => {
        $(impl ShardKey for $t {
            #[inline]
            fn shard_hash(self) -> u64 { self as u64 }
        })*
    };
}

impl_shard_key!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

pub struct ConcurrentMap<K, V> {
    shards: Vec<Mutex<BTreeMap<K, V>>>,
}

impl<K, V> ConcurrentMap<K, V>
where
    K: ShardKey,
    V: Default + AddAssign,
{
    /// `shard_count` is clamped to at least one shard.
    pub fn new(shard_count: usize) -> Self {
        let shards = (0..shard_count.max(1)).map(|_| Mutex::new(BTreeMap::new())).collect();
        Self { shards }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    #[inline]
    fn shard(&self, key: K) -> &Mutex<BTreeMap<K, V>> {
        let idx = key.shard_hash() % self.shards.len() as u64;
        &self.shards[idx as usize]
    }

    /// Add `delta` to the value under `key`, inserting the default first.
    pub fn accumulate_add(&self, key: K, delta: V) {
        let mut shard = self.shard(key).lock();
        *shard.entry(key).or_default() += delta;
    }

    pub fn erase(&self, key: K) {
        self.shard(key).lock().remove(&key);
    }

    /// Move every entry out into one ordered map.
    ///
    /// Locks are taken in ascending shard order and all held until the merge
    /// finishes. The map is left empty.
    pub fn drain(&self) -> BTreeMap<K, V> {
        let mut guards: Vec<_> = self.shards.iter().map(|s| s.lock()).collect();
        let mut result = BTreeMap::new();
        for guard in guards.iter_mut() {
            result.append(&mut **guard);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn accumulates_and_erases() {
        let map: ConcurrentMap<i32, f64> = ConcurrentMap::new(4);
        map.accumulate_add(1, 0.5);
        map.accumulate_add(1, 0.25);
        map.accumulate_add(5, 1.0);
        map.accumulate_add(2, 2.0);
        map.erase(5);
        map.erase(42);
        let merged = map.drain();
        assert_eq!(merged.into_iter().collect::<Vec<_>>(), vec![(1, 0.75), (2, 2.0)]);
    }

    #[test]
    fn drain_leaves_map_empty() {
        let map: ConcurrentMap<u32, u64> = ConcurrentMap::new(3);
        map.accumulate_add(7, 1);
        assert_eq!(map.drain().len(), 1);
        assert!(map.drain().is_empty());
    }

    #[test]
    fn zero_shards_is_clamped() {
        let map: ConcurrentMap<u32, u64> = ConcurrentMap::new(0);
        assert_eq!(map.shard_count(), 1);
        map.accumulate_add(9, 3);
        assert_eq!(map.drain().get(&9), Some(&3));
    }

    #[test]
    fn concurrent_adds_to_shared_keys() {
        let map: ConcurrentMap<u32, u64> = ConcurrentMap::new(16);
        (0..10_000u32).into_par_iter().for_each(|i| {
            map.accumulate_add(i % 100, 1);
        });
        let merged = map.drain();
        assert_eq!(merged.len(), 100);
        assert!(merged.values().all(|&v| v == 100));
    }
}
