//! The [`TaggedMap`] Robin-Hood hash map.

use bytemuck::{Pod, Zeroable};
use sara_arena::Arena;
use sara_core::{ByteStore, PtrVec};
use sara_vec::RawVec;

use crate::error::MapError;
use crate::hash::{KeyHasher, Mix64Hasher, SAFE_HASH};

/// Smallest non-empty bucket count; requested sizes round up to it.
pub const MIN_BUCKET_SIZE: u32 = 64;

/// Largest supported bucket count.
pub const MAX_BUCKET_SIZE: u32 = 1 << 20;

/// Bucket occupancy fraction that triggers automatic growth.
const LOAD_FACTOR: f64 = 0.8;

/// Below this bucket count the growth schedule squares the table size.
const SQUARE_GROWTH_LIMIT: u32 = 8192;

/// One bucket slot: hash, key, and value.
///
/// `hash == 0` marks an empty slot, which is why the hashing layer never
/// produces 0. Packed to 20 bytes so the record derives `Pod` with no
/// padding; fields must be read by value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C, packed)]
pub struct Entry {
    /// Cached hash of `key`; 0 means the slot is empty.
    pub hash: u32,
    /// The 64-bit key.
    pub key: u64,
    /// The 64-bit value.
    pub value: u64,
}

/// A key/value pair as materialised by [`TaggedMap::all_entries`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct KeyValue {
    /// The 64-bit key.
    pub key: u64,
    /// The 64-bit value.
    pub value: u64,
}

/// A Robin-Hood open-addressing hash map over a [`RawVec`] of entries.
///
/// The bucket array lives in arena memory; the map itself holds only
/// scalar bookkeeping and the hashing strategy. Bucket counts are powers
/// of two (or exactly 0 after [`TaggedMap::clear`]), so hashes mask into
/// indices with `count_mod`.
///
/// Entries further from their ideal slot displace entries closer to
/// theirs on insert, which bounds the variance of probe lengths and lets
/// lookups stop as soon as the probe distance of the slot under the
/// cursor falls below the distance walked.
pub struct TaggedMap<H> {
    entries: RawVec<Entry>,
    /// Bucket count; a power of two, or 0 for a cleared map.
    count: u32,
    /// `count - 1`, the index mask.
    count_mod: u32,
    /// Number of occupied buckets.
    count_used: u32,
    /// Occupancy that triggers automatic growth (`count` in manual mode).
    grow_at: u32,
    /// Occupancy that triggers automatic shrink (0 in manual mode).
    shrink_at: u32,
    hasher: H,
    valid: bool,
}

impl TaggedMap<Mix64Hasher> {
    /// Create a map with the default hashing strategy.
    ///
    /// `initial_size` rounds up to a supported bucket count; automatic
    /// resizing is enabled.
    pub fn new<S: ByteStore>(
        arena: &mut Arena<S>,
        initial_size: u32,
    ) -> Result<Self, MapError> {
        Self::with_hasher(arena, initial_size, Mix64Hasher)
    }
}

impl<H: KeyHasher> TaggedMap<H> {
    /// Create a map with a caller-supplied hashing strategy.
    pub fn with_hasher<S: ByteStore>(
        arena: &mut Arena<S>,
        initial_size: u32,
        hasher: H,
    ) -> Result<Self, MapError> {
        let entries = RawVec::new(arena)?;
        let mut map = Self {
            entries,
            count: 0,
            count_mod: 0,
            count_used: 0,
            grow_at: 0,
            shrink_at: 0,
            hasher,
            valid: true,
        };
        map.resize(arena, initial_size, true)?;
        Ok(map)
    }

    /// Insert or update `key`.
    ///
    /// With `can_replace`, an existing key's value is overwritten.
    /// Without it, inserting an existing key fails with
    /// [`MapError::KeyExists`] and the map is unchanged. The map grows
    /// beforehand when occupancy has reached the growth threshold.
    pub fn put<S: ByteStore>(
        &mut self,
        arena: &mut Arena<S>,
        key: u64,
        value: u64,
        can_replace: bool,
    ) -> Result<(), MapError> {
        self.ensure_valid()?;
        if self.count_used >= self.grow_at {
            self.resize_next(arena)?;
        }
        let hash = self.hash_of(key);
        self.insert_entry(arena, Entry { hash, key, value }, can_replace, true)
    }

    /// Look up the value stored under `key`.
    pub fn get<S: ByteStore>(&mut self, arena: &mut Arena<S>, key: u64) -> Result<u64, MapError> {
        self.ensure_valid()?;
        let hash = self.hash_of(key);
        match self.find_index(arena, hash, key)? {
            Some(index) => Ok(self.entries.get(arena, index)?.value),
            None => Err(MapError::KeyNotFound { key }),
        }
    }

    /// Whether `key` is present.
    pub fn contains_key<S: ByteStore>(
        &mut self,
        arena: &mut Arena<S>,
        key: u64,
    ) -> Result<bool, MapError> {
        self.ensure_valid()?;
        let hash = self.hash_of(key);
        Ok(self.find_index(arena, hash, key)?.is_some())
    }

    /// Remove `key`, returning its value.
    ///
    /// Subsequent entries shift back over the vacated slot until an
    /// empty slot or an entry already at its ideal position is reached.
    /// The map shrinks automatically when occupancy falls to a quarter
    /// of the bucket count.
    pub fn remove<S: ByteStore>(
        &mut self,
        arena: &mut Arena<S>,
        key: u64,
    ) -> Result<u64, MapError> {
        self.ensure_valid()?;
        let hash = self.hash_of(key);
        let Some(mut index) = self.find_index(arena, hash, key)? else {
            return Err(MapError::KeyNotFound { key });
        };
        let removed = self.entries.get(arena, index)?.value;

        for _ in 0..self.count {
            let next = (index + 1) & self.count_mod;
            let entry = self.entries.get(arena, next)?;
            if entry.hash == 0 || self.probe_distance(next, entry.hash) == 0 {
                break;
            }
            self.entries.set(arena, index, entry)?;
            index = next;
        }
        self.entries.set(arena, index, Entry::zeroed())?;
        self.count_used -= 1;

        if self.shrink_at > 0
            && self.count_used <= self.shrink_at
            && self.count > MIN_BUCKET_SIZE
        {
            let target = self.shrink_at;
            self.resize(arena, target, true)?;
        }
        Ok(removed)
    }

    /// Rebuild the bucket array at `new_size` (rounded to a supported
    /// size), re-inserting every occupied entry.
    ///
    /// In `auto` mode the growth and shrink thresholds track the new
    /// count; in manual mode growth triggers only at full occupancy and
    /// shrink never does. A `new_size` of 0 empties the map without
    /// re-inserting anything — the next insert grows it again.
    pub fn resize<S: ByteStore>(
        &mut self,
        arena: &mut Arena<S>,
        new_size: u32,
        auto: bool,
    ) -> Result<(), MapError> {
        self.ensure_valid()?;
        let new_size = Self::supported_size(new_size);

        let mut fresh = RawVec::new(arena)?;
        fresh.prealloc(arena, new_size)?;
        for index in 0..new_size {
            fresh.set(arena, index, Entry::zeroed())?;
        }

        let mut old = std::mem::replace(&mut self.entries, fresh);
        let old_count = self.count;
        self.count = new_size;
        self.count_mod = new_size.wrapping_sub(1);
        self.count_used = 0;
        if auto {
            self.grow_at = (f64::from(new_size) * LOAD_FACTOR) as u32;
            self.shrink_at = new_size >> 2;
        } else {
            self.grow_at = new_size;
            self.shrink_at = 0;
        }

        if new_size > 0 {
            for index in 0..old_count {
                let entry = old.get(arena, index)?;
                if entry.hash != 0 {
                    self.insert_entry(arena, entry, false, false)?;
                }
            }
        }
        old.deallocate(arena)?;
        Ok(())
    }

    /// Empty the map while keeping it usable.
    pub fn clear<S: ByteStore>(&mut self, arena: &mut Arena<S>) -> Result<(), MapError> {
        self.resize(arena, 0, false)
    }

    /// Materialise every key/value pair into a fresh vector.
    ///
    /// The caller owns the returned vector and must deallocate it.
    pub fn all_entries<S: ByteStore>(
        &mut self,
        arena: &mut Arena<S>,
    ) -> Result<RawVec<KeyValue>, MapError> {
        self.ensure_valid()?;
        let mut out = RawVec::new(arena)?;
        for index in 0..self.count {
            let entry = self.entries.get(arena, index)?;
            if entry.hash != 0 {
                out.push(
                    arena,
                    KeyValue {
                        key: entry.key,
                        value: entry.value,
                    },
                )?;
            }
        }
        Ok(out)
    }

    /// Release the bucket array. The map refuses to operate afterwards.
    pub fn deallocate<S: ByteStore>(&mut self, arena: &mut Arena<S>) -> Result<(), MapError> {
        self.ensure_valid()?;
        self.entries.deallocate(arena)?;
        self.valid = false;
        Ok(())
    }

    /// Every arena pointer the map holds, via its bucket vector.
    pub fn references<S: ByteStore>(&self, arena: &Arena<S>) -> PtrVec {
        self.entries.references(arena)
    }

    /// Number of occupied buckets.
    pub fn len(&self) -> u32 {
        self.count_used
    }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.count_used == 0
    }

    /// Current bucket count.
    pub fn bucket_count(&self) -> u32 {
        self.count
    }

    /// Whether the map is usable (not yet deallocated).
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    // ── internals ──────────────────────────────────────────────

    fn ensure_valid(&self) -> Result<(), MapError> {
        if self.valid {
            Ok(())
        } else {
            Err(MapError::Invalid)
        }
    }

    fn hash_of(&self, key: u64) -> u32 {
        let hash = self.hasher.hash_key(key);
        if hash == 0 {
            SAFE_HASH
        } else {
            hash
        }
    }

    /// Distance of the slot at `index` from the ideal slot of `hash`.
    fn probe_distance(&self, index: u32, hash: u32) -> u32 {
        index.wrapping_sub(hash & self.count_mod) & self.count_mod
    }

    /// Clamp and round a requested bucket count to a supported size:
    /// a power of two in `[MIN_BUCKET_SIZE, MAX_BUCKET_SIZE]`, or 0.
    fn supported_size(requested: u32) -> u32 {
        if requested == 0 {
            return 0;
        }
        requested
            .clamp(MIN_BUCKET_SIZE, MAX_BUCKET_SIZE)
            .next_power_of_two()
            .min(MAX_BUCKET_SIZE)
    }

    /// The next bucket count on the growth schedule.
    ///
    /// Small maps square their size — a resize is a full rehash, so
    /// early growth is made rare — while large maps double.
    fn next_size(&self) -> u32 {
        if self.count == 0 {
            MIN_BUCKET_SIZE
        } else if self.count < SQUARE_GROWTH_LIMIT {
            self.count.saturating_mul(self.count)
        } else {
            self.count.saturating_mul(2)
        }
    }

    fn resize_next<S: ByteStore>(&mut self, arena: &mut Arena<S>) -> Result<(), MapError> {
        let next = self.next_size();
        self.resize(arena, next, true)
    }

    /// Robin-Hood insertion of a prepared entry.
    ///
    /// With `check_duplicates`, an existing key is either updated
    /// (`can_replace`) or reported as a conflict before any slot moves.
    /// If the probe sequence exhausts the bucket count, the map grows
    /// and the insert retries.
    fn insert_entry<S: ByteStore>(
        &mut self,
        arena: &mut Arena<S>,
        mut entry: Entry,
        can_replace: bool,
        check_duplicates: bool,
    ) -> Result<(), MapError> {
        if check_duplicates {
            let (hash, key) = (entry.hash, entry.key);
            if let Some(index) = self.find_index(arena, hash, key)? {
                if !can_replace {
                    return Err(MapError::KeyExists { key });
                }
                let mut existing = self.entries.get(arena, index)?;
                existing.value = entry.value;
                self.entries.set(arena, index, existing)?;
                return Ok(());
            }
        }

        if self.count > 0 {
            let mut index = entry.hash & self.count_mod;
            let mut distance = 0u32;
            for _ in 0..self.count {
                let occupant = self.entries.get(arena, index)?;
                if occupant.hash == 0 {
                    self.entries.set(arena, index, entry)?;
                    self.count_used += 1;
                    return Ok(());
                }
                let occupant_distance = self.probe_distance(index, occupant.hash);
                if occupant_distance < distance {
                    self.entries.set(arena, index, entry)?;
                    entry = occupant;
                    distance = occupant_distance;
                }
                index = (index + 1) & self.count_mod;
                distance += 1;
            }
        }

        // Probe sequence saturated (or no buckets at all): grow, retry.
        self.resize_next(arena)?;
        self.insert_entry(arena, entry, can_replace, check_duplicates)
    }

    /// Locate `key`'s bucket, or `None`.
    ///
    /// The walk stops at an empty slot or as soon as it has walked
    /// further than the occupant's own probe distance — Robin-Hood
    /// ordering guarantees the key cannot appear later.
    fn find_index<S: ByteStore>(
        &mut self,
        arena: &mut Arena<S>,
        hash: u32,
        key: u64,
    ) -> Result<Option<u32>, MapError> {
        if self.count == 0 || self.count_used == 0 {
            return Ok(None);
        }
        let mut index = hash & self.count_mod;
        let mut walked = 0u32;
        while walked < self.count {
            let entry = self.entries.get(arena, index)?;
            if entry.hash == 0 {
                return Ok(None);
            }
            if walked > self.probe_distance(index, entry.hash) {
                return Ok(None);
            }
            if entry.hash == hash && entry.key == key {
                return Ok(Some(index));
            }
            index = (index + 1) & self.count_mod;
            walked += 1;
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sara_test_utils::{mib, VecStore};

    fn make_arena(bytes: usize) -> Arena<VecStore> {
        Arena::new(0, bytes as i64, VecStore::new(bytes))
    }

    /// A hasher that sends every key to the same bucket, for forcing
    /// collision chains.
    struct FixedHasher(u32);

    impl KeyHasher for FixedHasher {
        fn hash_key(&self, _key: u64) -> u32 {
            self.0
        }
    }

    #[test]
    fn entry_is_20_bytes() {
        assert_eq!(std::mem::size_of::<Entry>(), 20);
    }

    #[test]
    fn put_get_round_trip() {
        let mut arena = make_arena(mib(4));
        let mut map = TaggedMap::new(&mut arena, 0).unwrap();
        map.put(&mut arena, 7, 700, true).unwrap();
        map.put(&mut arena, 8, 800, true).unwrap();
        assert_eq!(map.get(&mut arena, 7).unwrap(), 700);
        assert_eq!(map.get(&mut arena, 8).unwrap(), 800);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn zero_key_is_a_valid_key() {
        let mut arena = make_arena(mib(4));
        let mut map = TaggedMap::new(&mut arena, 0).unwrap();
        map.put(&mut arena, 0, 1, true).unwrap();
        assert_eq!(map.get(&mut arena, 0).unwrap(), 1);
    }

    #[test]
    fn put_without_replace_preserves_existing() {
        let mut arena = make_arena(mib(4));
        let mut map = TaggedMap::new(&mut arena, 0).unwrap();
        map.put(&mut arena, 5, 50, true).unwrap();
        let len_before = map.len();

        let result = map.put(&mut arena, 5, 99, false);
        assert!(matches!(result, Err(MapError::KeyExists { key: 5 })));
        assert_eq!(map.get(&mut arena, 5).unwrap(), 50);
        assert_eq!(map.len(), len_before);
    }

    #[test]
    fn put_with_replace_overwrites() {
        let mut arena = make_arena(mib(4));
        let mut map = TaggedMap::new(&mut arena, 0).unwrap();
        map.put(&mut arena, 5, 50, true).unwrap();
        map.put(&mut arena, 5, 99, true).unwrap();
        assert_eq!(map.get(&mut arena, 5).unwrap(), 99);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn remove_clears_key_and_preserves_others() {
        let mut arena = make_arena(mib(4));
        let mut map = TaggedMap::new(&mut arena, 0).unwrap();
        for key in 1..=40u64 {
            map.put(&mut arena, key, key * 10, true).unwrap();
        }
        assert_eq!(map.remove(&mut arena, 17).unwrap(), 170);
        assert!(matches!(
            map.get(&mut arena, 17),
            Err(MapError::KeyNotFound { key: 17 })
        ));
        for key in (1..=40u64).filter(|&k| k != 17) {
            assert_eq!(map.get(&mut arena, key).unwrap(), key * 10);
        }
        assert_eq!(map.len(), 39);
    }

    #[test]
    fn remove_missing_key_fails() {
        let mut arena = make_arena(mib(4));
        let mut map = TaggedMap::new(&mut arena, 0).unwrap();
        assert!(matches!(
            map.remove(&mut arena, 1),
            Err(MapError::KeyNotFound { key: 1 })
        ));
    }

    #[test]
    fn collision_chain_probes_and_removes() {
        let mut arena = make_arena(mib(4));
        // Every key lands on the same ideal slot.
        let mut map = TaggedMap::with_hasher(&mut arena, 64, FixedHasher(5)).unwrap();
        for key in 1..=10u64 {
            map.put(&mut arena, key, key + 100, true).unwrap();
        }
        for key in 1..=10u64 {
            assert_eq!(map.get(&mut arena, key).unwrap(), key + 100);
        }
        // Removing from the middle of the chain back-shifts the rest.
        map.remove(&mut arena, 4).unwrap();
        for key in (1..=10u64).filter(|&k| k != 4) {
            assert_eq!(map.get(&mut arena, key).unwrap(), key + 100);
        }
    }

    #[test]
    fn collision_chain_wraps_around_table_end() {
        let mut arena = make_arena(mib(4));
        // Ideal slot 62 of 64: chains wrap to the low indices.
        let mut map = TaggedMap::with_hasher(&mut arena, 64, FixedHasher(62)).unwrap();
        for key in 1..=6u64 {
            map.put(&mut arena, key, key, true).unwrap();
        }
        map.remove(&mut arena, 1).unwrap();
        for key in 2..=6u64 {
            assert_eq!(map.get(&mut arena, key).unwrap(), key);
        }
    }

    #[test]
    fn growth_keeps_all_entries() {
        let mut arena = make_arena(mib(8));
        let mut map = TaggedMap::new(&mut arena, 0).unwrap();
        assert_eq!(map.bucket_count(), 0);

        // Push well past the 64-bucket threshold; the square schedule
        // jumps 64 -> 4096.
        for key in 1..=200u64 {
            map.put(&mut arena, key, key * 3, true).unwrap();
        }
        assert_eq!(map.bucket_count(), 4096);
        assert_eq!(map.len(), 200);
        for key in 1..=200u64 {
            assert_eq!(map.get(&mut arena, key).unwrap(), key * 3);
        }
    }

    #[test]
    fn initial_size_rounds_to_power_of_two() {
        let mut arena = make_arena(mib(8));
        let map = TaggedMap::new(&mut arena, 10_000).unwrap();
        assert_eq!(map.bucket_count(), 16384);

        let map = TaggedMap::new(&mut arena, 1).unwrap();
        assert_eq!(map.bucket_count(), MIN_BUCKET_SIZE);
    }

    #[test]
    fn shrink_follows_removals() {
        let mut arena = make_arena(mib(8));
        let mut map = TaggedMap::new(&mut arena, 0).unwrap();
        for key in 1..=2000u64 {
            map.put(&mut arena, key, key, true).unwrap();
        }
        assert_eq!(map.bucket_count(), 4096);

        // Remove down to a quarter of the bucket count.
        for key in 1..=976u64 {
            map.remove(&mut arena, key).unwrap();
        }
        assert_eq!(map.len(), 1024);
        assert!(map.bucket_count() < 4096);
        for key in 977..=2000u64 {
            assert_eq!(map.get(&mut arena, key).unwrap(), key);
        }
    }

    #[test]
    fn clear_leaves_a_usable_empty_map() {
        let mut arena = make_arena(mib(4));
        let mut map = TaggedMap::new(&mut arena, 0).unwrap();
        for key in 1..=30u64 {
            map.put(&mut arena, key, key, true).unwrap();
        }
        map.clear(&mut arena).unwrap();
        assert_eq!(map.len(), 0);
        assert_eq!(map.bucket_count(), 0);
        assert!(matches!(
            map.get(&mut arena, 1),
            Err(MapError::KeyNotFound { .. })
        ));

        // A cleared map grows again on the next insert.
        map.put(&mut arena, 2, 22, true).unwrap();
        assert_eq!(map.get(&mut arena, 2).unwrap(), 22);
        assert_eq!(map.bucket_count(), MIN_BUCKET_SIZE);
    }

    #[test]
    fn all_entries_materialises_pairs() {
        let mut arena = make_arena(mib(4));
        let mut map = TaggedMap::new(&mut arena, 0).unwrap();
        for key in 1..=20u64 {
            map.put(&mut arena, key, key * 2, true).unwrap();
        }

        let mut pairs = map.all_entries(&mut arena).unwrap();
        assert_eq!(pairs.len(), 20);
        let mut seen: Vec<(u64, u64)> = Vec::new();
        for index in 0..pairs.len() {
            let kv = pairs.get(&mut arena, index).unwrap();
            seen.push((kv.key, kv.value));
        }
        seen.sort_unstable();
        let expected: Vec<(u64, u64)> = (1..=20u64).map(|k| (k, k * 2)).collect();
        assert_eq!(seen, expected);
        pairs.deallocate(&mut arena).unwrap();
    }

    /// A hasher that always returns the reserved empty sentinel, to
    /// prove the map's own zero-forcing layer.
    struct ZeroHasher;

    impl KeyHasher for ZeroHasher {
        fn hash_key(&self, _key: u64) -> u32 {
            0
        }
    }

    #[test]
    fn stray_zero_hash_is_forced_to_safe_hash() {
        let mut arena = make_arena(mib(4));
        let mut map = TaggedMap::with_hasher(&mut arena, 64, ZeroHasher).unwrap();
        map.put(&mut arena, 9, 90, true).unwrap();
        // The entry is findable and its stored hash is not the sentinel.
        assert_eq!(map.get(&mut arena, 9).unwrap(), 90);
        assert_eq!(map.len(), 1);
        map.remove(&mut arena, 9).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn manual_resize_disables_automatic_thresholds() {
        let mut arena = make_arena(mib(8));
        let mut map = TaggedMap::new(&mut arena, 0).unwrap();
        for key in 1..=100u64 {
            map.put(&mut arena, key, key, true).unwrap();
        }

        map.resize(&mut arena, 8192, false).unwrap();
        assert_eq!(map.bucket_count(), 8192);
        assert_eq!(map.len(), 100);

        // Removals far below a quarter occupancy must not shrink.
        for key in 1..=99u64 {
            map.remove(&mut arena, key).unwrap();
        }
        assert_eq!(map.bucket_count(), 8192);
        assert_eq!(map.get(&mut arena, 100).unwrap(), 100);
    }

    #[test]
    fn resize_preserves_entries_across_rehash() {
        let mut arena = make_arena(mib(8));
        let mut map = TaggedMap::new(&mut arena, 0).unwrap();
        for key in 1..=50u64 {
            map.put(&mut arena, key, !key, true).unwrap();
        }
        map.resize(&mut arena, 1024, true).unwrap();
        assert_eq!(map.bucket_count(), 1024);
        for key in 1..=50u64 {
            assert_eq!(map.get(&mut arena, key).unwrap(), !key);
        }
    }

    #[test]
    fn deallocate_refuses_further_use() {
        let mut arena = make_arena(mib(4));
        let mut map = TaggedMap::new(&mut arena, 0).unwrap();
        map.put(&mut arena, 1, 1, true).unwrap();
        map.deallocate(&mut arena).unwrap();
        assert!(!map.is_valid());
        assert!(matches!(
            map.put(&mut arena, 2, 2, true),
            Err(MapError::Invalid)
        ));
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use std::collections::HashMap;

        use proptest::prelude::*;

        #[derive(Clone, Debug)]
        enum Op {
            Put(u64, u64, bool),
            Remove(u64),
            Get(u64),
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            // A narrow key space makes collisions and re-puts common.
            prop_oneof![
                (0u64..64, any::<u64>(), any::<bool>()).prop_map(|(k, v, r)| Op::Put(k, v, r)),
                (0u64..64).prop_map(Op::Remove),
                (0u64..64).prop_map(Op::Get),
            ]
        }

        proptest! {
            #[test]
            fn matches_std_hashmap_model(
                ops in proptest::collection::vec(op_strategy(), 1..300),
            ) {
                let mut arena = make_arena(mib(8));
                let mut map = TaggedMap::new(&mut arena, 0).unwrap();
                let mut model: HashMap<u64, u64> = HashMap::new();

                for op in ops {
                    match op {
                        Op::Put(k, v, replace) => {
                            let result = map.put(&mut arena, k, v, replace);
                            match model.entry(k) {
                                std::collections::hash_map::Entry::Occupied(mut e) => {
                                    if replace {
                                        prop_assert!(result.is_ok());
                                        e.insert(v);
                                    } else {
                                        prop_assert!(
                                            matches!(result, Err(MapError::KeyExists { .. })),
                                            "expected KeyExists error"
                                        );
                                    }
                                }
                                std::collections::hash_map::Entry::Vacant(e) => {
                                    prop_assert!(result.is_ok());
                                    e.insert(v);
                                }
                            }
                        }
                        Op::Remove(k) => {
                            let result = map.remove(&mut arena, k);
                            match model.remove(&k) {
                                Some(v) => prop_assert_eq!(result.unwrap(), v),
                                None => prop_assert!(
                                    matches!(result, Err(MapError::KeyNotFound { .. })),
                                    "expected KeyNotFound error"
                                ),
                            }
                        }
                        Op::Get(k) => {
                            let result = map.get(&mut arena, k);
                            match model.get(&k) {
                                Some(&v) => prop_assert_eq!(result.unwrap(), v),
                                None => prop_assert!(
                                    matches!(result, Err(MapError::KeyNotFound { .. })),
                                    "expected KeyNotFound error"
                                ),
                            }
                        }
                    }
                }

                prop_assert_eq!(map.len() as usize, model.len());
            }
        }
    }
}
