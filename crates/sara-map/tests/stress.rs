//! Integration test: randomised put/remove churn against a large store.
//!
//! Drives the map with a seeded RNG so failures reproduce exactly.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sara_arena::Arena;
use sara_map::TaggedMap;
use sara_test_utils::{mib, VecStore};

#[test]
fn random_churn_keeps_the_map_consistent() {
    let bytes = mib(50);
    let mut arena = Arena::new(0, bytes as i64, VecStore::new(bytes));
    let mut map = TaggedMap::new(&mut arena, 10_000).unwrap();

    // A sentinel entry that must survive the whole run.
    map.put(&mut arena, 0, 1, true).unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(0x5A7A);
    for i in 0..25_000u64 {
        let key = rng.gen_range(1..1_000_000u64);
        map.put(&mut arena, key, i, true).unwrap();

        let victim = rng.gen_range(1..1_000_000u64);
        // Most victims are absent; a failed remove must be harmless.
        let _ = map.remove(&mut arena, victim);
    }

    assert_eq!(map.get(&mut arena, 0).unwrap(), 1);
    assert!(map.len() >= 1000, "map len {} unexpectedly small", map.len());
}
