// ChainedHashMap property tests (public API only).
//
// Property 1: resizing preserves entries.
//  - Insert N distinct keys into a small table so several resizes happen.
//  - Invariant: every key maps to its value; len == N; Inserted reported once per key.
//
// Property 2: put results match first-insertion.
//  - Random sequence of puts over a small key pool, both ownership modes.
//  - Invariant: Inserted exactly on the first put of a key since its last removal.
//
// Property 3: hash-function swaps keep keys reachable.
//  - Insert keys, swap the hash function (possibly to a constant), look up everything.
use chained_hashmap::{ChainedHashMap, GrowthPolicy, PutResult};
use hashbrown::HashSet;
use proptest::prelude::*;

fn growth() -> impl Strategy<Value = GrowthPolicy> {
    prop_oneof![
        (1.1f32..4.0).prop_map(GrowthPolicy::Multiply),
        (1.0f32..32.0).prop_map(GrowthPolicy::Add),
    ]
}

proptest! {
    #[test]
    fn prop_resize_preserves_entries(
        capacity in 1usize..=8,
        load_factor in 0.25f32..2.0,
        growth in growth(),
        keys in proptest::collection::hash_set(any::<u64>(), 1..400),
    ) {
        let mut m: ChainedHashMap<u64, u64> = ChainedHashMap::builder()
            .capacity(capacity)
            .load_factor(load_factor)
            .growth_policy(growth)
            .build()
            .unwrap();
        for &k in &keys {
            prop_assert_eq!(m.put_noalloc(k, !k), PutResult::Inserted);
        }
        prop_assert_eq!(m.len(), keys.len());
        prop_assert!(m.capacity() >= capacity);
        for &k in &keys {
            prop_assert_eq!(m.get(&k), Some(&!k));
        }
        prop_assert_eq!(m.iter().count(), keys.len());
    }
}

proptest! {
    #[test]
    fn prop_put_reports_first_insertion(
        ops in proptest::collection::vec((0u8..=2u8, 0u16..16u16, any::<u32>()), 1..200)
    ) {
        let mut m: ChainedHashMap<u16, u32> = ChainedHashMap::with_capacity(2);
        let mut present: HashSet<u16> = HashSet::new();
        for (op, k, v) in ops {
            match op {
                0 => {
                    let r = m.put_noalloc(k, v);
                    prop_assert_eq!(r.existed(), !present.insert(k));
                    prop_assert_eq!(m.get(&k), Some(&v));
                }
                1 => {
                    let r = m.put(&k, &v);
                    prop_assert_eq!(r.existed(), !present.insert(k));
                    prop_assert_eq!(m.get(&k), Some(&v));
                }
                2 => {
                    prop_assert_eq!(m.remove(&k), present.remove(&k));
                }
                _ => unreachable!(),
            }
            prop_assert_eq!(m.len(), present.len());
        }
    }
}

proptest! {
    #[test]
    fn prop_hash_swap_keeps_keys(
        keys in proptest::collection::hash_set("[a-z]{0,6}", 0..60),
        mul in any::<u64>(),
        constant in any::<bool>(),
    ) {
        let mut m: ChainedHashMap<String, usize> = ChainedHashMap::with_capacity(4);
        for (i, k) in keys.iter().enumerate() {
            m.put_noalloc(k.clone(), i);
        }
        let capacity = m.capacity();
        if constant {
            m.set_hash_fn(|_: &String| 42);
        } else {
            m.set_hash_fn(move |k: &String| {
                k.bytes().fold(0u64, |h, b| h.wrapping_mul(mul | 1).wrapping_add(b as u64))
            });
        }
        prop_assert_eq!(m.capacity(), capacity);
        for (i, k) in keys.iter().enumerate() {
            prop_assert_eq!(m.get(k), Some(&i));
        }
        prop_assert_eq!(m.len(), keys.len());
    }
}
