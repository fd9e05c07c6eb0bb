#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can check
// bucket placement through internal accessors.

use crate::chained_hash_map::{ChainedHashMap, PutResult};
use crate::policy::Disposal;
use hashbrown::HashMap;
use proptest::prelude::*;
use std::cell::Cell;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::ops::ControlFlow;
use std::rc::Rc;

// Pool-indexed operations so shrinking moves towards earlier keys.
#[derive(Clone, Debug)]
enum Op {
    PutNoalloc(usize, u8),
    PutAliased(usize),
    Put(usize, u8),
    Remove(usize),
    RemoveNofree(usize),
    Get(usize),
    Clear,
    Browse,
    SetHashFn(u64),
    SetLoadFactor(f32),
    SetGrowth(f32),
}

#[derive(Clone, Debug, PartialEq)]
struct ModelValue {
    value: String,
    aliased: bool,
}

#[derive(Default)]
struct Ledger {
    keys: Rc<Cell<usize>>,
    values: Rc<Cell<usize>>,
}

fn seeded_hash(seed: u64) -> Box<dyn Fn(&String) -> u64> {
    if seed % 4 == 0 {
        // every key collides
        return Box::new(|_: &String| 0);
    }
    Box::new(move |k: &String| {
        let mut h = DefaultHasher::new();
        seed.hash(&mut h);
        k.hash(&mut h);
        h.finish()
    })
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<Op>)> {
    (1usize..=4, proptest::collection::vec("[a-z]{1,4}", 1..=10)).prop_flat_map(
        |(capacity, pool)| {
            let idxs: Vec<usize> = (0..pool.len()).collect();
            let idx = proptest::sample::select(idxs);
            let op = prop_oneof![
                4 => (idx.clone(), any::<u8>()).prop_map(|(i, v)| Op::PutNoalloc(i, v)),
                1 => idx.clone().prop_map(Op::PutAliased),
                3 => (idx.clone(), any::<u8>()).prop_map(|(i, v)| Op::Put(i, v)),
                2 => idx.clone().prop_map(Op::Remove),
                1 => idx.clone().prop_map(Op::RemoveNofree),
                2 => idx.clone().prop_map(Op::Get),
                1 => Just(Op::Clear),
                1 => Just(Op::Browse),
                1 => any::<u64>().prop_map(Op::SetHashFn),
                1 => proptest::sample::select(vec![0.25f32, 0.5, 0.75, 1.0, 3.0])
                    .prop_map(Op::SetLoadFactor),
                1 => proptest::sample::select(vec![2.0f32, 1.5, -1.0, -7.0, 0.0])
                    .prop_map(Op::SetGrowth),
            ];
            proptest::collection::vec(op, 1..80).prop_map(move |ops| (capacity, pool.clone(), ops))
        },
    )
}

fn counting_map(capacity: usize, ledger: &Ledger) -> ChainedHashMap<String, String> {
    let mut m = ChainedHashMap::with_functions(capacity, seeded_hash(1), |a: &String, b: &String| {
        a == b
    });
    let k = ledger.keys.clone();
    m.set_key_disposal(Disposal::with(move |_| k.set(k.get() + 1)));
    let v = ledger.values.clone();
    m.set_value_disposal(Disposal::with(move |_| v.set(v.get() + 1)));
    m
}

// Property: state-machine equivalence against a hashbrown model.
// Invariants exercised across random operation sequences:
// - `get` returns the most recently stored value; `len` equals the model's size.
// - Put variants report `Inserted` exactly once per distinct key.
// - Every disposal expected by the ownership rules happens, and no other:
//   overwritten keys/values, removed and cleared entries; aliased entries
//   dispose only their key; `remove_nofree` disposes nothing.
// - Every entry sits in the bucket selected by its up-to-date cached hash,
//   across resizes, growth-policy changes and hash-function swaps.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((capacity, pool, ops) in arb_scenario()) {
        let ledger = Ledger::default();
        let mut sut = counting_map(capacity, &ledger);
        let mut model: HashMap<String, ModelValue> = HashMap::new();
        let mut expected_keys = 0usize;
        let mut expected_values = 0usize;

        for op in ops {
            match op {
                Op::PutNoalloc(i, v) => {
                    let k = pool[i].clone();
                    let value = format!("v{}", v);
                    let r = sut.put_noalloc(k.clone(), value.clone());
                    let prev = model.insert(k, ModelValue { value, aliased: false });
                    prop_assert_eq!(r.existed(), prev.is_some());
                    if let Some(old) = prev {
                        expected_keys += 1;
                        if !old.aliased { expected_values += 1; }
                    }
                }
                Op::PutAliased(i) => {
                    let k = pool[i].clone();
                    let r = sut.put_noalloc_aliased(k.clone());
                    let prev = model.insert(k.clone(), ModelValue { value: k, aliased: true });
                    prop_assert_eq!(r.existed(), prev.is_some());
                    if let Some(old) = prev {
                        expected_keys += 1;
                        if !old.aliased { expected_values += 1; }
                    }
                }
                Op::Put(i, v) => {
                    let k = pool[i].clone();
                    let value = format!("c{}", v);
                    let r = sut.put(&k, &value);
                    match model.get_mut(&k) {
                        Some(old) => {
                            prop_assert_eq!(r, PutResult::Updated);
                            if !old.aliased { expected_values += 1; }
                            *old = ModelValue { value, aliased: false };
                        }
                        None => {
                            prop_assert_eq!(r, PutResult::Inserted);
                            model.insert(k, ModelValue { value, aliased: false });
                        }
                    }
                }
                Op::Remove(i) => {
                    let k = &pool[i];
                    let removed = sut.remove(k);
                    let prev = model.remove(k);
                    prop_assert_eq!(removed, prev.is_some());
                    if let Some(old) = prev {
                        expected_keys += 1;
                        if !old.aliased { expected_values += 1; }
                    }
                }
                Op::RemoveNofree(i) => {
                    let k = &pool[i];
                    let got = sut.remove_nofree(k);
                    match model.remove(k) {
                        Some(old) => {
                            let (kk, vv) = got.expect("present in model");
                            prop_assert_eq!(&kk, k);
                            if old.aliased {
                                prop_assert!(vv.is_none());
                            } else {
                                prop_assert_eq!(vv, Some(old.value));
                            }
                        }
                        None => prop_assert!(got.is_none()),
                    }
                }
                Op::Get(i) => {
                    let k = &pool[i];
                    prop_assert_eq!(sut.get(k), model.get(k).map(|m| &m.value));
                    prop_assert_eq!(sut.contains(k), model.contains_key(k));
                }
                Op::Clear => {
                    let capacity = sut.capacity();
                    for old in model.values() {
                        expected_keys += 1;
                        if !old.aliased { expected_values += 1; }
                    }
                    model.clear();
                    sut.clear();
                    prop_assert_eq!(sut.capacity(), capacity);
                    let mut calls = 0;
                    let _ = sut.browse(|_, _| { calls += 1; ControlFlow::<()>::Continue(()) });
                    prop_assert_eq!(calls, 0);
                }
                Op::Browse => {
                    let mut seen = BTreeSet::new();
                    let r = sut.browse(|k, v| {
                        seen.insert((k.clone(), v.clone()));
                        ControlFlow::<()>::Continue(())
                    });
                    prop_assert_eq!(r, ControlFlow::Continue(()));
                    let expected: BTreeSet<_> = model
                        .iter()
                        .map(|(k, m)| (k.clone(), m.value.clone()))
                        .collect();
                    prop_assert_eq!(seen, expected);
                }
                Op::SetHashFn(seed) => {
                    let capacity = sut.capacity();
                    sut.set_hash_fn(seeded_hash(seed));
                    prop_assert_eq!(sut.capacity(), capacity);
                }
                Op::SetLoadFactor(f) => sut.set_load_factor(f),
                Op::SetGrowth(off) => {
                    let capacity = sut.capacity();
                    sut.set_growth_policy(off);
                    prop_assert_eq!(sut.capacity(), capacity);
                }
            }

            sut.assert_consistent();
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
            prop_assert_eq!(ledger.keys.get(), expected_keys);
            prop_assert_eq!(ledger.values.get(), expected_values);
        }

        // Dropping the table disposes whatever is left.
        for old in model.values() {
            expected_keys += 1;
            if !old.aliased { expected_values += 1; }
        }
        drop(sut);
        prop_assert_eq!(ledger.keys.get(), expected_keys);
        prop_assert_eq!(ledger.values.get(), expected_values);
    }
}

// Property: with growth disabled the bucket array never changes size and
// every key stays reachable through its chain.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_growth_disabled_keeps_capacity(
        capacity in 1usize..=8,
        keys in proptest::collection::btree_set(any::<u32>(), 0..200),
    ) {
        let mut m: ChainedHashMap<u32, u32> = ChainedHashMap::with_capacity(capacity);
        m.set_growth_policy(0.0);
        for &k in &keys {
            prop_assert_eq!(m.put_noalloc(k, k ^ 0xabcd), PutResult::Inserted);
        }
        prop_assert_eq!(m.capacity(), capacity);
        prop_assert_eq!(m.len(), keys.len());
        for &k in &keys {
            prop_assert_eq!(m.get(&k), Some(&(k ^ 0xabcd)));
        }
        m.assert_consistent();
    }
}
