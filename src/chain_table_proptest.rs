#![cfg(test)]

// Property tests for ChainTable kept inside the crate so they can check the
// structural invariants through `assert_consistent`.

use crate::chain_table::{ChainTable, Handle};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeSet, HashMap};
use std::hash::{Hash, Hasher};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    Remove(usize),
    Find(usize),
    Mutate(usize, i32),
    Grow,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Put(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Find),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Grow),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn std_hash(key: &str) -> u64 {
    let mut h = DefaultHasher::new();
    key.hash(&mut h);
    h.finish()
}

fn const_hash(_key: &str) -> u64 {
    0
}

// State-machine equivalence against std::collections::HashMap. Invariants
// checked after every op:
// - size accounting and `iter` length match the model;
// - every entry sits in its hash's bucket and is reachable once;
// - handles of live keys stay stable across growth; removed handles go stale.
fn run_scenario(
    hash: fn(&str) -> u64,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut sut: ChainTable<String, i32> = ChainTable::with_buckets(4).unwrap();
    let mut model: HashMap<String, i32> = HashMap::new();
    let mut live: HashMap<String, Handle> = HashMap::new();
    let mut stale: Vec<Handle> = Vec::new();

    for op in ops {
        match op {
            OpI::Put(i, v) => {
                let k = &pool[i];
                let h = hash(k);
                match sut.find(h, |q| q == k) {
                    Some(handle) => {
                        prop_assert!(model.contains_key(k));
                        *handle.value_mut(&mut sut).expect("live handle") = v;
                    }
                    None => {
                        prop_assert!(!model.contains_key(k));
                        let handle = sut.insert_front(h, k.clone(), v);
                        live.insert(k.clone(), handle);
                    }
                }
                model.insert(k.clone(), v);
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                let removed = sut.remove(hash(k), |q| q == k);
                match model.remove(k) {
                    Some(mv) => {
                        let (kk, vv) = removed.expect("model says present");
                        prop_assert_eq!(&kk, k);
                        prop_assert_eq!(vv, mv);
                        stale.push(live.remove(k).expect("tracked handle"));
                    }
                    None => prop_assert!(removed.is_none()),
                }
            }
            OpI::Find(i) => {
                let k = &pool[i];
                let found = sut.find(hash(k), |q| q == k);
                prop_assert_eq!(found.is_some(), model.contains_key(k));
                if let Some(h) = found {
                    prop_assert_eq!(Some(&h), live.get(k));
                    prop_assert_eq!(h.value(&sut), model.get(k));
                }
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(&h) = live.get(k) {
                    let vr = h.value_mut(&mut sut).expect("live handle should resolve");
                    *vr = vr.saturating_add(d);
                    if let Some(mv) = model.get_mut(k) {
                        *mv = mv.saturating_add(d);
                    }
                }
            }
            OpI::Grow => {
                if sut.capacity() < 256 {
                    let before = sut.capacity();
                    sut.grow(before * 2).expect("small growth succeeds");
                    prop_assert_eq!(sut.capacity(), before * 2);
                }
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<_> = sut.iter().map(|(_, k, _)| k.clone()).collect();
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
            }
        }

        sut.assert_consistent();
        for &h in &stale {
            prop_assert!(h.value(&sut).is_none());
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.iter().count(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(std_hash, &pool, ops)?;
    }

    // Worst-case collisions: every key shares one chain regardless of capacity.
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(const_hash, &pool, ops)?;
    }
}
