#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can run
// the structural audit, which is not part of the public API.

use crate::chained_hash_map::{ChainedHashMap, Removal};
use crate::key_hash::{Djb2, KeyHasher};
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};

// Resizes double the bucket array; stop well before it gets expensive.
const MAX_CAPACITY: usize = 1 << 10;

// Pool-indexed operations so shrinking converges on few, short keys.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    Retrieve(usize),
    Mutate(usize, i32),
    Resize,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<OpI>)> {
    (1usize..=4, proptest::collection::vec("[a-z_0-9]{0,6}", 1..=10)).prop_flat_map(
        |(capacity, pool)| {
            let idx = 0..pool.len();
            let op = prop_oneof![
                4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
                2 => idx.clone().prop_map(OpI::Remove),
                2 => idx.clone().prop_map(OpI::Retrieve),
                1 => (idx, any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
                1 => Just(OpI::Resize),
                1 => Just(OpI::Iterate),
            ];
            proptest::collection::vec(op, 1..80)
                .prop_map(move |ops| (capacity, pool.clone(), ops))
        },
    )
}

fn run_against_model<H: KeyHasher>(
    mut sut: ChainedHashMap<i32, H>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = &pool[i];
                let bucket = sut.bucket_index(k);
                let chain_before = sut.bucket(bucket).count();
                let prev = sut.insert(k.as_str(), v);
                prop_assert_eq!(prev, model.insert(k.clone(), v));
                let grown = if prev.is_some() { 0 } else { 1 };
                prop_assert_eq!(sut.bucket(bucket).count(), chain_before + grown);
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                let bucket_was_empty = sut.bucket(sut.bucket_index(k)).next().is_none();
                match (sut.remove(k), model.remove(k)) {
                    (Removal::Removed(v), Some(mv)) => prop_assert_eq!(v, mv),
                    (Removal::EmptyBucket, None) => prop_assert!(bucket_was_empty),
                    (Removal::NotFound, None) => prop_assert!(!bucket_was_empty),
                    (got, want) => {
                        return Err(TestCaseError::fail(format!(
                            "remove mismatch for `{}`: {:?} vs {:?}",
                            k, got, want
                        )))
                    }
                }
                prop_assert!(sut.retrieve(k).is_none());
            }
            OpI::Retrieve(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.retrieve(k), model.get(k));
                prop_assert_eq!(sut.contains_key(k), model.contains_key(k));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(v) = sut.retrieve_mut(k) {
                    *v = v.wrapping_add(d);
                }
                if let Some(mv) = model.get_mut(k) {
                    *mv = mv.wrapping_add(d);
                }
            }
            OpI::Resize => {
                if sut.capacity() < MAX_CAPACITY {
                    let before = sut.capacity();
                    // Chains keep their relative order when they land together.
                    let chains: Vec<Vec<String>> = (0..before)
                        .map(|b| sut.bucket(b).map(|(k, _)| k.to_string()).collect())
                        .collect();
                    sut.resize().map_err(|e| TestCaseError::fail(e.to_string()))?;
                    prop_assert_eq!(sut.capacity(), before * 2);
                    for chain in chains {
                        for pair in chain.windows(2) {
                            let (a, b) = (sut.bucket_index(&pair[0]), sut.bucket_index(&pair[1]));
                            if a == b {
                                let order: Vec<&str> = sut.bucket(a).map(|(k, _)| k).collect();
                                let pa = order.iter().position(|k| *k == pair[0]);
                                let pb = order.iter().position(|k| *k == pair[1]);
                                prop_assert!(pa < pb, "order lost for {:?}", pair);
                            }
                        }
                    }
                }
            }
            OpI::Iterate => {
                let seen: BTreeMap<String, i32> =
                    sut.iter().map(|(k, v)| (k.to_string(), *v)).collect();
                let expected: BTreeMap<String, i32> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(seen, expected);
            }
        }

        // Post-conditions after each op
        sut.audit().map_err(TestCaseError::fail)?;
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// After every step the chains are audited: each entry sits in its hash
// bucket, keys are unique, chains are acyclic and cover every entry.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((capacity, pool, ops) in arb_scenario()) {
        let sut: ChainedHashMap<i32> = ChainedHashMap::new(capacity).unwrap();
        run_against_model(sut, &pool, ops)?;
    }

    #[test]
    fn prop_state_machine_djb2((capacity, pool, ops) in arb_scenario()) {
        let sut = ChainedHashMap::with_hasher(capacity, Djb2).unwrap();
        run_against_model(sut, &pool, ops)?;
    }
}

// Property: same invariants under worst-case collisions, where every key
// shares one chain regardless of capacity.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((capacity, pool, ops) in arb_scenario()) {
        let sut = ChainedHashMap::with_hasher(capacity, |_: &str| 0u64).unwrap();
        run_against_model(sut, &pool, ops)?;
    }
}
