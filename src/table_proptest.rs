#![cfg(test)]

// Property tests for ProbeMap kept inside the crate so they can inspect the
// slot array directly.

use crate::error::TableError;
use crate::probe::Probe;
use crate::table::ProbeMap;
use core::hash::BuildHasher;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::hash::{BuildHasherDefault, Hasher};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Put(usize, String),
    Get(usize),
    Contains(String),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<Op>)> {
    let cap = (0u32..=5).prop_map(|b| 1usize << b);
    let pool = proptest::collection::vec("[a-zA-Z]{0,5}", 1..=40);
    (cap, pool).prop_flat_map(|(cap, pool)| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => (idx.clone(), "[a-z0-9]{0,4}").prop_map(|(i, v)| Op::Put(i, v)),
            2 => idx.clone().prop_map(Op::Get),
            1 => "[a-zA-Z]{0,5}".prop_map(Op::Contains),
            1 => Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (cap, pool.clone(), ops))
    })
}

// Structural invariants of the slot array:
// - capacity is a power of two, len <= max_load and
//   max_load == capacity * 3 / 4;
// - the number of filled slots equals len;
// - every entry sits on its own probe path with no empty slot before it,
//   so lookups that stop at the first empty slot still find it.
fn check_structure<S: BuildHasher>(m: &ProbeMap<S>) -> Result<(), TestCaseError> {
    let cap = m.capacity();
    prop_assert!(cap.is_power_of_two());
    prop_assert_eq!(m.max_load(), cap * 3 / 4);
    prop_assert!(m.len() <= cap);
    prop_assert!(m.len() <= m.max_load());

    for (k, v) in m.iter() {
        let hash = m.hasher().hash_one(k);
        let mut reached = false;
        for i in Probe::new(hash, cap) {
            match m.slot_key(i) {
                None => break,
                Some(sk) if sk == k => {
                    reached = true;
                    break;
                }
                Some(_) => {}
            }
        }
        prop_assert!(reached, "entry {:?} => {:?} unreachable from its home slot", k, v);
    }
    let filled = (0..cap).filter(|&i| m.slot_key(i).is_some()).count();
    prop_assert_eq!(filled, m.len());
    Ok(())
}

fn run<S: BuildHasher>(
    mut sut: ProbeMap<S>,
    pool: &[String],
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, String> = HashMap::new();
    for op in ops {
        match op {
            Op::Put(i, v) => {
                let k = &pool[i];
                let before = (sut.len(), sut.capacity());
                match sut.put(k, v.clone()) {
                    Ok(()) => {
                        prop_assert!(!k.is_empty());
                        model.insert(k.clone(), v);
                    }
                    Err(TableError::InvalidKey) => {
                        prop_assert!(k.is_empty());
                        prop_assert_eq!((sut.len(), sut.capacity()), before);
                    }
                    Err(e) => prop_assert!(false, "unexpected error {:?}", e),
                }
                prop_assert!(sut.capacity() >= before.1);
                prop_assert!(sut.len() >= before.0);
            }
            Op::Get(i) => {
                let k = &pool[i];
                if k.is_empty() {
                    prop_assert_eq!(sut.get(k), Err(TableError::InvalidKey));
                } else {
                    prop_assert_eq!(sut.get(k).unwrap(), model.get(k).map(String::as_str));
                }
            }
            Op::Contains(s) => {
                if s.is_empty() {
                    prop_assert_eq!(sut.contains_key(&s), Err(TableError::InvalidKey));
                } else {
                    prop_assert_eq!(sut.contains_key(&s).unwrap(), model.contains_key(&s));
                }
            }
            Op::Iterate => {
                let s_pairs: BTreeSet<(String, String)> = sut
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();
                let m_pairs: BTreeSet<(String, String)> =
                    model.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
                prop_assert_eq!(s_pairs, m_pairs);
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        check_structure(&sut)?;
    }
    Ok(())
}

// Degenerate hasher: only the first byte of the key counts, so
// many keys share a home slot and long clusters form.
#[derive(Default)]
struct FirstByteHasher(u64);
impl Hasher for FirstByteHasher {
    fn write(&mut self, bytes: &[u8]) {
        if self.0 == 0 {
            if let Some(&b) = bytes.first() {
                self.0 = u64::from(b) + 1;
            }
        }
    }
    fn finish(&self) -> u64 {
        self.0
    }
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - put followed by get returns the latest value; misses are Ok(None).
// - empty keys are rejected without changing len or capacity.
// - len grows by one per new key, never shrinks; capacity only doubles.
// - iter yields exactly the model's pairs.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((cap, pool, ops) in arb_scenario()) {
        let sut = ProbeMap::with_capacity(cap).unwrap();
        run(sut, &pool, ops)?;
    }

    #[test]
    fn prop_state_machine_clustered((cap, pool, ops) in arb_scenario()) {
        let hasher = BuildHasherDefault::<FirstByteHasher>::default();
        let sut = ProbeMap::with_capacity_and_hasher(cap, hasher).unwrap();
        run(sut, &pool, ops)?;
    }
}
