#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can use
// small bucket tables and inspect handles directly.

use crate::chained_hash_map::{ChainedHashMap, KeyHandle};
use crate::key::{Key, KeyRef};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Model key mirroring the map's two key variants.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
enum MKey {
    Int(i32),
    Str(String),
}

impl MKey {
    fn as_key_ref(&self) -> KeyRef<'_> {
        match self {
            MKey::Int(i) => KeyRef::Int(*i),
            MKey::Str(s) => KeyRef::Str(s),
        }
    }

    fn to_key(&self) -> Key<String> {
        match self {
            MKey::Int(i) => Key::Int(*i),
            MKey::Str(s) => Key::Str(s.clone()),
        }
    }

    fn from_key(k: &Key<String>) -> Self {
        match k {
            Key::Int(i) => MKey::Int(*i),
            Key::Str(s) => MKey::Str(s.clone()),
        }
    }
}

// Pool-indexed operations so shrinking moves toward earlier keys.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    RemoveHandle(usize),
    Find(usize),
    Mutate(usize, i32),
    SortKeys,
    SortByValue,
    Iterate,
}

fn arb_key() -> impl Strategy<Value = MKey> {
    prop_oneof![
        (-20i32..20).prop_map(MKey::Int),
        "[a-z0-9]{0,4}".prop_map(MKey::Str),
    ]
}

fn arb_scenario() -> impl Strategy<Value = (Vec<MKey>, Vec<OpI>)> {
    proptest::collection::vec(arb_key(), 1..=10).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            3 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            1 => idx.clone().prop_map(OpI::Remove),
            1 => idx.clone().prop_map(OpI::RemoveHandle),
            1 => idx.clone().prop_map(OpI::Find),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::SortKeys),
            1 => Just(OpI::SortByValue),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run(buckets: usize, pool: Vec<MKey>, ops: Vec<OpI>) -> Result<(), TestCaseError> {
    let mut sut: ChainedHashMap<i32> = ChainedHashMap::with_buckets(buckets);
    let mut model: HashMap<MKey, i32> = HashMap::new();
    let mut live: HashMap<MKey, KeyHandle> = HashMap::new();
    let mut stale: Vec<KeyHandle> = Vec::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = &pool[i];
                let prev = sut.insert(k.to_key(), v);
                prop_assert_eq!(prev, model.insert(k.clone(), v));
                let h = sut.find(k.as_key_ref()).expect("inserted key is findable");
                if let Some(&old) = live.get(k) {
                    prop_assert_eq!(old, h, "replacing insert keeps the entry");
                }
                live.insert(k.clone(), h);
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                match sut.remove(k.as_key_ref()) {
                    Some((kk, vv)) => {
                        prop_assert_eq!(&MKey::from_key(&kk), k);
                        prop_assert_eq!(Some(vv), model.remove(k));
                        stale.extend(live.remove(k));
                    }
                    None => prop_assert!(!model.contains_key(k)),
                }
            }
            OpI::RemoveHandle(i) => {
                let k = &pool[i];
                if let Some(h) = live.remove(k) {
                    let (kk, vv) = sut.remove_handle(h).expect("live handle removes");
                    prop_assert_eq!(&MKey::from_key(&kk), k);
                    prop_assert_eq!(Some(vv), model.remove(k));
                    stale.push(h);
                } else {
                    prop_assert!(sut.find(k.as_key_ref()).is_none());
                }
            }
            OpI::Find(i) => {
                let k = &pool[i];
                let got = sut.get(k.as_key_ref()).copied();
                prop_assert_eq!(got, model.get(k).copied());
                prop_assert_eq!(sut.find(k.as_key_ref()), live.get(k).copied());
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(&h) = live.get(k) {
                    let vr = h.value_mut(&mut sut);
                    prop_assert!(vr.is_some(), "live handle should resolve");
                    if let Some(vr) = vr {
                        *vr = vr.wrapping_add(d);
                    }
                    if let Some(mv) = model.get_mut(k) {
                        *mv = mv.wrapping_add(d);
                    }
                }
            }
            OpI::SortKeys => {
                sut.sort_keys();
                let texts: Vec<String> = sut.keys().map(|k| k.to_string()).collect();
                prop_assert!(texts.windows(2).all(|w| w[0].as_bytes() <= w[1].as_bytes()));
            }
            OpI::SortByValue => {
                sut.sort_by(|(_, a), (_, b)| a.cmp(b));
                let vals: Vec<i32> = sut.values().copied().collect();
                prop_assert!(vals.windows(2).all(|w| w[0] <= w[1]));
            }
            OpI::Iterate => {
                let seen: Vec<MKey> = sut.keys().map(MKey::from_key).collect();
                let set: BTreeSet<MKey> = seen.iter().cloned().collect();
                prop_assert_eq!(set.len(), seen.len(), "each key iterated once");
                let m_keys: BTreeSet<MKey> = model.keys().cloned().collect();
                prop_assert_eq!(set, m_keys);
            }
        }

        // Post-conditions after each op.
        for &h in &stale {
            prop_assert!(h.value(&sut).is_none());
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.iter().count(), model.len());
        for (k, v) in &model {
            prop_assert_eq!(sut.get(k.as_key_ref()), Some(v));
        }
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// - `get` returns the most recent value for live keys and `None` otherwise.
// - Replacing inserts keep the entry handle; removals return the stored key.
// - Tracked iteration yields each live key exactly once, sorted or not.
// - Sorting never changes lookup results.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run(97, pool, ops)?;
    }
}

// Property: same invariants with a single bucket, so every key shares one
// chain and removal has to unlink from the head, middle and tail.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_single_chain((pool, ops) in arb_scenario()) {
        run(1, pool, ops)?;
    }
}
