//! Model-based tests: a random operation sequence is applied to both the
//! coalesced map and `std::collections::HashMap`, with the std map adjusted
//! to the insert-if-absent contract, and the observable behavior of every
//! operation must agree.

use std::collections::HashMap as ModelMap;

use coalesced_hash::HashMap;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(u8, u32),
    Remove(u8),
    Get(u8),
    EntryOrInsert(u8, u32),
    Clear,
}

// Keys are drawn from a small domain so sequences revisit keys often,
// exercising duplicate inserts, re-removals, and tombstone reuse paths.
fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        8 => (any::<u8>(), any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        4 => any::<u8>().prop_map(Op::Remove),
        4 => any::<u8>().prop_map(Op::Get),
        2 => (any::<u8>(), any::<u32>()).prop_map(|(k, v)| Op::EntryOrInsert(k, v)),
        1 => Just(Op::Clear),
    ]
}

proptest! {
    #[test]
    fn behaves_like_first_wins_model(ops in prop::collection::vec(op_strategy(), 0..512)) {
        let mut map: HashMap<u8, u32> = HashMap::new();
        let mut model: ModelMap<u8, u32> = ModelMap::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    let inserted = map.insert(k, v);
                    prop_assert_eq!(inserted, !model.contains_key(&k));
                    model.entry(k).or_insert(v);
                }
                Op::Remove(k) => {
                    prop_assert_eq!(map.remove(&k), model.remove(&k));
                }
                Op::Get(k) => {
                    prop_assert_eq!(map.get(&k), model.get(&k));
                    prop_assert_eq!(map.contains_key(&k), model.contains_key(&k));
                }
                Op::EntryOrInsert(k, v) => {
                    let got = *map.entry(k).or_insert(v);
                    let expected = *model.entry(k).or_insert(v);
                    prop_assert_eq!(got, expected);
                }
                Op::Clear => {
                    map.clear();
                    model.clear();
                }
            }
            prop_assert_eq!(map.len(), model.len());
        }

        let mut seen: Vec<(u8, u32)> = map.iter().map(|(&k, &v)| (k, v)).collect();
        let mut expected: Vec<(u8, u32)> = model.iter().map(|(&k, &v)| (k, v)).collect();
        seen.sort_unstable();
        expected.sort_unstable();
        prop_assert_eq!(seen, expected);
    }

    // Wider key domain so sequences push the map through several rehashes
    // while the model comparison still holds.
    #[test]
    fn growth_preserves_contents(keys in prop::collection::vec(any::<u16>(), 0..4_000)) {
        let mut map: HashMap<u16, usize> = HashMap::new();
        let mut model: ModelMap<u16, usize> = ModelMap::new();

        for (i, key) in keys.iter().copied().enumerate() {
            let inserted = map.insert(key, i);
            prop_assert_eq!(inserted, !model.contains_key(&key));
            model.entry(key).or_insert(i);
        }

        prop_assert_eq!(map.len(), model.len());
        for (key, value) in &model {
            prop_assert_eq!(map.get(key), Some(value));
        }
    }

    #[test]
    fn drain_yields_every_entry_once(keys in prop::collection::vec(any::<u16>(), 0..1_000)) {
        let mut map: HashMap<u16, u16> = HashMap::new();
        let mut model: ModelMap<u16, u16> = ModelMap::new();

        for key in keys {
            map.insert(key, key);
            model.entry(key).or_insert(key);
        }

        let mut drained: Vec<(u16, u16)> = map.drain().collect();
        let mut expected: Vec<(u16, u16)> = model.into_iter().collect();
        drained.sort_unstable();
        expected.sort_unstable();

        prop_assert_eq!(drained, expected);
        prop_assert!(map.is_empty());
    }
}
