//! Property-based tests for RosewoodMap, checked against `BTreeMap` as a model.

use std::collections::BTreeMap;
use std::ops::Bound;

use proptest::prelude::*;
use rosewood_map::{Natural, RosewoodMap};

#[derive(Debug, Clone)]
enum Op {
    Put(i16, i32),
    Remove(i16),
    PopFirst,
    PopLast,
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (any::<i16>(), any::<i32>()).prop_map(|(key, value)| Op::Put(key % 256, value)),
        3 => any::<i16>().prop_map(|key| Op::Remove(key % 256)),
        1 => Just(Op::PopFirst),
        1 => Just(Op::PopLast),
    ]
}

fn arbitrary_map(max_size: usize) -> impl Strategy<Value = RosewoodMap<i32, i32>> {
    prop::collection::vec((any::<i32>(), any::<i32>()), 0..max_size)
        .prop_map(|entries| entries.into_iter().collect::<RosewoodMap<i32, i32>>())
}

proptest! {
    #[test]
    fn prop_operations_match_model(ops in prop::collection::vec(arbitrary_op(), 0..300)) {
        let mut map = RosewoodMap::new();
        let mut model = BTreeMap::new();

        for op in ops {
            match op {
                Op::Put(key, value) => {
                    prop_assert_eq!(map.put(key, value).unwrap(), model.insert(key, value));
                }
                Op::Remove(key) => {
                    prop_assert_eq!(map.remove(&key).unwrap(), model.remove(&key));
                }
                Op::PopFirst => {
                    prop_assert_eq!(map.pop_first(), model.pop_first());
                }
                Op::PopLast => {
                    prop_assert_eq!(map.pop_last(), model.pop_last());
                }
            }

            prop_assert!(map.check_invariants().is_ok());
        }

        prop_assert_eq!(map.len(), model.len());
        prop_assert!(map.iter().eq(model.iter()));
    }

    #[test]
    fn prop_inorder_is_strictly_ascending(map in arbitrary_map(200)) {
        let keys: Vec<i32> = map.keys().copied().collect();

        prop_assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert_eq!(keys.len(), map.len());
    }

    #[test]
    fn prop_get_after_put(map in arbitrary_map(50), key: i32, value: i32) {
        let mut map = map;
        map.put(key, value).unwrap();

        prop_assert_eq!(map.get(&key), Ok(Some(&value)));
    }

    #[test]
    fn prop_removing_everything_empties(
        keys in prop::collection::vec(any::<u16>(), 0..200),
        seed: u64,
    ) {
        let mut map: RosewoodMap<u16, ()> = keys.iter().map(|&key| (key, ())).collect();
        let mut order: Vec<u16> = map.keys().copied().collect();

        let len = order.len();
        if len > 1 {
            for i in 0..len {
                let j = (seed as usize).wrapping_mul(i + 7) % len;
                order.swap(i, j);
            }
        }

        for key in order {
            prop_assert_eq!(map.remove(&key), Ok(Some(())));
            prop_assert!(map.check_invariants().is_ok());
        }

        prop_assert!(map.is_empty());
    }

    #[test]
    fn prop_bulk_build_is_valid(count in 0usize..2000) {
        let map =
            RosewoodMap::build_from_sorted(count, (0..count).map(|k| (k, ())), Natural).unwrap();

        prop_assert!(map.check_invariants().is_ok());
        prop_assert!(map.keys().copied().eq(0..count));
    }

    #[test]
    fn prop_navigation_matches_model(map in arbitrary_map(100), needle: i32) {
        let model: BTreeMap<i32, i32> = map.iter().map(|(&k, &v)| (k, v)).collect();

        prop_assert_eq!(
            map.floor_key(&needle).unwrap(),
            model.range(..=needle).next_back().map(|(k, _)| k)
        );
        prop_assert_eq!(
            map.lower_key(&needle).unwrap(),
            model.range(..needle).next_back().map(|(k, _)| k)
        );
        prop_assert_eq!(
            map.ceiling_key(&needle).unwrap(),
            model.range(needle..).next().map(|(k, _)| k)
        );
        prop_assert_eq!(
            map.higher_key(&needle).unwrap(),
            model.range((Bound::Excluded(needle), Bound::Unbounded)).next().map(|(k, _)| k)
        );
    }

    #[test]
    fn prop_views_match_model_ranges(
        map in arbitrary_map(100),
        a: i32,
        b: i32,
        lo_inclusive: bool,
        hi_inclusive: bool,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let lo_bound = if lo_inclusive { Bound::Included(lo) } else { Bound::Excluded(lo) };
        let hi_bound = if hi_inclusive { Bound::Included(hi) } else { Bound::Excluded(hi) };
        prop_assume!(!(lo == hi && !(lo_inclusive && hi_inclusive)));

        let model: BTreeMap<i32, i32> = map.iter().map(|(&k, &v)| (k, v)).collect();
        let expected: Vec<i32> = model.range((lo_bound, hi_bound)).map(|(&k, _)| k).collect();

        let view = map.sub_map(lo, lo_inclusive, hi, hi_inclusive).unwrap();
        let ascending: Vec<i32> = view.keys().unwrap().copied().collect();
        let descending: Vec<i32> = view.descending_map().keys().unwrap().copied().collect();

        prop_assert_eq!(&ascending, &expected);
        prop_assert!(descending.iter().eq(expected.iter().rev()));
        prop_assert_eq!(view.len(), Ok(expected.len()));
    }

    #[test]
    fn prop_clone_is_equal_and_valid(map in arbitrary_map(150)) {
        let copy = map.clone();

        prop_assert!(copy.check_invariants().is_ok());
        prop_assert_eq!(copy, map);
    }
}
