use core::fmt;

use alloc::vec::Vec;

use crate::{Comparator, Natural, RosewoodMap, Search, TreeMapError};

impl<K, V, C: Comparator<K>> RosewoodMap<K, V, C> {
    /// Inserts `value` only if `key` is absent.
    ///
    /// Returns the value already stored under `key`, in which case `value` is dropped.
    pub fn put_if_absent(&mut self, key: K, value: V) -> Result<Option<&V>, TreeMapError> {
        match self.search(&key)? {
            Search::Found(idx) => Ok(Some(&self.node(idx).value)),
            Search::Vacant(parent, side) => {
                self.insert_leaf(parent, side, key, value);
                Ok(None)
            }
        }
    }

    /// Replaces the value of an existing key, returning the previous value.
    /// Absent keys are left absent.
    pub fn replace(&mut self, key: &K, value: V) -> Result<Option<V>, TreeMapError> {
        Ok(self.get_mut(key)?.map(|slot| core::mem::replace(slot, value)))
    }

    /// Replaces the value of `key` only if it currently equals `expected`.
    pub fn replace_if(&mut self, key: &K, expected: &V, value: V) -> Result<bool, TreeMapError>
    where
        V: PartialEq,
    {
        match self.get_mut(key)? {
            Some(slot) if *slot == *expected => {
                *slot = value;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Recomputes the mapping of `key` from its current value (if any).
    ///
    /// Returning `None` from `remap` removes the mapping, or leaves the key absent.
    /// Returns the value now stored under `key`.
    pub fn compute<F>(&mut self, key: K, remap: F) -> Result<Option<&V>, TreeMapError>
    where
        F: FnOnce(&K, Option<&V>) -> Option<V>,
    {
        match self.search(&key)? {
            Search::Found(idx) => {
                let node = self.node(idx);

                match remap(&node.key, Some(&node.value)) {
                    Some(value) => {
                        self.node_mut(idx).value = value;
                        Ok(Some(&self.node(idx).value))
                    }
                    None => {
                        self.delete_node(idx);
                        Ok(None)
                    }
                }
            }
            Search::Vacant(parent, side) => match remap(&key, None) {
                Some(value) => {
                    let idx = self.insert_leaf(parent, side, key, value);
                    Ok(Some(&self.node(idx).value))
                }
                None => Ok(None),
            },
        }
    }

    /// Inserts the value produced by `make` if `key` is absent.
    pub fn compute_if_absent<F>(&mut self, key: K, make: F) -> Result<Option<&V>, TreeMapError>
    where
        F: FnOnce(&K) -> Option<V>,
    {
        match self.search(&key)? {
            Search::Found(idx) => Ok(Some(&self.node(idx).value)),
            Search::Vacant(parent, side) => match make(&key) {
                Some(value) => {
                    let idx = self.insert_leaf(parent, side, key, value);
                    Ok(Some(&self.node(idx).value))
                }
                None => Ok(None),
            },
        }
    }

    /// Recomputes the value of `key` if it is present; `None` removes the mapping.
    pub fn compute_if_present<F>(&mut self, key: &K, remap: F) -> Result<Option<&V>, TreeMapError>
    where
        F: FnOnce(&K, &V) -> Option<V>,
    {
        let idx = self.find_node(key)?;
        if idx.is_nil() {
            return Ok(None);
        }

        let node = self.node(idx);
        match remap(&node.key, &node.value) {
            Some(value) => {
                self.node_mut(idx).value = value;
                Ok(Some(&self.node(idx).value))
            }
            None => {
                self.delete_node(idx);
                Ok(None)
            }
        }
    }

    /// Stores `value` if `key` is absent, otherwise combines it with the current value.
    /// A `None` from `combine` removes the mapping.
    pub fn merge<F>(&mut self, key: K, value: V, combine: F) -> Result<Option<&V>, TreeMapError>
    where
        F: FnOnce(&V, V) -> Option<V>,
    {
        match self.search(&key)? {
            Search::Found(idx) => match combine(&self.node(idx).value, value) {
                Some(merged) => {
                    self.node_mut(idx).value = merged;
                    Ok(Some(&self.node(idx).value))
                }
                None => {
                    self.delete_node(idx);
                    Ok(None)
                }
            },
            Search::Vacant(parent, side) => {
                let idx = self.insert_leaf(parent, side, key, value);
                Ok(Some(&self.node(idx).value))
            }
        }
    }

    /// Puts every entry of `entries`.
    ///
    /// When the map is empty and the entries arrive in strictly ascending key order,
    /// the tree is built in linear time. Otherwise the entries are put one by one, and
    /// on error the ones before the failing key stay in the map.
    pub fn put_all<I>(&mut self, entries: I) -> Result<(), TreeMapError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let entries: Vec<(K, V)> = entries.into_iter().collect();

        if self.is_empty() && !entries.is_empty() && self.is_strictly_ascending(&entries)? {
            tracing::trace!(count = entries.len(), "bulk loading sorted entries");

            self.reserve(entries.len());
            self.fill_from_sorted(entries);
            self.version = self.version.wrapping_add(1);

            return Ok(());
        }

        for (key, value) in entries {
            self.put(key, value)?;
        }

        Ok(())
    }

    /// Removes and returns the entry with the smallest key.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let idx = self.first_node();
        if idx.is_nil() {
            return None;
        }

        let removed = self.delete_node(idx);
        Some((removed.key, removed.value))
    }

    /// Removes and returns the entry with the largest key.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let idx = self.last_node();
        if idx.is_nil() {
            return None;
        }

        let removed = self.delete_node(idx);
        Some((removed.key, removed.value))
    }
}

impl<K, V, C> RosewoodMap<K, V, C> {
    /// Whether some key maps to `value`. Linear in the map's size.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|candidate| candidate == value)
    }

    /// Replaces every value with `rewrite(key, value)`, in ascending key order.
    pub fn replace_all<F>(&mut self, mut rewrite: F)
    where
        F: FnMut(&K, &V) -> V,
    {
        for idx in self.in_order() {
            let node = self.node(idx);
            let value = rewrite(&node.key, &node.value);
            self.node_mut(idx).value = value;
        }
    }

    /// Keeps only the entries for which `keep` returns `true`, visiting them in
    /// ascending key order.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut idx = self.first_node();

        while !idx.is_nil() {
            let next = self.successor(idx);
            let node = self.node_mut(idx);

            idx = if keep(&node.key, &mut node.value) {
                next
            } else {
                self.delete_node(idx).retarget(next)
            };
        }
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for RosewoodMap<K, V, C> {
    fn clone(&self) -> Self {
        let entries = self.iter().map(|(key, value)| (key.clone(), value.clone()));

        Self::from_sorted_trusted(entries, self.comparator.clone())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for RosewoodMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for RosewoodMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for RosewoodMap<K, V, C> {}

impl<K: Ord, V> FromIterator<(K, V)> for RosewoodMap<K, V, Natural> {
    /// Collects entries in any order. For duplicate keys the last value wins.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut entries: Vec<(K, V)> = iter.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut unique: Vec<(K, V)> = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            match unique.last_mut() {
                Some(last) if last.0 == key => last.1 = value,
                _ => unique.push((key, value)),
            }
        }

        Self::from_sorted_trusted(unique, Natural)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Natural, RosewoodMap, TreeMapError};

    #[test]
    pub fn map_entry_multi_insertion() {
        let mut map = RosewoodMap::<usize, usize>::new();

        map.put(3, 17).unwrap();
        map.put(2, 12).unwrap();
        map.put(1, 7).unwrap();

        assert_eq!(map.contains_key(&2), Ok(true));
        assert_eq!(map.contains_key(&1), Ok(true));
        assert_eq!(map.contains_key(&3), Ok(true));

        assert_eq!(map.put_if_absent(3, 19), Ok(Some(&17)));
        assert_eq!(map.get(&3), Ok(Some(&17)));
        assert_eq!(map.put_if_absent(4, 19), Ok(None));
        assert_eq!(map.get(&4), Ok(Some(&19)));
    }

    #[test]
    pub fn map_update_entry() {
        let mut map = RosewoodMap::<usize, usize>::new();

        map.put(3, 17).unwrap();
        assert_eq!(map.replace(&3, 5), Ok(Some(17)));
        assert_eq!(map.replace(&4, 5), Ok(None));

        assert_eq!(map.get(&3), Ok(Some(&5)));
        assert_eq!(map.contains_key(&4), Ok(false));
    }

    #[test]
    pub fn conditional_replace() {
        let mut map: RosewoodMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();

        assert_eq!(map.replace_if(&"a", &2, 10), Ok(false));
        assert_eq!(map.replace_if(&"a", &1, 10), Ok(true));
        assert_eq!(map.replace_if(&"z", &1, 10), Ok(false));
        assert_eq!(map.get(&"a"), Ok(Some(&10)));
    }

    #[test]
    pub fn compute_inserts_updates_and_removes() {
        let mut map = RosewoodMap::<u8, u32>::new();

        assert_eq!(map.compute(1, |_, old| Some(old.copied().unwrap_or(0) + 1)), Ok(Some(&1)));
        assert_eq!(map.compute(1, |_, old| Some(old.copied().unwrap_or(0) + 1)), Ok(Some(&2)));
        assert_eq!(map.compute(2, |_, _| None), Ok(None));
        assert_eq!(map.len(), 1);

        assert_eq!(map.compute(1, |_, _| None), Ok(None));
        assert!(map.is_empty());
    }

    #[test]
    pub fn compute_if_absent_and_present() {
        let mut map = RosewoodMap::<u8, String>::new();

        assert_eq!(
            map.compute_if_absent(7, |key| Some(key.to_string())).unwrap().map(String::as_str),
            Some("7")
        );
        assert_eq!(
            map.compute_if_absent(7, |_| Some("other".into())).unwrap().map(String::as_str),
            Some("7")
        );
        assert_eq!(map.compute_if_absent(8, |_| None), Ok(None));

        assert_eq!(
            map.compute_if_present(&7, |_, old| Some(format!("{old}!")))
                .unwrap()
                .map(String::as_str),
            Some("7!")
        );
        assert_eq!(map.compute_if_present(&8, |_, _| Some(String::new())), Ok(None));
        assert_eq!(map.compute_if_present(&7, |_, _| None), Ok(None));
        assert!(map.is_empty());
    }

    #[test]
    pub fn merge_combines_values() {
        let mut map = RosewoodMap::<char, u32>::new();

        for letter in "abracadabra".chars() {
            map.merge(letter, 1, |count, one| Some(count + one)).unwrap();
        }

        assert_eq!(map.get(&'a'), Ok(Some(&5)));
        assert_eq!(map.get(&'r'), Ok(Some(&2)));

        assert_eq!(map.merge('a', 0, |_, _| None), Ok(None));
        assert_eq!(map.keys().copied().collect::<String>(), "bcdr");
    }

    #[test]
    pub fn put_all_on_empty_map_bumps_version_once() {
        let mut map = RosewoodMap::<u32, u32>::new();

        map.put_all((0..100).map(|k| (k, k))).unwrap();

        assert_eq!(map.len(), 100);
        assert_eq!(map.version(), 1);
        assert!(map.check_invariants().is_ok());
    }

    #[test]
    pub fn put_all_falls_back_to_puts() {
        let mut map = RosewoodMap::<u32, u32>::new();

        map.put_all([(3, 0), (1, 0), (2, 0), (1, 1)]).unwrap();

        assert_eq!(map.len(), 3);
        assert_eq!(map.get(&1), Ok(Some(&1)));
        assert!(map.check_invariants().is_ok());

        map.put_all([(10, 10), (11, 11)]).unwrap();
        assert_eq!(map.len(), 5);
    }

    #[test]
    pub fn pop_from_both_ends() {
        let mut map: RosewoodMap<i32, i32> = (1..=4).map(|k| (k, -k)).collect();

        assert_eq!(map.pop_first(), Some((1, -1)));
        assert_eq!(map.pop_last(), Some((4, -4)));
        assert_eq!(map.pop_last(), Some((3, -3)));
        assert_eq!(map.pop_first(), Some((2, -2)));
        assert_eq!(map.pop_first(), None);
    }

    #[test]
    pub fn replace_all_and_contains_value() {
        let mut map: RosewoodMap<i32, i32> = (1..=5).map(|k| (k, k)).collect();

        map.replace_all(|key, value| key * 100 + value);

        assert!(map.contains_value(&303));
        assert!(!map.contains_value(&3));
        assert_eq!(map.values().copied().collect::<Vec<_>>(), vec![101, 202, 303, 404, 505]);
    }

    #[test]
    pub fn retain_keeps_tree_valid() {
        let mut map: RosewoodMap<u32, u32> = (0..64).map(|k| (k, 0)).collect();

        map.retain(|key, value| {
            *value = key * 2;
            key % 5 != 0
        });

        assert_eq!(map.len(), 51);
        assert_eq!(map.get(&5), Ok(None));
        assert_eq!(map.get(&6), Ok(Some(&12)));
        assert!(map.check_invariants().is_ok());
        assert!(map.keys().all(|key| key % 5 != 0));
    }

    #[test]
    pub fn collect_keeps_last_duplicate() {
        let map: RosewoodMap<i32, &str> =
            [(2, "b"), (1, "a"), (2, "B"), (0, "z")].into_iter().collect();

        assert_eq!(map.len(), 3);
        assert_eq!(map.get(&2), Ok(Some(&"B")));
        assert!(map.check_invariants().is_ok());
    }

    #[test]
    pub fn clone_and_equality() {
        let map: RosewoodMap<i32, i32> = (0..33).map(|k| (k, k * k)).collect();
        let mut copy = map.clone();

        assert_eq!(copy, map);
        assert!(copy.check_invariants().is_ok());

        copy.put(3, 0).unwrap();
        assert_ne!(copy, map);
        assert_eq!(map.get(&3), Ok(Some(&9)));
    }

    #[test]
    pub fn debug_lists_entries_in_order() {
        let map: RosewoodMap<i32, char> = [(2, 'b'), (1, 'a')].into_iter().collect();

        assert_eq!(format!("{map:?}"), "{1: 'a', 2: 'b'}");
    }

    #[test]
    pub fn custom_comparator_orders_keys() {
        let mut map = RosewoodMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));

        map.put_all([(1, ()), (5, ()), (3, ())]).unwrap();

        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![5, 3, 1]);
        assert_eq!(map.first_key(), Ok(&5));
    }

    #[test]
    pub fn rejected_key_leaves_map_untouched() {
        let mut map = RosewoodMap::with_comparator(crate::Partial);

        assert_eq!(map.put(f64::NAN, 1), Err(TreeMapError::InvalidKey));
        assert!(map.is_empty());

        map.put(1.0, 1).unwrap();
        assert_eq!(map.compute(f64::NAN, |_, _| Some(2)), Err(TreeMapError::InvalidKey));
        assert_eq!(map.len(), 1);
        assert_eq!(map.version(), 1);
    }

    #[test]
    pub fn default_map_is_empty() {
        let map: RosewoodMap<u8, u8, Natural> = RosewoodMap::default();

        assert!(map.is_empty());
        assert_eq!(map.first_entry(), None);
    }
}
