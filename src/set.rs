use core::{fmt, ops::Bound};

use crate::{Comparator, Keys, Natural, RosewoodMap, SubMap, TreeMapError};

/// A sorted set of keys, backed by a [`RosewoodMap`] with unit values.
///
/// ```rust
/// use rosewood_map::RosewoodSet;
///
/// let mut set: RosewoodSet<u32> = [8, 3, 5].into_iter().collect();
///
/// assert_eq!(set.insert(4), Ok(true));
/// assert_eq!(set.insert(4), Ok(false));
/// assert_eq!(set.ceiling(&6), Ok(Some(&8)));
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5, 8]);
/// ```
pub struct RosewoodSet<K, C = Natural> {
    map: RosewoodMap<K, (), C>,
}

impl<K> RosewoodSet<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: RosewoodMap::new(),
        }
    }
}

impl<K, C> RosewoodSet<K, C> {
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            map: RosewoodMap::with_comparator(comparator),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Keys in ascending order.
    pub fn iter(&self) -> Keys<'_, K, (), C> {
        self.map.keys()
    }

    /// Smallest key.
    pub fn first(&self) -> Result<&K, TreeMapError> {
        self.map.first_key()
    }

    /// Largest key.
    pub fn last(&self) -> Result<&K, TreeMapError> {
        self.map.last_key()
    }
}

impl<K, C: Comparator<K>> RosewoodSet<K, C> {
    /// Adds `key`, returning whether it was newly inserted.
    pub fn insert(&mut self, key: K) -> Result<bool, TreeMapError> {
        Ok(self.map.put_if_absent(key, ())?.is_none())
    }

    pub fn contains(&self, key: &K) -> Result<bool, TreeMapError> {
        self.map.contains_key(key)
    }

    /// Removes `key`, returning whether it was present.
    pub fn remove(&mut self, key: &K) -> Result<bool, TreeMapError> {
        Ok(self.map.remove(key)?.is_some())
    }

    pub fn floor(&self, key: &K) -> Result<Option<&K>, TreeMapError> {
        self.map.floor_key(key)
    }

    pub fn ceiling(&self, key: &K) -> Result<Option<&K>, TreeMapError> {
        self.map.ceiling_key(key)
    }

    pub fn higher(&self, key: &K) -> Result<Option<&K>, TreeMapError> {
        self.map.higher_key(key)
    }

    pub fn lower(&self, key: &K) -> Result<Option<&K>, TreeMapError> {
        self.map.lower_key(key)
    }

    pub fn pop_first(&mut self) -> Option<K> {
        self.map.pop_first().map(|(key, ())| key)
    }

    pub fn pop_last(&mut self) -> Option<K> {
        self.map.pop_last().map(|(key, ())| key)
    }

    /// Live view of the keys between `lo` and `hi`.
    pub fn range(&self, lo: Bound<K>, hi: Bound<K>) -> Result<SubMap<'_, K, (), C>, TreeMapError> {
        self.map.range(lo, hi)
    }
}

impl<K> Default for RosewoodSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, C: Clone> Clone for RosewoodSet<K, C> {
    fn clone(&self) -> Self {
        Self { map: self.map.clone() }
    }
}

impl<K: fmt::Debug, C> fmt::Debug for RosewoodSet<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, C> PartialEq for RosewoodSet<K, C> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<K: Eq, C> Eq for RosewoodSet<K, C> {}

impl<K: Ord> FromIterator<K> for RosewoodSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().map(|key| (key, ())).collect(),
        }
    }
}

impl<'a, K, C> IntoIterator for &'a RosewoodSet<K, C> {
    type Item = &'a K;
    type IntoIter = Keys<'a, K, (), C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use core::ops::Bound;

    use crate::{RosewoodSet, TreeMapError};

    #[test]
    pub fn set_insert_and_remove() {
        let mut set = RosewoodSet::new();

        assert_eq!(set.insert(3), Ok(true));
        assert_eq!(set.insert(1), Ok(true));
        assert_eq!(set.insert(3), Ok(false));
        assert_eq!(set.len(), 2);

        assert_eq!(set.remove(&3), Ok(true));
        assert_eq!(set.remove(&3), Ok(false));
        assert_eq!(set.contains(&1), Ok(true));
    }

    #[test]
    pub fn set_navigation() {
        let set: RosewoodSet<i32> = [10, 20, 30].into_iter().collect();

        assert_eq!(set.first(), Ok(&10));
        assert_eq!(set.last(), Ok(&30));
        assert_eq!(set.floor(&25), Ok(Some(&20)));
        assert_eq!(set.ceiling(&25), Ok(Some(&30)));
        assert_eq!(set.higher(&30), Ok(None));
        assert_eq!(set.lower(&10), Ok(None));
    }

    #[test]
    pub fn set_pops_in_order() {
        let mut set: RosewoodSet<char> = "rosewood".chars().collect();

        assert_eq!(set.pop_first(), Some('d'));
        assert_eq!(set.pop_last(), Some('w'));
        assert_eq!(format!("{set:?}"), "{'e', 'o', 'r', 's'}");
    }

    #[test]
    pub fn set_range() {
        let set: RosewoodSet<u8> = (0..10).collect();
        let view = set.range(Bound::Excluded(2), Bound::Included(5)).unwrap();

        assert_eq!(view.keys().unwrap().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
    }

    #[test]
    pub fn empty_set_has_no_first() {
        let set = RosewoodSet::<u8>::new();

        assert_eq!(set.first(), Err(TreeMapError::EmptyCollection));
    }
}
