//! Bounded, directed views over a map.
//!
//! A view is a pair of optional bounds plus a [`Direction`]. Every query is answered by
//! the backing map's own navigation, filtered through the bounds and then re-expressed
//! in the view's direction: a descending view's first entry is the highest entry the
//! bounds admit. Views borrow the map and never copy entries.

use core::{cmp::Ordering, ops::Bound};

use crate::{Comparator, Cursor, Iter, Keys, Natural, NodeIndex, RosewoodMap, TreeMapError, Values};

/// Order in which a view or cursor visits keys.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    #[must_use]
    pub fn reverse(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

fn bound_of<K>(key: K, inclusive: bool) -> Bound<K> {
    if inclusive {
        Bound::Included(key)
    } else {
        Bound::Excluded(key)
    }
}

fn bound_key<K>(bound: &Bound<K>) -> Option<&K> {
    match bound {
        Bound::Included(key) | Bound::Excluded(key) => Some(key),
        Bound::Unbounded => None,
    }
}

/// Absolute bounds (always expressed in the comparator's order) and a direction.
#[derive(Debug, Clone)]
pub(crate) struct Bounds<K> {
    lo: Bound<K>,
    hi: Bound<K>,
    direction: Direction,
}

impl<K> Bounds<K> {
    pub(crate) fn unbounded(direction: Direction) -> Self {
        Self {
            lo: Bound::Unbounded,
            hi: Bound::Unbounded,
            direction,
        }
    }

    /// Checks that both bounds can be ordered and that `lo <= hi`.
    pub(crate) fn new<V, C: Comparator<K>>(
        lo: Bound<K>,
        hi: Bound<K>,
        direction: Direction,
        map: &RosewoodMap<K, V, C>,
    ) -> Result<Self, TreeMapError> {
        match (bound_key(&lo), bound_key(&hi)) {
            (Some(lo_key), Some(hi_key)) => {
                if map.comparator.compare(lo_key, hi_key)? == Ordering::Greater {
                    return Err(TreeMapError::InvalidRange);
                }
            }
            (Some(key), None) | (None, Some(key)) => {
                map.comparator.compare(key, key)?;
            }
            (None, None) => {}
        }

        Ok(Self { lo, hi, direction })
    }

    fn is_unbounded(&self) -> bool {
        matches!((&self.lo, &self.hi), (Bound::Unbounded, Bound::Unbounded))
    }

    fn too_low<V, C: Comparator<K>>(
        &self,
        key: &K,
        map: &RosewoodMap<K, V, C>,
    ) -> Result<bool, TreeMapError> {
        Ok(match &self.lo {
            Bound::Unbounded => false,
            Bound::Included(lo) => map.comparator.compare(key, lo)? == Ordering::Less,
            Bound::Excluded(lo) => map.comparator.compare(key, lo)? != Ordering::Greater,
        })
    }

    fn too_high<V, C: Comparator<K>>(
        &self,
        key: &K,
        map: &RosewoodMap<K, V, C>,
    ) -> Result<bool, TreeMapError> {
        Ok(match &self.hi {
            Bound::Unbounded => false,
            Bound::Included(hi) => map.comparator.compare(key, hi)? == Ordering::Greater,
            Bound::Excluded(hi) => map.comparator.compare(key, hi)? != Ordering::Less,
        })
    }

    fn in_range<V, C: Comparator<K>>(
        &self,
        key: &K,
        map: &RosewoodMap<K, V, C>,
    ) -> Result<bool, TreeMapError> {
        Ok(!self.too_low(key, map)? && !self.too_high(key, map)?)
    }

    /// Like [`in_range`](Self::in_range), but treating both bounds as inclusive.
    fn in_closed_range<V, C: Comparator<K>>(
        &self,
        key: &K,
        map: &RosewoodMap<K, V, C>,
    ) -> Result<bool, TreeMapError> {
        if let Some(lo) = bound_key(&self.lo) {
            if map.comparator.compare(key, lo)? == Ordering::Less {
                return Ok(false);
            }
        }

        if let Some(hi) = bound_key(&self.hi) {
            if map.comparator.compare(key, hi)? == Ordering::Greater {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Whether a narrowed view may use `key` as a bound.
    fn admits_bound<V, C: Comparator<K>>(
        &self,
        key: &K,
        inclusive: bool,
        map: &RosewoodMap<K, V, C>,
    ) -> Result<bool, TreeMapError> {
        if inclusive {
            self.in_range(key, map)
        } else {
            self.in_closed_range(key, map)
        }
    }

    fn within_high<V, C: Comparator<K>>(
        &self,
        idx: NodeIndex,
        map: &RosewoodMap<K, V, C>,
    ) -> Result<NodeIndex, TreeMapError> {
        if idx.is_nil() || self.too_high(&map.node(idx).key, map)? {
            return Ok(NodeIndex::BLACK_NIL);
        }

        Ok(idx)
    }

    fn within_low<V, C: Comparator<K>>(
        &self,
        idx: NodeIndex,
        map: &RosewoodMap<K, V, C>,
    ) -> Result<NodeIndex, TreeMapError> {
        if idx.is_nil() || self.too_low(&map.node(idx).key, map)? {
            return Ok(NodeIndex::BLACK_NIL);
        }

        Ok(idx)
    }

    fn abs_lowest<V, C: Comparator<K>>(
        &self,
        map: &RosewoodMap<K, V, C>,
    ) -> Result<NodeIndex, TreeMapError> {
        let idx = match &self.lo {
            Bound::Unbounded => map.first_node(),
            Bound::Included(lo) => map.ceiling_node(lo, true)?,
            Bound::Excluded(lo) => map.ceiling_node(lo, false)?,
        };

        self.within_high(idx, map)
    }

    fn abs_highest<V, C: Comparator<K>>(
        &self,
        map: &RosewoodMap<K, V, C>,
    ) -> Result<NodeIndex, TreeMapError> {
        let idx = match &self.hi {
            Bound::Unbounded => map.last_node(),
            Bound::Included(hi) => map.floor_node(hi, true)?,
            Bound::Excluded(hi) => map.floor_node(hi, false)?,
        };

        self.within_low(idx, map)
    }

    fn abs_ceiling<V, C: Comparator<K>>(
        &self,
        key: &K,
        inclusive: bool,
        map: &RosewoodMap<K, V, C>,
    ) -> Result<NodeIndex, TreeMapError> {
        if self.too_low(key, map)? {
            return self.abs_lowest(map);
        }

        self.within_high(map.ceiling_node(key, inclusive)?, map)
    }

    fn abs_floor<V, C: Comparator<K>>(
        &self,
        key: &K,
        inclusive: bool,
        map: &RosewoodMap<K, V, C>,
    ) -> Result<NodeIndex, TreeMapError> {
        if self.too_high(key, map)? {
            return self.abs_highest(map);
        }

        self.within_low(map.floor_node(key, inclusive)?, map)
    }

    /// First node past the upper bound, where ascending traversal stops.
    fn abs_high_fence<V, C: Comparator<K>>(
        &self,
        map: &RosewoodMap<K, V, C>,
    ) -> Result<NodeIndex, TreeMapError> {
        match &self.hi {
            Bound::Unbounded => Ok(NodeIndex::BLACK_NIL),
            Bound::Included(hi) => map.ceiling_node(hi, false),
            Bound::Excluded(hi) => map.ceiling_node(hi, true),
        }
    }

    /// First node below the lower bound, where descending traversal stops.
    fn abs_low_fence<V, C: Comparator<K>>(
        &self,
        map: &RosewoodMap<K, V, C>,
    ) -> Result<NodeIndex, TreeMapError> {
        match &self.lo {
            Bound::Unbounded => Ok(NodeIndex::BLACK_NIL),
            Bound::Included(lo) => map.floor_node(lo, false),
            Bound::Excluded(lo) => map.floor_node(lo, true),
        }
    }

    pub(crate) fn lowest<V, C: Comparator<K>>(
        &self,
        map: &RosewoodMap<K, V, C>,
    ) -> Result<NodeIndex, TreeMapError> {
        match self.direction {
            Direction::Ascending => self.abs_lowest(map),
            Direction::Descending => self.abs_highest(map),
        }
    }

    pub(crate) fn highest<V, C: Comparator<K>>(
        &self,
        map: &RosewoodMap<K, V, C>,
    ) -> Result<NodeIndex, TreeMapError> {
        match self.direction {
            Direction::Ascending => self.abs_highest(map),
            Direction::Descending => self.abs_lowest(map),
        }
    }

    /// Nearest node at or after `key` in the view's direction.
    fn ceiling<V, C: Comparator<K>>(
        &self,
        key: &K,
        inclusive: bool,
        map: &RosewoodMap<K, V, C>,
    ) -> Result<NodeIndex, TreeMapError> {
        match self.direction {
            Direction::Ascending => self.abs_ceiling(key, inclusive, map),
            Direction::Descending => self.abs_floor(key, inclusive, map),
        }
    }

    /// Nearest node at or before `key` in the view's direction.
    fn floor<V, C: Comparator<K>>(
        &self,
        key: &K,
        inclusive: bool,
        map: &RosewoodMap<K, V, C>,
    ) -> Result<NodeIndex, TreeMapError> {
        match self.direction {
            Direction::Ascending => self.abs_floor(key, inclusive, map),
            Direction::Descending => self.abs_ceiling(key, inclusive, map),
        }
    }

    fn fence<V, C: Comparator<K>>(
        &self,
        map: &RosewoodMap<K, V, C>,
    ) -> Result<NodeIndex, TreeMapError> {
        match self.direction {
            Direction::Ascending => self.abs_high_fence(map),
            Direction::Descending => self.abs_low_fence(map),
        }
    }

    /// Bounds of a narrower view. `from` and `to` are given in this view's direction;
    /// `None` keeps the current bound on that side.
    fn narrow<V, C: Comparator<K>>(
        &self,
        from: Option<(K, bool)>,
        to: Option<(K, bool)>,
        map: &RosewoodMap<K, V, C>,
    ) -> Result<Self, TreeMapError>
    where
        K: Clone,
    {
        for (key, inclusive) in from.iter().chain(to.iter()) {
            if !self.admits_bound(key, *inclusive, map)? {
                return Err(TreeMapError::OutOfRange);
            }
        }

        let (lower, upper) = match self.direction {
            Direction::Ascending => (from, to),
            Direction::Descending => (to, from),
        };

        let lo = match lower {
            Some((key, inclusive)) => bound_of(key, inclusive),
            None => self.lo.as_ref().cloned(),
        };
        let hi = match upper {
            Some((key, inclusive)) => bound_of(key, inclusive),
            None => self.hi.as_ref().cloned(),
        };

        Self::new(lo, hi, self.direction, map)
    }

    fn reversed(&self) -> Self
    where
        K: Clone,
    {
        Self {
            lo: self.lo.as_ref().cloned(),
            hi: self.hi.as_ref().cloned(),
            direction: self.direction.reverse(),
        }
    }

    fn iter<'m, V, C: Comparator<K>>(
        &self,
        map: &'m RosewoodMap<K, V, C>,
    ) -> Result<Iter<'m, K, V, C>, TreeMapError> {
        let remaining = self.is_unbounded().then(|| map.len());

        Ok(Iter::new(
            map,
            self.lowest(map)?,
            self.highest(map)?,
            self.direction,
            remaining,
        ))
    }

    fn cursor<V, C: Comparator<K>>(
        &self,
        map: &RosewoodMap<K, V, C>,
    ) -> Result<Cursor, TreeMapError> {
        Ok(Cursor::new(
            self.lowest(map)?,
            self.fence(map)?,
            map.version(),
            self.direction,
        ))
    }

    fn get<'m, V, C: Comparator<K>>(
        &self,
        key: &K,
        map: &'m RosewoodMap<K, V, C>,
    ) -> Result<Option<&'m V>, TreeMapError> {
        if !self.in_range(key, map)? {
            return Ok(None);
        }

        map.get(key)
    }
}

/// A shared, live view of the entries of a map lying within some bounds.
///
/// Created by [`RosewoodMap::range`], [`RosewoodMap::head_map`] and friends.
///
/// ```rust
/// use rosewood_map::RosewoodMap;
///
/// let map: RosewoodMap<i32, ()> = (1..=6).map(|k| (k, ())).collect();
/// let view = map.sub_map(2, true, 5, false).unwrap();
///
/// assert_eq!(view.keys().unwrap().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
/// assert_eq!(view.last_key(), Ok(&4));
/// ```
pub struct SubMap<'a, K, V, C = Natural> {
    map: &'a RosewoodMap<K, V, C>,
    bounds: Bounds<K>,
}

/// An exclusive, live view of the entries of a map lying within some bounds.
///
/// Insertions through the view are checked against its bounds.
pub struct SubMapMut<'a, K, V, C = Natural> {
    map: &'a mut RosewoodMap<K, V, C>,
    bounds: Bounds<K>,
}

impl<'a, K, V, C: Comparator<K>> SubMap<'a, K, V, C> {
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.bounds.direction
    }

    pub fn get(&self, key: &K) -> Result<Option<&'a V>, TreeMapError> {
        self.bounds.get(key, self.map)
    }

    pub fn contains_key(&self, key: &K) -> Result<bool, TreeMapError> {
        Ok(self.get(key)?.is_some())
    }

    /// Number of entries within the bounds. Linear in that number.
    pub fn len(&self) -> Result<usize, TreeMapError> {
        Ok(self.iter()?.count())
    }

    pub fn is_empty(&self) -> Result<bool, TreeMapError> {
        Ok(self.bounds.lowest(self.map)?.is_nil())
    }

    pub fn first_entry(&self) -> Result<Option<(&'a K, &'a V)>, TreeMapError> {
        Ok(self.map.entry_at(self.bounds.lowest(self.map)?))
    }

    pub fn last_entry(&self) -> Result<Option<(&'a K, &'a V)>, TreeMapError> {
        Ok(self.map.entry_at(self.bounds.highest(self.map)?))
    }

    /// First key in the view's direction.
    ///
    /// # Errors
    ///
    /// [`TreeMapError::EmptyCollection`] when no entry lies within the bounds.
    pub fn first_key(&self) -> Result<&'a K, TreeMapError> {
        self.first_entry()?
            .map(|(key, _)| key)
            .ok_or(TreeMapError::EmptyCollection)
    }

    /// Last key in the view's direction.
    ///
    /// # Errors
    ///
    /// [`TreeMapError::EmptyCollection`] when no entry lies within the bounds.
    pub fn last_key(&self) -> Result<&'a K, TreeMapError> {
        self.last_entry()?
            .map(|(key, _)| key)
            .ok_or(TreeMapError::EmptyCollection)
    }

    /// Nearest entry at or before `key` in the view's direction.
    pub fn floor_entry(&self, key: &K) -> Result<Option<(&'a K, &'a V)>, TreeMapError> {
        Ok(self.map.entry_at(self.bounds.floor(key, true, self.map)?))
    }

    /// Nearest entry at or after `key` in the view's direction.
    pub fn ceiling_entry(&self, key: &K) -> Result<Option<(&'a K, &'a V)>, TreeMapError> {
        Ok(self.map.entry_at(self.bounds.ceiling(key, true, self.map)?))
    }

    /// Nearest entry strictly after `key` in the view's direction.
    pub fn higher_entry(&self, key: &K) -> Result<Option<(&'a K, &'a V)>, TreeMapError> {
        Ok(self.map.entry_at(self.bounds.ceiling(key, false, self.map)?))
    }

    /// Nearest entry strictly before `key` in the view's direction.
    pub fn lower_entry(&self, key: &K) -> Result<Option<(&'a K, &'a V)>, TreeMapError> {
        Ok(self.map.entry_at(self.bounds.floor(key, false, self.map)?))
    }

    pub fn floor_key(&self, key: &K) -> Result<Option<&'a K>, TreeMapError> {
        Ok(self.floor_entry(key)?.map(|(key, _)| key))
    }

    pub fn ceiling_key(&self, key: &K) -> Result<Option<&'a K>, TreeMapError> {
        Ok(self.ceiling_entry(key)?.map(|(key, _)| key))
    }

    pub fn higher_key(&self, key: &K) -> Result<Option<&'a K>, TreeMapError> {
        Ok(self.higher_entry(key)?.map(|(key, _)| key))
    }

    pub fn lower_key(&self, key: &K) -> Result<Option<&'a K>, TreeMapError> {
        Ok(self.lower_entry(key)?.map(|(key, _)| key))
    }

    /// Entries within the bounds, in the view's direction.
    pub fn iter(&self) -> Result<Iter<'a, K, V, C>, TreeMapError> {
        self.bounds.iter(self.map)
    }

    pub fn keys(&self) -> Result<Keys<'a, K, V, C>, TreeMapError> {
        Ok(Keys { inner: self.iter()? })
    }

    pub fn values(&self) -> Result<Values<'a, K, V, C>, TreeMapError> {
        Ok(Values { inner: self.iter()? })
    }

    /// Fail-fast cursor over the view that stops at the view's far bound.
    pub fn cursor(&self) -> Result<Cursor, TreeMapError> {
        self.bounds.cursor(self.map)
    }

    /// Copies the entries within the bounds into a new map with the same comparator.
    pub fn to_map(&self) -> Result<RosewoodMap<K, V, C>, TreeMapError>
    where
        K: Clone,
        V: Clone,
        C: Clone,
    {
        let ascending = Bounds {
            direction: Direction::Ascending,
            ..self.bounds.clone()
        };
        let entries = ascending
            .iter(self.map)?
            .map(|(key, value)| (key.clone(), value.clone()));

        Ok(RosewoodMap::from_sorted_trusted(entries, self.map.comparator.clone()))
    }
}

impl<'a, K: Clone, V, C: Comparator<K>> SubMap<'a, K, V, C> {
    /// Narrows the view to keys before `to` in its direction.
    ///
    /// # Errors
    ///
    /// [`TreeMapError::OutOfRange`] if `to` lies outside the current bounds.
    pub fn head_map(&self, to: K, inclusive: bool) -> Result<SubMap<'a, K, V, C>, TreeMapError> {
        Ok(SubMap {
            map: self.map,
            bounds: self.bounds.narrow(None, Some((to, inclusive)), self.map)?,
        })
    }

    /// Narrows the view to keys after `from` in its direction.
    pub fn tail_map(&self, from: K, inclusive: bool) -> Result<SubMap<'a, K, V, C>, TreeMapError> {
        Ok(SubMap {
            map: self.map,
            bounds: self.bounds.narrow(Some((from, inclusive)), None, self.map)?,
        })
    }

    /// Narrows the view to keys between `from` and `to` in its direction.
    pub fn sub_map(
        &self,
        from: K,
        from_inclusive: bool,
        to: K,
        to_inclusive: bool,
    ) -> Result<SubMap<'a, K, V, C>, TreeMapError> {
        Ok(SubMap {
            map: self.map,
            bounds: self
                .bounds
                .narrow(Some((from, from_inclusive)), Some((to, to_inclusive)), self.map)?,
        })
    }

    /// Same bounds, opposite direction.
    pub fn descending_map(&self) -> SubMap<'a, K, V, C> {
        SubMap {
            map: self.map,
            bounds: self.bounds.reversed(),
        }
    }
}

impl<K, V, C: Comparator<K>> SubMapMut<'_, K, V, C> {
    fn shared(&self) -> SubMap<'_, K, V, C>
    where
        K: Clone,
    {
        SubMap {
            map: &*self.map,
            bounds: self.bounds.clone(),
        }
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.bounds.direction
    }

    pub fn get(&self, key: &K) -> Result<Option<&V>, TreeMapError> {
        self.bounds.get(key, self.map)
    }

    pub fn get_mut(&mut self, key: &K) -> Result<Option<&mut V>, TreeMapError> {
        if !self.bounds.in_range(key, self.map)? {
            return Ok(None);
        }

        self.map.get_mut(key)
    }

    pub fn contains_key(&self, key: &K) -> Result<bool, TreeMapError> {
        Ok(self.get(key)?.is_some())
    }

    pub fn len(&self) -> Result<usize, TreeMapError> {
        Ok(self.bounds.iter(self.map)?.count())
    }

    pub fn is_empty(&self) -> Result<bool, TreeMapError> {
        Ok(self.bounds.lowest(self.map)?.is_nil())
    }

    pub fn first_entry(&self) -> Result<Option<(&K, &V)>, TreeMapError> {
        Ok(self.map.entry_at(self.bounds.lowest(self.map)?))
    }

    pub fn last_entry(&self) -> Result<Option<(&K, &V)>, TreeMapError> {
        Ok(self.map.entry_at(self.bounds.highest(self.map)?))
    }

    pub fn first_key(&self) -> Result<&K, TreeMapError> {
        self.first_entry()?
            .map(|(key, _)| key)
            .ok_or(TreeMapError::EmptyCollection)
    }

    pub fn last_key(&self) -> Result<&K, TreeMapError> {
        self.last_entry()?
            .map(|(key, _)| key)
            .ok_or(TreeMapError::EmptyCollection)
    }

    pub fn floor_key(&self, key: &K) -> Result<Option<&K>, TreeMapError> {
        let idx = self.bounds.floor(key, true, self.map)?;
        Ok(self.map.entry_at(idx).map(|(key, _)| key))
    }

    pub fn ceiling_key(&self, key: &K) -> Result<Option<&K>, TreeMapError> {
        let idx = self.bounds.ceiling(key, true, self.map)?;
        Ok(self.map.entry_at(idx).map(|(key, _)| key))
    }

    pub fn higher_key(&self, key: &K) -> Result<Option<&K>, TreeMapError> {
        let idx = self.bounds.ceiling(key, false, self.map)?;
        Ok(self.map.entry_at(idx).map(|(key, _)| key))
    }

    pub fn lower_key(&self, key: &K) -> Result<Option<&K>, TreeMapError> {
        let idx = self.bounds.floor(key, false, self.map)?;
        Ok(self.map.entry_at(idx).map(|(key, _)| key))
    }

    pub fn iter(&self) -> Result<Iter<'_, K, V, C>, TreeMapError> {
        self.bounds.iter(self.map)
    }

    pub fn keys(&self) -> Result<Keys<'_, K, V, C>, TreeMapError> {
        Ok(Keys { inner: self.iter()? })
    }

    pub fn values(&self) -> Result<Values<'_, K, V, C>, TreeMapError> {
        Ok(Values { inner: self.iter()? })
    }

    /// Fail-fast cursor over the view. Use it with [`map`](Self::map) /
    /// [`map_mut`](Self::map_mut), or with the backing map once the view is dropped.
    pub fn cursor(&self) -> Result<Cursor, TreeMapError> {
        self.bounds.cursor(self.map)
    }

    /// The backing map.
    pub fn map(&self) -> &RosewoodMap<K, V, C> {
        &*self.map
    }

    /// The backing map, mutably. Changes made through it are not bound-checked.
    pub fn map_mut(&mut self) -> &mut RosewoodMap<K, V, C> {
        &mut *self.map
    }

    /// Inserts `key` if it lies within the bounds.
    ///
    /// # Errors
    ///
    /// [`TreeMapError::OutOfRange`] when the key lies outside the bounds; the map is
    /// left untouched.
    pub fn put(&mut self, key: K, value: V) -> Result<Option<V>, TreeMapError> {
        if !self.bounds.in_range(&key, self.map)? {
            return Err(TreeMapError::OutOfRange);
        }

        self.map.put(key, value)
    }

    /// Removes `key` if it lies within the bounds.
    pub fn remove(&mut self, key: &K) -> Result<Option<V>, TreeMapError> {
        if !self.bounds.in_range(key, self.map)? {
            return Ok(None);
        }

        self.map.remove(key)
    }

    /// Removes the first entry in the view's direction.
    pub fn pop_first(&mut self) -> Result<Option<(K, V)>, TreeMapError> {
        let idx = self.bounds.lowest(self.map)?;
        Ok(self.detach(idx))
    }

    /// Removes the last entry in the view's direction.
    pub fn pop_last(&mut self) -> Result<Option<(K, V)>, TreeMapError> {
        let idx = self.bounds.highest(self.map)?;
        Ok(self.detach(idx))
    }

    fn detach(&mut self, idx: NodeIndex) -> Option<(K, V)> {
        if idx.is_nil() {
            return None;
        }

        let removed = self.map.delete_node(idx);
        Some((removed.key, removed.value))
    }

    /// Removes every entry within the bounds.
    pub fn clear(&mut self) -> Result<(), TreeMapError> {
        if self.bounds.is_unbounded() {
            self.map.clear();
            return Ok(());
        }

        while self.pop_first()?.is_some() {}

        Ok(())
    }

    pub fn to_map(&self) -> Result<RosewoodMap<K, V, C>, TreeMapError>
    where
        K: Clone,
        V: Clone,
        C: Clone,
    {
        self.shared().to_map()
    }
}

impl<K: Clone, V, C: Comparator<K>> SubMapMut<'_, K, V, C> {
    /// Shared view with the same bounds.
    pub fn as_view(&self) -> SubMap<'_, K, V, C> {
        self.shared()
    }

    pub fn head_map_mut(
        &mut self,
        to: K,
        inclusive: bool,
    ) -> Result<SubMapMut<'_, K, V, C>, TreeMapError> {
        let bounds = self.bounds.narrow(None, Some((to, inclusive)), self.map)?;
        Ok(SubMapMut {
            map: &mut *self.map,
            bounds,
        })
    }

    pub fn tail_map_mut(
        &mut self,
        from: K,
        inclusive: bool,
    ) -> Result<SubMapMut<'_, K, V, C>, TreeMapError> {
        let bounds = self.bounds.narrow(Some((from, inclusive)), None, self.map)?;
        Ok(SubMapMut {
            map: &mut *self.map,
            bounds,
        })
    }

    pub fn sub_map_mut(
        &mut self,
        from: K,
        from_inclusive: bool,
        to: K,
        to_inclusive: bool,
    ) -> Result<SubMapMut<'_, K, V, C>, TreeMapError> {
        let bounds = self
            .bounds
            .narrow(Some((from, from_inclusive)), Some((to, to_inclusive)), self.map)?;
        Ok(SubMapMut {
            map: &mut *self.map,
            bounds,
        })
    }

    pub fn descending_map_mut(&mut self) -> SubMapMut<'_, K, V, C> {
        SubMapMut {
            bounds: self.bounds.reversed(),
            map: &mut *self.map,
        }
    }
}

impl<K, V, C: Comparator<K>> RosewoodMap<K, V, C> {
    /// View of the entries between `lo` and `hi`, ascending.
    ///
    /// # Errors
    ///
    /// [`TreeMapError::InvalidRange`] if `lo` is above `hi`.
    pub fn range(&self, lo: Bound<K>, hi: Bound<K>) -> Result<SubMap<'_, K, V, C>, TreeMapError> {
        Ok(SubMap {
            bounds: Bounds::new(lo, hi, Direction::Ascending, self)?,
            map: self,
        })
    }

    pub fn range_mut(
        &mut self,
        lo: Bound<K>,
        hi: Bound<K>,
    ) -> Result<SubMapMut<'_, K, V, C>, TreeMapError> {
        Ok(SubMapMut {
            bounds: Bounds::new(lo, hi, Direction::Ascending, self)?,
            map: self,
        })
    }

    /// Entries from `lo` to `hi`, each bound inclusive or exclusive.
    pub fn sub_map(
        &self,
        lo: K,
        lo_inclusive: bool,
        hi: K,
        hi_inclusive: bool,
    ) -> Result<SubMap<'_, K, V, C>, TreeMapError> {
        self.range(bound_of(lo, lo_inclusive), bound_of(hi, hi_inclusive))
    }

    pub fn sub_map_mut(
        &mut self,
        lo: K,
        lo_inclusive: bool,
        hi: K,
        hi_inclusive: bool,
    ) -> Result<SubMapMut<'_, K, V, C>, TreeMapError> {
        self.range_mut(bound_of(lo, lo_inclusive), bound_of(hi, hi_inclusive))
    }

    /// Entries below `hi` (or equal to it when `inclusive`).
    pub fn head_map(&self, hi: K, inclusive: bool) -> Result<SubMap<'_, K, V, C>, TreeMapError> {
        self.range(Bound::Unbounded, bound_of(hi, inclusive))
    }

    pub fn head_map_mut(
        &mut self,
        hi: K,
        inclusive: bool,
    ) -> Result<SubMapMut<'_, K, V, C>, TreeMapError> {
        self.range_mut(Bound::Unbounded, bound_of(hi, inclusive))
    }

    /// Entries above `lo` (or equal to it when `inclusive`).
    pub fn tail_map(&self, lo: K, inclusive: bool) -> Result<SubMap<'_, K, V, C>, TreeMapError> {
        self.range(bound_of(lo, inclusive), Bound::Unbounded)
    }

    pub fn tail_map_mut(
        &mut self,
        lo: K,
        inclusive: bool,
    ) -> Result<SubMapMut<'_, K, V, C>, TreeMapError> {
        self.range_mut(bound_of(lo, inclusive), Bound::Unbounded)
    }
}

impl<K, V, C> RosewoodMap<K, V, C> {
    /// The whole map, in descending key order.
    pub fn descending_map(&self) -> SubMap<'_, K, V, C> {
        SubMap {
            map: self,
            bounds: Bounds::unbounded(Direction::Descending),
        }
    }

    pub fn descending_map_mut(&mut self) -> SubMapMut<'_, K, V, C> {
        SubMapMut {
            map: self,
            bounds: Bounds::unbounded(Direction::Descending),
        }
    }
}
