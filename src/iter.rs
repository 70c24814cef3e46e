use core::iter::{self, FusedIterator};

use alloc::vec::{self, Vec};

use slab::Slab;

use crate::{Direction, Natural, NodeIndex, RosewoodMap, RosewoodNode};

/// Borrowing iterator over the entries of a map or view, in the view's direction.
pub struct Iter<'a, K, V, C = Natural> {
    map: &'a RosewoodMap<K, V, C>,
    front: NodeIndex,
    back: NodeIndex,
    direction: Direction,
    remaining: Option<usize>,
}

impl<'a, K, V, C> Iter<'a, K, V, C> {
    /// Iterates from `front` to `back` inclusive; both nil for an empty range.
    pub(crate) fn new(
        map: &'a RosewoodMap<K, V, C>,
        front: NodeIndex,
        back: NodeIndex,
        direction: Direction,
        remaining: Option<usize>,
    ) -> Self {
        if front.is_nil() || back.is_nil() {
            return Self {
                map,
                front: NodeIndex::BLACK_NIL,
                back: NodeIndex::BLACK_NIL,
                direction,
                remaining: Some(0),
            };
        }

        Self {
            map,
            front,
            back,
            direction,
            remaining,
        }
    }

    fn step(&self, idx: NodeIndex, direction: Direction) -> NodeIndex {
        match direction {
            Direction::Ascending => self.map.successor(idx),
            Direction::Descending => self.map.predecessor(idx),
        }
    }

    fn take(&mut self, current: NodeIndex) -> Option<(&'a K, &'a V)> {
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(1);
        }

        self.map.entry_at(current)
    }
}

impl<'a, K, V, C> Iterator for Iter<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.front.is_nil() {
            return None;
        }

        let current = self.front;
        if current == self.back {
            self.front = NodeIndex::BLACK_NIL;
            self.back = NodeIndex::BLACK_NIL;
        } else {
            self.front = self.step(current, self.direction);
        }

        self.take(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining {
            Some(remaining) => (remaining, Some(remaining)),
            None if self.front.is_nil() => (0, Some(0)),
            None => (1, Some(self.map.len())),
        }
    }
}

impl<K, V, C> DoubleEndedIterator for Iter<'_, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.back.is_nil() {
            return None;
        }

        let current = self.back;
        if current == self.front {
            self.front = NodeIndex::BLACK_NIL;
            self.back = NodeIndex::BLACK_NIL;
        } else {
            self.back = self.step(current, self.direction.reverse());
        }

        self.take(current)
    }
}

impl<K, V, C> FusedIterator for Iter<'_, K, V, C> {}

impl<K, V, C> Clone for Iter<'_, K, V, C> {
    fn clone(&self) -> Self {
        Self {
            map: self.map,
            front: self.front,
            back: self.back,
            direction: self.direction,
            remaining: self.remaining,
        }
    }
}

/// Keys of a map or view, in the view's direction.
pub struct Keys<'a, K, V, C = Natural> {
    pub(crate) inner: Iter<'a, K, V, C>,
}

impl<'a, K, V, C> Iterator for Keys<'a, K, V, C> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C> DoubleEndedIterator for Keys<'_, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, V, C> FusedIterator for Keys<'_, K, V, C> {}

/// Values of a map or view, ordered by their keys.
pub struct Values<'a, K, V, C = Natural> {
    pub(crate) inner: Iter<'a, K, V, C>,
}

impl<'a, K, V, C> Iterator for Values<'a, K, V, C> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C> DoubleEndedIterator for Values<'_, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V, C> FusedIterator for Values<'_, K, V, C> {}

/// Entries with mutable values, in ascending key order.
pub struct IterMut<'a, K, V> {
    inner: iter::Flatten<vec::IntoIter<Option<(&'a K, &'a mut V)>>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// Owning iterator, in ascending key order.
pub struct IntoIter<K, V> {
    storage: Slab<RosewoodNode<K, V>>,
    order: vec::IntoIter<NodeIndex>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.order.next()?;
        let node = self.storage.remove(idx.0);

        Some((node.key, node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let idx = self.order.next_back()?;
        let node = self.storage.remove(idx.0);

        Some((node.key, node.value))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V, C> RosewoodMap<K, V, C> {
    /// Entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V, C> {
        Iter::new(
            self,
            self.first_node(),
            self.last_node(),
            Direction::Ascending,
            Some(self.len()),
        )
    }

    pub fn keys(&self) -> Keys<'_, K, V, C> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V, C> {
        Values { inner: self.iter() }
    }

    /// Entries in ascending key order, with mutable access to the values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let order = self.in_order();
        let span = order.iter().map(|idx| idx.0 + 1).max().unwrap_or(0);

        let mut rank = alloc::vec![0; span];
        for (position, idx) in order.iter().enumerate() {
            rank[idx.0] = position;
        }

        let mut entries: Vec<Option<(&K, &mut V)>> =
            iter::repeat_with(|| None).take(order.len()).collect();
        for (slot, node) in self.storage.iter_mut() {
            let RosewoodNode { key, value, .. } = node;
            entries[rank[slot]] = Some((&*key, value));
        }

        IterMut {
            inner: entries.into_iter().flatten(),
        }
    }

    /// Mutable access to every value, in ascending key order.
    pub fn values_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut V> + '_ {
        self.iter_mut().map(|(_, value)| value)
    }
}

impl<K, V, C> IntoIterator for RosewoodMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let order = self.in_order();

        IntoIter {
            storage: self.storage,
            order: order.into_iter(),
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a RosewoodMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut RosewoodMap<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use crate::RosewoodMap;

    fn sample() -> RosewoodMap<usize, String> {
        let mut map = RosewoodMap::new();

        for key in [12, 4, 9, 1, 15, 7, 3] {
            map.put(key, key.to_string()).unwrap();
        }

        map
    }

    #[test]
    pub fn inorder_iteration() {
        let map = sample();
        let keys: Vec<usize> = map.keys().copied().collect();

        assert_eq!(keys, vec![1, 3, 4, 7, 9, 12, 15]);
        assert_eq!(map.iter().size_hint(), (7, Some(7)));
    }

    #[test]
    pub fn reverse_iteration() {
        let map = sample();
        let keys: Vec<usize> = map.keys().rev().copied().collect();

        assert_eq!(keys, vec![15, 12, 9, 7, 4, 3, 1]);
    }

    #[test]
    pub fn iteration_from_both_ends_meets_once() {
        let map = sample();
        let mut iter = map.keys();

        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&15));
        assert_eq!(iter.next(), Some(&3));
        assert_eq!(iter.next_back(), Some(&12));
        assert_eq!(iter.next(), Some(&4));
        assert_eq!(iter.next(), Some(&7));
        assert_eq!(iter.next_back(), Some(&9));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    pub fn empty_map_iteration() {
        let map = RosewoodMap::<u8, u8>::new();

        assert_eq!(map.iter().next(), None);
        assert_eq!(map.iter().next_back(), None);
    }

    #[test]
    pub fn iter_mut_follows_key_order() {
        let mut map = sample();
        map.remove(&4).unwrap();
        map.put(5, String::new()).unwrap();

        let mut seen = Vec::new();
        for (key, value) in map.iter_mut() {
            seen.push(*key);
            value.push('!');
        }

        assert_eq!(seen, vec![1, 3, 5, 7, 9, 12, 15]);
        assert_eq!(map.get(&9).unwrap().map(String::as_str), Some("9!"));
        assert_eq!(map.get(&5).unwrap().map(String::as_str), Some("!"));
    }

    #[test]
    pub fn into_iter_yields_owned_pairs() {
        let map = sample();
        let entries: Vec<(usize, String)> = map.into_iter().rev().take(2).collect();

        assert_eq!(entries, vec![(15, "15".to_string()), (12, "12".to_string())]);
    }
}
