//! Linear-time construction from sorted entries.
//!
//! Entries are first allocated in key order, then linked into a perfectly balanced
//! shape by repeatedly splitting index ranges at their midpoint. Every level above the
//! deepest one is full, so colouring the deepest level red (when it is not full itself)
//! and everything else black satisfies the red-black invariants without any rotation.

use core::cmp::Ordering;

use alloc::vec::Vec;

use crate::{Comparator, NodeColor, NodeIndex, RosewoodMap, Side, TreeMapError};

/// Depth whose nodes are coloured red in a balanced tree of `count` nodes.
///
/// `None` when the tree is perfect and every node is black.
pub(crate) fn red_level(count: usize) -> Option<usize> {
    if count == 0 || count.checked_add(1).is_some_and(usize::is_power_of_two) {
        return None;
    }

    Some(count.ilog2() as usize)
}

struct Span {
    depth: usize,
    lo: usize,
    hi: usize,
    parent: NodeIndex,
    side: Side,
}

impl<K, V, C> RosewoodMap<K, V, C> {
    /// Builds a map from entries already in strictly ascending order, without checking.
    pub(crate) fn from_sorted_trusted<I>(source: I, comparator: C) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let source = source.into_iter();
        let mut map = Self::with_capacity_and_comparator(source.size_hint().0, comparator);

        map.fill_from_sorted(source);
        map
    }

    /// Allocates and links sorted entries into an empty map.
    pub(crate) fn fill_from_sorted<I>(&mut self, source: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        debug_assert!(self.is_empty());

        let order: Vec<NodeIndex> = source
            .into_iter()
            .map(|(key, value)| self.allocate(key, value))
            .collect();

        self.link_balanced(&order);
    }

    /// Links nodes allocated in key order into a balanced red-black tree.
    fn link_balanced(&mut self, order: &[NodeIndex]) {
        self.root = NodeIndex::BLACK_NIL;

        let Some(last) = order.len().checked_sub(1) else {
            return;
        };

        let red_level = red_level(order.len());
        tracing::trace!(count = order.len(), ?red_level, "linking sorted entries");

        let mut pending = Vec::with_capacity(usize::BITS as usize);
        pending.push(Span {
            depth: 0,
            lo: 0,
            hi: last,
            parent: NodeIndex::BLACK_NIL,
            side: Side::Left,
        });

        while let Some(span) = pending.pop() {
            let mid = span.lo + (span.hi - span.lo) / 2;
            let idx = order[mid];

            let node = self.node_mut(idx);
            node.parent = span.parent;
            node.left = NodeIndex::BLACK_NIL;
            node.right = NodeIndex::BLACK_NIL;
            node.color = if red_level == Some(span.depth) {
                NodeColor::Red
            } else {
                NodeColor::Black
            };

            if span.parent.is_nil() {
                self.root = idx;
            } else {
                self.set_child(span.parent, span.side, idx);
            }

            if span.lo < mid {
                pending.push(Span {
                    depth: span.depth + 1,
                    lo: span.lo,
                    hi: mid - 1,
                    parent: idx,
                    side: Side::Left,
                });
            }

            if mid < span.hi {
                pending.push(Span {
                    depth: span.depth + 1,
                    lo: mid + 1,
                    hi: span.hi,
                    parent: idx,
                    side: Side::Right,
                });
            }
        }
    }
}

impl<K, V, C: Comparator<K>> RosewoodMap<K, V, C> {
    /// Builds a balanced map from `count` entries in strictly ascending key order.
    ///
    /// Runs in linear time. Exactly `count` entries are taken from `source`; anything
    /// after them is left unread.
    ///
    /// # Errors
    ///
    /// - [`TreeMapError::MissingElements`] if `source` yields fewer than `count` entries.
    /// - [`TreeMapError::UnsortedInput`] if a key is not strictly greater than the one before it.
    /// - [`TreeMapError::InvalidKey`] if the comparator rejects a key.
    ///
    /// ```rust
    /// use rosewood_map::{Natural, RosewoodMap};
    ///
    /// let entries = [(1, "a"), (2, "b"), (3, "c")];
    /// let map = RosewoodMap::build_from_sorted(3, entries, Natural).unwrap();
    ///
    /// assert_eq!(map.len(), 3);
    /// assert_eq!(map.get(&2), Ok(Some(&"b")));
    /// ```
    pub fn build_from_sorted<I>(
        count: usize,
        source: I,
        comparator: C,
    ) -> Result<Self, TreeMapError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut source = source.into_iter();
        let capacity = count.min(source.size_hint().0);
        let mut map = Self::with_capacity_and_comparator(capacity, comparator);
        let mut order = Vec::with_capacity(capacity);

        for position in 0..count {
            let Some((key, value)) = source.next() else {
                return Err(TreeMapError::MissingElements {
                    expected: count,
                    found: position,
                });
            };

            match order.last() {
                Some(&previous) => {
                    let previous_key = &map.node(previous).key;
                    if map.comparator.compare(previous_key, &key)? != Ordering::Less {
                        return Err(TreeMapError::UnsortedInput { position });
                    }
                }
                None => {
                    map.comparator.compare(&key, &key)?;
                }
            }

            order.push(map.allocate(key, value));
        }

        map.link_balanced(&order);
        Ok(map)
    }

    /// Whether `entries` are in strictly ascending key order.
    pub(crate) fn is_strictly_ascending(&self, entries: &[(K, V)]) -> Result<bool, TreeMapError> {
        if let Some((first, _)) = entries.first() {
            self.comparator.compare(first, first)?;
        }

        for pair in entries.windows(2) {
            if self.comparator.compare(&pair[0].0, &pair[1].0)? != Ordering::Less {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::red_level;
    use crate::{Natural, Partial, RosewoodMap, TreeMapError};

    #[test]
    pub fn red_level_boundaries() {
        assert_eq!(red_level(0), None);
        assert_eq!(red_level(1), None);
        assert_eq!(red_level(2), Some(1));
        assert_eq!(red_level(3), None);
        assert_eq!(red_level(4), Some(2));
        assert_eq!(red_level(6), Some(2));
        assert_eq!(red_level(7), None);
        assert_eq!(red_level(8), Some(3));
        assert_eq!(red_level(1023), None);
        assert_eq!(red_level(1024), Some(10));
    }

    #[test]
    pub fn built_trees_are_valid_for_every_small_size() {
        for count in 0..200usize {
            let map = RosewoodMap::build_from_sorted(count, (0..count).map(|k| (k, k * 2)), Natural)
                .unwrap();

            assert_eq!(map.len(), count);
            assert!(map.check_invariants().is_ok(), "invalid tree for {count} entries");

            let keys: Vec<usize> = map.keys().copied().collect();
            assert_eq!(keys, (0..count).collect::<Vec<_>>());
        }
    }

    #[test]
    pub fn built_black_height_counts_black_levels() {
        for count in 1..300usize {
            let built =
                RosewoodMap::build_from_sorted(count, (0..count).map(|k| (k, ())), Natural)
                    .unwrap();

            let mut inserted = RosewoodMap::new();
            for key in 0..count {
                inserted.put(key, ()).unwrap();
            }

            let levels = count.ilog2() as usize + 1;
            let black_levels = levels - usize::from(red_level(count).is_some());

            assert_eq!(built.check_invariants(), Ok(black_levels), "{count} entries");
            assert!(inserted.check_invariants().is_ok());
        }

        let perfect =
            RosewoodMap::build_from_sorted(127, (0..127).map(|k| (k, ())), Natural).unwrap();
        assert_eq!(perfect.check_invariants(), Ok(7));
    }

    #[test]
    pub fn oversized_count_reports_missing_entries() {
        let result = RosewoodMap::<u32, u32>::build_from_sorted(usize::MAX, [(1, 1)], Natural);

        assert_eq!(
            result.err(),
            Some(TreeMapError::MissingElements {
                expected: usize::MAX,
                found: 1
            })
        );
    }

    #[test]
    pub fn built_tree_accepts_further_updates() {
        let mut map =
            RosewoodMap::build_from_sorted(10, (0..10).map(|k| (k * 2, k)), Natural).unwrap();

        for key in (1..20).step_by(2) {
            map.put(key, key).unwrap();
        }
        for key in (0..20).step_by(3) {
            map.remove(&key).unwrap();
        }

        assert!(map.check_invariants().is_ok());
    }

    #[test]
    pub fn short_source_is_rejected() {
        let result = RosewoodMap::build_from_sorted(5, [(1, ()), (2, ())], Natural);

        assert_eq!(
            result.err(),
            Some(TreeMapError::MissingElements {
                expected: 5,
                found: 2
            })
        );
    }

    #[test]
    pub fn unsorted_source_is_rejected() {
        let result = RosewoodMap::build_from_sorted(3, [(1, ()), (3, ()), (3, ())], Natural);

        assert_eq!(result.err(), Some(TreeMapError::UnsortedInput { position: 2 }));
    }

    #[test]
    pub fn incomparable_key_is_rejected() {
        let result = RosewoodMap::build_from_sorted(2, [(f64::NAN, ()), (1.0, ())], Partial);

        assert_eq!(result.err(), Some(TreeMapError::InvalidKey));
    }

    #[test]
    pub fn extra_entries_are_left_in_source() {
        let mut source = (0..10).map(|k| (k, ()));
        let map = RosewoodMap::build_from_sorted(4, source.by_ref(), Natural).unwrap();

        assert_eq!(map.len(), 4);
        assert_eq!(source.next(), Some((4, ())));
    }
}
