//! Red-black tree based sorted map.
//!
//! [`RosewoodMap`] keeps its entries ordered by a [`Comparator`] and offers
//! logarithmic lookup, insertion and removal, ordered navigation (floor,
//! ceiling, higher, lower), live range views ([`SubMap`], [`SubMapMut`]) and
//! detached [`Cursor`]s that detect structural changes made behind their back.
//!
//! Nodes live in a slab arena and refer to each other by index, so parent links
//! are plain integers rather than shared pointers.
//!
//! ```rust
//! use rosewood_map::RosewoodMap;
//!
//! let mut map = RosewoodMap::new();
//! for key in [5, 3, 8, 1, 4, 7, 9] {
//!     map.put(key, key * 10).unwrap();
//! }
//!
//! assert_eq!(map.first_key(), Ok(&1));
//! assert_eq!(map.floor_key(&6), Ok(Some(&5)));
//! assert_eq!(map.ceiling_key(&6), Ok(Some(&7)));
//!
//! let view = map.sub_map(3, true, 8, false).unwrap();
//! let keys: Vec<_> = view.keys().unwrap().copied().collect();
//! assert_eq!(keys, vec![3, 4, 5, 7]);
//! ```

extern crate alloc;

mod build;
mod compare;
mod cursor;
mod error;
mod iter;
mod map;
mod navigate;
#[cfg(feature = "serde")]
mod persist;
mod set;
mod validate;
mod view;

use core::{cmp::Ordering, mem};

use slab::Slab;

pub use compare::{Comparator, Natural, Partial};
pub use cursor::Cursor;
pub use error::TreeMapError;
pub use iter::{IntoIter, Iter, IterMut, Keys, Values};
pub use set::RosewoodSet;
pub use validate::InvariantViolation;
pub use view::{Direction, SubMap, SubMapMut};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum NodeColor {
    #[default]
    Red,
    Black,
}

/// Position of a node inside the map's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeIndex(pub(crate) usize);

impl NodeIndex {
    /// Absent child, parent of the root. Always black.
    pub(crate) const BLACK_NIL: Self = Self(usize::MAX);

    #[inline]
    pub(crate) fn is_nil(self) -> bool {
        self == Self::BLACK_NIL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RosewoodNode<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    color: NodeColor,
    parent: NodeIndex,
    left: NodeIndex,
    right: NodeIndex,
}

impl<K, V> RosewoodNode<K, V> {
    fn new_isolated(key: K, value: V) -> Self {
        Self {
            key,
            value,
            color: NodeColor::default(),
            parent: NodeIndex::BLACK_NIL,
            left: NodeIndex::BLACK_NIL,
            right: NodeIndex::BLACK_NIL,
        }
    }

    #[inline]
    pub(crate) fn left_child(&self) -> NodeIndex {
        self.left
    }

    #[inline]
    pub(crate) fn right_child(&self) -> NodeIndex {
        self.right
    }
}

/// Outcome of a key search: the matching node, or the leaf slot where the key belongs.
pub(crate) enum Search {
    Found(NodeIndex),
    Vacant(NodeIndex, Side),
}

/// A node's payload after it left the tree.
///
/// When the removed node had two children, the payload of its in-order successor
/// was moved into the removed node's slot and the successor's slot was freed:
/// `relocated` then holds `(successor, removed)`.
pub(crate) struct Detached<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) relocated: Option<(NodeIndex, NodeIndex)>,
}

impl<K, V> Detached<K, V> {
    /// Where a position captured before the removal now lives.
    pub(crate) fn retarget(&self, position: NodeIndex) -> NodeIndex {
        match self.relocated {
            Some((from, to)) if from == position => to,
            _ => position,
        }
    }
}

/// A sorted map backed by a red-black tree.
///
/// Keys are ordered by `C`, which defaults to the keys' [`Ord`] implementation.
/// Every operation that compares keys returns a `Result` so that orderings able to
/// reject a key (see [`Partial`]) report [`TreeMapError::InvalidKey`] instead of
/// misplacing it.
pub struct RosewoodMap<K, V, C = Natural> {
    storage: Slab<RosewoodNode<K, V>>,
    root: NodeIndex,
    version: u64,
    comparator: C,
}

impl<K, V> RosewoodMap<K, V> {
    /// Creates an empty map ordered by the keys' natural ordering.
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }

    /// Creates an empty map with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, Natural)
    }
}

impl<K, V, C> RosewoodMap<K, V, C> {
    /// Creates an empty map ordered by `comparator`.
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            storage: Slab::new(),
            root: NodeIndex::BLACK_NIL,
            version: 0,
            comparator,
        }
    }

    pub fn with_capacity_and_comparator(capacity: usize, comparator: C) -> Self {
        Self {
            storage: Slab::with_capacity(capacity),
            root: NodeIndex::BLACK_NIL,
            version: 0,
            comparator,
        }
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Reserves room for at least `additional` more entries.
    pub fn reserve(&mut self, additional: usize) {
        self.storage.reserve(additional);
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        tracing::debug!(dropped = self.len(), "clearing map");

        self.storage.clear();
        self.root = NodeIndex::BLACK_NIL;
        self.version = self.version.wrapping_add(1);
    }

    /// Structural modification counter. Changes on every insertion and removal,
    /// never on value updates.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[inline]
    pub(crate) fn node(&self, idx: NodeIndex) -> &RosewoodNode<K, V> {
        &self.storage[idx.0]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, idx: NodeIndex) -> &mut RosewoodNode<K, V> {
        &mut self.storage[idx.0]
    }

    pub(crate) fn entry_at(&self, idx: NodeIndex) -> Option<(&K, &V)> {
        if idx.is_nil() {
            return None;
        }

        let node = self.node(idx);
        Some((&node.key, &node.value))
    }

    #[inline]
    fn color_of(&self, idx: NodeIndex) -> NodeColor {
        if idx.is_nil() {
            NodeColor::Black
        } else {
            self.node(idx).color
        }
    }

    #[inline]
    fn set_color(&mut self, idx: NodeIndex, color: NodeColor) {
        if !idx.is_nil() {
            self.node_mut(idx).color = color;
        }
    }

    #[inline]
    pub(crate) fn parent_of(&self, idx: NodeIndex) -> NodeIndex {
        if idx.is_nil() {
            NodeIndex::BLACK_NIL
        } else {
            self.node(idx).parent
        }
    }

    #[inline]
    pub(crate) fn child_of(&self, idx: NodeIndex, side: Side) -> NodeIndex {
        if idx.is_nil() {
            return NodeIndex::BLACK_NIL;
        }

        match side {
            Side::Left => self.node(idx).left,
            Side::Right => self.node(idx).right,
        }
    }

    fn set_child(&mut self, idx: NodeIndex, side: Side, child: NodeIndex) {
        let node = self.node_mut(idx);
        match side {
            Side::Left => node.left = child,
            Side::Right => node.right = child,
        }
    }

    /// Which side of its parent `idx` hangs from.
    #[inline]
    fn side_of(&self, idx: NodeIndex) -> Side {
        if self.child_of(self.parent_of(idx), Side::Left) == idx {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Points whatever referenced `old` from `parent` (or the root slot) at `new`.
    fn replace_child(&mut self, parent: NodeIndex, old: NodeIndex, new: NodeIndex) {
        if parent.is_nil() {
            self.root = new;
        } else if self.node(parent).left == old {
            self.node_mut(parent).left = new;
        } else {
            self.node_mut(parent).right = new;
        }
    }

    pub(crate) fn allocate(&mut self, key: K, value: V) -> NodeIndex {
        NodeIndex(self.storage.insert(RosewoodNode::new_isolated(key, value)))
    }

    /// Links a fresh red leaf below `parent` and restores the red-black invariants.
    pub(crate) fn insert_leaf(
        &mut self,
        parent: NodeIndex,
        side: Side,
        key: K,
        value: V,
    ) -> NodeIndex {
        let new_node_pos = self.allocate(key, value);
        self.node_mut(new_node_pos).parent = parent;

        if parent.is_nil() {
            self.root = new_node_pos;
        } else {
            self.set_child(parent, side, new_node_pos);
        }

        self.fix_red_violation(new_node_pos);
        self.version = self.version.wrapping_add(1);

        new_node_pos
    }

    /// Unlinks `target` from the tree, rebalances, and hands back its payload.
    pub(crate) fn delete_node(&mut self, target: NodeIndex) -> Detached<K, V> {
        self.version = self.version.wrapping_add(1);

        let mut spliced = target;
        let mut relocated = None;

        if !self.node(target).left.is_nil() && !self.node(target).right.is_nil() {
            let successor = self.successor(target);
            relocated = Some((successor, target));
            spliced = successor;
        }

        let spliced_node = self.node(spliced);
        let replacement = if spliced_node.left.is_nil() {
            spliced_node.right
        } else {
            spliced_node.left
        };
        let parent = spliced_node.parent;
        let spliced_color = spliced_node.color;

        if !replacement.is_nil() {
            self.node_mut(replacement).parent = parent;
            self.replace_child(parent, spliced, replacement);

            if spliced_color == NodeColor::Black {
                self.fix_black_violation(replacement);
            }
        } else if parent.is_nil() {
            self.root = NodeIndex::BLACK_NIL;
        } else {
            // Leaf: it stands in as the phantom replacement during the fixup.
            if spliced_color == NodeColor::Black {
                self.fix_black_violation(spliced);
            }

            let parent = self.parent_of(spliced);
            if !parent.is_nil() {
                let side = self.side_of(spliced);
                self.set_child(parent, side, NodeIndex::BLACK_NIL);
            }
        }

        let mut removed = self.storage.remove(spliced.0);

        if relocated.is_some() {
            let target_node = self.node_mut(target);
            mem::swap(&mut target_node.key, &mut removed.key);
            mem::swap(&mut target_node.value, &mut removed.value);
        }

        Detached {
            key: removed.key,
            value: removed.value,
            relocated,
        }
    }

    fn fix_red_violation(&mut self, start_node_idx: NodeIndex) {
        let mut curr_node = start_node_idx;

        while self.color_of(self.parent_of(curr_node)) == NodeColor::Red {
            let parent_idx = self.parent_of(curr_node);
            let grandparent_idx = self.parent_of(parent_idx);
            let parent_side = self.side_of(parent_idx);
            let uncle = self.child_of(grandparent_idx, parent_side.opposite());

            if self.color_of(uncle) == NodeColor::Red {
                self.set_color(parent_idx, NodeColor::Black);
                self.set_color(uncle, NodeColor::Black);
                self.set_color(grandparent_idx, NodeColor::Red);

                curr_node = grandparent_idx;
                continue;
            }

            if self.child_of(parent_idx, parent_side.opposite()) == curr_node {
                curr_node = parent_idx;
                self.rotate(curr_node, parent_side);
            }

            let parent_idx = self.parent_of(curr_node);
            let grandparent_idx = self.parent_of(parent_idx);

            self.set_color(parent_idx, NodeColor::Black);
            self.set_color(grandparent_idx, NodeColor::Red);
            self.rotate(grandparent_idx, parent_side.opposite());
        }

        let root = self.root;
        self.set_color(root, NodeColor::Black);
    }

    fn fix_black_violation(&mut self, start_node_idx: NodeIndex) {
        let mut curr_node = start_node_idx;

        while curr_node != self.root && self.color_of(curr_node) == NodeColor::Black {
            let side = self.side_of(curr_node);
            let far = side.opposite();
            let mut sibling = self.child_of(self.parent_of(curr_node), far);

            if self.color_of(sibling) == NodeColor::Red {
                let parent_idx = self.parent_of(curr_node);
                self.set_color(sibling, NodeColor::Black);
                self.set_color(parent_idx, NodeColor::Red);
                self.rotate(parent_idx, side);
                sibling = self.child_of(self.parent_of(curr_node), far);
            }

            if self.color_of(self.child_of(sibling, side)) == NodeColor::Black
                && self.color_of(self.child_of(sibling, far)) == NodeColor::Black
            {
                self.set_color(sibling, NodeColor::Red);
                curr_node = self.parent_of(curr_node);
                continue;
            }

            if self.color_of(self.child_of(sibling, far)) == NodeColor::Black {
                let near_nephew = self.child_of(sibling, side);
                self.set_color(near_nephew, NodeColor::Black);
                self.set_color(sibling, NodeColor::Red);
                self.rotate(sibling, far);
                sibling = self.child_of(self.parent_of(curr_node), far);
            }

            let parent_idx = self.parent_of(curr_node);
            let far_nephew = self.child_of(sibling, far);
            self.set_color(sibling, self.color_of(parent_idx));
            self.set_color(parent_idx, NodeColor::Black);
            self.set_color(far_nephew, NodeColor::Black);
            self.rotate(parent_idx, side);

            curr_node = self.root;
        }

        self.set_color(curr_node, NodeColor::Black);
    }

    /// Rotates around `center`, moving it down towards `side`.
    #[inline]
    fn rotate(&mut self, center: NodeIndex, side: Side) {
        match side {
            Side::Left => self.rotate_left(center),
            Side::Right => self.rotate_right(center),
        }
    }

    fn rotate_left(&mut self, center: NodeIndex) {
        let grandparent_idx = self.node(center).parent;
        let sibling_idx = self.node(center).right;

        let c_idx = self.node(sibling_idx).left;

        self.node_mut(center).right = c_idx;
        if !c_idx.is_nil() {
            self.node_mut(c_idx).parent = center;
        }

        self.node_mut(sibling_idx).left = center;
        self.node_mut(center).parent = sibling_idx;
        self.node_mut(sibling_idx).parent = grandparent_idx;

        self.replace_child(grandparent_idx, center, sibling_idx);
    }

    fn rotate_right(&mut self, center: NodeIndex) {
        let grandparent_idx = self.node(center).parent;
        let sibling_idx = self.node(center).left;

        let c_idx = self.node(sibling_idx).right;

        self.node_mut(center).left = c_idx;
        if !c_idx.is_nil() {
            self.node_mut(c_idx).parent = center;
        }

        self.node_mut(sibling_idx).right = center;
        self.node_mut(center).parent = sibling_idx;
        self.node_mut(sibling_idx).parent = grandparent_idx;

        self.replace_child(grandparent_idx, center, sibling_idx);
    }
}

impl<K, V, C: Comparator<K>> RosewoodMap<K, V, C> {
    /// Locates the node holding `key`, or [`NodeIndex::BLACK_NIL`].
    pub(crate) fn find_node(&self, key: &K) -> Result<NodeIndex, TreeMapError> {
        let mut current_node = self.root;

        while !current_node.is_nil() {
            let curr_node_storage = self.node(current_node);

            match self.comparator.compare(key, &curr_node_storage.key)? {
                Ordering::Less => current_node = curr_node_storage.left,
                Ordering::Greater => current_node = curr_node_storage.right,
                Ordering::Equal => return Ok(current_node),
            }
        }

        Ok(NodeIndex::BLACK_NIL)
    }

    /// Like [`find_node`](Self::find_node), but also reports where a missing key
    /// would be attached. On an empty map the key is compared with itself so that
    /// keys the comparator rejects never get stored.
    pub(crate) fn search(&self, key: &K) -> Result<Search, TreeMapError> {
        if self.root.is_nil() {
            self.comparator.compare(key, key)?;
            return Ok(Search::Vacant(NodeIndex::BLACK_NIL, Side::Left));
        }

        let mut current_node = self.root;

        loop {
            let curr_node_storage = self.node(current_node);

            let (side, next) = match self.comparator.compare(key, &curr_node_storage.key)? {
                Ordering::Less => (Side::Left, curr_node_storage.left),
                Ordering::Greater => (Side::Right, curr_node_storage.right),
                Ordering::Equal => return Ok(Search::Found(current_node)),
            };

            if next.is_nil() {
                return Ok(Search::Vacant(current_node, side));
            }

            current_node = next;
        }
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &K) -> Result<Option<&V>, TreeMapError> {
        let idx = self.find_node(key)?;

        Ok(self.entry_at(idx).map(|(_, value)| value))
    }

    pub fn get_mut(&mut self, key: &K) -> Result<Option<&mut V>, TreeMapError> {
        let idx = self.find_node(key)?;

        if idx.is_nil() {
            return Ok(None);
        }

        Ok(Some(&mut self.node_mut(idx).value))
    }

    /// Returns the stored key and value matching `key`.
    pub fn get_key_value(&self, key: &K) -> Result<Option<(&K, &V)>, TreeMapError> {
        let idx = self.find_node(key)?;

        Ok(self.entry_at(idx))
    }

    pub fn contains_key(&self, key: &K) -> Result<bool, TreeMapError> {
        Ok(!self.find_node(key)?.is_nil())
    }

    /// Associates `value` with `key`.
    ///
    /// If the key was already present its value is replaced in place and the previous
    /// value returned; the tree's shape and [`version`](Self::version) are left untouched.
    pub fn put(&mut self, key: K, value: V) -> Result<Option<V>, TreeMapError> {
        match self.search(&key)? {
            Search::Found(idx) => Ok(Some(mem::replace(&mut self.node_mut(idx).value, value))),
            Search::Vacant(parent, side) => {
                self.insert_leaf(parent, side, key, value);
                Ok(None)
            }
        }
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Result<Option<V>, TreeMapError> {
        Ok(self.remove_entry(key)?.map(|(_, value)| value))
    }

    /// Removes `key`, returning the stored key and its value.
    pub fn remove_entry(&mut self, key: &K) -> Result<Option<(K, V)>, TreeMapError> {
        let idx = self.find_node(key)?;

        if idx.is_nil() {
            return Ok(None);
        }

        let removed = self.delete_node(idx);
        Ok(Some((removed.key, removed.value)))
    }
}

impl<K, V, C: Default> Default for RosewoodMap<K, V, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}
