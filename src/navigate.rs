use core::cmp::Ordering;

use alloc::vec::Vec;

use crate::{Comparator, NodeIndex, RosewoodMap, Side, TreeMapError};

impl<K, V, C> RosewoodMap<K, V, C> {
    fn leftmost(&self, mut idx: NodeIndex) -> NodeIndex {
        while !self.child_of(idx, Side::Left).is_nil() {
            idx = self.child_of(idx, Side::Left);
        }

        idx
    }

    fn rightmost(&self, mut idx: NodeIndex) -> NodeIndex {
        while !self.child_of(idx, Side::Right).is_nil() {
            idx = self.child_of(idx, Side::Right);
        }

        idx
    }

    pub(crate) fn first_node(&self) -> NodeIndex {
        self.leftmost(self.root)
    }

    pub(crate) fn last_node(&self) -> NodeIndex {
        self.rightmost(self.root)
    }

    /// In-order successor of `idx`, or nil past the last node.
    pub(crate) fn successor(&self, idx: NodeIndex) -> NodeIndex {
        let right = self.child_of(idx, Side::Right);
        if !right.is_nil() {
            return self.leftmost(right);
        }

        let mut child = idx;
        let mut parent = self.parent_of(idx);
        while !parent.is_nil() && child == self.child_of(parent, Side::Right) {
            child = parent;
            parent = self.parent_of(parent);
        }

        parent
    }

    /// In-order predecessor of `idx`, or nil before the first node.
    pub(crate) fn predecessor(&self, idx: NodeIndex) -> NodeIndex {
        let left = self.child_of(idx, Side::Left);
        if !left.is_nil() {
            return self.rightmost(left);
        }

        let mut child = idx;
        let mut parent = self.parent_of(idx);
        while !parent.is_nil() && child == self.child_of(parent, Side::Left) {
            child = parent;
            parent = self.parent_of(parent);
        }

        parent
    }

    /// Every node index in ascending key order.
    pub(crate) fn in_order(&self) -> Vec<NodeIndex> {
        let mut order = Vec::with_capacity(self.len());
        let mut stack = Vec::new();
        let mut curr = self.root;

        loop {
            while !curr.is_nil() {
                stack.push(curr);
                curr = self.node(curr).left_child();
            }

            let Some(node) = stack.pop() else {
                break;
            };

            order.push(node);
            curr = self.node(node).right_child();
        }

        order
    }

    /// Smallest key.
    ///
    /// # Errors
    ///
    /// [`TreeMapError::EmptyCollection`] when the map is empty.
    pub fn first_key(&self) -> Result<&K, TreeMapError> {
        self.first_entry()
            .map(|(key, _)| key)
            .ok_or(TreeMapError::EmptyCollection)
    }

    /// Largest key.
    ///
    /// # Errors
    ///
    /// [`TreeMapError::EmptyCollection`] when the map is empty.
    pub fn last_key(&self) -> Result<&K, TreeMapError> {
        self.last_entry()
            .map(|(key, _)| key)
            .ok_or(TreeMapError::EmptyCollection)
    }

    pub fn first_entry(&self) -> Option<(&K, &V)> {
        self.entry_at(self.first_node())
    }

    pub fn last_entry(&self) -> Option<(&K, &V)> {
        self.entry_at(self.last_node())
    }
}

impl<K, V, C: Comparator<K>> RosewoodMap<K, V, C> {
    /// Greatest node whose key is below `key` (or equal to it when `inclusive`).
    pub(crate) fn floor_node(&self, key: &K, inclusive: bool) -> Result<NodeIndex, TreeMapError> {
        let mut current = self.root;
        let mut candidate = NodeIndex::BLACK_NIL;

        while !current.is_nil() {
            let node = self.node(current);

            match self.comparator.compare(key, &node.key)? {
                Ordering::Greater => {
                    candidate = current;
                    current = node.right_child();
                }
                Ordering::Equal if inclusive => return Ok(current),
                _ => current = node.left_child(),
            }
        }

        Ok(candidate)
    }

    /// Least node whose key is above `key` (or equal to it when `inclusive`).
    pub(crate) fn ceiling_node(&self, key: &K, inclusive: bool) -> Result<NodeIndex, TreeMapError> {
        let mut current = self.root;
        let mut candidate = NodeIndex::BLACK_NIL;

        while !current.is_nil() {
            let node = self.node(current);

            match self.comparator.compare(key, &node.key)? {
                Ordering::Less => {
                    candidate = current;
                    current = node.left_child();
                }
                Ordering::Equal if inclusive => return Ok(current),
                _ => current = node.right_child(),
            }
        }

        Ok(candidate)
    }

    /// Greatest entry with a key less than or equal to `key`.
    pub fn floor_entry(&self, key: &K) -> Result<Option<(&K, &V)>, TreeMapError> {
        Ok(self.entry_at(self.floor_node(key, true)?))
    }

    /// Least entry with a key greater than or equal to `key`.
    pub fn ceiling_entry(&self, key: &K) -> Result<Option<(&K, &V)>, TreeMapError> {
        Ok(self.entry_at(self.ceiling_node(key, true)?))
    }

    /// Least entry with a key strictly greater than `key`.
    pub fn higher_entry(&self, key: &K) -> Result<Option<(&K, &V)>, TreeMapError> {
        Ok(self.entry_at(self.ceiling_node(key, false)?))
    }

    /// Greatest entry with a key strictly less than `key`.
    pub fn lower_entry(&self, key: &K) -> Result<Option<(&K, &V)>, TreeMapError> {
        Ok(self.entry_at(self.floor_node(key, false)?))
    }

    pub fn floor_key(&self, key: &K) -> Result<Option<&K>, TreeMapError> {
        Ok(self.floor_entry(key)?.map(|(key, _)| key))
    }

    pub fn ceiling_key(&self, key: &K) -> Result<Option<&K>, TreeMapError> {
        Ok(self.ceiling_entry(key)?.map(|(key, _)| key))
    }

    pub fn higher_key(&self, key: &K) -> Result<Option<&K>, TreeMapError> {
        Ok(self.higher_entry(key)?.map(|(key, _)| key))
    }

    pub fn lower_key(&self, key: &K) -> Result<Option<&K>, TreeMapError> {
        Ok(self.lower_entry(key)?.map(|(key, _)| key))
    }
}
