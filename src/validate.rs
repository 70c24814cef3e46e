use core::cmp::Ordering;

use alloc::vec::Vec;
use thiserror::Error;

use crate::{Comparator, NodeColor, NodeIndex, RosewoodMap, Side};

/// A broken red-black or ordering invariant, as found by
/// [`RosewoodMap::check_invariants`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("root node is red")]
    RedRoot,

    #[error("red node has a red child")]
    RedRedEdge,

    #[error("black height differs between subtrees ({left} on the left, {right} on the right)")]
    BlackHeightMismatch { left: usize, right: usize },

    #[error("child does not point back to its parent")]
    BrokenParentLink,

    #[error("in-order traversal is not strictly ascending")]
    OrderViolation,

    #[error("{reachable} nodes reachable from the root but the map holds {len}")]
    LengthMismatch { reachable: usize, len: usize },

    #[error("stored keys cannot be ordered by the comparator")]
    IncomparableKeys,
}

impl<K, V, C: Comparator<K>> RosewoodMap<K, V, C> {
    /// Walks the whole tree and verifies every red-black invariant, the parent links,
    /// the key order and the element count.
    ///
    /// Returns the black height: the number of black nodes on any path from the root
    /// down to a leaf, not counting the nil leaves. Runs in linear time.
    pub fn check_invariants(&self) -> Result<usize, InvariantViolation> {
        if self.root.is_nil() {
            return match self.len() {
                0 => Ok(0),
                len => Err(InvariantViolation::LengthMismatch { reachable: 0, len }),
            };
        }

        if self.color_of(self.root) == NodeColor::Red {
            return Err(InvariantViolation::RedRoot);
        }

        if !self.parent_of(self.root).is_nil() {
            return Err(InvariantViolation::BrokenParentLink);
        }

        let black_height = self.check_subtree(self.root)?;

        let order = self.in_order();
        if order.len() != self.len() {
            return Err(InvariantViolation::LengthMismatch {
                reachable: order.len(),
                len: self.len(),
            });
        }

        self.check_order(&order)?;

        Ok(black_height)
    }

    /// Black height of the subtree under `idx`, checked with an explicit post-order walk.
    fn check_subtree(&self, idx: NodeIndex) -> Result<usize, InvariantViolation> {
        let mut heights: Vec<usize> = Vec::new();
        let mut stack = alloc::vec![(idx, false)];

        while let Some((current, visited)) = stack.pop() {
            if current.is_nil() {
                heights.push(0);
                continue;
            }

            if !visited {
                self.check_links(current)?;

                stack.push((current, true));
                stack.push((self.child_of(current, Side::Right), false));
                stack.push((self.child_of(current, Side::Left), false));
                continue;
            }

            let (Some(right), Some(left)) = (heights.pop(), heights.pop()) else {
                return Err(InvariantViolation::BrokenParentLink);
            };

            if left != right {
                return Err(InvariantViolation::BlackHeightMismatch { left, right });
            }

            let own = usize::from(self.color_of(current) == NodeColor::Black);
            heights.push(left + own);
        }

        heights.pop().ok_or(InvariantViolation::BrokenParentLink)
    }

    fn check_links(&self, idx: NodeIndex) -> Result<(), InvariantViolation> {
        for side in [Side::Left, Side::Right] {
            let child = self.child_of(idx, side);
            if child.is_nil() {
                continue;
            }

            if self.parent_of(child) != idx {
                return Err(InvariantViolation::BrokenParentLink);
            }

            if self.color_of(idx) == NodeColor::Red && self.color_of(child) == NodeColor::Red {
                return Err(InvariantViolation::RedRedEdge);
            }
        }

        Ok(())
    }

    fn check_order(&self, order: &[NodeIndex]) -> Result<(), InvariantViolation> {
        for pair in order.windows(2) {
            let ordering = self
                .comparator
                .compare(&self.node(pair[0]).key, &self.node(pair[1]).key)
                .map_err(|_| InvariantViolation::IncomparableKeys)?;

            if ordering != Ordering::Less {
                return Err(InvariantViolation::OrderViolation);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::InvariantViolation;
    use crate::{NodeColor, RosewoodMap};

    fn sample() -> RosewoodMap<u32, ()> {
        let mut map = RosewoodMap::new();
        for key in [10, 5, 15, 3, 7, 12, 20] {
            map.put(key, ()).unwrap();
        }
        map
    }

    #[test]
    pub fn healthy_tree_reports_black_height() {
        let map = sample();

        assert_eq!(map.check_invariants(), Ok(2));
    }

    #[test]
    pub fn red_root_is_reported() {
        let mut map = sample();
        let root = map.root;

        map.node_mut(root).color = NodeColor::Red;

        assert_eq!(map.check_invariants(), Err(InvariantViolation::RedRoot));
    }

    #[test]
    pub fn uneven_black_height_is_reported() {
        let mut map = sample();
        let leftmost = map.first_node();

        map.node_mut(leftmost).color = NodeColor::Black;

        assert!(matches!(
            map.check_invariants(),
            Err(InvariantViolation::BlackHeightMismatch { .. })
        ));
    }

    #[test]
    pub fn swapped_keys_are_reported() {
        let mut map = sample();
        let first = map.first_node();

        map.node_mut(first).key = 100;

        assert_eq!(map.check_invariants(), Err(InvariantViolation::OrderViolation));
    }

    #[test]
    pub fn violation_messages() {
        let violation = InvariantViolation::LengthMismatch { reachable: 3, len: 4 };

        assert_eq!(violation.to_string(), "3 nodes reachable from the root but the map holds 4");
    }
}
