//! Detached cursors.
//!
//! A [`Cursor`] remembers positions inside a map without borrowing it, so the map can
//! be modified between steps. Each step re-checks the map's modification counter and
//! refuses to continue once the map changed structurally behind the cursor.

use crate::{Direction, NodeIndex, RosewoodMap, TreeMapError};

/// A fail-fast position in a map or range view.
///
/// The cursor must always be used with the map it was created from.
///
/// ```rust
/// use rosewood_map::{RosewoodMap, TreeMapError};
///
/// let mut map: RosewoodMap<i32, ()> = [(1, ()), (2, ()), (3, ())].into_iter().collect();
/// let mut cursor = map.cursor();
///
/// assert_eq!(cursor.next_key(&map), Ok(Some(&1)));
/// map.put(4, ()).unwrap();
/// assert!(matches!(
///     cursor.next_key(&map),
///     Err(TreeMapError::ConcurrentModification { .. })
/// ));
/// ```
#[derive(Debug, Clone)]
pub struct Cursor {
    next: NodeIndex,
    last_returned: NodeIndex,
    fence: NodeIndex,
    expected_version: u64,
    direction: Direction,
}

impl Cursor {
    pub(crate) fn new(
        first: NodeIndex,
        fence: NodeIndex,
        version: u64,
        direction: Direction,
    ) -> Self {
        Self {
            next: first,
            last_returned: NodeIndex::BLACK_NIL,
            fence,
            expected_version: version,
            direction,
        }
    }

    /// Whether another step would yield an entry, assuming the map is unchanged.
    #[must_use]
    pub fn has_next(&self) -> bool {
        !self.next.is_nil() && self.next != self.fence
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn check_version<K, V, C>(&self, map: &RosewoodMap<K, V, C>) -> Result<(), TreeMapError> {
        let found = map.version();

        if found != self.expected_version {
            tracing::debug!(
                expected = self.expected_version,
                found,
                "cursor detected a structural modification"
            );

            return Err(TreeMapError::ConcurrentModification {
                expected: self.expected_version,
                found,
            });
        }

        Ok(())
    }

    /// Advances and returns the next entry, or `None` past the end.
    ///
    /// # Errors
    ///
    /// [`TreeMapError::ConcurrentModification`] if `map` was structurally modified since
    /// the cursor was created or last removed an entry.
    pub fn next_entry<'m, K, V, C>(
        &mut self,
        map: &'m RosewoodMap<K, V, C>,
    ) -> Result<Option<(&'m K, &'m V)>, TreeMapError> {
        self.check_version(map)?;

        if !self.has_next() {
            return Ok(None);
        }

        let current = self.next;
        self.next = match self.direction {
            Direction::Ascending => map.successor(current),
            Direction::Descending => map.predecessor(current),
        };
        self.last_returned = current;

        Ok(map.entry_at(current))
    }

    pub fn next_key<'m, K, V, C>(
        &mut self,
        map: &'m RosewoodMap<K, V, C>,
    ) -> Result<Option<&'m K>, TreeMapError> {
        Ok(self.next_entry(map)?.map(|(key, _)| key))
    }

    pub fn next_value<'m, K, V, C>(
        &mut self,
        map: &'m RosewoodMap<K, V, C>,
    ) -> Result<Option<&'m V>, TreeMapError> {
        Ok(self.next_entry(map)?.map(|(_, value)| value))
    }

    /// Removes the entry returned by the last step and returns it.
    ///
    /// The cursor stays usable afterwards.
    ///
    /// # Errors
    ///
    /// - [`TreeMapError::NoCurrentElement`] if nothing was returned since creation or the
    ///   previous removal.
    /// - [`TreeMapError::ConcurrentModification`] as for [`next_entry`](Self::next_entry).
    pub fn remove<K, V, C>(
        &mut self,
        map: &mut RosewoodMap<K, V, C>,
    ) -> Result<(K, V), TreeMapError> {
        if self.last_returned.is_nil() {
            return Err(TreeMapError::NoCurrentElement);
        }

        self.check_version(map)?;

        let removed = map.delete_node(self.last_returned);
        self.next = removed.retarget(self.next);
        self.fence = removed.retarget(self.fence);
        self.last_returned = NodeIndex::BLACK_NIL;
        self.expected_version = map.version();

        Ok((removed.key, removed.value))
    }
}

impl<K, V, C> RosewoodMap<K, V, C> {
    /// Ascending cursor positioned before the first entry.
    pub fn cursor(&self) -> Cursor {
        Cursor::new(
            self.first_node(),
            NodeIndex::BLACK_NIL,
            self.version(),
            Direction::Ascending,
        )
    }

    /// Descending cursor positioned after the last entry.
    pub fn descending_cursor(&self) -> Cursor {
        Cursor::new(
            self.last_node(),
            NodeIndex::BLACK_NIL,
            self.version(),
            Direction::Descending,
        )
    }
}
