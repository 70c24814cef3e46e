//! Error type shared by every fallible map, view and cursor operation.

use thiserror::Error;

/// Errors raised by [`RosewoodMap`](crate::RosewoodMap) and its views and cursors.
///
/// Every error is raised before the map is modified, so a failing call leaves
/// the tree exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeMapError {
    /// The comparator could not order the key (for example a NaN under
    /// [`Partial`](crate::Partial)).
    #[error("key cannot be ordered by the map's comparator")]
    InvalidKey,

    /// The key lies outside the bounds of the view it was given to.
    #[error("key lies outside the bounds of the view")]
    OutOfRange,

    /// A view was requested with a lower bound above its upper bound.
    #[error("lower bound of the range is greater than its upper bound")]
    InvalidRange,

    /// The map was structurally modified behind a cursor's back.
    #[error("map was modified outside the cursor (expected version {expected}, found {found})")]
    ConcurrentModification { expected: u64, found: u64 },

    /// A cursor removal was attempted without a current entry.
    #[error("cursor has no current entry to remove")]
    NoCurrentElement,

    /// A first or last key was required from an empty map or view.
    #[error("map is empty")]
    EmptyCollection,

    /// A bulk-build source was not in strictly ascending key order.
    #[error("sorted input is out of order at position {position}")]
    UnsortedInput { position: usize },

    /// A bulk-build source ran dry before yielding the announced count.
    #[error("sorted input ended after {found} of {expected} entries")]
    MissingElements { expected: usize, found: usize },
}

#[cfg(test)]
mod tests {
    use super::TreeMapError;

    #[test]
    pub fn concurrent_modification_display() {
        let error = TreeMapError::ConcurrentModification {
            expected: 3,
            found: 4,
        };

        assert_eq!(
            error.to_string(),
            "map was modified outside the cursor (expected version 3, found 4)"
        );
    }

    #[test]
    pub fn missing_elements_display() {
        let error = TreeMapError::MissingElements {
            expected: 10,
            found: 7,
        };

        assert_eq!(error.to_string(), "sorted input ended after 7 of 10 entries");
    }
}
