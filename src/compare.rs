//! Key orderings.
//!
//! A map orders its keys through a [`Comparator`]. The comparison is fallible so
//! that orderings which are not total over their key type (floating point keys,
//! for instance) can reject the offending key instead of corrupting the tree.

use core::cmp::Ordering;

use crate::TreeMapError;

/// A total order over keys of type `K`.
///
/// Implemented by [`Natural`], [`Partial`] and by any `Fn(&K, &K) -> Ordering`
/// closure or function.
pub trait Comparator<K: ?Sized> {
    /// Orders `left` relative to `right`.
    ///
    /// Must be consistent for the lifetime of the map: a comparator that changes its
    /// answers for keys already stored breaks the ordering invariant.
    fn compare(&self, left: &K, right: &K) -> Result<Ordering, TreeMapError>;
}

/// The keys' intrinsic [`Ord`] ordering. Never fails.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Natural;

impl<K: Ord + ?Sized> Comparator<K> for Natural {
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Result<Ordering, TreeMapError> {
        Ok(left.cmp(right))
    }
}

/// The keys' intrinsic [`PartialOrd`] ordering.
///
/// Fails with [`TreeMapError::InvalidKey`] when two keys are incomparable.
/// Since a key is compared with itself before it is first stored, keys such as
/// `f64::NAN` never enter a map using this ordering.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Partial;

impl<K: PartialOrd + ?Sized> Comparator<K> for Partial {
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Result<Ordering, TreeMapError> {
        left.partial_cmp(right).ok_or(TreeMapError::InvalidKey)
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Result<Ordering, TreeMapError> {
        Ok(self(left, right))
    }
}

#[cfg(test)]
mod tests {
    use core::cmp::Ordering;

    use super::{Comparator, Natural, Partial};
    use crate::TreeMapError;

    #[test]
    pub fn natural_ordering() {
        assert_eq!(Natural.compare(&1, &2), Ok(Ordering::Less));
        assert_eq!(Natural.compare("b", "a"), Ok(Ordering::Greater));
    }

    #[test]
    pub fn partial_ordering_rejects_nan() {
        assert_eq!(Partial.compare(&1.5, &0.5), Ok(Ordering::Greater));
        assert_eq!(Partial.compare(&f64::NAN, &f64::NAN), Err(TreeMapError::InvalidKey));
    }

    #[test]
    pub fn closure_ordering() {
        let reverse = |a: &u32, b: &u32| b.cmp(a);

        assert_eq!(reverse.compare(&1, &2), Ok(Ordering::Greater));
    }
}
