//! Three-way comparators for OrderedTree.
//!
//! A comparator is called as `compare(stored, target)` and answers how the
//! element already in the tree orders relative to the one being searched for.
//!
//! Comparators do not have to be strict total orders over targets. A
//! *wildcard* comparator may report `Equal` for a whole run of consecutive
//! stored elements (for example "every key with this prefix"). Node searches
//! keep scanning left after an equal hit, so `lower_bound_by` lands on the
//! first element of such a run. Stored elements themselves must still
//! be strictly ordered among each other, since insertion rejects equal keys.

use std::cmp::Ordering;

/// Three-way comparison between a stored element and a target.
pub trait Compare<T: ?Sized> {
    /// Order `stored` relative to `target`.
    fn compare(&self, stored: &T, target: &T) -> Ordering;
}

/// Comparator using the element type's `Ord` implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Compare<T> for NaturalOrder {
    #[inline]
    fn compare(&self, stored: &T, target: &T) -> Ordering {
        stored.cmp(target)
    }
}

impl<T: ?Sized, F> Compare<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, stored: &T, target: &T) -> Ordering {
        self(stored, target)
    }
}

/// Comparator carrying user data that is passed to every comparison.
///
/// ```
/// use ordtree::{ContextCompare, OrderedTree};
///
/// // Order strings by their lowercase form.
/// let cmp = ContextCompare::new(true, |a: &String, b: &String, fold: &bool| {
///     if *fold {
///         a.to_lowercase().cmp(&b.to_lowercase())
///     } else {
///         a.cmp(b)
///     }
/// });
/// let mut tree = OrderedTree::new(cmp);
/// tree.insert("Beta".to_string()).unwrap();
/// assert!(tree.insert("beta".to_string()).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ContextCompare<D, F> {
    data: D,
    f: F,
}

impl<D, F> ContextCompare<D, F> {
    pub fn new(data: D, f: F) -> Self {
        Self { data, f }
    }

    /// The data handed to every comparison.
    pub fn data(&self) -> &D {
        &self.data
    }
}

impl<T: ?Sized, D, F> Compare<T> for ContextCompare<D, F>
where
    F: Fn(&T, &T, &D) -> Ordering,
{
    #[inline]
    fn compare(&self, stored: &T, target: &T) -> Ordering {
        (self.f)(stored, target, &self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_and_natural_agree() {
        let by_closure = |a: &i32, b: &i32| a.cmp(b);
        for (a, b) in [(1, 2), (2, 2), (3, 2)] {
            assert_eq!(by_closure.compare(&a, &b), NaturalOrder.compare(&a, &b));
        }
    }

    #[test]
    fn test_context_is_passed_through() {
        let modulo = ContextCompare::new(10u32, |a: &u32, b: &u32, m: &u32| (a % m).cmp(&(b % m)));
        assert_eq!(modulo.compare(&13, &3), Ordering::Equal);
        assert_eq!(modulo.compare(&19, &11), Ordering::Greater);
        assert_eq!(*modulo.data(), 10);
    }
}
