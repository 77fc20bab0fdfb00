//! GET operations for OrderedTree.
//!
//! This module contains the read-only searches: exact `find` and
//! `lower_bound`, each in a comparator form and a probe-closure form for
//! tolerant range matching.

use std::cmp::Ordering;

use crate::compare::Compare;
use crate::error::{KeyResult, TreeError};
use crate::iteration::Cursor;
use crate::node::node_find;
use crate::types::{OrderedTree, RawTree};

impl<T> RawTree<T> {
    /// Cursor at the first node level where an element matches, if any.
    pub(crate) fn find_by<F>(&self, mut probe: F) -> KeyResult<Cursor>
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut cursor = Cursor::with_height(self.height);
        let mut n = self.root;

        loop {
            let node = self.node(n)?;
            let (i, equal) = node_find(node.vals(), &mut probe);
            cursor.push(n, i);
            if equal {
                return Ok(cursor);
            }
            match node.child(i) {
                Some(child) => n = child,
                None => return Err(TreeError::NotFound),
            }
        }
    }

    /// Cursor at the first element not less than the target, or the end.
    pub(crate) fn lower_bound_by<F>(&self, mut probe: F) -> Cursor
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut cursor = Cursor::with_height(self.height);
        if self.size == 0 {
            return cursor;
        }

        let mut n = self.root;
        while let Some(node) = self.arena.get(n) {
            let (i, _) = node_find(node.vals(), &mut probe);
            cursor.push(n, i);
            match node.child(i) {
                Some(child) => n = child,
                None => break,
            }
        }

        // Ran off the end of the leaf: the answer is the deepest ancestor
        // frame still in bounds. After an exact match on an upper level that
        // is the matching separator; with no match it is the nearest
        // separator greater than the target, and past the last element it
        // is the end.
        self.settle(&mut cursor);
        cursor
    }
}

impl<T, C: Compare<T>> OrderedTree<T, C> {
    /// Cursor at the element comparing equal to `target`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::{OrderedTree, TreeError};
    ///
    /// let tree: OrderedTree<i32> = [10, 20, 30].into_iter().collect();
    /// let cursor = tree.find(&20).unwrap();
    /// assert_eq!(tree.get(&cursor), Some(&20));
    /// assert_eq!(tree.find(&25), Err(TreeError::NotFound));
    /// ```
    pub fn find(&self, target: &T) -> KeyResult<Cursor> {
        let cmp = &self.cmp;
        self.raw.find_by(|stored| cmp.compare(stored, target))
    }

    /// Cursor at an element for which `probe` returns `Equal`.
    ///
    /// `probe` orders a stored element relative to the thing searched for,
    /// and must be consistent with the tree's ordering. When several
    /// elements match, the one found highest in the tree wins; use
    /// [`OrderedTree::lower_bound_by`] for the first of them.
    pub fn find_by<F>(&self, probe: F) -> KeyResult<Cursor>
    where
        F: FnMut(&T) -> Ordering,
    {
        self.raw.find_by(probe)
    }

    /// True if an element comparing equal to `target` is stored.
    pub fn contains(&self, target: &T) -> bool {
        self.find(target).is_ok()
    }

    /// Cursor at the smallest element not less than `target`, or the end
    /// cursor if every element is less.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::OrderedTree;
    ///
    /// let tree: OrderedTree<i32> = [10, 20, 30].into_iter().collect();
    /// assert_eq!(tree.get(&tree.lower_bound(&15)), Some(&20));
    /// assert_eq!(tree.get(&tree.lower_bound(&20)), Some(&20));
    /// assert!(tree.lower_bound(&31).is_end());
    /// ```
    pub fn lower_bound(&self, target: &T) -> Cursor {
        let cmp = &self.cmp;
        self.raw.lower_bound_by(|stored| cmp.compare(stored, target))
    }

    /// Cursor at the first element for which `probe` does not return `Less`.
    ///
    /// With a probe that reports `Equal` for a whole run of elements this is
    /// the start of the run, which makes range scans a `lower_bound_by`
    /// followed by iteration while the probe stays `Equal`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::OrderedTree;
    ///
    /// let tree: OrderedTree<u32> = (0..100).collect();
    /// // Everything in the forties
    /// let probe = |v: &u32| (v / 10).cmp(&4);
    /// let forties: Vec<_> = tree
    ///     .iter_from(tree.lower_bound_by(probe))
    ///     .take_while(|v| probe(*v).is_eq())
    ///     .copied()
    ///     .collect();
    /// assert_eq!(forties, (40..50).collect::<Vec<_>>());
    /// ```
    pub fn lower_bound_by<F>(&self, probe: F) -> Cursor
    where
        F: FnMut(&T) -> Ordering,
    {
        self.raw.lower_bound_by(probe)
    }
}
