//! Construction and teardown logic for OrderedTree.
//!
//! This module contains capacity validation, the constructors for the
//! different comparator flavours, and the `Drop` implementation that hands
//! remaining elements to the destroy callback.

use std::fmt;

use crate::compact_arena::CompactArena;
use crate::compare::{Compare, NaturalOrder};
use crate::error::{InitResult, TreeError, TreeResultExt};
use crate::types::{
    DestroyFn, Node, OrderedTree, RawTree, DEFAULT_LEAF_CAPACITY, MIN_LEAF_CAPACITY,
};

impl<T> RawTree<T> {
    /// Create an empty structure whose leaves hold `leaf_max` elements.
    pub(crate) fn new(leaf_max: usize) -> InitResult<Self> {
        if leaf_max < MIN_LEAF_CAPACITY {
            return Err(TreeError::invalid_capacity(leaf_max, MIN_LEAF_CAPACITY));
        }

        let mut arena = CompactArena::new();
        let root = Node::new_leaf(leaf_max)
            .and_then(|leaf| arena.allocate(leaf))
            .with_operation("create")?;

        Ok(Self {
            root,
            size: 0,
            height: 1,
            leaf_max,
            inode_max: leaf_max / 2,
            arena,
        })
    }
}

impl<T, C: Compare<T>> OrderedTree<T, C> {
    /// Create an empty tree with page-sized nodes.
    ///
    /// Aborts like any other collection if the first leaf cannot be
    /// allocated; use [`OrderedTree::try_new`] to observe that failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new(|a: &u64, b: &u64| b.cmp(a));
    /// tree.insert(1).unwrap();
    /// tree.insert(2).unwrap();
    /// assert_eq!(tree.first(), Some(&2));
    /// ```
    pub fn new(cmp: C) -> Self {
        match Self::try_new(cmp) {
            Ok(tree) => tree,
            Err(e) => panic!("failed to allocate tree root: {}", e),
        }
    }

    /// Create an empty tree with page-sized nodes, reporting allocation
    /// failure as `TreeError::NoMemory`.
    pub fn try_new(cmp: C) -> InitResult<Self> {
        Self::with_capacity(DEFAULT_LEAF_CAPACITY, cmp)
    }

    /// Create an empty tree whose leaves hold up to `leaf_capacity` elements
    /// and whose internal nodes hold half as many.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::{NaturalOrder, OrderedTree};
    ///
    /// let tree = OrderedTree::<i32, _>::with_capacity(8, NaturalOrder).unwrap();
    /// assert_eq!(tree.leaf_capacity(), 8);
    /// assert_eq!(tree.inode_capacity(), 4);
    /// assert!(OrderedTree::<i32, _>::with_capacity(4, NaturalOrder).is_err());
    /// ```
    pub fn with_capacity(leaf_capacity: usize, cmp: C) -> InitResult<Self> {
        Ok(Self {
            cmp,
            destroy: None,
            raw: RawTree::new(leaf_capacity)?,
        })
    }

    /// Install a callback that receives every element still stored when the
    /// tree is cleared or dropped. Elements returned by `remove` are handed
    /// to the caller instead and never reach the callback.
    pub fn with_destroy<F>(mut self, destroy: F) -> Self
    where
        F: FnMut(T) + 'static,
    {
        self.destroy = Some(Box::new(destroy) as DestroyFn<T>);
        self
    }

    /// The comparator this tree orders its elements with.
    pub fn comparator(&self) -> &C {
        &self.cmp
    }
}

impl<T: Ord> OrderedTree<T, NaturalOrder> {
    /// Create an empty tree ordered by `T`'s `Ord` implementation.
    pub fn natural() -> Self {
        Self::new(NaturalOrder)
    }
}

impl<T: Ord> Default for OrderedTree<T, NaturalOrder> {
    fn default() -> Self {
        Self::natural()
    }
}

impl<T: Ord> FromIterator<T> for OrderedTree<T, NaturalOrder> {
    /// Collect into a tree; elements equal to one already collected are dropped.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::natural();
        tree.extend(iter);
        tree
    }
}

impl<T, C: Compare<T>> Extend<T> for OrderedTree<T, C> {
    /// Insert every element; elements equal to a stored one are dropped.
    ///
    /// # Panics
    ///
    /// Panics if a node cannot be allocated, like the std collections abort.
    /// Use [`OrderedTree::try_insert`] to observe allocation failure.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for elem in iter {
            match self.insert(elem) {
                Ok(()) | Err(TreeError::AlreadyExists) => {}
                Err(e) => panic!("failed to extend tree: {}", e),
            }
        }
    }
}

impl<T, C> Drop for OrderedTree<T, C> {
    fn drop(&mut self) {
        match self.destroy.as_mut() {
            Some(destroy) => {
                log::debug!("dropping tree, destroying {} elements", self.raw.size);
                self.raw.drain_into(&mut **destroy);
            }
            None => self.raw.drain_into(&mut |elem| drop(elem)),
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for OrderedTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedTree")
            .field("size", &self.raw.size)
            .field("height", &self.raw.height)
            .field("leaf_capacity", &self.raw.leaf_max)
            .field("has_destroy", &self.destroy.is_some())
            .finish()
    }
}
