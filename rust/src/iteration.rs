//! Cursor and iterator implementations for OrderedTree.
//!
//! A [`Cursor`] is an explicit stack of `(node, index)` frames recording the
//! path from the root to the current element. It holds no borrow of the
//! tree: it is a plain value that the tree's methods read and advance. Any
//! mutation of the tree invalidates outstanding cursors, except the one
//! passed to `remove_with_cursor`, which is repaired in place. Using an
//! invalidated cursor is memory safe but yields unspecified positions.

use crate::types::{Node, NodeId, OrderedTree, RawTree};

// ============================================================================
// CURSOR
// ============================================================================

/// One level of a cursor: a node and an index into its elements.
///
/// In an internal frame below the current level, `index` is the child that
/// was descended into; once that subtree is exhausted the element at
/// `index` is next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Frame {
    pub(crate) node: NodeId,
    pub(crate) index: usize,
}

/// Position in an OrderedTree, or the end position.
///
/// Two cursors are equal when both are at the end, or when they record the
/// same path to the same element. `Clone` produces an independent cursor at
/// the same position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    frames: Vec<Frame>,
}

impl Cursor {
    /// An end cursor with room for a path of `height` levels.
    pub(crate) fn with_height(height: usize) -> Self {
        Self {
            frames: Vec::with_capacity(height),
        }
    }

    /// True if the cursor is past the last element.
    pub fn is_end(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of levels on the path to the current element (0 at the end).
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn top(&self) -> Option<Frame> {
        self.frames.last().copied()
    }

    pub(crate) fn top_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    pub(crate) fn push(&mut self, node: NodeId, index: usize) {
        self.frames.push(Frame { node, index });
    }

    /// Record `(node, index)` at `level`, discarding anything deeper.
    pub(crate) fn set_frame(&mut self, level: usize, node: NodeId, index: usize) {
        self.frames.truncate(level);
        self.push(node, index);
    }

    pub(crate) fn set_end(&mut self) {
        self.frames.clear();
    }
}

// ============================================================================
// CURSOR NAVIGATION
// ============================================================================

impl<T> RawTree<T> {
    /// Push frames from `node` down its leftmost edge to a leaf.
    pub(crate) fn push_leftmost(&self, cursor: &mut Cursor, mut node: NodeId) {
        loop {
            match self.arena.get(node) {
                Some(Node::Internal { children, .. }) => {
                    cursor.push(node, 0);
                    match children.first() {
                        Some(&child) => node = child,
                        None => return cursor.set_end(),
                    }
                }
                Some(Node::Leaf { .. }) => return cursor.push(node, 0),
                None => return cursor.set_end(),
            }
        }
    }

    /// Pop frames whose index has run off the end of their node.
    ///
    /// The first frame still in bounds names the next element; popping past
    /// the root leaves the cursor at the end.
    pub(crate) fn settle(&self, cursor: &mut Cursor) {
        while let Some(top) = cursor.top() {
            match self.arena.get(top.node) {
                Some(node) if top.index < node.len() => return,
                Some(_) => {
                    cursor.frames.pop();
                }
                None => return cursor.set_end(),
            }
        }
    }

    pub(crate) fn begin(&self) -> Cursor {
        let mut cursor = Cursor::with_height(self.height);
        if self.size > 0 {
            self.push_leftmost(&mut cursor, self.root);
        }
        cursor
    }

    pub(crate) fn get(&self, cursor: &Cursor) -> Option<&T> {
        let top = cursor.top()?;
        self.arena.get(top.node)?.vals().get(top.index)
    }

    /// Advance `cursor` to the next element in order.
    pub(crate) fn increment(&self, cursor: &mut Cursor) {
        let Some(top) = cursor.top() else {
            return;
        };

        match self.arena.get(top.node) {
            Some(Node::Leaf { .. }) => {
                if let Some(frame) = cursor.top_mut() {
                    frame.index += 1;
                }
                self.settle(cursor);
            }
            Some(Node::Internal { children, .. }) => {
                // Next is the smallest element right of this separator
                let next = top.index + 1;
                if let Some(frame) = cursor.top_mut() {
                    frame.index = next;
                }
                match children.get(next) {
                    Some(&child) => self.push_leftmost(cursor, child),
                    None => cursor.set_end(),
                }
            }
            None => cursor.set_end(),
        }
    }
}

impl<T, C> OrderedTree<T, C> {
    /// Cursor at the smallest element, or the end cursor if the tree is empty.
    pub fn begin(&self) -> Cursor {
        self.raw.begin()
    }

    /// The end cursor.
    pub fn end(&self) -> Cursor {
        Cursor::with_height(self.raw.height)
    }

    /// The element at `cursor`, or `None` at the end.
    pub fn get(&self, cursor: &Cursor) -> Option<&T> {
        self.raw.get(cursor)
    }

    /// Move `cursor` to the next element in ascending order. Incrementing
    /// the end cursor leaves it at the end.
    pub fn increment(&self, cursor: &mut Cursor) {
        self.raw.increment(cursor)
    }

    /// Iterate over all elements in ascending order.
    pub fn iter(&self) -> Iter<'_, T, C> {
        Iter {
            tree: self,
            cursor: self.begin(),
            remaining: self.raw.size,
        }
    }

    /// Iterate from `cursor` (inclusive) to the end.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::OrderedTree;
    ///
    /// let tree: OrderedTree<i32> = (0..10).collect();
    /// let tail: Vec<_> = tree.iter_from(tree.lower_bound(&7)).copied().collect();
    /// assert_eq!(tail, [7, 8, 9]);
    /// ```
    pub fn iter_from(&self, cursor: Cursor) -> Iter<'_, T, C> {
        Iter {
            tree: self,
            cursor,
            remaining: self.raw.size,
        }
    }

    /// The smallest element.
    pub fn first(&self) -> Option<&T> {
        self.get(&self.begin())
    }

    /// The largest element.
    pub fn last(&self) -> Option<&T> {
        let mut node = self.raw.arena.get(self.raw.root)?;
        loop {
            match node {
                Node::Internal { children, .. } => {
                    node = self.raw.arena.get(*children.last()?)?;
                }
                Node::Leaf { vals } => return vals.last(),
            }
        }
    }
}

// ============================================================================
// ITERATOR
// ============================================================================

/// Iterator over the elements of an OrderedTree in ascending order.
pub struct Iter<'a, T, C> {
    tree: &'a OrderedTree<T, C>,
    cursor: Cursor,
    /// Upper bound on the elements left to yield.
    remaining: usize,
}

impl<'a, T, C> Iter<'a, T, C> {
    /// The position of the next element this iterator will yield.
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }
}

impl<'a, T, C> Iterator for Iter<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.tree.raw.get(&self.cursor)?;
        self.tree.raw.increment(&mut self.cursor);
        self.remaining = self.remaining.saturating_sub(1);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let upper = if self.cursor.is_end() { 0 } else { self.remaining };
        (0, Some(upper))
    }
}

impl<'a, T, C> std::iter::FusedIterator for Iter<'a, T, C> {}

impl<'a, T, C> IntoIterator for &'a OrderedTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
