//! DELETE operations for OrderedTree.
//!
//! Removal is a single downward pass mirroring insertion: before entering a
//! child, the child is given more than its minimum number of elements by
//! rotating one in from a sibling or by merging with a sibling. The node the
//! element is finally taken from can therefore always spare it.
//!
//! An optional cursor can be threaded through the pass. Its frames are
//! recorded level by level and adjusted at every merge, so that afterwards
//! it points at the element that followed the removed one.

use std::cmp::Ordering;

use crate::compare::Compare;
use crate::error::{ModifyResult, TreeError, TreeResult};
use crate::iteration::Cursor;
use crate::node::node_find;
use crate::types::{Node, NodeId, OrderedTree, RawTree};

impl<T> RawTree<T> {
    /// Remove the first element for which `probe` returns `Equal`.
    ///
    /// With a cursor, the cursor is rebuilt along the search path and ends
    /// up at the successor of the removed element (or the end). On
    /// `NotFound` it is left at the end. Rotations and merges done on the
    /// way down stay in place even when nothing is found.
    pub(crate) fn remove_by<F>(
        &mut self,
        mut probe: F,
        mut cursor: Option<&mut Cursor>,
    ) -> ModifyResult<T>
    where
        F: FnMut(&T) -> Ordering,
    {
        if let Some(c) = cursor.as_deref_mut() {
            c.set_end();
        }

        let mut n = self.root;
        let mut level = 0;

        loop {
            let (i, equal, is_leaf) = {
                let node = self.node(n)?;
                let (i, equal) = node_find(node.vals(), &mut probe);
                (i, equal, node.is_leaf())
            };
            if let Some(c) = cursor.as_deref_mut() {
                c.set_frame(level, n, i);
            }

            if is_leaf {
                if !equal {
                    if let Some(c) = cursor {
                        c.set_end();
                    }
                    return Err(TreeError::NotFound);
                }

                let out = self.node_mut(n)?.vals_mut().remove(i);
                self.size -= 1;

                if let Some(c) = cursor {
                    // The successor slid into slot i, unless that was the
                    // last slot and it lives in an ancestor
                    self.settle(c);
                }
                return Ok(out);
            }

            if equal {
                let lhs = self.child_of(n, i)?;
                let rhs = self.child_of(n, i + 1)?;

                if self.is_minimal(lhs)? && self.is_minimal(rhs)? {
                    // Pull the separator down between its children and keep
                    // looking in the merged node
                    let (merged, collapsed) = self.merge(n, i)?;
                    if !collapsed {
                        level += 1;
                    }
                    n = merged;
                    continue;
                }

                // Replace from whichever side is larger, the left on ties
                let from_left = self.node(lhs)?.len() >= self.node(rhs)?.len();
                let replacement = if from_left {
                    self.remove_max(lhs)?
                } else {
                    self.remove_min(rhs)?
                };
                let out = std::mem::replace(&mut self.node_mut(n)?.vals_mut()[i], replacement);
                self.size -= 1;

                if let Some(c) = cursor {
                    if from_left {
                        // The predecessor sits here now; move on to the
                        // leftmost element of the right subtree
                        self.increment(c);
                    }
                }
                return Ok(out);
            }

            // Not in this node, so under child i
            let child = self.child_of(n, i)?;
            if !self.is_minimal(child)? {
                n = child;
                level += 1;
                continue;
            }

            let count = self.node(n)?.len();
            if i > 0 && !self.is_minimal(self.child_of(n, i - 1)?)? {
                self.rotate_right(n, i)?;
                n = child;
                level += 1;
            } else if i < count && !self.is_minimal(self.child_of(n, i + 1)?)? {
                self.rotate_left(n, i)?;
                n = child;
                level += 1;
            } else {
                // Both neighbours minimal: merge, keeping the child at index
                // i unless it is the last one
                let at = if i < count { i } else { i - 1 };
                if at != i {
                    if let Some(frame) = cursor.as_deref_mut().and_then(Cursor::top_mut) {
                        frame.index = at;
                    }
                }
                let (merged, collapsed) = self.merge(n, at)?;
                if !collapsed {
                    level += 1;
                }
                n = merged;
            }
        }
    }

    /// Remove and return the smallest element under `n`, which must hold
    /// more than its minimum.
    fn remove_min(&mut self, mut n: NodeId) -> TreeResult<T> {
        while let Some(first) = self.node(n)?.child(0) {
            if !self.is_minimal(first)? {
                n = first;
            } else if !self.is_minimal(self.child_of(n, 1)?)? {
                self.rotate_left(n, 0)?;
                n = first;
            } else {
                n = self.merge(n, 0)?.0;
            }
        }

        let vals = self.node_mut(n)?.vals_mut();
        if vals.is_empty() {
            return Err(TreeError::corrupted_tree("Remove", "empty leaf below a separator"));
        }
        Ok(vals.remove(0))
    }

    /// Remove and return the largest element under `n`, which must hold
    /// more than its minimum.
    fn remove_max(&mut self, mut n: NodeId) -> TreeResult<T> {
        loop {
            let node = self.node(n)?;
            let count = node.len();
            let Some(last) = node.child(count) else {
                break;
            };

            if !self.is_minimal(last)? {
                n = last;
            } else if !self.is_minimal(self.child_of(n, count - 1)?)? {
                self.rotate_right(n, count)?;
                n = last;
            } else {
                n = self.merge(n, count - 1)?.0;
            }
        }

        self.node_mut(n)?
            .vals_mut()
            .pop()
            .ok_or_else(|| TreeError::corrupted_tree("Remove", "empty leaf below a separator"))
    }

    fn child_of(&self, n: NodeId, i: usize) -> TreeResult<NodeId> {
        self.node(n)?.child(i).ok_or_else(|| {
            TreeError::corrupted_tree("Node", &format!("no child {} under {}", i, n))
        })
    }

    /// Move the last element of child `i - 1` up into the parent, and the
    /// parent's separator down to the front of child `i`.
    fn rotate_right(&mut self, parent: NodeId, i: usize) -> TreeResult<()> {
        let lhs = self.child_of(parent, i - 1)?;
        let child = self.child_of(parent, i)?;

        let (val, grandchild) = self
            .node_mut(lhs)?
            .pop_back()
            .ok_or_else(|| TreeError::corrupted_tree("Rotate", "left sibling is empty"))?;
        let separator = std::mem::replace(&mut self.node_mut(parent)?.vals_mut()[i - 1], val);
        self.node_mut(child)?.push_front(separator, grandchild);
        Ok(())
    }

    /// Move the first element of child `i + 1` up into the parent, and the
    /// parent's separator down to the end of child `i`.
    fn rotate_left(&mut self, parent: NodeId, i: usize) -> TreeResult<()> {
        let child = self.child_of(parent, i)?;
        let rhs = self.child_of(parent, i + 1)?;

        let (val, grandchild) = self
            .node_mut(rhs)?
            .pop_front()
            .ok_or_else(|| TreeError::corrupted_tree("Rotate", "right sibling is empty"))?;
        let separator = std::mem::replace(&mut self.node_mut(parent)?.vals_mut()[i], val);
        self.node_mut(child)?.push_back(separator, grandchild);
        Ok(())
    }

    /// Merge child `i + 1` and separator `i` into child `i`.
    ///
    /// Returns the merged node and whether the parent ran out of separators,
    /// in which case it was the root and the merged node has replaced it.
    fn merge(&mut self, parent: NodeId, i: usize) -> TreeResult<(NodeId, bool)> {
        let (separator, lhs, rhs, emptied) = match self.node_mut(parent)? {
            Node::Internal { vals, children } if i < vals.len() => {
                let separator = vals.remove(i);
                let rhs = children.remove(i + 1);
                (separator, children[i], rhs, vals.is_empty())
            }
            _ => return Err(TreeError::corrupted_tree("Merge", "no separator to merge around")),
        };

        let other = self
            .arena
            .deallocate(rhs)
            .ok_or_else(|| TreeError::missing_node(rhs))?;
        self.node_mut(lhs)?.absorb(separator, other);

        if emptied {
            debug_assert_eq!(parent, self.root);
            self.arena.deallocate(parent);
            self.root = lhs;
            self.height -= 1;
            log::trace!("collapsed root, tree height now {}", self.height);
        }
        Ok((lhs, emptied))
    }
}

impl<T, C: Compare<T>> OrderedTree<T, C> {
    /// Remove the element comparing equal to `target` and return it.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::{OrderedTree, TreeError};
    ///
    /// let mut tree: OrderedTree<i32> = (0..10).collect();
    /// assert_eq!(tree.remove(&4), Ok(4));
    /// assert_eq!(tree.remove(&4), Err(TreeError::NotFound));
    /// assert_eq!(tree.size(), 9);
    /// ```
    pub fn remove(&mut self, target: &T) -> ModifyResult<T> {
        let cmp = &self.cmp;
        self.raw.remove_by(|stored| cmp.compare(stored, target), None)
    }

    /// Remove the element comparing equal to `target`, leaving `cursor` at
    /// the element that followed it.
    ///
    /// Whatever position `cursor` held before is discarded; it is rebuilt
    /// during the removal. This allows deleting while iterating without
    /// searching again for the resume point.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::OrderedTree;
    ///
    /// let mut tree: OrderedTree<i32> = (0..20).collect();
    /// let mut cursor = tree.begin();
    /// while let Some(&v) = tree.get(&cursor) {
    ///     if v % 3 == 0 {
    ///         tree.remove_with_cursor(&v, &mut cursor).unwrap();
    ///     } else {
    ///         tree.increment(&mut cursor);
    ///     }
    /// }
    /// assert!(tree.iter().all(|v| v % 3 != 0));
    /// ```
    pub fn remove_with_cursor(&mut self, target: &T, cursor: &mut Cursor) -> ModifyResult<T> {
        let cmp = &self.cmp;
        self.raw.remove_by(|stored| cmp.compare(stored, target), Some(cursor))
    }

    /// Remove the first element for which `probe` returns `Equal`,
    /// optionally repairing `cursor` as `remove_with_cursor` does.
    pub fn remove_by<F>(&mut self, probe: F, cursor: Option<&mut Cursor>) -> ModifyResult<T>
    where
        F: FnMut(&T) -> Ordering,
    {
        self.raw.remove_by(probe, cursor)
    }
}

#[cfg(test)]
mod tests {
    use crate::compare::NaturalOrder;
    use crate::error::TreeError;
    use crate::types::OrderedTree;

    fn tree_of(values: impl IntoIterator<Item = i32>) -> OrderedTree<i32> {
        let mut tree = OrderedTree::with_capacity(6, NaturalOrder).unwrap();
        for v in values {
            tree.insert(v).unwrap();
        }
        tree
    }

    #[test]
    fn test_remove_from_root_leaf() {
        let mut tree = tree_of([3, 1, 2]);
        assert_eq!(tree.remove(&2), Ok(2));
        assert_eq!(tree.remove(&2), Err(TreeError::NotFound));
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(tree.remove(&1), Ok(1));
        assert_eq!(tree.remove(&3), Ok(3));
        assert!(tree.is_empty());
        assert!(tree.begin().is_end());
    }

    #[test]
    fn test_remove_every_separator_keeps_invariants() {
        let mut tree = tree_of(0..300);
        let mut expected: Vec<i32> = (0..300).collect();
        // Separators are whatever sits in internal nodes; removing in a
        // stride hits plenty of them
        for v in (0..300).step_by(7).chain((3..300).step_by(7)) {
            if let Ok(pos) = expected.binary_search(&v) {
                assert_eq!(tree.remove(&v), Ok(v));
                expected.remove(pos);
                tree.validate().unwrap();
            }
        }
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_merges_collapse_root() {
        let mut tree = tree_of(0..200);
        let tall = tree.height();
        assert!(tall >= 3);
        for v in 0..195 {
            tree.remove(&v).unwrap();
        }
        assert!(tree.height() < tall);
        assert_eq!(tree.size(), 5);
        tree.validate().unwrap();
        for v in 195..200 {
            tree.remove(&v).unwrap();
        }
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_remove_missing_leaves_contents_alone() {
        let mut tree = tree_of((0..100).map(|v| v * 2));
        for v in 0..100 {
            assert_eq!(tree.remove(&(v * 2 + 1)), Err(TreeError::NotFound));
        }
        assert_eq!(tree.size(), 100);
        tree.validate().unwrap();
        assert_eq!(
            tree.iter().copied().collect::<Vec<_>>(),
            (0..100).map(|v| v * 2).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_cursor_follows_removed_element() {
        for victim in 0..150 {
            let mut tree = tree_of(0..150);
            let mut cursor = tree.end();
            assert_eq!(tree.remove_with_cursor(&victim, &mut cursor), Ok(victim));
            if victim == 149 {
                assert!(cursor.is_end());
            } else {
                assert_eq!(tree.get(&cursor), Some(&(victim + 1)), "victim {}", victim);
            }
        }
    }

    #[test]
    fn test_cursor_left_at_end_when_not_found() {
        let mut tree = tree_of(0..50);
        let mut cursor = tree.begin();
        assert_eq!(
            tree.remove_with_cursor(&1000, &mut cursor),
            Err(TreeError::NotFound)
        );
        assert!(cursor.is_end());
    }

    #[test]
    fn test_drain_front_with_cursor() {
        let mut tree = tree_of(0..120);
        let mut cursor = tree.begin();
        let mut removed = Vec::new();
        while let Some(&v) = tree.get(&cursor) {
            removed.push(tree.remove_with_cursor(&v, &mut cursor).unwrap());
        }
        assert_eq!(removed, (0..120).collect::<Vec<_>>());
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 1);
    }
}
