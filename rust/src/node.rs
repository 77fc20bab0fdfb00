//! Node implementation for OrderedTree.
//!
//! This module contains the node-level operations: in-node search, bounded
//! allocation, splitting, and the element/child shuffles used by rotation
//! and merging. Tree-level bookkeeping (arena, size, height) lives with the
//! operations that need it.

use std::cmp::Ordering;

use crate::error::TreeResult;
use crate::types::{Node, NodeId};

/// Lower-bound binary search over one node's elements.
///
/// Returns the lowest index `i` whose element is not less than the target,
/// and whether any element compared equal. After an equal hit the search
/// keeps narrowing to the left so that a comparator matching a run of
/// elements yields the first of them.
pub(crate) fn node_find<T, F>(vals: &[T], probe: &mut F) -> (usize, bool)
where
    F: FnMut(&T) -> Ordering,
{
    let mut first = 0;
    let mut len = vals.len();
    let mut equal = false;

    while len > 0 {
        let half = len / 2;
        let i = first + half;
        match probe(&vals[i]) {
            Ordering::Equal => {
                equal = true;
                len = half;
            }
            Ordering::Less => {
                let chop = half + 1;
                first += chop;
                len -= chop;
            }
            Ordering::Greater => len = half,
        }
    }

    (first, equal)
}

/// Allocate a vector that can hold `capacity` items without reallocating.
fn bounded_vec<U>(capacity: usize) -> TreeResult<Vec<U>> {
    let mut v = Vec::new();
    v.try_reserve_exact(capacity)?;
    Ok(v)
}

impl<T> Node<T> {
    // ============================================================================
    // CONSTRUCTION
    // ============================================================================

    /// Creates an empty leaf with room for `capacity` elements.
    pub(crate) fn new_leaf(capacity: usize) -> TreeResult<Self> {
        Ok(Node::Leaf {
            vals: bounded_vec(capacity)?,
        })
    }

    /// Creates an empty internal node with room for `capacity` elements
    /// and `capacity + 1` children.
    pub(crate) fn new_internal(capacity: usize) -> TreeResult<Self> {
        Ok(Node::Internal {
            vals: bounded_vec(capacity)?,
            children: bounded_vec(capacity + 1)?,
        })
    }

    // ============================================================================
    // ACCESSORS
    // ============================================================================

    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Number of elements stored in this node.
    pub(crate) fn len(&self) -> usize {
        self.vals().len()
    }

    pub(crate) fn vals(&self) -> &[T] {
        match self {
            Node::Leaf { vals } | Node::Internal { vals, .. } => vals,
        }
    }

    pub(crate) fn vals_mut(&mut self) -> &mut Vec<T> {
        match self {
            Node::Leaf { vals } | Node::Internal { vals, .. } => vals,
        }
    }

    /// Child references; empty for a leaf.
    pub(crate) fn children(&self) -> &[NodeId] {
        match self {
            Node::Leaf { .. } => &[],
            Node::Internal { children, .. } => children,
        }
    }

    pub(crate) fn child(&self, index: usize) -> Option<NodeId> {
        self.children().get(index).copied()
    }

    // ============================================================================
    // SPLITTING
    // ============================================================================

    /// Split off the upper part of this node.
    ///
    /// This node keeps its first `keep` elements. The element at `keep` is
    /// returned as the median to be moved into the parent, and the returned
    /// sibling (allocated with room for `capacity` elements) receives the
    /// rest. For internal nodes the children after the median go along.
    pub(crate) fn split_upper(&mut self, keep: usize, capacity: usize) -> TreeResult<(T, Node<T>)> {
        let mut rhs = if self.is_leaf() {
            Node::new_leaf(capacity)?
        } else {
            Node::new_internal(capacity)?
        };

        if let (Node::Internal { children, .. }, Node::Internal { children: rhs_children, .. }) =
            (&mut *self, &mut rhs)
        {
            rhs_children.extend(children.drain(keep + 1..));
        }

        let vals = self.vals_mut();
        rhs.vals_mut().extend(vals.drain(keep + 1..));
        match vals.pop() {
            Some(median) => Ok((median, rhs)),
            None => Err(crate::error::TreeError::corrupted_tree(
                "Split",
                "node has no median element",
            )),
        }
    }

    // ============================================================================
    // ROTATION AND MERGING HELPERS
    // ============================================================================

    /// Remove the last element (and last child, for internal nodes).
    pub(crate) fn pop_back(&mut self) -> Option<(T, Option<NodeId>)> {
        match self {
            Node::Leaf { vals } => vals.pop().map(|v| (v, None)),
            Node::Internal { vals, children } => {
                let v = vals.pop()?;
                Some((v, children.pop()))
            }
        }
    }

    /// Remove the first element (and first child, for internal nodes).
    pub(crate) fn pop_front(&mut self) -> Option<(T, Option<NodeId>)> {
        match self {
            Node::Leaf { vals } if !vals.is_empty() => Some((vals.remove(0), None)),
            Node::Internal { vals, children } if !vals.is_empty() => {
                Some((vals.remove(0), Some(children.remove(0))))
            }
            _ => None,
        }
    }

    /// Prepend an element and, for internal nodes, a child.
    pub(crate) fn push_front(&mut self, val: T, child: Option<NodeId>) {
        match self {
            Node::Leaf { vals } => vals.insert(0, val),
            Node::Internal { vals, children } => {
                vals.insert(0, val);
                if let Some(child) = child {
                    children.insert(0, child);
                }
            }
        }
    }

    /// Append an element and, for internal nodes, a child.
    pub(crate) fn push_back(&mut self, val: T, child: Option<NodeId>) {
        match self {
            Node::Leaf { vals } => vals.push(val),
            Node::Internal { vals, children } => {
                vals.push(val);
                children.extend(child);
            }
        }
    }

    /// Append a separator followed by everything from `other`.
    pub(crate) fn absorb(&mut self, separator: T, other: Node<T>) {
        match (self, other) {
            (
                Node::Internal { vals, children },
                Node::Internal {
                    vals: mut other_vals,
                    children: mut other_children,
                },
            ) => {
                vals.push(separator);
                vals.append(&mut other_vals);
                children.append(&mut other_children);
            }
            (this, mut other) => {
                let vals = this.vals_mut();
                vals.push(separator);
                vals.append(other.vals_mut());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(vals: &[i32], target: i32) -> (usize, bool) {
        node_find(vals, &mut |v: &i32| v.cmp(&target))
    }

    #[test]
    fn test_node_find_exact_and_between() {
        let vals = [10, 20, 30, 40];
        assert_eq!(find(&vals, 5), (0, false));
        assert_eq!(find(&vals, 10), (0, true));
        assert_eq!(find(&vals, 25), (2, false));
        assert_eq!(find(&vals, 40), (3, true));
        assert_eq!(find(&vals, 45), (4, false));
        assert_eq!(find(&[], 1), (0, false));
    }

    #[test]
    fn test_node_find_lands_on_first_wildcard_match() {
        // Everything in the 20s compares equal
        let vals = [11, 21, 22, 23, 24, 25, 31];
        let (i, equal) = node_find(&vals, &mut |v: &i32| (v / 10).cmp(&2));
        assert!(equal);
        assert_eq!(i, 1);
    }

    #[test]
    fn test_split_leaf_moves_median_out() {
        let mut leaf = Node::new_leaf(7).unwrap();
        leaf.vals_mut().extend([1, 2, 3, 4, 5, 6, 7]);

        let (median, rhs) = leaf.split_upper(3, 7).unwrap();
        assert_eq!(leaf.vals(), &[1, 2, 3]);
        assert_eq!(median, 4);
        assert_eq!(rhs.vals(), &[5, 6, 7]);
        assert!(rhs.is_leaf());
    }

    #[test]
    fn test_split_internal_partitions_children() {
        let mut inode = Node::new_internal(3).unwrap();
        if let Node::Internal { vals, children } = &mut inode {
            vals.extend([10, 20, 30]);
            children.extend([0, 1, 2, 3]);
        }

        let (median, rhs) = inode.split_upper(1, 3).unwrap();
        assert_eq!(median, 20);
        assert_eq!(inode.vals(), &[10]);
        assert_eq!(inode.children(), &[0, 1]);
        assert_eq!(rhs.vals(), &[30]);
        assert_eq!(rhs.children(), &[2, 3]);
    }

    #[test]
    fn test_front_and_back_shuffles() {
        let mut inode: Node<i32> = Node::new_internal(3).unwrap();
        inode.push_back(20, Some(2));
        if let Node::Internal { children, .. } = &mut inode {
            children.insert(0, 1);
        }
        inode.push_front(10, Some(0));
        assert_eq!(inode.vals(), &[10, 20]);
        assert_eq!(inode.children(), &[0, 1, 2]);

        assert_eq!(inode.pop_front(), Some((10, Some(0))));
        assert_eq!(inode.pop_back(), Some((20, Some(2))));
        assert_eq!(inode.children(), &[1]);
    }

    #[test]
    fn test_absorb_concatenates_around_separator() {
        let mut lhs = Node::new_leaf(7).unwrap();
        lhs.vals_mut().extend([1, 2]);
        let mut rhs = Node::new_leaf(7).unwrap();
        rhs.vals_mut().extend([4, 5]);

        lhs.absorb(3, rhs);
        assert_eq!(lhs.vals(), &[1, 2, 3, 4, 5]);
    }
}
