//! Tree structure management operations for OrderedTree.
//!
//! This module contains node access helpers, occupancy rules, size queries,
//! clearing and teardown, and structural statistics.

use crate::error::{TreeError, TreeResult, TreeResultExt};
use crate::types::{Node, NodeId, OrderedTree, RawTree};

// ============================================================================
// NODE ACCESS AND OCCUPANCY
// ============================================================================

impl<T> RawTree<T> {
    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> TreeResult<&Node<T>> {
        self.arena.get(id).ok_or_else(|| TreeError::missing_node(id))
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> TreeResult<&mut Node<T>> {
        self.arena.get_mut(id).ok_or_else(|| TreeError::missing_node(id))
    }

    /// Maximum number of elements `node` may hold.
    #[inline]
    pub(crate) fn max_vals(&self, node: &Node<T>) -> usize {
        if node.is_leaf() {
            self.leaf_max
        } else {
            self.inode_max
        }
    }

    /// Minimum number of elements a non-root `node` must hold.
    #[inline]
    pub(crate) fn min_vals(&self, node: &Node<T>) -> usize {
        (self.max_vals(node) + 1) / 2 - 1
    }

    /// True if removing an element from `id` would leave it underfull.
    pub(crate) fn is_minimal(&self, id: NodeId) -> TreeResult<bool> {
        let node = self.node(id)?;
        Ok(node.len() <= self.min_vals(node))
    }

    /// Free every node, feeding each stored element to `sink`.
    ///
    /// Leaves the structure without a root; callers either rebuild a root
    /// (see `reset`) or are dropping the tree.
    pub(crate) fn drain_into(&mut self, sink: &mut dyn FnMut(T)) {
        let mut pending = vec![self.root];
        while let Some(id) = pending.pop() {
            match self.arena.deallocate(id) {
                Some(Node::Leaf { vals }) => vals.into_iter().for_each(&mut *sink),
                Some(Node::Internal { vals, children }) => {
                    pending.extend(children);
                    vals.into_iter().for_each(&mut *sink);
                }
                None => {}
            }
        }
        self.arena.clear();
        self.size = 0;
        self.height = 0;
    }

    /// Drain everything into `sink` and start over with an empty root leaf.
    ///
    /// The new root is allocated before anything is drained, so on failure
    /// the tree is untouched.
    pub(crate) fn reset(&mut self, sink: &mut dyn FnMut(T)) -> TreeResult<()> {
        let leaf = Node::new_leaf(self.leaf_max)?;
        self.drain_into(sink);
        // The arena keeps its capacity across `clear`, so this reuses a slot
        self.root = self.arena.allocate(leaf)?;
        self.height = 1;
        Ok(())
    }

    /// Count leaf and internal nodes reachable from the root.
    pub(crate) fn count_nodes_in_tree(&self) -> (usize, usize) {
        let mut leaves = 0;
        let mut internals = 0;
        let mut pending = vec![self.root];
        while let Some(id) = pending.pop() {
            match self.arena.get(id) {
                Some(Node::Leaf { .. }) => leaves += 1,
                Some(Node::Internal { children, .. }) => {
                    internals += 1;
                    pending.extend_from_slice(children);
                }
                None => {}
            }
        }
        (leaves, internals)
    }
}

// ============================================================================
// TREE STRUCTURE OPERATIONS
// ============================================================================

impl<T, C> OrderedTree<T, C> {
    /// Returns the number of elements in the tree. O(1).
    pub fn size(&self) -> usize {
        self.raw.size
    }

    /// Alias of [`OrderedTree::size`].
    pub fn len(&self) -> usize {
        self.raw.size
    }

    /// Returns true if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.raw.size == 0
    }

    /// Number of node levels from the root down to the leaves.
    pub fn height(&self) -> usize {
        self.raw.height
    }

    /// Maximum number of elements a leaf holds.
    pub fn leaf_capacity(&self) -> usize {
        self.raw.leaf_max
    }

    /// Maximum number of elements an internal node holds.
    pub fn inode_capacity(&self) -> usize {
        self.raw.inode_max
    }

    /// Number of nodes currently allocated.
    pub fn node_count(&self) -> usize {
        self.raw.arena.len()
    }

    /// Returns the number of leaf nodes in the tree.
    pub fn leaf_count(&self) -> usize {
        self.raw.count_nodes_in_tree().0
    }

    /// Remove every element, passing each to the destroy callback if one is
    /// installed. The tree is left as a single empty leaf.
    pub fn clear(&mut self) -> TreeResult<()> {
        log::debug!("clearing tree of {} elements", self.raw.size);
        let result = match self.destroy.as_mut() {
            Some(destroy) => self.raw.reset(&mut **destroy),
            None => self.raw.reset(&mut |elem| drop(elem)),
        };
        result.with_operation("clear")
    }
}

#[cfg(test)]
mod tests {
    use crate::compare::NaturalOrder;
    use crate::types::OrderedTree;

    #[test]
    fn test_occupancy_bounds() {
        let tree: OrderedTree<i32> = OrderedTree::with_capacity(6, NaturalOrder).unwrap();
        let raw = &tree.raw;
        let leaf = raw.node(raw.root).unwrap();
        assert_eq!(raw.max_vals(leaf), 6);
        assert_eq!(raw.min_vals(leaf), 2);

        let inode = crate::types::Node::<i32>::new_internal(raw.inode_max).unwrap();
        assert_eq!(raw.max_vals(&inode), 3);
        assert_eq!(raw.min_vals(&inode), 1);
    }

    #[test]
    fn test_clear_resets_to_single_leaf() {
        let mut tree = OrderedTree::with_capacity(6, NaturalOrder).unwrap();
        for v in 0..200 {
            tree.insert(v).unwrap();
        }
        assert!(tree.height() > 2);
        assert!(tree.leaf_count() > 1);

        tree.clear().unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.node_count(), 1);
        assert!(tree.begin().is_end());

        tree.insert(7).unwrap();
        assert_eq!(tree.first(), Some(&7));
    }

    #[test]
    fn test_node_counts_agree_with_arena() {
        let mut tree = OrderedTree::with_capacity(8, NaturalOrder).unwrap();
        for v in (0..500).rev() {
            tree.insert(v).unwrap();
        }
        let (leaves, internals) = tree.raw.count_nodes_in_tree();
        assert_eq!(leaves + internals, tree.node_count());
        assert_eq!(leaves, tree.leaf_count());
    }
}
