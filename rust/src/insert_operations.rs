//! INSERT operations for OrderedTree.
//!
//! Insertion is a single downward pass. Any full node met on the way down is
//! split before it is entered, so the parent of a split always has room for
//! the promoted median and no fix-up pass is needed afterwards.

use std::cmp::Ordering;

use crate::compare::Compare;
use crate::error::{ModifyResult, TreeError, TreeResult};
use crate::node::node_find;
use crate::types::{Node, NodeId, OrderedTree, RawTree};

impl<T> RawTree<T> {
    /// Find the leaf slot for a new element, splitting full nodes on the way.
    ///
    /// Returns the leaf and the index to insert at, or `AlreadyExists` if an
    /// element compares equal. Splits done before a duplicate is detected
    /// stay in place; they never break an invariant.
    pub(crate) fn insert_position<F>(&mut self, mut probe: F) -> TreeResult<(NodeId, usize)>
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut parent: Option<NodeId> = None;
        let mut n = self.root;
        let mut i = 0;

        loop {
            let full = {
                let node = self.node(n)?;
                node.len() == self.max_vals(node)
            };

            if full {
                let (p, rhs) = match parent {
                    Some(p) => (p, self.split_child(p, i)?),
                    None => self.split_root()?,
                };

                // The promoted median tells which half the target lives in
                match probe(&self.node(p)?.vals()[i]) {
                    Ordering::Equal => return Err(TreeError::AlreadyExists),
                    Ordering::Less => n = rhs,
                    Ordering::Greater => {}
                }
            }

            let node = self.node(n)?;
            let (index, equal) = node_find(node.vals(), &mut probe);
            if equal {
                return Err(TreeError::AlreadyExists);
            }

            match node.child(index) {
                Some(child) => {
                    parent = Some(n);
                    n = child;
                    i = index;
                }
                None => return Ok((n, index)),
            }
        }
    }

    /// Split the full root under a new internal root.
    ///
    /// Returns the new root and the right half of the old one. If the split
    /// cannot allocate, the new root is dropped again and the tree keeps its
    /// old shape.
    fn split_root(&mut self) -> TreeResult<(NodeId, NodeId)> {
        let old_root = self.root;
        let new_root = self.grow_root()?;

        match self.split_child(new_root, 0) {
            Ok(rhs) => {
                log::trace!("grew tree to height {}", self.height);
                Ok((new_root, rhs))
            }
            Err(e) => {
                self.arena.deallocate(new_root);
                self.root = old_root;
                self.height -= 1;
                Err(e)
            }
        }
    }

    /// Put a new internal root above the current one and return its id.
    fn grow_root(&mut self) -> TreeResult<NodeId> {
        let mut new_root = Node::new_internal(self.inode_max)?;
        if let Node::Internal { children, .. } = &mut new_root {
            children.push(self.root);
        }
        let id = self.arena.allocate(new_root)?;

        self.root = id;
        self.height += 1;
        Ok(id)
    }

    /// Split the full child `i` of `parent`, returning the new right sibling.
    ///
    /// The left half keeps `max / 2` elements, the element after them moves
    /// up into `parent` at `i`, and the new node takes the rest and is linked
    /// in as child `i + 1`.
    pub(crate) fn split_child(&mut self, parent: NodeId, i: usize) -> TreeResult<NodeId> {
        let lhs = self
            .node(parent)?
            .child(i)
            .ok_or_else(|| TreeError::corrupted_tree("Split", "child index out of range"))?;

        let max = {
            let node = self.node(lhs)?;
            self.max_vals(node)
        };

        // Claim the slot first so nothing is moved if allocation fails
        let rhs = self.arena.allocate(Node::default())?;

        let split = self
            .node_mut(lhs)
            .and_then(|node| node.split_upper(max / 2, max));
        let (median, sibling) = match split {
            Ok(parts) => parts,
            Err(e) => {
                self.arena.deallocate(rhs);
                return Err(e);
            }
        };
        self.arena.replace(rhs, sibling);

        if let Node::Internal { vals, children } = self.node_mut(parent)? {
            vals.insert(i, median);
            children.insert(i + 1, rhs);
        }
        Ok(rhs)
    }
}

impl<T, C: Compare<T>> OrderedTree<T, C> {
    /// Insert an element.
    ///
    /// Fails with `AlreadyExists` if an element comparing equal is stored
    /// (the new element is dropped), or `NoMemory` if a node split could not
    /// allocate. The tree stays valid in both cases.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::{OrderedTree, TreeError};
    ///
    /// let mut tree = OrderedTree::natural();
    /// assert_eq!(tree.insert(5), Ok(()));
    /// assert_eq!(tree.insert(5), Err(TreeError::AlreadyExists));
    /// assert_eq!(tree.size(), 1);
    /// ```
    pub fn insert(&mut self, elem: T) -> ModifyResult<()> {
        self.try_insert(elem).map_err(|(e, _)| e)
    }

    /// Insert an element, handing it back together with the error on failure.
    pub fn try_insert(&mut self, elem: T) -> Result<(), (TreeError, T)> {
        let cmp = &self.cmp;
        let (leaf, index) = match self.raw.insert_position(|stored| cmp.compare(stored, &elem)) {
            Ok(slot) => slot,
            Err(e) => return Err((e, elem)),
        };

        match self.raw.arena.get_mut(leaf) {
            Some(node) => node.vals_mut().insert(index, elem),
            None => return Err((TreeError::missing_node(leaf), elem)),
        }
        self.raw.size += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::compare::NaturalOrder;
    use crate::error::TreeError;
    use crate::types::OrderedTree;

    #[test]
    fn test_root_split_grows_height() {
        let mut tree = OrderedTree::with_capacity(6, NaturalOrder).unwrap();
        for v in 0..6 {
            tree.insert(v).unwrap();
        }
        assert_eq!(tree.height(), 1);

        // The seventh insert meets a full root and splits it first
        tree.insert(6).unwrap();
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.node_count(), 3);
        assert!(tree.check_invariants());
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn test_duplicate_rejected_and_returned() {
        let mut tree = OrderedTree::natural();
        tree.insert(String::from("a")).unwrap();
        let err = tree.try_insert(String::from("a")).unwrap_err();
        assert_eq!(err, (TreeError::AlreadyExists, String::from("a")));
        assert_eq!(tree.size(), 1);
    }

    #[test]
    fn test_duplicate_equal_to_promoted_median() {
        let mut tree = OrderedTree::with_capacity(6, NaturalOrder).unwrap();
        for v in [10, 20, 30, 40, 50, 60] {
            tree.insert(v).unwrap();
        }
        // Root is full; 40 becomes the promoted median and matches the probe
        assert_eq!(tree.insert(40), Err(TreeError::AlreadyExists));
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.size(), 6);
        assert!(tree.check_invariants());
    }

    #[test]
    fn test_descending_inserts_stay_balanced() {
        let mut tree = OrderedTree::with_capacity(7, NaturalOrder).unwrap();
        for v in (0..1000).rev() {
            tree.insert(v).unwrap();
        }
        assert_eq!(tree.size(), 1000);
        tree.validate().unwrap();
    }
}
