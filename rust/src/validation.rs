//! Validation and debugging utilities for OrderedTree.
//!
//! This module contains invariant checking and a few structural helpers used
//! by tests and when debugging a misbehaving comparator.

use std::cmp::Ordering;

use crate::compact_arena::CompactArenaStats;
use crate::compare::Compare;
use crate::error::{TreeError, TreeResult};
use crate::types::{Node, NodeId, OrderedTree};

/// Exclusive bounds a subtree's elements must lie between.
struct Bounds<'a, T> {
    lower: Option<&'a T>,
    upper: Option<&'a T>,
}

// ============================================================================
// VALIDATION METHODS
// ============================================================================

impl<T, C: Compare<T>> OrderedTree<T, C> {
    /// Check if the tree maintains its B-tree invariants.
    /// Returns true if all invariants are satisfied.
    pub fn check_invariants(&self) -> bool {
        self.check_invariants_detailed().is_ok()
    }

    /// Check invariants with detailed error reporting.
    pub fn check_invariants_detailed(&self) -> Result<(), String> {
        let mut visited = 0;
        let count = self
            .check_node(
                self.raw.root,
                Bounds {
                    lower: None,
                    upper: None,
                },
                1,
                &mut visited,
            )
            .map_err(|e| e.to_string())?;

        if count != self.raw.size {
            return Err(format!(
                "Tree holds {} elements but size is {}",
                count, self.raw.size
            ));
        }

        self.check_arena_tree_consistency().map_err(|e| e.to_string())
    }

    /// Alias for check_invariants_detailed.
    pub fn validate(&self) -> Result<(), String> {
        self.check_invariants_detailed()
    }

    /// Check that arena allocation matches tree structure.
    fn check_arena_tree_consistency(&self) -> TreeResult<()> {
        let (leaves, internals) = self.raw.count_nodes_in_tree();
        let allocated = self.raw.arena.len();
        if leaves + internals != allocated {
            return Err(TreeError::corrupted_tree(
                "Arena consistency check",
                &format!("{} nodes in tree vs {} in arena", leaves + internals, allocated),
            ));
        }
        Ok(())
    }

    /// Recursively check a node and its subtree, returning its element count.
    fn check_node(
        &self,
        id: NodeId,
        bounds: Bounds<'_, T>,
        depth: usize,
        visited: &mut usize,
    ) -> TreeResult<usize> {
        // More visits than nodes means a child is linked twice
        *visited += 1;
        if *visited > self.raw.arena.len() {
            return Err(TreeError::corrupted_tree("Structure", "node reachable twice"));
        }

        let node = self.raw.node(id)?;
        let is_root = id == self.raw.root;
        let vals = node.vals();
        let here = |what: &str| format!("node {} at depth {}: {}", id, depth, what);

        if vals.len() > self.raw.max_vals(node) {
            return Err(TreeError::corrupted_tree("Occupancy", &here("over capacity")));
        }
        if !is_root && vals.len() < self.raw.min_vals(node) {
            return Err(TreeError::corrupted_tree("Occupancy", &here("underfull")));
        }

        for pair in vals.windows(2) {
            if self.cmp.compare(&pair[0], &pair[1]) != Ordering::Less {
                return Err(TreeError::corrupted_tree("Ordering", &here("elements out of order")));
            }
        }
        if let (Some(lower), Some(first)) = (bounds.lower, vals.first()) {
            if self.cmp.compare(first, lower) != Ordering::Greater {
                return Err(TreeError::corrupted_tree("Ordering", &here("below its separator")));
            }
        }
        if let (Some(upper), Some(last)) = (bounds.upper, vals.last()) {
            if self.cmp.compare(last, upper) != Ordering::Less {
                return Err(TreeError::corrupted_tree("Ordering", &here("above its separator")));
            }
        }

        match node {
            Node::Leaf { vals } => {
                if depth != self.raw.height {
                    let what = format!("leaf in tree of height {}", self.raw.height);
                    return Err(TreeError::corrupted_tree("Balance", &here(&what)));
                }
                Ok(vals.len())
            }
            Node::Internal { vals, children } => {
                if vals.is_empty() {
                    let what = here("internal node without elements");
                    return Err(TreeError::corrupted_tree("Occupancy", &what));
                }
                if children.len() != vals.len() + 1 {
                    return Err(TreeError::corrupted_tree(
                        "Structure",
                        &here(&format!("{} elements but {} children", vals.len(), children.len())),
                    ));
                }

                let mut count = vals.len();
                for (i, &child) in children.iter().enumerate() {
                    let child_bounds = Bounds {
                        lower: if i == 0 { bounds.lower } else { vals.get(i - 1) },
                        upper: if i == vals.len() { bounds.upper } else { vals.get(i) },
                    };
                    count += self.check_node(child, child_bounds, depth + 1, visited)?;
                }
                Ok(count)
            }
        }
    }
}

// ============================================================================
// DEBUGGING UTILITIES
// ============================================================================

impl<T, C> OrderedTree<T, C> {
    /// Returns the sizes of all leaf nodes, left to right.
    pub fn leaf_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::new();
        self.collect_leaf_sizes(self.raw.root, &mut sizes);
        sizes
    }

    fn collect_leaf_sizes(&self, id: NodeId, sizes: &mut Vec<usize>) {
        match self.raw.arena.get(id) {
            Some(Node::Leaf { vals }) => sizes.push(vals.len()),
            Some(Node::Internal { children, .. }) => {
                for &child in children {
                    self.collect_leaf_sizes(child, sizes);
                }
            }
            None => {}
        }
    }

    /// Node arena statistics.
    pub fn arena_stats(&self) -> CompactArenaStats {
        self.raw.arena.stats()
    }
}
