//! In-memory ordered B-tree set with explicit cursors.
//!
//! [`OrderedTree`] keeps elements in strictly ascending order according to a
//! user-supplied three-way comparator. Elements live in every node, leaf and
//! internal alike, and nodes are sized after a memory page so a lookup
//! touches few nodes.
//!
//! Positions are reported as [`Cursor`] values: a stack of `(node, index)`
//! frames from the root to the element. Cursors hold no borrow of the tree;
//! they are advanced with [`OrderedTree::increment`] and read with
//! [`OrderedTree::get`]. Mutating the tree invalidates cursors, except the
//! one handed to [`OrderedTree::remove_with_cursor`], which is left at the
//! element following the removed one.
//!
//! Comparators implement [`Compare`]. They may be tolerant: a search target
//! may compare equal to a whole run of stored elements, and
//! [`OrderedTree::lower_bound_by`] then lands on the first of them.
//!
//! # Examples
//!
//! ```
//! use ordtree::{OrderedTree, TreeError};
//!
//! let mut tree = OrderedTree::natural();
//! for v in [50, 20, 80, 10, 30, 70, 90, 5] {
//!     tree.insert(v).unwrap();
//! }
//! assert_eq!(tree.insert(30), Err(TreeError::AlreadyExists));
//!
//! // Remove while iterating
//! let mut cursor = tree.begin();
//! while let Some(&v) = tree.get(&cursor) {
//!     if v % 20 == 10 {
//!         tree.remove_with_cursor(&v, &mut cursor).unwrap();
//!     } else {
//!         tree.increment(&mut cursor);
//!     }
//! }
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [5, 20, 80]);
//! ```

mod compact_arena;
mod compare;
mod construction;
mod delete_operations;
mod error;
mod get_operations;
mod insert_operations;
mod iteration;
mod node;
mod tree_structure;
mod types;
mod validation;

pub use compact_arena::CompactArenaStats;
pub use compare::{Compare, ContextCompare, NaturalOrder};
pub use error::{InitResult, KeyResult, ModifyResult, TreeError, TreeResult, TreeResultExt};
pub use iteration::{Cursor, Iter};
pub use types::{
    DestroyFn, OrderedTree, DEFAULT_INODE_CAPACITY, DEFAULT_LEAF_CAPACITY, MIN_LEAF_CAPACITY,
    PAGE_SIZE,
};
