//! Core types and data structures for OrderedTree.
//!
//! This module contains the fundamental data structures, type definitions,
//! and constants used throughout the tree implementation.

use crate::compact_arena::CompactArena;
use crate::compare::NaturalOrder;

pub use crate::compact_arena::NodeId;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Size of the page a node is laid out to fill.
pub const PAGE_SIZE: usize = 4096;

/// Number of element references a leaf page holds: the page minus its two
/// 16-bit header fields, less one slot.
pub const DEFAULT_LEAF_CAPACITY: usize =
    (PAGE_SIZE - 2 * std::mem::size_of::<u16>()) / std::mem::size_of::<usize>() - 1;

/// Internal nodes spend half of the page on child references.
pub const DEFAULT_INODE_CAPACITY: usize = DEFAULT_LEAF_CAPACITY / 2;

/// Smallest leaf capacity that still leaves internal nodes room to split
/// and merge (an internal node needs at least three keys).
pub const MIN_LEAF_CAPACITY: usize = 6;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// Callback receiving elements that are still owned by the tree when it is
/// cleared or dropped.
pub type DestroyFn<T> = Box<dyn FnMut(T)>;

/// In-memory ordered B-tree set.
///
/// Elements are kept in strictly ascending order according to the tree's
/// comparator. Every node, leaf or internal, stores elements; internal nodes
/// additionally hold one more child than elements. Nodes are sized like
/// pages: a leaf holds up to `leaf_capacity()` elements and an internal node
/// half as many.
///
/// # Examples
///
/// ```
/// use ordtree::OrderedTree;
///
/// let mut tree = OrderedTree::natural();
/// for v in [50, 20, 80, 10] {
///     tree.insert(v).unwrap();
/// }
///
/// let mut cursor = tree.lower_bound(&15);
/// assert_eq!(tree.get(&cursor), Some(&20));
/// tree.increment(&mut cursor);
/// assert_eq!(tree.get(&cursor), Some(&50));
///
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [10, 20, 50, 80]);
/// ```
///
/// # Performance Characteristics
///
/// - **Insertion**: O(log n), one pass with eager splitting
/// - **Lookup / lower bound**: O(log n)
/// - **Deletion**: O(log n), one pass with eager rotation and merging
/// - **Cursor increment**: amortized O(1)
pub struct OrderedTree<T, C = NaturalOrder> {
    /// Three-way comparator, including any context data it carries.
    pub(crate) cmp: C,
    /// Receives remaining elements on clear and drop.
    pub(crate) destroy: Option<DestroyFn<T>>,
    /// Node structure, kept separate from the comparator so searches can
    /// borrow the comparator while the structure is mutated.
    pub(crate) raw: RawTree<T>,
}

/// Node structure of an OrderedTree, independent of any comparator.
///
/// All algorithms in here work on probes: closures that order a stored
/// element relative to whatever is being searched for.
#[derive(Debug)]
pub(crate) struct RawTree<T> {
    /// The root node. Always allocated; an empty tree has an empty leaf root.
    pub(crate) root: NodeId,
    /// Number of stored elements.
    pub(crate) size: usize,
    /// Number of node levels, 1 for a lone root leaf.
    pub(crate) height: usize,
    /// Maximum number of elements in a leaf.
    pub(crate) leaf_max: usize,
    /// Maximum number of elements in an internal node.
    pub(crate) inode_max: usize,
    /// Storage for every node.
    pub(crate) arena: CompactArena<Node<T>>,
}

/// A tree node. Both variants keep their elements in ascending order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node<T> {
    Leaf {
        vals: Vec<T>,
    },
    Internal {
        vals: Vec<T>,
        /// Always `vals.len() + 1` children outside of a split or merge.
        children: Vec<NodeId>,
    },
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Node::Leaf { vals: Vec::new() }
    }
}
