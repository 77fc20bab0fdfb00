use ordtree::{NaturalOrder, OrderedTree, TreeError};
use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

/// Global allocator that can be told to refuse one allocation of a given
/// layout on the current thread.
struct FailingAlloc;

thread_local! {
    static FAIL_NEXT: Cell<Option<Layout>> = const { Cell::new(None) };
}

unsafe impl GlobalAlloc for FailingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let refuse = FAIL_NEXT
            .try_with(|slot| {
                if slot.get() == Some(layout) {
                    slot.set(None);
                    true
                } else {
                    false
                }
            })
            .unwrap_or(false);
        if refuse {
            return std::ptr::null_mut();
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static ALLOCATOR: FailingAlloc = FailingAlloc;

/// Key with an alignment nothing else in the tree uses, so the element
/// buffers of nodes are the only allocations with its layout.
#[repr(align(32))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Key(u32);

const LEAF_CAPACITY: usize = 8;
const INODE_CAPACITY: usize = LEAF_CAPACITY / 2;

fn leaf_layout() -> Layout {
    Layout::array::<Key>(LEAF_CAPACITY).unwrap()
}

fn inode_layout() -> Layout {
    Layout::array::<Key>(INODE_CAPACITY).unwrap()
}

fn fail_next(layout: Layout) {
    FAIL_NEXT.with(|slot| slot.set(Some(layout)));
}

/// True if the armed failure was consumed.
fn failure_fired() -> bool {
    FAIL_NEXT.with(|slot| slot.get().is_none())
}

fn tree_of(keys: impl IntoIterator<Item = u32>) -> OrderedTree<Key> {
    let mut tree = OrderedTree::with_capacity(LEAF_CAPACITY, NaturalOrder).unwrap();
    for k in keys {
        tree.insert(Key(k)).unwrap();
    }
    tree
}

fn contents(tree: &OrderedTree<Key>) -> Vec<u32> {
    tree.iter().map(|k| k.0).collect()
}

/// The tree must still accept inserts and removes down to empty.
fn assert_still_usable(mut tree: OrderedTree<Key>) {
    for k in 1000..1100 {
        tree.insert(Key(k)).unwrap();
    }
    tree.validate().unwrap();
    for k in contents(&tree) {
        assert_eq!(tree.remove(&Key(k)), Ok(Key(k)));
    }
    tree.validate().unwrap();
    assert!(tree.is_empty());
}

#[test]
fn test_root_split_leaf_failure_keeps_old_root() {
    let mut tree = tree_of(0..LEAF_CAPACITY as u32);
    assert_eq!(tree.height(), 1);

    fail_next(leaf_layout());
    let err = tree.insert(Key(100)).unwrap_err();
    assert!(failure_fired());
    assert!(err.is_no_memory(), "{:?}", err);

    tree.validate().unwrap();
    assert_eq!(tree.height(), 1);
    assert_eq!(tree.node_count(), 1);
    assert_eq!(contents(&tree), (0..LEAF_CAPACITY as u32).collect::<Vec<_>>());
    assert_still_usable(tree);
}

#[test]
fn test_root_growth_failure_leaves_tree_alone() {
    let mut tree = tree_of(0..LEAF_CAPACITY as u32);

    fail_next(inode_layout());
    assert!(tree.insert(Key(100)).unwrap_err().is_no_memory());
    assert!(failure_fired());

    tree.validate().unwrap();
    assert_eq!(tree.height(), 1);
    assert_eq!(tree.size(), LEAF_CAPACITY);
    assert_still_usable(tree);
}

#[test]
fn test_leaf_split_failure_below_root() {
    // Root [4] over [0..3] and [5..12]; the right leaf is full
    let mut tree = tree_of(0..13);
    assert_eq!(tree.height(), 2);
    assert_eq!(tree.leaf_sizes(), vec![4, LEAF_CAPACITY]);

    fail_next(leaf_layout());
    let err = tree.try_insert(Key(13)).unwrap_err();
    assert!(failure_fired());
    assert!(err.0.is_no_memory());
    assert_eq!(err.1, Key(13));

    tree.validate().unwrap();
    assert_eq!(tree.size(), 13);
    assert_eq!(tree.node_count(), 3);

    // Removing from under the root rebalances normally afterwards
    for k in 0..13 {
        assert_eq!(tree.remove(&Key(k)), Ok(Key(k)));
        tree.validate().unwrap();
    }
    assert_still_usable(tree);
}

#[test]
fn test_inode_split_failure_at_right_edge() {
    let mut tree = tree_of(0..200);
    assert!(tree.height() >= 3);

    // Keep inserting at the right edge until a full internal node has to
    // split; that split is refused
    let mut next = 200;
    fail_next(inode_layout());
    loop {
        match tree.insert(Key(next)) {
            Ok(()) => next += 1,
            Err(e) => {
                assert!(e.is_no_memory(), "{:?}", e);
                break;
            }
        }
        assert!(next < 10_000, "no internal split happened");
    }
    assert!(failure_fired());

    tree.validate().unwrap();
    assert_eq!(tree.size(), next as usize);
    assert!(!tree.contains(&Key(next)));
    assert_still_usable(tree);
}

#[test]
fn test_clear_failure_keeps_elements() {
    let mut tree = tree_of(0..100);
    let height = tree.height();

    fail_next(leaf_layout());
    assert!(tree.clear().unwrap_err().is_no_memory());
    assert!(failure_fired());

    tree.validate().unwrap();
    assert_eq!(tree.size(), 100);
    assert_eq!(tree.height(), height);
    assert_eq!(contents(&tree), (0..100).collect::<Vec<_>>());

    tree.clear().unwrap();
    tree.validate().unwrap();
    assert!(tree.is_empty());
    assert_still_usable(tree);
}

#[test]
fn test_extend_skips_duplicates() {
    let mut tree = tree_of(0..5);
    tree.extend([Key(3), Key(7), Key(3)]);
    assert_eq!(contents(&tree), vec![0, 1, 2, 3, 4, 7]);
}

#[test]
#[should_panic(expected = "failed to extend tree")]
fn test_extend_panics_on_allocation_failure() {
    let mut tree = tree_of(0..LEAF_CAPACITY as u32);
    fail_next(leaf_layout());
    tree.extend([Key(100)]);
}

#[test]
fn test_insert_error_is_not_already_exists() {
    let mut tree = tree_of(0..LEAF_CAPACITY as u32);
    fail_next(leaf_layout());
    // Even a duplicate meets the split first
    let err = tree.insert(Key(3)).unwrap_err();
    assert_ne!(err, TreeError::AlreadyExists);
    assert_eq!(tree.insert(Key(3)), Err(TreeError::AlreadyExists));
    tree.validate().unwrap();
}
