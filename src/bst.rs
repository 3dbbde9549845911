use std::fmt;

use crate::tree_base::{BstNode, NodeId, RawTree, SearchTree};

/// Unbalanced binary search tree.
///
/// Duplicate keys are kept and routed to the right subtree. Height depends
/// entirely on insertion order: sorted input builds a chain.
///
/// ```
/// use order_stat_tree::{Bst, SearchTree};
///
/// let mut tree = Bst::new();
/// for key in [15, 6, 18, 3, 7] {
///     tree.insert_key(key);
/// }
/// let six = tree.search(&6).unwrap();
/// assert_eq!(tree.successor(six).map(|x| *tree.key(x)), Some(7));
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![3, 6, 7, 15, 18]);
/// ```
pub struct Bst<K: Ord + fmt::Debug> {
    tree: RawTree<BstNode<K>>,
}

impl<K: Ord + fmt::Debug> Bst<K> {
    pub fn new() -> Self {
        Self {
            tree: RawTree::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tree: RawTree::with_capacity(capacity),
        }
    }

    /// Unhooks the subtree rooted at `x` and releases all of its nodes in
    /// post-order, reporting each key. Returns the number of nodes released.
    ///
    /// `x` must be linked into this tree. The rest of the tree stays intact.
    pub fn destroy_from(&mut self, x: NodeId, on_release: impl FnMut(K)) -> usize {
        self.tree.destroy_from(x, on_release)
    }
}

impl<K: Ord + fmt::Debug> Default for Bst<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + fmt::Debug> SearchTree for Bst<K> {
    type Node = BstNode<K>;

    #[inline]
    fn raw(&self) -> &RawTree<BstNode<K>> {
        &self.tree
    }

    #[inline]
    fn raw_mut(&mut self) -> &mut RawTree<BstNode<K>> {
        &mut self.tree
    }

    fn insert(&mut self, z: NodeId) {
        self.tree.insert_with(z, |_| {});
    }

    fn delete(&mut self, z: NodeId) {
        log::debug!("Bst::delete({:?}) key {:?}", z, self.tree.key(z));
        self.tree.splice_out(z, |_, _, _| {});
    }
}

impl<K: Ord + fmt::Debug> FromIterator<K> for Bst<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        for key in iter {
            tree.insert_key(key);
        }
        tree
    }
}

impl<K: Ord + fmt::Debug> fmt::Debug for Bst<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.tree, f)
    }
}
