use std::fmt;

use crate::tree_base::{NodeId, OsNode, RawTree, SearchTree, TreeNode};

/// Order-statistic tree: an unbalanced binary search tree whose nodes also
/// record the size of their subtree, which makes [`select`](OsTree::select)
/// and [`rank`](OsTree::rank) run in O(height).
///
/// Ranks are 1-based.
///
/// ```
/// use order_stat_tree::{OsTree, SearchTree};
///
/// let tree: OsTree<i32> = [15, 6, 18, 3, 7, 17, 20, 2, 4, 13, 9].into_iter().collect();
/// let seventh = tree.select(5).unwrap();
/// assert_eq!(*tree.key(seventh), 7);
///
/// let thirteen = tree.search(&13).unwrap();
/// assert_eq!(tree.rank(thirteen), 8);
/// ```
pub struct OsTree<K: Ord + fmt::Debug> {
    tree: RawTree<OsNode<K>>,
}

impl<K: Ord + fmt::Debug> OsTree<K> {
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

    /// Stored subtree size of `x`, 0 for an absent node.
    #[inline]
    pub fn size_of(&self, x: Option<NodeId>) -> usize {
        x.map_or(0, |id| self.tree.node(id).size())
    }

    /// The node holding the `i`-th smallest key, `None` if `i` is 0 or larger
    /// than the tree.
    pub fn select(&self, i: usize) -> Option<NodeId> {
        self.select_from(self.tree.root(), i)
    }

    /// The `i`-th smallest node within the subtree rooted at `x`.
    pub fn select_from(&self, mut x: Option<NodeId>, mut i: usize) -> Option<NodeId> {
        while let Some(id) = x {
            let r = self.size_of(self.tree.left(id)) + 1;
            x = match i.cmp(&r) {
                std::cmp::Ordering::Equal => return Some(id),
                std::cmp::Ordering::Less => self.tree.left(id),
                std::cmp::Ordering::Greater => {
                    i -= r;
                    self.tree.right(id)
                }
            };
        }
        None
    }

    /// Position of `x` among all keys in sorted order. `x` must be linked into
    /// this tree.
    pub fn rank(&self, x: NodeId) -> usize {
        let mut r = self.size_of(self.tree.left(x)) + 1;
        let mut y = x;
        while let Some(p) = self.tree.parent(y) {
            if self.tree.right(p) == Some(y) {
                r += self.size_of(self.tree.left(p)) + 1;
            }
            y = p;
        }
        r
    }

    /// Key of the `i`-th smallest node.
    pub fn select_key(&self, i: usize) -> Option<&K> {
        self.select(i).map(|x| self.tree.key(x))
    }

    /// Rank of the first node found holding `key`.
    pub fn rank_of_key(&self, key: &K) -> Option<usize> {
        self.search(key).map(|x| self.rank(x))
    }
}

impl<K: Ord + fmt::Debug> Default for OsTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + fmt::Debug> SearchTree for OsTree<K> {
    type Node = OsNode<K>;

    #[inline]
    fn raw(&self) -> &RawTree<OsNode<K>> {
        &self.tree
    }

    #[inline]
    fn raw_mut(&mut self) -> &mut RawTree<OsNode<K>> {
        &mut self.tree
    }

    /// Every node on the descent gains one in size, so no fix-up pass is
    /// needed after linking.
    fn insert(&mut self, z: NodeId) {
        self.tree.node_mut(z).size = 1;
        self.tree.insert_with(z, |node| node.size += 1);
    }

    /// Size upkeep happens in two places:
    ///
    /// 1. every node on the root-to-`z` descent loses one, `z` included;
    /// 2. if `z` has two children and its successor `y` sits deeper than
    ///    `z.right`, the nodes between `y`'s old parent and `z` also lose one,
    ///    and `y` recounts itself once it has taken over `z`'s children.
    fn delete(&mut self, z: NodeId) {
        log::debug!("OsTree::delete({:?}) key {:?}", z, self.tree.key(z));

        let mut curr = self.tree.root();
        while let Some(id) = curr {
            self.tree.node_mut(id).size -= 1;
            if id == z {
                break;
            }
            // ties went right on insertion and stay right through deletions
            curr = if self.tree.key(z) < self.tree.key(id) {
                self.tree.left(id)
            } else {
                self.tree.right(id)
            };
        }
        debug_assert!(curr == Some(z), "OsTree::delete({:?}) on a node not in this tree", z);

        let moved = self.tree.splice_out(z, |nodes, y, z| {
            let mut temp = nodes.get(y).links().parent;
            while let Some(t) = temp {
                if t == z {
                    break;
                }
                let node = nodes.get_mut(t);
                node.size -= 1;
                temp = node.links().parent;
            }
        });

        if let Some(y) = moved {
            let size = self.size_of(self.tree.left(y)) + self.size_of(self.tree.right(y)) + 1;
            self.tree.node_mut(y).size = size;
        }
        self.tree.node_mut(z).size = 1;
    }
}

impl<K: Ord + fmt::Debug> FromIterator<K> for OsTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        for key in iter {
            tree.insert_key(key);
        }
        tree
    }
}

impl<K: Ord + fmt::Debug> fmt::Debug for OsTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.tree, f)
    }
}
