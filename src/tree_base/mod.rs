mod arena;
pub mod handle;
pub mod iter;
pub mod node;
pub mod raw_tree;
mod tree_stats;
mod verify;

pub use self::{
    handle::NodeId,
    iter::{Iter, NodeIds},
    node::{BstNode, Links, OsNode, TreeNode},
    raw_tree::RawTree,
    tree_stats::TreeStats,
    verify::InvariantError,
};

/// Key type stored by a tree.
pub type KeyOf<T> = <<T as SearchTree>::Node as TreeNode>::Key;

/// Operations shared by every unbalanced search tree in this crate.
///
/// Implementors provide insertion and deletion (where augmentation data is
/// maintained); everything that only reads or rewires the shape comes from
/// the underlying [`RawTree`].
///
/// Node lifecycle: [`create_node`](Self::create_node) allocates a detached
/// node, [`insert`](Self::insert) links it, [`delete`](Self::delete) unlinks
/// it again and [`free_node`](Self::free_node) releases it. Handles passed to
/// `delete` must belong to nodes currently linked into this tree.
pub trait SearchTree {
    type Node: TreeNode;

    #[doc(hidden)]
    fn raw(&self) -> &RawTree<Self::Node>;
    #[doc(hidden)]
    fn raw_mut(&mut self) -> &mut RawTree<Self::Node>;

    fn insert(&mut self, z: NodeId);

    /// Unlinks `z`. The node stays allocated until [`free_node`](Self::free_node).
    fn delete(&mut self, z: NodeId);

    fn create_node(&mut self, key: KeyOf<Self>) -> NodeId {
        self.raw_mut().create_node(key)
    }

    fn free_node(&mut self, z: NodeId) -> KeyOf<Self> {
        self.raw_mut().free_node(z)
    }

    /// Allocates a node for `key` and inserts it.
    fn insert_key(&mut self, key: KeyOf<Self>) -> NodeId {
        let z = self.create_node(key);
        self.insert(z);
        z
    }

    /// Deletes and releases `z`, returning its key.
    fn remove(&mut self, z: NodeId) -> KeyOf<Self> {
        self.delete(z);
        self.free_node(z)
    }

    /// Releases every node of the tree in post-order, reporting each key.
    fn destroy(&mut self, on_release: impl FnMut(KeyOf<Self>)) -> usize
    where
        Self: Sized,
    {
        self.raw_mut().destroy(on_release)
    }

    fn root(&self) -> Option<NodeId> {
        self.raw().root()
    }

    /// Number of linked nodes.
    fn len(&self) -> usize {
        self.raw().len()
    }

    fn is_empty(&self) -> bool {
        self.raw().is_empty()
    }

    fn stats(&self) -> &TreeStats {
        self.raw().stats()
    }

    fn key(&self, x: NodeId) -> &KeyOf<Self> {
        self.raw().key(x)
    }

    fn parent(&self, x: NodeId) -> Option<NodeId> {
        self.raw().parent(x)
    }

    fn left(&self, x: NodeId) -> Option<NodeId> {
        self.raw().left(x)
    }

    fn right(&self, x: NodeId) -> Option<NodeId> {
        self.raw().right(x)
    }

    fn search(&self, key: &KeyOf<Self>) -> Option<NodeId> {
        self.raw().search_from(self.root(), key)
    }

    fn search_from(&self, x: Option<NodeId>, key: &KeyOf<Self>) -> Option<NodeId> {
        self.raw().search_from(x, key)
    }

    fn min(&self, x: NodeId) -> NodeId {
        self.raw().min(x)
    }

    fn max(&self, x: NodeId) -> NodeId {
        self.raw().max(x)
    }

    fn successor(&self, x: NodeId) -> Option<NodeId> {
        self.raw().successor(x)
    }

    fn predecessor(&self, x: NodeId) -> Option<NodeId> {
        self.raw().predecessor(x)
    }

    /// See [`RawTree::transplant`]. Does not touch augmentation data.
    fn transplant(&mut self, u: NodeId, v: Option<NodeId>) {
        self.raw_mut().transplant(u, v)
    }

    fn height(&self) -> usize {
        self.raw().height_from(self.root())
    }

    fn height_from(&self, x: Option<NodeId>) -> usize {
        self.raw().height_from(x)
    }

    fn iter(&self) -> Iter<'_, Self::Node> {
        self.raw().iter_from(self.root())
    }

    fn iter_from(&self, x: Option<NodeId>) -> Iter<'_, Self::Node> {
        self.raw().iter_from(x)
    }

    /// Inorder keys, cut off after `limit` of them.
    fn iter_limited(&self, limit: usize) -> std::iter::Take<Iter<'_, Self::Node>> {
        self.iter().take(limit)
    }

    fn node_ids(&self) -> NodeIds<'_, Self::Node> {
        self.raw().node_ids_from(self.root())
    }

    fn walk_silent(&self) -> usize {
        self.raw().walk_silent_from(self.root())
    }

    fn check_invariants(&self) -> Result<(), InvariantError> {
        self.raw().check_invariants()
    }
}
