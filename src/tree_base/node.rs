use std::fmt::Debug;

use super::handle::NodeId;

/// Parent and child links of a node. A node with no parent is either the root
/// or detached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Links {
    pub parent: Option<NodeId>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl Links {
    #[inline]
    pub fn is_detached(&self) -> bool {
        self.parent.is_none() && self.left.is_none() && self.right.is_none()
    }
}

/// Common node interface the shared tree routines work against.
pub trait TreeNode {
    type Key: Ord + Debug;

    fn new(key: Self::Key) -> Self;
    fn key(&self) -> &Self::Key;
    fn into_key(self) -> Self::Key;
    fn links(&self) -> &Links;
    fn links_mut(&mut self) -> &mut Links;

    /// Stored subtree size for augmented nodes, `None` for plain ones.
    fn subtree_size(&self) -> Option<usize> {
        None
    }
}

/// Plain binary search tree node.
#[derive(Clone, Debug)]
pub struct BstNode<K> {
    key: K,
    links: Links,
}

impl<K: Ord + Debug> TreeNode for BstNode<K> {
    type Key = K;

    #[inline]
    fn new(key: K) -> Self {
        Self {
            key,
            links: Links::default(),
        }
    }

    #[inline]
    fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    fn into_key(self) -> K {
        self.key
    }

    #[inline]
    fn links(&self) -> &Links {
        &self.links
    }

    #[inline]
    fn links_mut(&mut self) -> &mut Links {
        &mut self.links
    }
}

/// Order-statistic node: a BST node plus the size of its subtree.
#[derive(Clone, Debug)]
pub struct OsNode<K> {
    key: K,
    pub(crate) size: usize,
    links: Links,
}

impl<K> OsNode<K> {
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }
}

impl<K: Ord + Debug> TreeNode for OsNode<K> {
    type Key = K;

    #[inline]
    fn new(key: K) -> Self {
        Self {
            key,
            size: 1,
            links: Links::default(),
        }
    }

    #[inline]
    fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    fn into_key(self) -> K {
        self.key
    }

    #[inline]
    fn links(&self) -> &Links {
        &self.links
    }

    #[inline]
    fn links_mut(&mut self) -> &mut Links {
        &mut self.links
    }

    #[inline]
    fn subtree_size(&self) -> Option<usize> {
        Some(self.size)
    }
}
