use std::iter::FusedIterator;

use super::{arena::Arena, handle::NodeId, node::TreeNode};

/// Explicit-stack inorder walk. Holds at most `height` handles, so degenerate
/// trees do not grow the call stack.
#[derive(Clone, Debug)]
struct InorderStack {
    stack: Vec<NodeId>,
}

impl InorderStack {
    fn new<N: TreeNode>(nodes: &Arena<N>, start: Option<NodeId>) -> Self {
        let mut walk = Self { stack: Vec::new() };
        walk.push_left_spine(nodes, start);
        walk
    }

    fn push_left_spine<N: TreeNode>(&mut self, nodes: &Arena<N>, mut x: Option<NodeId>) {
        while let Some(id) = x {
            self.stack.push(id);
            x = nodes.get(id).links().left;
        }
    }

    fn next<N: TreeNode>(&mut self, nodes: &Arena<N>) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.push_left_spine(nodes, nodes.get(id).links().right);
        Some(id)
    }
}

/// Keys of a subtree in increasing order.
///
/// Created by [`RawTree::iter_from`](super::raw_tree::RawTree::iter_from). The
/// walk is lazy; calling `iter` again restarts it from the top.
#[derive(Clone, Debug)]
pub struct Iter<'a, N: TreeNode> {
    nodes: &'a Arena<N>,
    walk: InorderStack,
}

impl<'a, N: TreeNode> Iter<'a, N> {
    pub(crate) fn new(nodes: &'a Arena<N>, start: Option<NodeId>) -> Self {
        Self {
            nodes,
            walk: InorderStack::new(nodes, start),
        }
    }
}

impl<'a, N: TreeNode> Iterator for Iter<'a, N> {
    type Item = &'a N::Key;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.walk.next(self.nodes)?;
        Some(self.nodes.get(id).key())
    }
}

impl<N: TreeNode> FusedIterator for Iter<'_, N> {}

/// Node handles of a subtree in key order.
#[derive(Clone, Debug)]
pub struct NodeIds<'a, N: TreeNode> {
    nodes: &'a Arena<N>,
    walk: InorderStack,
}

impl<'a, N: TreeNode> NodeIds<'a, N> {
    pub(crate) fn new(nodes: &'a Arena<N>, start: Option<NodeId>) -> Self {
        Self {
            nodes,
            walk: InorderStack::new(nodes, start),
        }
    }
}

impl<N: TreeNode> Iterator for NodeIds<'_, N> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        self.walk.next(self.nodes)
    }
}

impl<N: TreeNode> FusedIterator for NodeIds<'_, N> {}
