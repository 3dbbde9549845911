use std::{fmt, hint::black_box};

use super::{
    arena::Arena,
    handle::NodeId,
    iter::{Iter, NodeIds},
    node::{Links, TreeNode},
    tree_stats::TreeStats,
    verify::InvariantError,
};

/// Unbalanced search tree over an arena of nodes.
///
/// Holds everything [`Bst`](crate::Bst) and [`OsTree`](crate::OsTree) have in
/// common: node lifecycle, the parent/child wiring, read-only queries and the
/// structural half of insertion and deletion. Augmented trees hook their
/// bookkeeping into [`insert_with`](Self::insert_with) and
/// [`splice_out`](Self::splice_out).
pub struct RawTree<N: TreeNode> {
    root: Option<NodeId>,
    nodes: Arena<N>,
    stats: TreeStats,
}

impl<N: TreeNode> Default for RawTree<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Node lifecycle
impl<N: TreeNode> RawTree<N> {
    pub fn new() -> Self {
        Self {
            root: None,
            nodes: Arena::new(),
            stats: TreeStats::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            root: None,
            nodes: Arena::with_capacity(capacity),
            stats: TreeStats::new(),
        }
    }

    /// Allocates a detached node holding `key`.
    pub fn create_node(&mut self, key: N::Key) -> NodeId {
        let id = self.nodes.alloc(N::new(key));
        self.stats.allocated += 1;
        id
    }

    /// Releases a detached node and hands its key back.
    ///
    /// The node must have been unlinked by `delete` (or never inserted).
    pub fn free_node(&mut self, id: NodeId) -> N::Key {
        debug_assert!(
            self.root != Some(id) && self.nodes.get(id).links().is_detached(),
            "free_node({:?}) on a node that is still linked",
            id
        );
        self.stats.allocated -= 1;
        self.nodes.take(id).into_key()
    }

    /// Releases every node reachable from the root in post-order (left, right,
    /// self), passing each key to `on_release`. Returns the number of nodes
    /// released. The tree is empty afterwards.
    pub fn destroy(&mut self, on_release: impl FnMut(N::Key)) -> usize {
        let released = match self.root {
            Some(root) => self.destroy_from(root, on_release),
            None => 0,
        };
        // detached nodes the caller never freed stay allocated
        if self.stats.allocated == 0 {
            self.nodes.clear();
        }
        released
    }

    /// Cuts the subtree rooted at `x` off its parent and releases it in
    /// post-order. Ancestors of `x` keep their augmentation data untouched, so
    /// trees that store subtree sizes must not call this below the root.
    pub(crate) fn destroy_from(
        &mut self,
        x: NodeId,
        mut on_release: impl FnMut(N::Key),
    ) -> usize {
        match self.parent(x) {
            None => {
                debug_assert!(
                    self.root == Some(x),
                    "destroy_from({:?}) on a node that is not linked",
                    x
                );
                self.root = None;
            }
            Some(p) if self.left(p) == Some(x) => self.nodes.get_mut(p).links_mut().left = None,
            Some(p) => self.nodes.get_mut(p).links_mut().right = None,
        }

        let mut released = 0;
        let mut stack: Vec<NodeId> = Vec::new();
        let mut last: Option<NodeId> = None;
        let mut curr = Some(x);

        loop {
            while let Some(id) = curr {
                stack.push(id);
                curr = self.left(id);
            }
            let Some(&top) = stack.last() else {
                break;
            };
            let right = self.right(top);
            if right.is_some() && right != last {
                curr = right;
            } else {
                stack.pop();
                on_release(self.nodes.take(top).into_key());
                released += 1;
                last = Some(top);
            }
        }

        log::debug!("RawTree::destroy_from {:?} released {} nodes", x, released);
        self.stats.size -= released;
        self.stats.allocated -= released;
        released
    }
}

/// Accessors
impl<N: TreeNode> RawTree<N> {
    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stats.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Node slots reserved before the arena reallocates.
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub fn stats(&self) -> &TreeStats {
        &self.stats
    }

    /// Whether `id` names a node that is still allocated in this tree.
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &N {
        self.nodes.get(id)
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut N {
        self.nodes.get_mut(id)
    }

    #[inline]
    pub fn key(&self, id: NodeId) -> &N::Key {
        self.nodes.get(id).key()
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).links().parent
    }

    #[inline]
    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).links().left
    }

    #[inline]
    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).links().right
    }
}

/// Queries
impl<N: TreeNode> RawTree<N> {
    /// First node found on the descent from `x` whose key equals `key`.
    pub fn search_from(&self, mut x: Option<NodeId>, key: &N::Key) -> Option<NodeId> {
        while let Some(id) = x {
            let node = self.nodes.get(id);
            x = match key.cmp(node.key()) {
                std::cmp::Ordering::Equal => return Some(id),
                std::cmp::Ordering::Less => node.links().left,
                std::cmp::Ordering::Greater => node.links().right,
            };
        }
        None
    }

    pub fn min(&self, mut x: NodeId) -> NodeId {
        while let Some(left) = self.left(x) {
            x = left;
        }
        x
    }

    pub fn max(&self, mut x: NodeId) -> NodeId {
        while let Some(right) = self.right(x) {
            x = right;
        }
        x
    }

    pub fn successor(&self, mut x: NodeId) -> Option<NodeId> {
        if let Some(right) = self.right(x) {
            return Some(self.min(right));
        }
        let mut y = self.parent(x);
        while let Some(p) = y {
            if self.right(p) != Some(x) {
                break;
            }
            x = p;
            y = self.parent(p);
        }
        y
    }

    pub fn predecessor(&self, mut x: NodeId) -> Option<NodeId> {
        if let Some(left) = self.left(x) {
            return Some(self.max(left));
        }
        let mut y = self.parent(x);
        while let Some(p) = y {
            if self.left(p) != Some(x) {
                break;
            }
            x = p;
            y = self.parent(p);
        }
        y
    }

    /// Number of nodes on the longest root-to-leaf path of the subtree at `x`,
    /// 0 for an absent subtree.
    pub fn height_from(&self, x: Option<NodeId>) -> usize {
        let mut height = 0;
        let mut stack: Vec<(NodeId, usize)> = x.map(|id| (id, 1)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            height = height.max(depth);
            let links = self.nodes.get(id).links();
            if let Some(left) = links.left {
                stack.push((left, depth + 1));
            }
            if let Some(right) = links.right {
                stack.push((right, depth + 1));
            }
        }
        height
    }

    pub fn iter_from(&self, x: Option<NodeId>) -> Iter<'_, N> {
        Iter::new(&self.nodes, x)
    }

    pub fn node_ids_from(&self, x: Option<NodeId>) -> NodeIds<'_, N> {
        NodeIds::new(&self.nodes, x)
    }

    /// Inorder walk that reads every key without producing output. Returns the
    /// number of nodes visited.
    pub fn walk_silent_from(&self, x: Option<NodeId>) -> usize {
        let mut visited = 0;
        for key in self.iter_from(x) {
            black_box(key);
            visited += 1;
        }
        visited
    }
}

/// Structural mutation
impl<N: TreeNode> RawTree<N> {
    /// Links the detached node `z` below the last node of the usual descent
    /// (left on strictly-less, right otherwise). `on_path` runs on every node
    /// visited on the way down, before the link is made.
    pub(crate) fn insert_with(&mut self, z: NodeId, mut on_path: impl FnMut(&mut N)) {
        debug_assert!(
            self.root != Some(z) && self.nodes.get(z).links().is_detached(),
            "insert({:?}) on a node that is already linked",
            z
        );

        let mut y: Option<NodeId> = None;
        let mut go_left = false;
        let mut x = self.root;
        while let Some(id) = x {
            y = x;
            let node = self.nodes.get_mut(id);
            on_path(node);
            go_left = self.nodes.get(z).key() < self.nodes.get(id).key();
            let links = self.nodes.get(id).links();
            x = if go_left { links.left } else { links.right };
        }

        self.nodes.get_mut(z).links_mut().parent = y;
        match y {
            None => self.root = Some(z),
            Some(p) if go_left => self.nodes.get_mut(p).links_mut().left = Some(z),
            Some(p) => self.nodes.get_mut(p).links_mut().right = Some(z),
        }

        self.stats.size += 1;
        self.stats.inserts += 1;
        log::debug!("RawTree::insert {:?} under {:?}", z, y);
    }

    /// Puts the subtree rooted at `v` where the subtree rooted at `u` hangs.
    /// `u`'s own links are left untouched; relinking `v`'s children is up to
    /// the caller.
    pub fn transplant(&mut self, u: NodeId, v: Option<NodeId>) {
        let up = self.parent(u);
        match up {
            None => self.root = v,
            Some(p) if self.left(p) == Some(u) => self.nodes.get_mut(p).links_mut().left = v,
            Some(p) => self.nodes.get_mut(p).links_mut().right = v,
        }
        if let Some(v) = v {
            self.nodes.get_mut(v).links_mut().parent = up;
        }
    }

    /// Unlinks `z` with the three-case splice. When `z` has two children and
    /// its successor `y` is not its right child, `on_relocate(nodes, y, z)` runs
    /// before `y` leaves its old position. Returns `y` if it took `z`'s place.
    ///
    /// `z` is left fully detached but still allocated.
    pub(crate) fn splice_out(
        &mut self,
        z: NodeId,
        on_relocate: impl FnOnce(&mut Arena<N>, NodeId, NodeId),
    ) -> Option<NodeId> {
        let Links { left, right, .. } = *self.nodes.get(z).links();
        let moved = match (left, right) {
            (None, right) => {
                log::debug!("RawTree::splice_out {:?}: no left child", z);
                self.transplant(z, right);
                None
            }
            (left @ Some(_), None) => {
                log::debug!("RawTree::splice_out {:?}: no right child", z);
                self.transplant(z, left);
                None
            }
            (Some(zl), Some(zr)) => {
                let y = self.min(zr);
                log::debug!("RawTree::splice_out {:?}: successor {:?}", z, y);
                if self.parent(y) != Some(z) {
                    on_relocate(&mut self.nodes, y, z);
                    let yr = self.right(y);
                    self.transplant(y, yr);
                    self.nodes.get_mut(y).links_mut().right = Some(zr);
                    self.nodes.get_mut(zr).links_mut().parent = Some(y);
                }
                self.transplant(z, Some(y));
                self.nodes.get_mut(y).links_mut().left = Some(zl);
                self.nodes.get_mut(zl).links_mut().parent = Some(y);
                Some(y)
            }
        };

        *self.nodes.get_mut(z).links_mut() = Links::default();
        self.stats.size -= 1;
        self.stats.deletes += 1;
        moved
    }
}

/// Verification
impl<N: TreeNode> RawTree<N> {
    /// Walks the whole tree and reports the first broken invariant: key order
    /// (left strictly less, right greater or equal), parent links, stored
    /// subtree sizes for augmented nodes, and the recorded node and allocation
    /// counts.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        enum Frame {
            Enter {
                id: NodeId,
                parent: Option<NodeId>,
                lower: Option<NodeId>,
                upper: Option<NodeId>,
            },
            Exit(NodeId),
        }

        if self.nodes.len() != self.stats.allocated {
            return Err(InvariantError::AllocatedCount {
                live: self.nodes.len(),
                recorded: self.stats.allocated,
            });
        }
        let Some(root) = self.root else {
            return match self.stats.size {
                0 => Ok(()),
                recorded => Err(InvariantError::NodeCount {
                    reachable: 0,
                    recorded,
                }),
            };
        };
        if self.parent(root).is_some() {
            return Err(InvariantError::RootHasParent(root));
        }

        let slots = self.nodes.slot_count();
        let mut seen = vec![false; slots];
        let mut sizes = vec![0usize; slots];
        let mut reachable = 0;
        let mut stack = vec![Frame::Enter {
            id: root,
            parent: None,
            lower: None,
            upper: None,
        }];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter {
                    id,
                    parent,
                    lower,
                    upper,
                } => {
                    if !self.nodes.contains(id) {
                        return Err(InvariantError::Dangling(id));
                    }
                    if seen[id.to_index()] {
                        return Err(InvariantError::Cycle(id));
                    }
                    seen[id.to_index()] = true;
                    reachable += 1;

                    let node = self.nodes.get(id);
                    if node.links().parent != parent {
                        return Err(InvariantError::ParentMismatch {
                            node: id,
                            expected: parent,
                            found: node.links().parent,
                        });
                    }
                    if let Some(a) = lower {
                        if node.key() < self.key(a) {
                            return Err(InvariantError::OutOfOrder { node: id, ancestor: a });
                        }
                    }
                    if let Some(b) = upper {
                        if node.key() >= self.key(b) {
                            return Err(InvariantError::OutOfOrder { node: id, ancestor: b });
                        }
                    }

                    stack.push(Frame::Exit(id));
                    if let Some(right) = node.links().right {
                        stack.push(Frame::Enter {
                            id: right,
                            parent: Some(id),
                            lower: Some(id),
                            upper,
                        });
                    }
                    if let Some(left) = node.links().left {
                        stack.push(Frame::Enter {
                            id: left,
                            parent: Some(id),
                            lower,
                            upper: Some(id),
                        });
                    }
                }
                Frame::Exit(id) => {
                    let links = self.nodes.get(id).links();
                    let size_of = |x: Option<NodeId>| x.map_or(0, |c| sizes[c.to_index()]);
                    let actual = size_of(links.left) + size_of(links.right) + 1;
                    if let Some(stored) = self.nodes.get(id).subtree_size() {
                        if stored != actual {
                            return Err(InvariantError::SizeMismatch {
                                node: id,
                                stored,
                                actual,
                            });
                        }
                    }
                    sizes[id.to_index()] = actual;
                }
            }
        }

        if reachable != self.stats.size {
            return Err(InvariantError::NodeCount {
                reachable,
                recorded: self.stats.size,
            });
        }
        Ok(())
    }
}

/// Debug
impl<N: TreeNode> RawTree<N> {
    fn print_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
        for _ in 0..depth {
            write!(f, "  ")?;
        }
        let node = self.nodes.get(id);
        match node.subtree_size() {
            Some(size) => writeln!(f, "{:?} {:?} (size {})", id, node.key(), size),
            None => writeln!(f, "{:?} {:?}", id, node.key()),
        }
    }
}

impl<N: TreeNode> fmt::Debug for RawTree<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // preorder, right child pushed first so the left one prints first
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|id| (id, 0)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            self.print_node(f, id, depth)?;
            if let Some(right) = self.right(id) {
                stack.push((right, depth + 1));
            }
            if let Some(left) = self.left(id) {
                stack.push((left, depth + 1));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree_base::BstNode;

    #[test]
    fn allocation_count_is_cross_checked() {
        let mut tree: RawTree<BstNode<i32>> = RawTree::new();
        let a = tree.create_node(1);
        tree.insert_with(a, |_| {});
        tree.create_node(2);
        tree.check_invariants().unwrap();

        tree.stats.allocated -= 1;
        assert_eq!(
            tree.check_invariants(),
            Err(InvariantError::AllocatedCount {
                live: 2,
                recorded: 1
            })
        );
    }
}
