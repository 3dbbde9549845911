use thiserror::Error;

use super::handle::NodeId;

/// A broken structural invariant found by `check_invariants`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    #[error("root {0:?} has a parent link")]
    RootHasParent(NodeId),
    #[error("node {node:?} points to parent {found:?}, expected {expected:?}")]
    ParentMismatch {
        node: NodeId,
        expected: Option<NodeId>,
        found: Option<NodeId>,
    },
    #[error("key of node {node:?} is out of order with ancestor {ancestor:?}")]
    OutOfOrder { node: NodeId, ancestor: NodeId },
    #[error("node {node:?} stores size {stored}, subtree holds {actual}")]
    SizeMismatch {
        node: NodeId,
        stored: usize,
        actual: usize,
    },
    #[error("link to released node {0:?}")]
    Dangling(NodeId),
    #[error("node {0:?} is reachable twice")]
    Cycle(NodeId),
    #[error("{reachable} nodes reachable from the root, tree records {recorded}")]
    NodeCount { reachable: usize, recorded: usize },
    #[error("arena holds {live} live nodes, tree records {recorded} allocated")]
    AllocatedCount { live: usize, recorded: usize },
}
