//! Unbalanced binary search trees for measuring how insertion order shapes
//! a tree.
//!
//! - [`Bst`]: plain binary search tree with CLRS-style `transplant` deletion.
//! - [`OsTree`]: the same tree with subtree sizes, adding 1-based
//!   [`select`](OsTree::select) and [`rank`](OsTree::rank).
//!
//! Nodes live in an arena owned by their tree and are addressed by
//! [`NodeId`]s; every shared operation is on the [`SearchTree`] trait. No
//! balancing is done, so height is whatever the insertion order produces,
//! and all walks use explicit stacks so chains of any length are safe.
//!
//! [`shuffle`], [`timing`] and [`experiment`] hold the harness behind the
//! `tree-experiments` binary.

pub mod bst;
pub mod experiment;
pub mod os_tree;
pub mod shuffle;
pub mod timing;
pub mod tree_base;

pub use bst::Bst;
pub use os_tree::OsTree;
pub use tree_base::{InvariantError, KeyOf, NodeId, SearchTree, TreeStats};
