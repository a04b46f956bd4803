use thiserror::Error;

use crate::node::NodeId;

/// Structural defect reported by [`BubbleTree::validate`](crate::BubbleTree::validate).
///
/// None of these can arise from the public operations. Seeing one means the
/// tree's own bookkeeping is broken.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    /// A key is not strictly between the bounds set by its ancestors.
    #[error("node {node:?} at depth {depth} breaks the search-tree ordering")]
    OutOfOrder {
        /// Offending node.
        node: NodeId,
        /// Distance from the root (root is 0).
        depth: usize,
    },

    /// A child link names a slot that holds no node.
    #[error("link to vacant slot {node:?}")]
    DanglingLink {
        /// Target of the broken link.
        node: NodeId,
    },

    /// A node is reachable along two different paths.
    #[error("node {node:?} is reachable more than once")]
    SharedNode {
        /// Node seen twice.
        node: NodeId,
    },

    /// The number of reachable nodes disagrees with the number allocated.
    #[error("{reachable} nodes reachable from the root but {live} allocated")]
    CountMismatch {
        /// Nodes found by walking from the root.
        reachable: usize,
        /// Nodes the arena holds.
        live: usize,
    },
}
