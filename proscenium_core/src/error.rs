// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by structural scene operations.

use crate::node::NodeId;

/// Crate-wide result alias.
pub type SceneResult<T> = Result<T, SceneError>;

/// A structural operation that could not be carried out.
///
/// Removing a node that is not a child, or destroying a node twice, are not
/// errors; those operations return `false` instead.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// The handle refers to a destroyed node.
    #[error("stale node handle: {0:?}")]
    StaleNode(NodeId),

    /// The parent of an attach operation cannot hold children.
    #[error("node {0:?} is not a container")]
    NotAContainer(NodeId),

    /// The child is the parent itself or one of its ancestors.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    Cycle {
        /// Would-be parent.
        parent: NodeId,
        /// Would-be child.
        child: NodeId,
    },

    /// A child index past the end of the child list.
    #[error("child index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of children.
        len: usize,
    },

    /// A mask must be a different node with shape content.
    #[error("node {0:?} cannot be used as a mask")]
    InvalidMask(NodeId),

    /// Dragging requires the node to be on stage.
    #[error("node {0:?} is not on stage")]
    NotOnStage(NodeId),

    /// The stage root cannot be attached, detached, or destroyed.
    #[error("operation not permitted on the stage root")]
    RootNode,
}
