// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by tree mutations.

use crate::types::NodeId;

/// A structural mutation that the [`Tree`](crate::Tree) refused to perform.
///
/// Mutations validate their inputs before changing anything, so a returned
/// error means the tree is exactly as it was before the call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The id does not refer to a live node.
    #[error("node {0:?} is not live")]
    StaleNode(NodeId),
    /// Shadow roots are only created, moved, and removed through
    /// `attach_shadow` and `detach_shadow`.
    #[error("shadow roots are managed by `attach_shadow` and `detach_shadow`")]
    ShadowRootMutation,
    /// The node is not an element and cannot host a shadow root.
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),
    /// The element already hosts a shadow root.
    #[error("element {0:?} already hosts a shadow root")]
    ShadowAlreadyAttached(NodeId),
    /// The node is not a slot.
    #[error("node {0:?} is not a slot")]
    NotASlot(NodeId),
    /// The node does not participate in layout and cannot be slotted.
    #[error("node {0:?} is not layoutable")]
    NotLayoutable(NodeId),
    /// The node is not a light-tree child of the host whose shadow tree
    /// contains the slot.
    #[error("node {node:?} cannot be assigned to slot {slot:?}")]
    NotSlottable {
        /// The node that was being assigned.
        node: NodeId,
        /// The slot it was being assigned to.
        slot: NodeId,
    },
    /// The same node appears more than once in one assignment.
    #[error("node {0:?} appears more than once in a slot assignment")]
    DuplicateAssignment(NodeId),
    /// The new parent lies inside the subtree being moved.
    #[error("moving {node:?} under {parent:?} would create a cycle")]
    WouldCycle {
        /// The node being moved.
        node: NodeId,
        /// The requested new parent.
        parent: NodeId,
    },
}
