// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only node model consumed by the composed traversals.
//!
//! ## Overview
//!
//! [`ComposedNodes`] is the seam between a node store and the traversal
//! iterators. It exposes only what composed traversal needs to read: light-tree
//! links (`parent`, `first_child`, `next_sibling`), the Layoutable capability,
//! shadow attachment in both directions, and slot projection in both
//! directions.
//!
//! [`Tree`](crate::Tree) implements it, but hosts with their own node storage
//! can implement it directly and reuse [`ComposedChildren`](crate::ComposedChildren)
//! and [`ComposedWalker`](crate::ComposedWalker) unchanged.
//!
//! ## Contract
//!
//! Implementations answer queries about a fixed snapshot: nothing may change
//! while a traversal borrowing the store is alive. Capability queries must be
//! consistent with each other: `shadow_host` is `Some` exactly for shadow roots,
//! and `projected_nodes` is `Some` exactly for slots.

use core::fmt::Debug;

/// Read access to a light tree with shadow roots and slots.
pub trait ComposedNodes {
    /// Node handle.
    type Id: Copy + Eq + Debug;

    /// Light-tree parent. For the top-level children of a shadow tree this is
    /// the shadow root, not the host.
    fn parent(&self, node: Self::Id) -> Option<Self::Id>;

    /// First light-tree child.
    fn first_child(&self, node: Self::Id) -> Option<Self::Id>;

    /// Next light-tree sibling.
    fn next_sibling(&self, node: Self::Id) -> Option<Self::Id>;

    /// Whether the node participates in layout.
    ///
    /// Composed traversal only ever yields layoutable nodes and does not look
    /// inside nodes that are not.
    fn is_layoutable(&self, node: Self::Id) -> bool;

    /// The slot this node is projected into, if any.
    ///
    /// This is a weak link: implementations return `None` once the slot no
    /// longer exists.
    fn assigned_slot(&self, node: Self::Id) -> Option<Self::Id>;

    /// The shadow root hosted by `element`, if any.
    fn shadow_root(&self, element: Self::Id) -> Option<Self::Id>;

    /// The host of `node` if `node` is a shadow root, otherwise `None`.
    fn shadow_host(&self, node: Self::Id) -> Option<Self::Id>;

    /// The nodes projected into `node` if `node` is a slot, otherwise `None`.
    ///
    /// An empty slice means the slot renders its fallback children.
    fn projected_nodes(&self, node: Self::Id) -> Option<&[Self::Id]>;

    /// Parent of `node` in the composed tree.
    ///
    /// A projected node's composed parent is its slot. A top-level node of a
    /// shadow tree has its host as composed parent, since shadow roots are not
    /// part of the composed tree.
    fn composed_parent(&self, node: Self::Id) -> Option<Self::Id> {
        if let Some(slot) = self.assigned_slot(node) {
            return Some(slot);
        }
        let parent = self.parent(node)?;
        Some(self.shadow_host(parent).unwrap_or(parent))
    }
}

/// Returns the first layoutable node in the sibling chain starting at `start`.
///
/// Nodes that are not layoutable are skipped without looking at their children.
pub(crate) fn first_layoutable<D: ComposedNodes + ?Sized>(
    nodes: &D,
    start: Option<D::Id>,
) -> Option<D::Id> {
    let mut cursor = start;
    while let Some(node) = cursor {
        if nodes.is_layoutable(node) {
            return Some(node);
        }
        cursor = nodes.next_sibling(node);
    }
    None
}
