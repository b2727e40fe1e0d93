// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the composed tree: node identifiers, kinds, and flags.

/// Identifier for a node in the tree (generational).
///
/// A `NodeId` stays valid until its node is removed. After that it is *stale*:
/// every accessor treats it as absent, even once the slot is reused by a newer
/// node. References held across mutations (for example a node's assigned slot)
/// are therefore weak: they never keep a node alive and never resolve to the
/// wrong node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

/// The kind of a node, fixed at creation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A plain node that does not take part in layout by default, such as a
    /// comment or a data carrier.
    ///
    /// Inert nodes are skipped by composed traversal, together with their
    /// children, unless [`NodeFlags::LAYOUTABLE`] is set on them.
    Inert,
    /// An element. Elements may host a single shadow root.
    Element,
    /// A slot: renders the light-tree nodes assigned to it, or its own
    /// children as fallback content when nothing is assigned.
    Slot,
    /// The root of a shadow tree.
    ///
    /// Shadow roots are created by [`Tree::attach_shadow`](crate::Tree::attach_shadow)
    /// and are never layoutable.
    ShadowRoot,
}

bitflags::bitflags! {
    /// Per-node flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node participates in layout and is produced by composed traversal.
        const LAYOUTABLE = 0b0000_0001;
    }
}

impl NodeFlags {
    /// The flags a freshly inserted node of `kind` starts with.
    pub const fn default_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Element | NodeKind::Slot => Self::LAYOUTABLE,
            NodeKind::Inert | NodeKind::ShadowRoot => Self::empty(),
        }
    }
}
