// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Upward traversal through the composed tree.

use core::fmt;
use core::iter::FusedIterator;

use crate::model::ComposedNodes;

/// Iterator over the composed ancestors of a node, nearest first.
///
/// Follows [`ComposedNodes::composed_parent`]: a projected node climbs to its
/// slot, and top-level shadow content climbs to the host. The starting node is
/// not included.
///
/// This is the path hit testing and event routing need: a click on projected
/// content bubbles through the slot and the shadow tree around it before
/// reaching the host.
pub struct ComposedAncestors<'a, D: ComposedNodes + ?Sized> {
    nodes: &'a D,
    next: Option<D::Id>,
}

impl<'a, D: ComposedNodes + ?Sized> ComposedAncestors<'a, D> {
    /// Create an iterator over the composed ancestors of `node`.
    pub fn new(nodes: &'a D, node: D::Id) -> Self {
        Self {
            nodes,
            next: nodes.composed_parent(node),
        }
    }
}

impl<D: ComposedNodes + ?Sized> fmt::Debug for ComposedAncestors<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposedAncestors")
            .field("next", &self.next)
            .finish_non_exhaustive()
    }
}

impl<D: ComposedNodes + ?Sized> Iterator for ComposedAncestors<'_, D> {
    type Item = D::Id;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.nodes.composed_parent(current);
        Some(current)
    }
}

impl<D: ComposedNodes + ?Sized> FusedIterator for ComposedAncestors<'_, D> {}
