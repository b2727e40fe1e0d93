// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-level composed children of an element.

use core::fmt;
use core::iter::FusedIterator;

use crate::model::{ComposedNodes, first_layoutable};

/// Iterator over the direct composed children of one element.
///
/// If the element hosts a shadow root, this yields the layoutable top-level
/// children of the shadow tree, skipping any that are assigned to a slot.
/// Otherwise it yields the element's own layoutable light-tree children.
///
/// The assigned-slot filter is only applied on the shadow side. Outside a shadow
/// tree a node is never assigned to a slot, so the light side yields every
/// layoutable child as-is. If that ever stops holding, a projected node would
/// show up here at its light-tree position as well as in its slot.
///
/// This does not descend into the yielded nodes and does not expand slots; use
/// [`ComposedWalker`](crate::ComposedWalker) for that.
pub struct ComposedChildren<'a, D: ComposedNodes + ?Sized> {
    nodes: &'a D,
    target: D::Id,
    state: State<D::Id>,
}

#[derive(Clone, Copy, Debug)]
enum State<Id> {
    Start,
    Shadow(Id),
    Light(Id),
    Done,
}

impl<'a, D: ComposedNodes + ?Sized> ComposedChildren<'a, D> {
    /// Create an iterator over the composed children of `target`.
    pub fn new(nodes: &'a D, target: D::Id) -> Self {
        Self {
            nodes,
            target,
            state: State::Start,
        }
    }

    /// The element whose children are being produced.
    pub fn target(&self) -> D::Id {
        self.target
    }

    /// Restart from the first child.
    pub fn reset(&mut self) {
        self.state = State::Start;
    }

    /// Produce the next child, or `None` once the sibling chain is exhausted.
    pub fn advance(&mut self) -> Option<D::Id> {
        let (candidate, in_shadow) = match self.state {
            State::Start => match self.nodes.shadow_root(self.target) {
                Some(shadow) => (self.nodes.first_child(shadow), true),
                None => (self.nodes.first_child(self.target), false),
            },
            State::Shadow(last) => (self.nodes.next_sibling(last), true),
            State::Light(last) => (self.nodes.next_sibling(last), false),
            State::Done => return None,
        };

        let found = if in_shadow {
            self.first_unassigned(candidate)
        } else {
            first_layoutable(self.nodes, candidate)
        };

        self.state = match found {
            Some(node) if in_shadow => State::Shadow(node),
            Some(node) => State::Light(node),
            None => State::Done,
        };
        found
    }

    fn first_unassigned(&self, start: Option<D::Id>) -> Option<D::Id> {
        let mut cursor = start;
        while let Some(node) = cursor {
            if self.nodes.is_layoutable(node) && self.nodes.assigned_slot(node).is_none() {
                return Some(node);
            }
            cursor = self.nodes.next_sibling(node);
        }
        None
    }
}

impl<D: ComposedNodes + ?Sized> Clone for ComposedChildren<'_, D> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            target: self.target,
            state: self.state,
        }
    }
}

impl<D: ComposedNodes + ?Sized> fmt::Debug for ComposedChildren<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposedChildren")
            .field("target", &self.target)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<D: ComposedNodes + ?Sized> Iterator for ComposedChildren<'_, D> {
    type Item = D::Id;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }
}

impl<D: ComposedNodes + ?Sized> FusedIterator for ComposedChildren<'_, D> {}
