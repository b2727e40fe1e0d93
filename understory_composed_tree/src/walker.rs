// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pre-order walk over the composed tree.
//!
//! ## Overview
//!
//! [`ComposedWalker`] flattens light trees, shadow trees, and slot projections
//! into a single pre-order sequence of layoutable nodes without building the
//! flattened tree. It keeps its position in a handful of scalars plus a stack of
//! slot frames, so a walk can be paused after any step and resumed later.
//!
//! ## Descending
//!
//! The first composed child of a node is:
//! - for a slot with projected nodes, the first projected node (a slot frame is
//!   pushed so the walk can continue through the rest of the projection);
//! - for a slot without projected nodes, its first layoutable fallback child;
//! - for an element hosting a shadow root, the first layoutable top-level node
//!   of the shadow tree;
//! - otherwise, the first layoutable light-tree child.
//!
//! Nodes that are not layoutable are skipped together with their subtrees.
//!
//! ## Climbing
//!
//! When a node has no composed children (or the caller asked to skip them), the
//! walk looks for the next composed sibling, climbing as needed:
//! - a node reached through projection continues with the next projected node
//!   of the same slot, then climbs to the slot;
//! - any other node continues with its next layoutable light-tree sibling, then
//!   climbs to its parent. When that parent is a shadow root the climb resumes at
//!   the host, so the walk continues after the host rather than inside the
//!   shadow root. A walk rooted at the shadow root itself ends there instead.
//!
//! The walk ends once the climb reaches the root.
//!
//! ## Well-formedness
//!
//! The walker does not detect malformed trees. A slot that (transitively)
//! projects one of its own ancestors makes the walk loop forever.

use core::fmt;
use core::iter::FusedIterator;

use smallvec::SmallVec;

use crate::model::{ComposedNodes, first_layoutable};

/// Slot frames kept inline before the stack spills to the heap.
const INLINE_FRAMES: usize = 8;

/// Position inside the projected nodes of a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SlotFrame<Id> {
    slot: Id,
    index: usize,
}

/// Pre-order iterator over the layoutable descendants of a root in the
/// composed tree.
///
/// The root itself is not yielded. Every layoutable node reachable in the
/// composed tree is yielded exactly once: a projected node at its slot's
/// position, any other node at its light-tree position.
///
/// Besides [`Iterator::next`] (an alias for [`advance`](Self::advance)), the
/// walker supports pruning with [`skip_children`](Self::skip_children) and
/// restarting with [`reset`](Self::reset). Steps do not allocate; the slot frame
/// stack only spills to the heap for projections nested deeper than a few
/// levels, and keeps that buffer across resets.
///
/// ## Example
///
/// ```rust
/// use understory_composed_tree::{NodeKind, Tree};
///
/// let mut tree = Tree::new();
/// let root = tree.insert(None, NodeKind::Element).unwrap();
/// let card = tree.insert(Some(root), NodeKind::Element).unwrap();
/// let title = tree.insert(Some(card), NodeKind::Element).unwrap();
/// let body = tree.insert(Some(card), NodeKind::Element).unwrap();
/// let body_text = tree.insert(Some(body), NodeKind::Element).unwrap();
///
/// let shadow = tree.attach_shadow(card).unwrap();
/// let frame = tree.insert(Some(shadow), NodeKind::Element).unwrap();
/// let slot = tree.insert(Some(frame), NodeKind::Slot).unwrap();
/// tree.assign(slot, &[body, title]).unwrap();
///
/// let mut walker = tree.walk(root);
/// assert_eq!(walker.next(), Some(card));
/// assert_eq!(walker.next(), Some(frame));
/// assert_eq!(walker.next(), Some(slot));
/// assert_eq!(walker.next(), Some(body));
///
/// // Don't look inside `body`.
/// walker.skip_children();
/// assert_eq!(walker.next(), Some(title));
/// assert_eq!(walker.next(), None);
/// # let _ = body_text;
/// ```
pub struct ComposedWalker<'a, D: ComposedNodes + ?Sized> {
    nodes: &'a D,
    root: D::Id,
    current: D::Id,
    stack: SmallVec<[SlotFrame<D::Id>; INLINE_FRAMES]>,
    skip_children: bool,
    exhausted: bool,
}

impl<'a, D: ComposedNodes + ?Sized> ComposedWalker<'a, D> {
    /// Create a walker over the composed descendants of `root`.
    pub fn new(nodes: &'a D, root: D::Id) -> Self {
        Self {
            nodes,
            root,
            current: root,
            stack: SmallVec::new(),
            skip_children: false,
            exhausted: false,
        }
    }

    /// The root of the walk.
    pub fn root(&self) -> D::Id {
        self.root
    }

    /// The node most recently yielded.
    ///
    /// `None` before the first step and once the walk is exhausted.
    pub fn current(&self) -> Option<D::Id> {
        (self.current != self.root).then_some(self.current)
    }

    /// Do not descend into the children of the current node on the next step.
    ///
    /// The next [`advance`](Self::advance) moves straight to the next sibling of
    /// the current node (or of its nearest ancestor that has one). The request
    /// only applies to that one step.
    pub fn skip_children(&mut self) {
        self.skip_children = true;
    }

    /// Restart the walk from the root.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.skip_children = false;
        self.exhausted = false;
        self.current = self.root;
    }

    /// Produce the next node in composed pre-order, or `None` once the walk is
    /// exhausted. An exhausted walker stays exhausted until [`reset`](Self::reset).
    pub fn advance(&mut self) -> Option<D::Id> {
        if self.exhausted {
            return None;
        }

        if !core::mem::take(&mut self.skip_children)
            && let Some(child) = self.first_composed_child(self.current)
        {
            self.current = child;
            return Some(child);
        }

        let mut node = self.current;
        while node != self.root {
            let (next, climb) = self.next_composed_sibling(node);
            if let Some(next) = next {
                self.current = next;
                return Some(next);
            }
            match climb {
                Some(parent) => node = parent,
                None => break,
            }
        }

        self.exhausted = true;
        self.current = self.root;
        self.stack.clear();
        None
    }

    fn first_composed_child(&mut self, node: D::Id) -> Option<D::Id> {
        let nodes = self.nodes;
        if let Some(projected) = nodes.projected_nodes(node) {
            if let Some(&first) = projected.first() {
                self.stack.push(SlotFrame {
                    slot: node,
                    index: 0,
                });
                return Some(first);
            }
            return first_layoutable(nodes, nodes.first_child(node));
        }
        let start = match nodes.shadow_root(node) {
            Some(shadow) => nodes.first_child(shadow),
            None => nodes.first_child(node),
        };
        first_layoutable(nodes, start)
    }

    /// Returns the next composed sibling of `node`, if any, along with the node
    /// to continue climbing from when there is none.
    fn next_composed_sibling(&mut self, node: D::Id) -> (Option<D::Id>, Option<D::Id>) {
        let nodes = self.nodes;

        if let Some(&frame) = self.stack.last()
            && nodes.assigned_slot(node) == Some(frame.slot)
        {
            self.stack.pop();
            let index = frame.index + 1;
            let next = nodes
                .projected_nodes(frame.slot)
                .and_then(|projected| projected.get(index))
                .copied();
            if next.is_some() {
                self.stack.push(SlotFrame {
                    slot: frame.slot,
                    index,
                });
            }
            return (next, Some(frame.slot));
        }

        let parent = nodes.parent(node);
        if let Some(next) = first_layoutable(nodes, nodes.next_sibling(node)) {
            return (Some(next), parent);
        }
        // Shadow roots have no siblings; carry on from the host, unless the
        // walk is rooted at the shadow root itself.
        let climb = parent.map(|parent| {
            if parent == self.root {
                parent
            } else {
                nodes.shadow_host(parent).unwrap_or(parent)
            }
        });
        (None, climb)
    }
}

impl<D: ComposedNodes + ?Sized> fmt::Debug for ComposedWalker<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposedWalker")
            .field("root", &self.root)
            .field("current", &self.current)
            .field("stack", &self.stack)
            .field("skip_children", &self.skip_children)
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}

impl<D: ComposedNodes + ?Sized> Iterator for ComposedWalker<'_, D> {
    type Item = D::Id;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }
}

impl<D: ComposedNodes + ?Sized> FusedIterator for ComposedWalker<'_, D> {}
