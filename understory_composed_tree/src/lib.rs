// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_composed_tree --heading-base-level=0

//! Understory Composed Tree: allocation-free traversal of element trees with shadow roots and slots.
//!
//! Retained-mode UIs often let a component keep an encapsulated *shadow tree* behind an element
//! (its *host*). The shadow tree decides where the host's own children show up by placing *slots*;
//! each slot renders the light-tree children assigned to it, or its own fallback children when
//! nothing is assigned. Layout, hit testing, and painting all need the *composed tree*: light and
//! shadow content flattened together, with slots replaced by what they project.
//!
//! This crate walks the composed tree without ever building it.
//!
//! - [`ComposedWalker`]: pre-order walk over every layoutable descendant of a root, crossing
//!   shadow boundaries and expanding slots, with [`ComposedWalker::skip_children`] to prune
//!   subtrees that are handled elsewhere.
//! - [`ComposedChildren`]: the direct composed children of a single element.
//! - [`ComposedAncestors`] and [`Tree::composed_path`]: the way back up, for hit-test paths and
//!   event routing.
//!
//! Both walkers are small values that borrow the tree. Steps never allocate, a walk can be paused
//! after any step and resumed later, and [`ComposedWalker::reset`] restarts it in place.
//!
//! ## Node model
//!
//! Traversals read the tree through the [`ComposedNodes`] trait, so any node store can drive them.
//! [`Tree`] is the store provided here:
//!
//! - [`NodeId`]: generational handle of a node. Stale ids read as absent, which also makes a
//!   node's assigned slot a weak link.
//! - [`NodeKind`]: `Element`, `Slot`, `Inert`, or `ShadowRoot`.
//! - [`NodeFlags`]: [`NodeFlags::LAYOUTABLE`] decides whether a node takes part in layout.
//!   Traversals only yield layoutable nodes and never look inside the others.
//!
//! Key operations:
//! - [`Tree::insert`](Tree::insert) / [`Tree::remove`](Tree::remove) /
//!   [`Tree::reparent`](Tree::reparent) for light-tree structure.
//! - [`Tree::attach_shadow`](Tree::attach_shadow) / [`Tree::detach_shadow`](Tree::detach_shadow)
//!   for shadow roots.
//! - [`Tree::assign`](Tree::assign) / [`Tree::unassign`](Tree::unassign) for slot projection.
//! - [`Tree::walk`](Tree::walk), [`Tree::composed_children`](Tree::composed_children), and
//!   [`Tree::composed_ancestors`](Tree::composed_ancestors) to traverse.
//!
//! Mutations return a [`TreeError`] rather than break the assumptions the traversals make; for
//! example a node can only be assigned to a slot inside its own parent's shadow tree. The composed
//! tree as a whole is not validated: nested projections that form a cycle make a walk loop
//! forever.
//!
//! ## Not a layout engine
//!
//! This crate does not compute geometry, resolve styles, or paint. It only decides *which* nodes
//! a layout or paint pass visits and in what order.
//!
//! ## Example
//!
//! ```rust
//! use understory_composed_tree::{NodeKind, Tree};
//!
//! let mut tree = Tree::new();
//! let root = tree.insert(None, NodeKind::Element).unwrap();
//! let host = tree.insert(Some(root), NodeKind::Element).unwrap();
//! let a = tree.insert(Some(host), NodeKind::Element).unwrap();
//! let b = tree.insert(Some(host), NodeKind::Element).unwrap();
//!
//! // `host` renders a shadow tree with a single slot.
//! let shadow = tree.attach_shadow(host).unwrap();
//! let slot = tree.insert(Some(shadow), NodeKind::Slot).unwrap();
//! let fallback = tree.insert(Some(slot), NodeKind::Element).unwrap();
//!
//! // Nothing assigned: the slot shows its fallback content.
//! let order: Vec<_> = tree.walk(root).collect();
//! assert_eq!(order, [host, slot, fallback]);
//!
//! // Assigned: `a` and `b` render inside the slot, the fallback does not.
//! tree.assign(slot, &[a, b]).unwrap();
//! let order: Vec<_> = tree.walk(root).collect();
//! assert_eq!(order, [host, slot, a, b]);
//!
//! // Prune the host's subtree.
//! let mut walker = tree.walk(root);
//! assert_eq!(walker.next(), Some(host));
//! walker.skip_children();
//! assert_eq!(walker.next(), None);
//! ```
//!
//! ## Features
//!
//! - `std` (disabled by default): enables `std` support in `log` and `thiserror`.
//!
//! Structural changes are reported through the [`log`] facade at `debug` and `trace` level;
//! traversals do not log.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod ancestors;
mod children;
mod error;
mod model;
mod tree;
mod types;
mod walker;

pub use ancestors::ComposedAncestors;
pub use children::ComposedChildren;
pub use error::TreeError;
pub use model::ComposedNodes;
pub use tree::Tree;
pub use types::{NodeFlags, NodeId, NodeKind};
pub use walker::ComposedWalker;
