// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node store: structure, shadow attachment, slot assignment, queries.

use alloc::{vec, vec::Vec};
use core::iter;

use crate::ancestors::ComposedAncestors;
use crate::children::ComposedChildren;
use crate::error::TreeError;
use crate::model::ComposedNodes;
use crate::types::{NodeFlags, NodeId, NodeKind};
use crate::walker::ComposedWalker;

/// Arena of nodes forming light trees, their shadow trees, and slot
/// assignments.
///
/// Nodes are addressed by generational [`NodeId`]s. Children are kept in
/// intrusive sibling chains, so appending, unlinking, and sibling navigation
/// are constant time.
///
/// Shadow roots are created with [`Tree::attach_shadow`]. Content is inserted
/// into a shadow tree by passing the shadow root as `parent` to
/// [`Tree::insert`]. A shadow root has no parent of its own; it only knows its
/// host.
///
/// Mutations check the preconditions the composed traversals rely on and
/// return a [`TreeError`] instead of breaking them. In particular, a node can
/// only be assigned to a slot that lives in the shadow tree of the node's own
/// parent.
///
/// ## Example
///
/// ```rust
/// use understory_composed_tree::{NodeKind, Tree};
///
/// let mut tree = Tree::new();
/// let root = tree.insert(None, NodeKind::Element).unwrap();
/// let host = tree.insert(Some(root), NodeKind::Element).unwrap();
/// let a = tree.insert(Some(host), NodeKind::Element).unwrap();
/// let b = tree.insert(Some(host), NodeKind::Element).unwrap();
///
/// let shadow = tree.attach_shadow(host).unwrap();
/// let slot = tree.insert(Some(shadow), NodeKind::Slot).unwrap();
/// tree.assign(slot, &[a, b]).unwrap();
///
/// let order: Vec<_> = tree.walk(root).collect();
/// assert_eq!(order, [host, slot, a, b]);
/// ```
pub struct Tree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tree")
            .field("nodes_total", &self.nodes.len())
            .field("nodes_alive", &self.len())
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
enum Payload {
    Inert,
    Element { shadow_root: Option<NodeId> },
    Slot { projected: Vec<NodeId> },
    ShadowRoot { host: NodeId },
}

impl Payload {
    /// Payload for a node created by `insert`; shadow roots are not insertable.
    fn insertable(kind: NodeKind) -> Option<Self> {
        match kind {
            NodeKind::Inert => Some(Self::Inert),
            NodeKind::Element => Some(Self::Element { shadow_root: None }),
            NodeKind::Slot => Some(Self::Slot {
                projected: Vec::new(),
            }),
            NodeKind::ShadowRoot => None,
        }
    }

    fn kind(&self) -> NodeKind {
        match self {
            Self::Inert => NodeKind::Inert,
            Self::Element { .. } => NodeKind::Element,
            Self::Slot { .. } => NodeKind::Slot,
            Self::ShadowRoot { .. } => NodeKind::ShadowRoot,
        }
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    payload: Payload,
    flags: NodeFlags,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
    /// Weak; may outlive the slot it names.
    assigned_slot: Option<NodeId>,
}

impl Node {
    fn new(generation: u32, payload: Payload) -> Self {
        Self {
            generation,
            flags: NodeFlags::default_for(payload.kind()),
            payload,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            assigned_slot: None,
        }
    }
}

impl Tree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Insert a new node of `kind` as the last child of `parent` (or as a root
    /// if `None`).
    ///
    /// Pass a shadow root as `parent` to insert into a shadow tree, or a slot to
    /// give it fallback content. Shadow roots themselves are created with
    /// [`Tree::attach_shadow`]; inserting [`NodeKind::ShadowRoot`] fails.
    pub fn insert(
        &mut self,
        parent: Option<NodeId>,
        kind: NodeKind,
    ) -> Result<NodeId, TreeError> {
        let payload = Payload::insertable(kind).ok_or(TreeError::ShadowRootMutation)?;
        if let Some(p) = parent {
            self.ensure_alive(p)?;
        }
        let id = self.alloc(payload);
        if let Some(p) = parent {
            self.link_last(id, p);
        }
        log::trace!("inserted {kind:?} {id:?} under {parent:?}");
        Ok(id)
    }

    /// Remove a node together with its subtree and any shadow trees inside it.
    ///
    /// Removed nodes are taken out of the slots they were projected into, and
    /// nodes projected into a removed slot become unassigned. Shadow roots are
    /// removed with [`Tree::detach_shadow`].
    pub fn remove(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.ensure_alive(id)?;
        if self.node(id).payload.kind() == NodeKind::ShadowRoot {
            return Err(TreeError::ShadowRootMutation);
        }
        self.remove_subtree(id);
        Ok(())
    }

    /// Move `id` (and its subtree) to be the last child of `new_parent`, or make
    /// it a root if `None`.
    ///
    /// Fails with [`TreeError::WouldCycle`] if `new_parent` is inside the moved
    /// subtree, including inside shadow trees hosted there. Slot assignments
    /// that no longer connect a host's light child to a slot in that host's
    /// shadow tree are dropped.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) -> Result<(), TreeError> {
        self.ensure_alive(id)?;
        if self.node(id).payload.kind() == NodeKind::ShadowRoot {
            return Err(TreeError::ShadowRootMutation);
        }
        if let Some(parent) = new_parent {
            self.ensure_alive(parent)?;
            if self.host_inclusive_ancestors(parent).any(|a| a == id) {
                return Err(TreeError::WouldCycle { node: id, parent });
            }
        }
        self.unlink(id);
        if let Some(p) = new_parent {
            self.link_last(id, p);
        }
        self.revalidate_assignments(id);
        log::debug!("moved {id:?} under {new_parent:?}");
        Ok(())
    }

    /// Attach a new, empty shadow root to `host` and return it.
    pub fn attach_shadow(&mut self, host: NodeId) -> Result<NodeId, TreeError> {
        self.ensure_alive(host)?;
        match self.node(host).payload {
            Payload::Element { shadow_root: None } => {}
            Payload::Element { shadow_root: Some(_) } => {
                return Err(TreeError::ShadowAlreadyAttached(host));
            }
            _ => return Err(TreeError::NotAnElement(host)),
        }
        let shadow = self.alloc(Payload::ShadowRoot { host });
        if let Payload::Element { shadow_root } = &mut self.node_mut(host).payload {
            *shadow_root = Some(shadow);
        }
        log::debug!("attached shadow root {shadow:?} to {host:?}");
        Ok(shadow)
    }

    /// Remove the shadow root of `host` and everything inside it.
    ///
    /// Light children of `host` that were projected into its slots become
    /// unassigned. Does nothing if `host` has no shadow root.
    pub fn detach_shadow(&mut self, host: NodeId) -> Result<(), TreeError> {
        self.ensure_alive(host)?;
        let Payload::Element { shadow_root } = self.node(host).payload else {
            return Err(TreeError::NotAnElement(host));
        };
        if let Some(shadow) = shadow_root {
            self.remove_subtree(shadow);
            log::debug!("detached shadow root {shadow:?} from {host:?}");
        }
        Ok(())
    }

    /// Replace the nodes projected into `slot`, in order.
    ///
    /// Every node must be live, layoutable, listed once, and a light-tree child
    /// of the host whose shadow tree contains `slot`. Nothing changes unless all
    /// of them pass. Nodes assigned to another slot are moved here; nodes
    /// previously projected into `slot` and missing from `nodes` become
    /// unassigned. An empty `nodes` makes the slot fall back to its own
    /// children.
    pub fn assign(&mut self, slot: NodeId, nodes: &[NodeId]) -> Result<(), TreeError> {
        self.ensure_alive(slot)?;
        if !matches!(self.node(slot).payload, Payload::Slot { .. }) {
            return Err(TreeError::NotASlot(slot));
        }
        for (i, &node) in nodes.iter().enumerate() {
            self.ensure_alive(node)?;
            if !self.is_layoutable(node) {
                return Err(TreeError::NotLayoutable(node));
            }
            if nodes[..i].contains(&node) {
                return Err(TreeError::DuplicateAssignment(node));
            }
            if !self.is_slottable(node, slot) {
                return Err(TreeError::NotSlottable { node, slot });
            }
        }

        let previous = self
            .projected_mut(slot)
            .map(core::mem::take)
            .unwrap_or_default();
        for old in previous {
            if !nodes.contains(&old)
                && let Some(n) = self.node_opt_mut(old)
            {
                n.assigned_slot = None;
            }
        }
        for &node in nodes {
            if let Some(other) = self.node(node).assigned_slot
                && other != slot
            {
                self.detach_from_slot(node, other);
            }
            self.node_mut(node).assigned_slot = Some(slot);
        }
        if let Some(projected) = self.projected_mut(slot) {
            projected.extend_from_slice(nodes);
        }
        log::debug!("assigned {} node(s) to slot {slot:?}", nodes.len());
        Ok(())
    }

    /// Take `node` out of the slot it is projected into, if any.
    pub fn unassign(&mut self, node: NodeId) -> Result<(), TreeError> {
        self.ensure_alive(node)?;
        self.unassign_unchecked(node);
        Ok(())
    }

    /// Replace the flags of a node.
    ///
    /// Clearing [`NodeFlags::LAYOUTABLE`] on a projected node also unassigns it,
    /// since slots only project layoutable nodes.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) -> Result<(), TreeError> {
        self.ensure_alive(id)?;
        self.node_mut(id).flags = flags;
        if !flags.contains(NodeFlags::LAYOUTABLE) {
            self.unassign_unchecked(id);
        }
        Ok(())
    }

    /// Iterator over the direct composed children of `element`.
    ///
    /// See [`ComposedChildren`] for which children are produced.
    pub fn composed_children(&self, element: NodeId) -> ComposedChildren<'_, Self> {
        ComposedChildren::new(self, element)
    }

    /// Pre-order walk over the composed descendants of `root`.
    ///
    /// See [`ComposedWalker`].
    pub fn walk(&self, root: NodeId) -> ComposedWalker<'_, Self> {
        ComposedWalker::new(self, root)
    }

    /// Iterator over the composed ancestors of `node`, nearest first.
    pub fn composed_ancestors(&self, node: NodeId) -> ComposedAncestors<'_, Self> {
        ComposedAncestors::new(self, node)
    }

    /// Path from the top of the composed tree to `node` (inclusive).
    ///
    /// Projected nodes are reached through their slot and shadow content
    /// through its host; shadow roots never appear. Returns an empty path for
    /// stale ids.
    pub fn composed_path(&self, node: NodeId) -> Vec<NodeId> {
        if !self.is_alive(node) {
            return Vec::new();
        }
        let mut path: Vec<_> = iter::once(node)
            .chain(self.composed_ancestors(node))
            .collect();
        path.reverse();
        path
    }
}

impl Tree {
    // --- queries ---

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    /// See [`NodeId`] docs for the generational semantics.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Number of live nodes, shadow roots included.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Returns true if the tree holds no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the kind of a node if the identifier is live.
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node_opt(id).map(|n| n.payload.kind())
    }

    /// Returns the flags of a node if the identifier is live.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.node_opt(id).map(|n| n.flags)
    }

    /// Returns the light-tree parent of a node if live, or `None` for roots,
    /// shadow roots, and stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id)?.parent
    }

    /// Iterator over the light-tree children of a node, empty if the node is
    /// stale.
    pub fn children_of(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let first = self.node_opt(id).and_then(|n| n.first_child);
        iter::successors(first, move |&child| self.node(child).next_sibling)
    }
}

impl ComposedNodes for Tree {
    type Id = NodeId;

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node_opt(node)?.parent
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.node_opt(node)?.first_child
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.node_opt(node)?.next_sibling
    }

    fn is_layoutable(&self, node: NodeId) -> bool {
        self.node_opt(node).is_some_and(|n| {
            n.flags.contains(NodeFlags::LAYOUTABLE)
                && !matches!(n.payload, Payload::ShadowRoot { .. })
        })
    }

    fn assigned_slot(&self, node: NodeId) -> Option<NodeId> {
        self.node_opt(node)?
            .assigned_slot
            .filter(|&slot| self.is_alive(slot))
    }

    fn shadow_root(&self, element: NodeId) -> Option<NodeId> {
        match self.node_opt(element)?.payload {
            Payload::Element { shadow_root } => shadow_root,
            _ => None,
        }
    }

    fn shadow_host(&self, node: NodeId) -> Option<NodeId> {
        match self.node_opt(node)?.payload {
            Payload::ShadowRoot { host } => Some(host),
            _ => None,
        }
    }

    fn projected_nodes(&self, node: NodeId) -> Option<&[NodeId]> {
        match &self.node_opt(node)?.payload {
            Payload::Slot { projected } => Some(projected.as_slice()),
            _ => None,
        }
    }
}

impl Tree {
    // --- internals ---

    /// Access a node; panics if `id` is stale.
    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        if n.generation != id.generation() {
            return None;
        }
        Some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.generation() {
            return None;
        }
        Some(n)
    }

    fn ensure_alive(&self, id: NodeId) -> Result<(), TreeError> {
        if self.is_alive(id) {
            Ok(())
        } else {
            Err(TreeError::StaleNode(id))
        }
    }

    fn alloc(&mut self, payload: Payload) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, payload));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, payload)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    fn link_last(&mut self, id: NodeId, parent: NodeId) {
        let prev = self.node(parent).last_child;
        match prev {
            Some(prev) => self.node_mut(prev).next_sibling = Some(id),
            None => self.node_mut(parent).first_child = Some(id),
        }
        self.node_mut(parent).last_child = Some(id);
        let node = self.node_mut(id);
        node.parent = Some(parent);
        node.prev_sibling = prev;
        node.next_sibling = None;
    }

    fn unlink(&mut self, id: NodeId) {
        let node = self.node(id);
        let (Some(parent), prev, next) = (node.parent, node.prev_sibling, node.next_sibling) else {
            return;
        };
        match prev {
            Some(prev) => self.node_mut(prev).next_sibling = next,
            None => self.node_mut(parent).first_child = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev_sibling = prev,
            None => self.node_mut(parent).last_child = prev,
        }
        let node = self.node_mut(id);
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
    }

    fn remove_subtree(&mut self, id: NodeId) {
        self.unlink(id);
        let mut removed = 0_usize;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            stack.extend(self.children_of(current));
            if let Payload::Element {
                shadow_root: Some(shadow),
            } = self.node(current).payload
            {
                stack.push(shadow);
            }
            self.release(current);
            removed += 1;
        }
        log::debug!("removed {id:?} and {} descendant(s)", removed - 1);
    }

    /// Free a single node and drop the slot links that point at it.
    fn release(&mut self, id: NodeId) {
        let node = self.nodes[id.idx()].take().expect("dangling NodeId");
        self.free_list.push(id.idx());
        if let Some(slot) = node.assigned_slot {
            self.detach_from_slot(id, slot);
        }
        match node.payload {
            Payload::Slot { projected } => {
                for p in projected {
                    if let Some(n) = self.node_opt_mut(p)
                        && n.assigned_slot == Some(id)
                    {
                        n.assigned_slot = None;
                    }
                }
            }
            Payload::ShadowRoot { host } => {
                if let Some(Node {
                    payload: Payload::Element { shadow_root },
                    ..
                }) = self.node_opt_mut(host)
                    && *shadow_root == Some(id)
                {
                    *shadow_root = None;
                }
            }
            Payload::Inert | Payload::Element { .. } => {}
        }
    }

    fn projected_mut(&mut self, slot: NodeId) -> Option<&mut Vec<NodeId>> {
        match &mut self.node_opt_mut(slot)?.payload {
            Payload::Slot { projected } => Some(projected),
            _ => None,
        }
    }

    fn detach_from_slot(&mut self, node: NodeId, slot: NodeId) {
        if let Some(projected) = self.projected_mut(slot) {
            projected.retain(|&p| p != node);
        }
    }

    fn unassign_unchecked(&mut self, node: NodeId) {
        if let Some(slot) = self.node_mut(node).assigned_slot.take() {
            self.detach_from_slot(node, slot);
            log::trace!("unassigned {node:?} from slot {slot:?}");
        }
    }

    /// The host of the shadow tree that `node` lives in, if any.
    fn containing_host(&self, node: NodeId) -> Option<NodeId> {
        let mut cursor = self.node_opt(node)?.parent;
        while let Some(current) = cursor {
            let n = self.node_opt(current)?;
            if let Payload::ShadowRoot { host } = n.payload {
                return Some(host);
            }
            cursor = n.parent;
        }
        None
    }

    /// Whether `node` is a light-tree child of the host whose shadow tree
    /// contains `slot`.
    fn is_slottable(&self, node: NodeId, slot: NodeId) -> bool {
        self.parent_of(node)
            .is_some_and(|host| self.containing_host(slot) == Some(host))
    }

    /// Inclusive ancestors of `node`, stepping from each shadow root to its host.
    fn host_inclusive_ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        iter::successors(Some(node), move |&current| {
            let n = self.node_opt(current)?;
            match n.payload {
                Payload::ShadowRoot { host } => Some(host),
                _ => n.parent,
            }
        })
    }

    /// Drop assignments broken by moving `id`.
    ///
    /// Only `id` changed parent, so only its own assignment and the slots in its
    /// light subtree can be affected. Shadow trees inside the subtree move with
    /// their hosts and stay consistent.
    fn revalidate_assignments(&mut self, id: NodeId) {
        if let Some(slot) = self.node(id).assigned_slot
            && !self.is_slottable(id, slot)
        {
            self.unassign_unchecked(id);
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            stack.extend(self.children_of(current));
            let broken: Vec<NodeId> = match &self.node(current).payload {
                Payload::Slot { projected } => projected
                    .iter()
                    .copied()
                    .filter(|&p| !self.is_slottable(p, current))
                    .collect(),
                _ => Vec::new(),
            };
            for node in broken {
                self.unassign_unchecked(node);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_links_children_in_order() {
        let mut tree = Tree::new();
        let root = tree.insert(None, NodeKind::Element).unwrap();
        let a = tree.insert(Some(root), NodeKind::Element).unwrap();
        let b = tree.insert(Some(root), NodeKind::Inert).unwrap();
        let c = tree.insert(Some(root), NodeKind::Slot).unwrap();

        let children: Vec<_> = tree.children_of(root).collect();
        assert_eq!(children, [a, b, c]);
        assert_eq!(tree.parent_of(a), Some(root));
        assert_eq!(tree.parent_of(root), None);
        assert_eq!(tree.kind(b), Some(NodeKind::Inert));
        assert_eq!(tree.flags(a), Some(NodeFlags::LAYOUTABLE));
        assert_eq!(tree.flags(b), Some(NodeFlags::empty()));
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn liveness_insert_remove_reuse() {
        let mut tree = Tree::new();
        let root = tree.insert(None, NodeKind::Element).unwrap();
        let a = tree.insert(Some(root), NodeKind::Element).unwrap();

        assert!(tree.is_alive(root));
        assert!(tree.is_alive(a));

        // Remove child; id becomes stale.
        tree.remove(a).unwrap();
        assert!(!tree.is_alive(a));
        assert_eq!(tree.kind(a), None);
        assert_eq!(tree.parent_of(a), None);

        // Insert new child; might reuse slot but generation bumps.
        let b = tree.insert(Some(root), NodeKind::Element).unwrap();
        assert!(tree.is_alive(b));
        assert!(!tree.is_alive(a));
        if a.0 == b.0 {
            assert!(b.1 > a.1, "generation must increase on reuse");
        }
        assert_eq!(tree.remove(a), Err(TreeError::StaleNode(a)));
    }

    #[test]
    fn remove_unlinks_middle_child() {
        let mut tree = Tree::new();
        let root = tree.insert(None, NodeKind::Element).unwrap();
        let a = tree.insert(Some(root), NodeKind::Element).unwrap();
        let b = tree.insert(Some(root), NodeKind::Element).unwrap();
        let c = tree.insert(Some(root), NodeKind::Element).unwrap();

        tree.remove(b).unwrap();
        let children: Vec<_> = tree.children_of(root).collect();
        assert_eq!(children, [a, c]);

        tree.remove(c).unwrap();
        let d = tree.insert(Some(root), NodeKind::Element).unwrap();
        let children: Vec<_> = tree.children_of(root).collect();
        assert_eq!(children, [a, d]);
    }

    #[test]
    fn remove_takes_subtree_and_shadow_tree() {
        let mut tree = Tree::new();
        let root = tree.insert(None, NodeKind::Element).unwrap();
        let host = tree.insert(Some(root), NodeKind::Element).unwrap();
        let light = tree.insert(Some(host), NodeKind::Element).unwrap();
        let shadow = tree.attach_shadow(host).unwrap();
        let slot = tree.insert(Some(shadow), NodeKind::Slot).unwrap();
        let fallback = tree.insert(Some(slot), NodeKind::Element).unwrap();

        tree.remove(host).unwrap();
        for id in [host, light, shadow, slot, fallback] {
            assert!(!tree.is_alive(id), "{id:?} should be removed");
        }
        assert_eq!(tree.len(), 1);
        assert!(tree.children_of(root).next().is_none());
    }

    #[test]
    fn shadow_roots_are_managed_separately() {
        let mut tree = Tree::new();
        let host = tree.insert(None, NodeKind::Element).unwrap();
        let slot = tree.insert(None, NodeKind::Slot).unwrap();

        assert_eq!(
            tree.insert(None, NodeKind::ShadowRoot),
            Err(TreeError::ShadowRootMutation)
        );
        assert_eq!(tree.attach_shadow(slot), Err(TreeError::NotAnElement(slot)));

        let shadow = tree.attach_shadow(host).unwrap();
        assert_eq!(tree.kind(shadow), Some(NodeKind::ShadowRoot));
        assert_eq!(tree.shadow_root(host), Some(shadow));
        assert_eq!(tree.shadow_host(shadow), Some(host));
        assert_eq!(tree.parent_of(shadow), None);
        assert!(!tree.is_layoutable(shadow));
        assert_eq!(
            tree.attach_shadow(host),
            Err(TreeError::ShadowAlreadyAttached(host))
        );
        assert_eq!(tree.remove(shadow), Err(TreeError::ShadowRootMutation));
        assert_eq!(
            tree.reparent(shadow, Some(slot)),
            Err(TreeError::ShadowRootMutation)
        );
    }

    #[test]
    fn detach_shadow_unassigns_light_children() {
        let mut tree = Tree::new();
        let host = tree.insert(None, NodeKind::Element).unwrap();
        let a = tree.insert(Some(host), NodeKind::Element).unwrap();
        let shadow = tree.attach_shadow(host).unwrap();
        let slot = tree.insert(Some(shadow), NodeKind::Slot).unwrap();
        tree.assign(slot, &[a]).unwrap();

        tree.detach_shadow(host).unwrap();
        assert!(!tree.is_alive(shadow));
        assert!(!tree.is_alive(slot));
        assert_eq!(tree.shadow_root(host), None);
        assert_eq!(tree.assigned_slot(a), None);

        // Without a shadow root the light children render again.
        let children: Vec<_> = tree.composed_children(host).collect();
        assert_eq!(children, [a]);

        // A fresh shadow root can be attached; detaching twice is a no-op.
        tree.attach_shadow(host).unwrap();
        tree.detach_shadow(host).unwrap();
        tree.detach_shadow(host).unwrap();
        assert_eq!(tree.detach_shadow(a), Ok(()));
        assert_eq!(tree.detach_shadow(slot), Err(TreeError::StaleNode(slot)));
    }

    #[test]
    fn assign_validates_before_changing_anything() {
        let mut tree = Tree::new();
        let root = tree.insert(None, NodeKind::Element).unwrap();
        let host = tree.insert(Some(root), NodeKind::Element).unwrap();
        let a = tree.insert(Some(host), NodeKind::Element).unwrap();
        let inert = tree.insert(Some(host), NodeKind::Inert).unwrap();
        let outsider = tree.insert(Some(root), NodeKind::Element).unwrap();
        let shadow = tree.attach_shadow(host).unwrap();
        let slot = tree.insert(Some(shadow), NodeKind::Slot).unwrap();
        let not_slot = tree.insert(Some(shadow), NodeKind::Element).unwrap();
        let nested_slot = tree.insert(Some(not_slot), NodeKind::Slot).unwrap();
        let fallback = tree.insert(Some(slot), NodeKind::Element).unwrap();

        assert_eq!(tree.assign(not_slot, &[a]), Err(TreeError::NotASlot(not_slot)));
        assert_eq!(tree.assign(slot, &[inert]), Err(TreeError::NotLayoutable(inert)));
        assert_eq!(
            tree.assign(slot, &[a, a]),
            Err(TreeError::DuplicateAssignment(a))
        );
        assert_eq!(
            tree.assign(slot, &[a, outsider]),
            Err(TreeError::NotSlottable {
                node: outsider,
                slot
            })
        );
        assert_eq!(
            tree.assign(slot, &[fallback]),
            Err(TreeError::NotSlottable {
                node: fallback,
                slot
            })
        );
        // The failed calls left `a` alone.
        assert_eq!(tree.assigned_slot(a), None);
        assert_eq!(tree.projected_nodes(slot), Some(&[][..]));

        // Slots nested deeper in the shadow tree are fine.
        tree.assign(nested_slot, &[a]).unwrap();
        assert_eq!(tree.assigned_slot(a), Some(nested_slot));
    }

    #[test]
    fn assign_replaces_and_moves() {
        let mut tree = Tree::new();
        let host = tree.insert(None, NodeKind::Element).unwrap();
        let a = tree.insert(Some(host), NodeKind::Element).unwrap();
        let b = tree.insert(Some(host), NodeKind::Element).unwrap();
        let c = tree.insert(Some(host), NodeKind::Element).unwrap();
        let shadow = tree.attach_shadow(host).unwrap();
        let first = tree.insert(Some(shadow), NodeKind::Slot).unwrap();
        let second = tree.insert(Some(shadow), NodeKind::Slot).unwrap();

        tree.assign(first, &[a, b]).unwrap();
        tree.assign(second, &[c]).unwrap();
        assert_eq!(tree.projected_nodes(first), Some(&[a, b][..]));

        // Moving `b` to `second` takes it out of `first`.
        tree.assign(second, &[b, c]).unwrap();
        assert_eq!(tree.projected_nodes(first), Some(&[a][..]));
        assert_eq!(tree.projected_nodes(second), Some(&[b, c][..]));
        assert_eq!(tree.assigned_slot(b), Some(second));

        // Reassigning drops nodes that are no longer listed.
        tree.assign(second, &[c]).unwrap();
        assert_eq!(tree.assigned_slot(b), None);
        assert_eq!(tree.assigned_slot(c), Some(second));

        tree.assign(first, &[]).unwrap();
        assert_eq!(tree.assigned_slot(a), None);

        tree.unassign(c).unwrap();
        assert_eq!(tree.projected_nodes(second), Some(&[][..]));
        assert_eq!(tree.assigned_slot(c), None);
    }

    #[test]
    fn removing_slot_or_projected_node_updates_links() {
        let mut tree = Tree::new();
        let host = tree.insert(None, NodeKind::Element).unwrap();
        let a = tree.insert(Some(host), NodeKind::Element).unwrap();
        let b = tree.insert(Some(host), NodeKind::Element).unwrap();
        let shadow = tree.attach_shadow(host).unwrap();
        let slot = tree.insert(Some(shadow), NodeKind::Slot).unwrap();
        tree.assign(slot, &[a, b]).unwrap();

        tree.remove(a).unwrap();
        assert_eq!(tree.projected_nodes(slot), Some(&[b][..]));

        tree.remove(slot).unwrap();
        assert_eq!(tree.assigned_slot(b), None);
    }

    #[test]
    fn assigned_slot_is_weak() {
        let mut tree = Tree::new();
        let host = tree.insert(None, NodeKind::Element).unwrap();
        let a = tree.insert(Some(host), NodeKind::Element).unwrap();
        let shadow = tree.attach_shadow(host).unwrap();
        let slot = tree.insert(Some(shadow), NodeKind::Slot).unwrap();
        tree.assign(slot, &[a]).unwrap();

        tree.remove(slot).unwrap();
        // Reuse the freed slot index with a different node.
        let reused = tree.insert(Some(shadow), NodeKind::Slot).unwrap();
        assert_eq!(tree.assigned_slot(a), None);
        assert_eq!(tree.projected_nodes(reused), Some(&[][..]));
    }

    #[test]
    fn reparent_rejects_cycles() {
        let mut tree = Tree::new();
        let root = tree.insert(None, NodeKind::Element).unwrap();
        let a = tree.insert(Some(root), NodeKind::Element).unwrap();
        let b = tree.insert(Some(a), NodeKind::Element).unwrap();
        let shadow = tree.attach_shadow(b).unwrap();
        let inner = tree.insert(Some(shadow), NodeKind::Element).unwrap();

        assert_eq!(
            tree.reparent(a, Some(b)),
            Err(TreeError::WouldCycle { node: a, parent: b })
        );
        assert_eq!(
            tree.reparent(a, Some(inner)),
            Err(TreeError::WouldCycle {
                node: a,
                parent: inner
            })
        );
        assert_eq!(
            tree.reparent(a, Some(a)),
            Err(TreeError::WouldCycle { node: a, parent: a })
        );

        tree.reparent(b, Some(root)).unwrap();
        let children: Vec<_> = tree.children_of(root).collect();
        assert_eq!(children, [a, b]);

        tree.reparent(a, None).unwrap();
        assert_eq!(tree.parent_of(a), None);
    }

    #[test]
    fn reparent_drops_broken_assignments() {
        let mut tree = Tree::new();
        let root = tree.insert(None, NodeKind::Element).unwrap();
        let host = tree.insert(Some(root), NodeKind::Element).unwrap();
        let a = tree.insert(Some(host), NodeKind::Element).unwrap();
        let b = tree.insert(Some(host), NodeKind::Element).unwrap();
        let shadow = tree.attach_shadow(host).unwrap();
        let wrapper = tree.insert(Some(shadow), NodeKind::Element).unwrap();
        let slot = tree.insert(Some(wrapper), NodeKind::Slot).unwrap();
        tree.assign(slot, &[a, b]).unwrap();

        // Moving a projected node away from its host unassigns it.
        tree.reparent(a, Some(root)).unwrap();
        assert_eq!(tree.assigned_slot(a), None);
        assert_eq!(tree.projected_nodes(slot), Some(&[b][..]));

        // Moving within the shadow tree keeps the assignment.
        tree.reparent(slot, Some(shadow)).unwrap();
        assert_eq!(tree.assigned_slot(b), Some(slot));

        // Moving the slot's container out of the shadow tree breaks it.
        tree.reparent(slot, Some(wrapper)).unwrap();
        tree.reparent(wrapper, Some(root)).unwrap();
        assert_eq!(tree.assigned_slot(b), None);
        assert_eq!(tree.projected_nodes(slot), Some(&[][..]));
    }

    #[test]
    fn clearing_layoutable_unassigns() {
        let mut tree = Tree::new();
        let host = tree.insert(None, NodeKind::Element).unwrap();
        let a = tree.insert(Some(host), NodeKind::Element).unwrap();
        let shadow = tree.attach_shadow(host).unwrap();
        let slot = tree.insert(Some(shadow), NodeKind::Slot).unwrap();
        tree.assign(slot, &[a]).unwrap();

        tree.set_flags(a, NodeFlags::empty()).unwrap();
        assert!(!tree.is_layoutable(a));
        assert_eq!(tree.assigned_slot(a), None);

        // Inert nodes can opt into layout.
        let inert = tree.insert(Some(host), NodeKind::Inert).unwrap();
        tree.set_flags(inert, NodeFlags::LAYOUTABLE).unwrap();
        tree.assign(slot, &[inert]).unwrap();
        assert_eq!(tree.assigned_slot(inert), Some(slot));
    }

    #[test]
    fn composed_path_crosses_slots_and_shadow_roots() {
        let mut tree = Tree::new();
        let root = tree.insert(None, NodeKind::Element).unwrap();
        let host = tree.insert(Some(root), NodeKind::Element).unwrap();
        let a = tree.insert(Some(host), NodeKind::Element).unwrap();
        let leaf = tree.insert(Some(a), NodeKind::Element).unwrap();
        let shadow = tree.attach_shadow(host).unwrap();
        let frame = tree.insert(Some(shadow), NodeKind::Element).unwrap();
        let slot = tree.insert(Some(frame), NodeKind::Slot).unwrap();
        tree.assign(slot, &[a]).unwrap();

        assert_eq!(tree.composed_path(leaf), [root, host, frame, slot, a, leaf]);
        assert_eq!(tree.composed_path(frame), [root, host, frame]);
        assert_eq!(tree.composed_path(root), [root]);

        tree.remove(leaf).unwrap();
        assert!(tree.composed_path(leaf).is_empty());
    }

    #[test]
    fn debug_summarizes_counts() {
        let mut tree = Tree::new();
        let root = tree.insert(None, NodeKind::Element).unwrap();
        let child = tree.insert(Some(root), NodeKind::Element).unwrap();
        tree.remove(child).unwrap();

        let text = alloc::format!("{tree:?}");
        assert!(text.contains("nodes_alive: 1"), "{text}");
        assert!(text.contains("free_list: 1"), "{text}");
    }
}
