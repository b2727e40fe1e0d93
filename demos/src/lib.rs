// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the Understory demos.

use std::collections::HashMap;
use std::fmt::Write;

use understory_composed_tree::{NodeId, Tree};

/// Human-readable names for nodes, used when printing trees.
#[derive(Clone, Debug, Default)]
pub struct Labels(HashMap<NodeId, &'static str>);

impl Labels {
    /// Create an empty label table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Name `id`, returning it for chaining.
    pub fn name(&mut self, id: NodeId, label: &'static str) -> NodeId {
        self.0.insert(id, label);
        id
    }

    /// The name of `id`, or `"?"` when it has none.
    pub fn get(&self, id: NodeId) -> &'static str {
        self.0.get(&id).copied().unwrap_or("?")
    }
}

/// Render the composed tree below `root` as an indented outline.
///
/// Indentation is the number of composed ancestors between a node and `root`.
pub fn outline(tree: &Tree, root: NodeId, labels: &Labels) -> String {
    let mut out = String::new();
    for node in tree.walk(root) {
        let depth = tree
            .composed_ancestors(node)
            .take_while(|&a| a != root)
            .count();
        writeln!(out, "{:indent$}{}", "", labels.get(node), indent = depth * 2)
            .expect("writing to a String cannot fail");
    }
    out
}
