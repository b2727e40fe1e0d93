// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Composed traversal of a card component with a shadow tree.
//!
//! This example shows how to:
//! - attach a shadow root to a `card` element and fill it with a header, two slots, and fallback,
//! - project the card's light children into those slots,
//! - walk the composed tree, prune a subtree with `skip_children`, and build a composed path.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example slotted_card`

use understory_composed_tree::{NodeKind, Tree};
use understory_demos::{Labels, outline};

fn main() {
    env_logger::init();

    let mut tree = Tree::new();
    let mut labels = Labels::new();

    // Light tree: page -> [card -> [title, body -> [paragraph]], footer]
    let page = tree.insert(None, NodeKind::Element).unwrap();
    labels.name(page, "page");
    let card = tree.insert(Some(page), NodeKind::Element).unwrap();
    labels.name(card, "card");
    let title = tree.insert(Some(card), NodeKind::Element).unwrap();
    labels.name(title, "title");
    let body = tree.insert(Some(card), NodeKind::Element).unwrap();
    labels.name(body, "body");
    let paragraph = tree.insert(Some(body), NodeKind::Element).unwrap();
    labels.name(paragraph, "paragraph");
    let footer = tree.insert(Some(page), NodeKind::Element).unwrap();
    labels.name(footer, "footer");

    // Shadow tree of `card`: [frame -> [title-slot, divider, body-slot -> [placeholder]], comment]
    let shadow = tree.attach_shadow(card).unwrap();
    let frame = tree.insert(Some(shadow), NodeKind::Element).unwrap();
    labels.name(frame, "frame");
    let title_slot = tree.insert(Some(frame), NodeKind::Slot).unwrap();
    labels.name(title_slot, "slot:title");
    let divider = tree.insert(Some(frame), NodeKind::Element).unwrap();
    labels.name(divider, "divider");
    let body_slot = tree.insert(Some(frame), NodeKind::Slot).unwrap();
    labels.name(body_slot, "slot:body");
    let placeholder = tree.insert(Some(body_slot), NodeKind::Element).unwrap();
    labels.name(placeholder, "placeholder");
    tree.insert(Some(shadow), NodeKind::Inert).unwrap();
    log::info!("built a tree with {} live nodes", tree.len());

    tree.assign(title_slot, &[title]).unwrap();
    println!("Only the title is assigned; the body slot shows its fallback:");
    print!("{}", outline(&tree, page, &labels));

    tree.assign(body_slot, &[body]).unwrap();
    println!("\nBoth slots assigned:");
    print!("{}", outline(&tree, page, &labels));

    println!("\nDirect composed children of card:");
    for child in tree.composed_children(card) {
        println!("  {}", labels.get(child));
    }

    println!("\nWalk that skips the frame's subtree:");
    let mut walker = tree.walk(page);
    while let Some(node) = walker.advance() {
        println!("  {}", labels.get(node));
        if node == frame {
            walker.skip_children();
        }
    }

    let path: Vec<_> = tree
        .composed_path(paragraph)
        .into_iter()
        .map(|id| labels.get(id))
        .collect();
    println!("\nComposed path to paragraph: {}", path.join(" > "));
}
