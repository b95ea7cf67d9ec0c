// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directional focus basics.
//!
//! Two shelves of tiles driven by arrow keys. The last move comes back down
//! to the tile focus left from, not the geometrically closest one.
//!
//! Run:
//! - `cargo run -p tvnav_demos --example focus_basics`

use kurbo::Rect;
use tvnav::{InputOutcome, KeyInput, Navigator, keys};
use tvnav_demos::{label, shelf};
use tvnav_dom::{Document, Element};

fn main() {
    let mut doc = Document::new(Rect::new(0.0, 0.0, 1280.0, 720.0));
    let root = doc.root();
    // A full-width search bar above both shelves.
    doc.append(
        root,
        Element::new("button")
            .with_id("search")
            .with_bounds(Rect::new(40.0, 20.0, 900.0, 80.0)),
    );
    let top = doc.append(root, Element::new("section"));
    shelf(&mut doc, top, (40.0, 140.0), &["a1", "a2", "a3", "a4"]);
    let bottom = doc.append(root, Element::new("section"));
    shelf(&mut doc, bottom, (40.0, 320.0), &["b1", "b2", "b3", "b4"]);

    let mut nav = Navigator::new();
    println!("Start focus at: {}", label(&doc, doc.active_element()));

    for (name, code) in [
        ("down", keys::ARROW_DOWN),   // first focus: search
        ("down", keys::ARROW_DOWN),   // search -> a1
        ("right", keys::ARROW_RIGHT), // a1 -> a2
        ("right", keys::ARROW_RIGHT), // a2 -> a3
        ("down", keys::ARROW_DOWN),   // a3 -> b3
        ("up", keys::ARROW_UP),       // b3 -> a3 (history)
        ("up", keys::ARROW_UP),       // a3 -> search
        ("down", keys::ARROW_DOWN),   // search -> a3 (history)
    ] {
        let before = doc.active_element();
        match nav.handle_key(&mut doc, KeyInput::down(code)) {
            InputOutcome::Moved(next) => println!(
                "{name}: {} -> {}",
                label(&doc, before),
                label(&doc, Some(next))
            ),
            other => println!("{name}: {} ({other:?})", label(&doc, before)),
        }
    }
}
