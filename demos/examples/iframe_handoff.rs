// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus hand-off between a page and an embedded frame.
//!
//! The page has a menu, a player frame and a sidebar in one row. Pressing
//! right walks into the player, across its controls and out the other side.
//!
//! Run:
//! - `cargo run -p tvnav_demos --example iframe_handoff`

use kurbo::Rect;
use tvnav::{FrameHost, KeyInput, keys};
use tvnav_demos::{label, shelf};
use tvnav_dom::{Document, Element};

fn main() {
    let mut page = Document::new(Rect::new(0.0, 0.0, 1280.0, 720.0));
    let root = page.root();
    let menu = shelf(&mut page, root, (20.0, 40.0), &["menu"])[0];
    let player = page.append(
        root,
        Element::new("iframe")
            .with_id("player")
            .with_bounds(Rect::new(260.0, 0.0, 960.0, 400.0)),
    );
    shelf(&mut page, root, (1000.0, 40.0), &["sidebar"]);

    let mut controls = Document::new(Rect::new(0.0, 0.0, 700.0, 400.0));
    let body = controls.root();
    shelf(&mut controls, body, (20.0, 40.0), &["play", "seek", "subtitles"]);

    let mut host = FrameHost::new(page);
    let top = host.top();
    let Some(frame) = host.attach(top, player, controls) else {
        return;
    };
    if let Some(f) = host.frame_mut(top) {
        f.document.focus(menu);
    }

    for _ in 0..5 {
        let outcome = host.handle_key(KeyInput::down(keys::ARROW_RIGHT));
        let delivered = host.pump();
        let focused = host.focused_frame();
        let Some(f) = host.frame(focused) else {
            continue;
        };
        let place = if focused == frame { "player" } else { "page" };
        println!(
            "right: {outcome:?}, {delivered} message(s), focus in {place} on {}",
            label(&f.document, f.document.active_element())
        );
    }
}
