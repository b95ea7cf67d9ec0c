// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handing the d-pad to something else for a while.
//!
//! A settings page loaded from JSON config: `.card` divs are focusable and
//! WASD works alongside the arrows. A long text box takes over vertical keys
//! by vetoing `focuschanging` while it scrolls, and a modal switches
//! navigation off altogether.
//!
//! Run:
//! - `cargo run -p tvnav_demos --example text_scroller`

use std::cell::Cell;
use std::rc::Rc;

use kurbo::Rect;
use tvnav::{Direction, InputOutcome, KeyInput, Navigator, NavigatorConfig, Verdict, keys};
use tvnav_demos::label;
use tvnav_dom::{Document, Element};

const CONFIG: &str = r#"{
    "focusable_selectors": [".card"],
    "key_codes": {
        "up": [38, 87],
        "down": [40, 83],
        "left": [37, 65],
        "right": [39, 68]
    }
}"#;

fn main() {
    let config: NavigatorConfig = match serde_json::from_str(CONFIG) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("bad config: {err}");
            return;
        }
    };
    let mut nav = match Navigator::with_config(config) {
        Ok(nav) => nav,
        Err(err) => {
            eprintln!("bad selector: {err}");
            return;
        }
    };

    let mut doc = Document::new(Rect::new(0.0, 0.0, 1280.0, 720.0));
    let root = doc.root();
    let terms = doc.append(
        root,
        Element::new("div")
            .with_id("terms")
            .with_class("card")
            .with_bounds(Rect::new(40.0, 40.0, 640.0, 440.0)),
    );
    doc.append(
        root,
        Element::new("div")
            .with_id("accept")
            .with_class("card")
            .with_bounds(Rect::new(40.0, 480.0, 340.0, 560.0)),
    );
    doc.append(
        root,
        Element::new("div")
            .with_id("decline")
            .with_class("card")
            .with_bounds(Rect::new(680.0, 40.0, 980.0, 120.0)),
    );
    doc.focus(terms);

    // Lines of text still below the fold.
    let remaining = Rc::new(Cell::new(2_u32));
    let scroll = Rc::clone(&remaining);
    nav.on_focus_changing(move |event| {
        if event.direction == Direction::Down && scroll.get() > 0 {
            scroll.set(scroll.get() - 1);
            println!("  terms scrolled, {} line(s) left", scroll.get());
            Verdict::Cancel
        } else {
            Verdict::Allow
        }
    });
    nav.on_focus_changed(|event| {
        println!("  focus changed going {}", event.direction);
    });

    let press = |nav: &mut Navigator, doc: &mut Document, key: &str, code: u32| {
        let before = doc.active_element();
        let outcome = nav.handle_key(doc, KeyInput::down(code));
        let to = match outcome {
            InputOutcome::Moved(next) => label(doc, Some(next)).to_owned(),
            _ => format!("{outcome:?}"),
        };
        println!("{key}: {} -> {to}", label(doc, before));
    };

    press(&mut nav, &mut doc, "s", 83);
    press(&mut nav, &mut doc, "s", 83);
    press(&mut nav, &mut doc, "s", 83);
    press(&mut nav, &mut doc, "w", 87);

    println!("modal opens");
    nav.set_enabled(false);
    press(&mut nav, &mut doc, "right", keys::ARROW_RIGHT);
    nav.set_enabled(true);
    println!("modal closes");
    press(&mut nav, &mut doc, "d", 68);
}
