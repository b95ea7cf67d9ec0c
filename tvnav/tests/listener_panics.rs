// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A listener that panics must not leave the navigator half-way through a move.

use std::panic::{AssertUnwindSafe, catch_unwind};

use kurbo::Rect;
use tvnav::{Direction, FocusChangingEvent, NavigateOptions, Navigator, Phase, Verdict};
use tvnav_dom::{Document, Element, NodeId};

fn row() -> (Document, NodeId, NodeId) {
    let mut doc = Document::new(Rect::new(0.0, 0.0, 1000.0, 500.0));
    let root = doc.root();
    let a = doc.append(
        root,
        Element::new("button").with_bounds(Rect::new(0.0, 0.0, 100.0, 100.0)),
    );
    let b = doc.append(
        root,
        Element::new("button").with_bounds(Rect::new(200.0, 0.0, 300.0, 100.0)),
    );
    doc.focus(a);
    (doc, a, b)
}

#[test]
fn panic_before_the_veto_touches_nothing() {
    let (mut doc, a, b) = row();
    let mut nav = Navigator::new();
    let id = nav.on_focus_changing(|_: &FocusChangingEvent| -> Verdict {
        panic!("changing listener failed")
    });

    let result = catch_unwind(AssertUnwindSafe(|| {
        nav.move_focus(&mut doc, Direction::Right, &NavigateOptions::new())
    }));
    assert!(result.is_err());
    assert_eq!(doc.active_element(), Some(a));
    assert!(nav.history().is_empty());
    assert_eq!(nav.phase(), Phase::Dispatching);

    assert!(nav.remove_listener(id));
    assert_eq!(
        nav.move_focus(&mut doc, Direction::Right, &NavigateOptions::new()),
        Some(b)
    );
    assert_eq!(nav.phase(), Phase::Idle);
}

#[test]
fn panic_after_the_move_keeps_the_move() {
    let (mut doc, a, b) = row();
    let mut nav = Navigator::new();
    nav.on_focus_changed(|_| panic!("changed listener failed"));

    let result = catch_unwind(AssertUnwindSafe(|| {
        nav.move_focus(&mut doc, Direction::Right, &NavigateOptions::new())
    }));
    assert!(result.is_err());
    assert_eq!(doc.active_element(), Some(b));
    assert_eq!(
        nav.history()
            .peek(&doc, b, Direction::Left)
            .map(|entry| entry.element),
        Some(a)
    );
}
