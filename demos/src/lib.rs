// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the `tvnav` demos.

use kurbo::Rect;
use tvnav_dom::{Document, Element, NodeId};

/// A row of equally sized tiles under `parent`, each tagged with `id`.
pub fn shelf(
    doc: &mut Document,
    parent: NodeId,
    origin: (f64, f64),
    names: &[&str],
) -> Vec<NodeId> {
    let (x0, y0) = origin;
    names
        .iter()
        .zip(0_u32..)
        .map(|(name, i)| {
            let x = x0 + f64::from(i) * 220.0;
            doc.append(
                parent,
                Element::new("button")
                    .with_id(name)
                    .with_bounds(Rect::new(x, y0, x + 200.0, y0 + 120.0)),
            )
        })
        .collect()
}

/// The `id` attribute of an element, or `-` when there is none.
pub fn label(doc: &Document, node: Option<NodeId>) -> &str {
    node.and_then(|n| doc.element(n))
        .and_then(|e| e.id())
        .unwrap_or("-")
}
