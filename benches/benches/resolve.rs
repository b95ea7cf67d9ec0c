// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Rect;
use tvnav::{Direction, NavigateOptions, Navigator, NavigatorConfig};
use tvnav_dom::{Document, Element, NodeId};

/// A `side × side` grid of tiles; returns the document and the center tile.
fn grid(side: u32, tag: &str, class: Option<&str>) -> (Document, NodeId) {
    let cell = 120.0;
    let extent = f64::from(side) * cell;
    let mut doc = Document::new(Rect::new(0.0, 0.0, extent, extent));
    let root = doc.root();
    let mut center = root;
    for row in 0..side {
        let shelf = doc.append(root, Element::new("div"));
        for col in 0..side {
            let (x, y) = (f64::from(col) * cell, f64::from(row) * cell);
            let mut element = Element::new(tag).with_bounds(Rect::new(x, y, x + 100.0, y + 100.0));
            if let Some(class) = class {
                element = element.with_class(class);
            }
            let id = doc.append(shelf, element);
            if row == side / 2 && col == side / 2 {
                center = id;
            }
        }
    }
    (doc, center)
}

fn bench_find_next(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve/find_next");
    for side in [8_u32, 32, 64] {
        let (mut doc, center) = grid(side, "button", None);
        doc.focus(center);
        let nav = Navigator::new();
        group.throughput(Throughput::Elements(u64::from(side * side)));
        group.bench_with_input(BenchmarkId::new("buttons", side), &doc, |b, doc| {
            b.iter(|| {
                for direction in Direction::ALL {
                    black_box(nav.find_next_focus_element(
                        doc,
                        direction,
                        &NavigateOptions::new(),
                    ));
                }
            });
        });
    }
    group.finish();
}

fn bench_custom_selectors(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve/custom_selectors");
    for side in [8_u32, 32] {
        let (mut doc, center) = grid(side, "div", Some("tile"));
        doc.focus(center);
        let config = NavigatorConfig {
            focusable_selectors: vec![String::from("div.tile"), String::from("[data-card]")],
            ..NavigatorConfig::default()
        };
        let Ok(nav) = Navigator::with_config(config) else {
            return;
        };
        group.throughput(Throughput::Elements(u64::from(side * side)));
        group.bench_with_input(BenchmarkId::new("tiles", side), &doc, |b, doc| {
            b.iter(|| {
                black_box(nav.find_next_focus_element(
                    doc,
                    Direction::Right,
                    &NavigateOptions::new(),
                ))
            });
        });
    }
    group.finish();
}

fn bench_move_back_and_forth(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve/move_focus");
    for side in [8_u32, 32] {
        let (mut doc, center) = grid(side, "button", None);
        doc.focus(center);
        let mut nav = Navigator::new();
        group.bench_function(BenchmarkId::new("left_right", side), |b| {
            b.iter(|| {
                black_box(nav.move_focus(&mut doc, Direction::Left, &NavigateOptions::new()));
                black_box(nav.move_focus(&mut doc, Direction::Right, &NavigateOptions::new()));
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_find_next,
    bench_custom_selectors,
    bench_move_back_and_forth
);
criterion_main!(benches);
