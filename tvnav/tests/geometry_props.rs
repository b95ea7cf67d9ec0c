// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for `tvnav::geometry`.

use kurbo::{Rect, Vec2};
use proptest::prelude::*;
use tvnav::Direction;
use tvnav::geometry::{score, shadow};

fn any_rect() -> impl Strategy<Value = Rect> {
    (-1000_i32..1000, -1000_i32..1000, 1_i32..400, 1_i32..400).prop_map(|(x, y, w, h)| {
        let (x, y) = (f64::from(x), f64::from(y));
        Rect::new(x, y, x + f64::from(w), y + f64::from(h))
    })
}

fn any_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

/// Quarter-pixel offsets, so shifted coordinates stay exactly representable.
fn any_offset() -> impl Strategy<Value = Vec2> {
    (-4000_i32..4000, -4000_i32..4000)
        .prop_map(|(dx, dy)| Vec2::new(f64::from(dx) * 0.25, f64::from(dy) * 0.25))
}

proptest! {
    #[test]
    fn scores_are_bounded(a in any_rect(), b in any_rect(), d in any_direction()) {
        if let Some(s) = score(a, b, d) {
            prop_assert!(s.overlap > 0.0 && s.overlap <= 1.0);
            prop_assert!(s.distance >= 0.0);
        }
    }

    #[test]
    fn scored_candidates_touch_the_shadow(a in any_rect(), b in any_rect(), d in any_direction()) {
        if score(a, b, d).is_some() {
            let hit = shadow(a, d).intersect(b);
            let covered = if d.is_horizontal() { hit.height() } else { hit.width() };
            prop_assert!(covered > 0.0);
        }
    }

    #[test]
    fn a_rect_never_scores_against_itself(a in any_rect(), d in any_direction()) {
        prop_assert!(score(a, a, d).is_none());
    }

    #[test]
    fn opposite_moves_mirror(a in any_rect(), b in any_rect(), d in any_direction()) {
        prop_assert_eq!(score(a, b, d), score(b, a, d.opposite()));
    }

    #[test]
    fn scores_are_translation_invariant(
        a in any_rect(),
        b in any_rect(),
        c in any_rect(),
        d in any_direction(),
        offset in any_offset(),
    ) {
        let sb = score(a, b, d);
        let sc = score(a, c, d);
        let sb2 = score(a + offset, b + offset, d);
        let sc2 = score(a + offset, c + offset, d);
        prop_assert_eq!(sb, sb2);
        prop_assert_eq!(sc, sc2);
        if let (Some(x), Some(y)) = (sb, sc) {
            prop_assert_eq!(x.beats(&y), sb2.unwrap().beats(&sc2.unwrap()));
        }
    }

    #[test]
    fn beats_is_asymmetric(a in any_rect(), b in any_rect(), c in any_rect(), d in any_direction()) {
        if let (Some(x), Some(y)) = (score(a, b, d), score(a, c, d)) {
            prop_assert!(!(x.beats(&y) && y.beats(&x)));
            prop_assert!(!x.beats(&x));
        }
    }
}
