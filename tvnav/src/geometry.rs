// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry for directional scoring: shadows, overlap, and distance.
//!
//! All functions here are pure. Rectangles are [`kurbo::Rect`] in viewport
//! coordinates and are assumed to be normalized (`x0 <= x1`, `y0 <= y1`) and
//! finite, except for the unbounded side of a [`shadow`].
//!
//! ## Scoring
//!
//! A candidate is considered only when it lies *ahead* of the reference in
//! the requested direction and overlaps the reference's shadow on the
//! perpendicular axis. Among those:
//!
//! 1. Larger perpendicular overlap wins. Overlap is measured as a fraction of
//!    the shorter of the two perpendicular spans, so a small element sitting
//!    entirely inside a large element's shadow scores `1.0`.
//! 2. Smaller gap along the primary axis breaks overlap ties.
//!
//! Comparisons use small tolerances ([`OVERLAP_EPSILON`], [`DISTANCE_EPSILON`])
//! and only a strict win replaces the incumbent, so identical layouts resolve
//! identically regardless of fractional-pixel offsets, and exact ties fall back
//! to document order.

use kurbo::Rect;

use crate::direction::Direction;

/// Tolerance when comparing overlap fractions.
pub const OVERLAP_EPSILON: f64 = 1e-6;

/// Tolerance, in pixels, when comparing distances and edges.
pub const DISTANCE_EPSILON: f64 = 1e-3;

/// How much smaller a remembered element's overlap may be while still counting
/// as comparable to the best candidate.
pub const HISTORY_OVERLAP_SLACK: f64 = 0.25;

/// How much farther, in pixels, a remembered element may be while still
/// counting as comparable to the best candidate.
pub const HISTORY_DISTANCE_SLACK: f64 = 8.0;

/// The unbounded strip swept from `rect` in `direction`.
///
/// For [`Direction::Right`] this spans from `rect`'s right edge to `+∞` with
/// `rect`'s vertical extent; the other directions are analogous.
#[must_use]
pub fn shadow(rect: Rect, direction: Direction) -> Rect {
    match direction {
        Direction::Up => Rect::new(rect.x0, f64::NEG_INFINITY, rect.x1, rect.y0),
        Direction::Down => Rect::new(rect.x0, rect.y1, rect.x1, f64::INFINITY),
        Direction::Left => Rect::new(f64::NEG_INFINITY, rect.y0, rect.x0, rect.y1),
        Direction::Right => Rect::new(rect.x1, rect.y0, f64::INFINITY, rect.y1),
    }
}

/// Signed gap along the primary axis from `reference`'s far edge to
/// `candidate`'s near edge. Negative when the candidate starts behind that edge.
#[must_use]
pub fn primary_gap(reference: Rect, candidate: Rect, direction: Direction) -> f64 {
    match direction {
        Direction::Up => reference.y0 - candidate.y1,
        Direction::Down => candidate.y0 - reference.y1,
        Direction::Left => reference.x0 - candidate.x1,
        Direction::Right => candidate.x0 - reference.x1,
    }
}

/// Fraction of the shorter perpendicular span covered by `candidate`'s
/// intersection with `reference`'s shadow, in `[0, 1]`.
///
/// Only meaningful for candidates ahead of the reference; see [`score`].
#[must_use]
pub fn overlap_fraction(reference: Rect, candidate: Rect, direction: Direction) -> f64 {
    let hit = shadow(reference, direction).intersect(candidate);
    let (covered, reference_span, candidate_span) = if direction.is_horizontal() {
        (hit.height(), reference.height(), candidate.height())
    } else {
        (hit.width(), reference.width(), candidate.width())
    };
    let short_edge = reference_span.min(candidate_span);
    if short_edge <= 0.0 {
        return 0.0;
    }
    (covered / short_edge).clamp(0.0, 1.0)
}

/// Ranking key of a candidate relative to a reference and direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Score {
    /// Perpendicular overlap with the reference's shadow, in `(0, 1]`. Larger wins.
    pub overlap: f64,
    /// Gap along the primary axis, `>= 0`. Smaller wins.
    pub distance: f64,
}

impl Score {
    /// Returns `true` if `self` ranks strictly above `other`.
    ///
    /// Differences within [`OVERLAP_EPSILON`] / [`DISTANCE_EPSILON`] are ties,
    /// and ties never win.
    #[must_use]
    pub fn beats(&self, other: &Self) -> bool {
        if self.overlap > other.overlap + OVERLAP_EPSILON {
            return true;
        }
        if self.overlap < other.overlap - OVERLAP_EPSILON {
            return false;
        }
        self.distance < other.distance - DISTANCE_EPSILON
    }

    /// Looser comparison used for remembered (history) candidates.
    ///
    /// Returns `true` when `self` is within [`HISTORY_OVERLAP_SLACK`] of
    /// `best`'s overlap and within [`HISTORY_DISTANCE_SLACK`] of its distance.
    #[must_use]
    pub fn is_comparable_to(&self, best: &Self) -> bool {
        self.overlap + HISTORY_OVERLAP_SLACK >= best.overlap
            && self.distance <= best.distance + HISTORY_DISTANCE_SLACK
    }
}

/// Scores `candidate` against `reference` for a move in `direction`.
///
/// Returns `None` when the candidate starts behind the reference's far edge
/// or does not overlap its shadow.
#[must_use]
pub fn score(reference: Rect, candidate: Rect, direction: Direction) -> Option<Score> {
    let gap = primary_gap(reference, candidate, direction);
    if gap < -DISTANCE_EPSILON {
        return None;
    }
    let overlap = overlap_fraction(reference, candidate, direction);
    if overlap <= OVERLAP_EPSILON {
        return None;
    }
    Some(Score {
        overlap,
        distance: gap.max(0.0),
    })
}

/// A zero-thickness reference on the edge of `viewport` that a move in
/// `direction` enters through.
///
/// Moving right into a frame enters through its left edge, and so on. The
/// perpendicular extent comes from `incoming` when it overlaps the viewport on
/// that axis, and spans the whole viewport otherwise.
#[must_use]
pub fn entry_edge(viewport: Rect, direction: Direction, incoming: Option<Rect>) -> Rect {
    let span = incoming
        .map(|r| r.intersect(viewport))
        .filter(|r| {
            if direction.is_horizontal() {
                r.height() > 0.0
            } else {
                r.width() > 0.0
            }
        })
        .unwrap_or(viewport);
    match direction {
        Direction::Up => Rect::new(span.x0, viewport.y1, span.x1, viewport.y1),
        Direction::Down => Rect::new(span.x0, viewport.y0, span.x1, viewport.y0),
        Direction::Left => Rect::new(viewport.x1, span.y0, viewport.x1, span.y1),
        Direction::Right => Rect::new(viewport.x0, span.y0, viewport.x0, span.y1),
    }
}

/// Returns `true` if every edge of `a` is within [`DISTANCE_EPSILON`] of `b`'s.
#[must_use]
pub fn same_rect(a: Rect, b: Rect) -> bool {
    let near = |p: f64, q: f64| p - q <= DISTANCE_EPSILON && q - p <= DISTANCE_EPSILON;
    near(a.x0, b.x0) && near(a.y0, b.y0) && near(a.x1, b.x1) && near(a.y1, b.y1)
}
