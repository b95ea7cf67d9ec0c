// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directional focus history.
//!
//! Each element that received focus remembers, per direction, where focus
//! came from. Moving back the opposite way prefers that element when its
//! score is comparable to the geometric winner.

use hashbrown::HashMap;
use kurbo::Rect;
use tvnav_dom::{Document, NodeId};

use crate::direction::Direction;
use crate::geometry::same_rect;

/// A remembered focus source.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    /// The element focus came from.
    pub element: NodeId,
    /// Its layout box at the time of the move.
    pub rect: Rect,
}

impl HistoryEntry {
    /// Alive and still laid out where it was when recorded.
    fn is_valid(&self, doc: &Document) -> bool {
        doc.rect(self.element)
            .is_some_and(|current| same_rect(current, self.rect))
    }
}

type Row = [Option<HistoryEntry>; 4];

/// Per-element, per-direction history of focus moves.
#[derive(Clone, Debug, Default)]
pub struct FocusHistory {
    rows: HashMap<NodeId, Row>,
}

impl FocusHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a move from `from` to `to` in `direction`.
    ///
    /// Overwrites `to`'s entry for the opposite direction so that moving back
    /// from `to` remembers `from`.
    pub fn record(&mut self, from: NodeId, from_rect: Rect, to: NodeId, direction: Direction) {
        if from == to {
            return;
        }
        let row = self.rows.entry(to).or_default();
        row[direction.opposite().index()] = Some(HistoryEntry {
            element: from,
            rect: from_rect,
        });
    }

    /// The valid entry for moving from `at` in `direction`, without mutating.
    #[must_use]
    pub fn peek(&self, doc: &Document, at: NodeId, direction: Direction) -> Option<HistoryEntry> {
        if !doc.is_alive(at) {
            return None;
        }
        self.rows
            .get(&at)
            .and_then(|row| row[direction.index()])
            .filter(|entry| entry.is_valid(doc))
    }

    /// Like [`peek`](Self::peek), but purges what it finds stale.
    ///
    /// An invalid entry is cleared; a row keyed by a detached element is
    /// dropped entirely.
    pub fn lookup(&mut self, doc: &Document, at: NodeId, direction: Direction) -> Option<HistoryEntry> {
        if !doc.is_alive(at) {
            self.rows.remove(&at);
            return None;
        }
        let row = self.rows.get_mut(&at)?;
        let slot = &mut row[direction.index()];
        match *slot {
            Some(entry) if entry.is_valid(doc) => Some(entry),
            Some(_) => {
                *slot = None;
                if row.iter().all(Option::is_none) {
                    self.rows.remove(&at);
                }
                None
            }
            None => None,
        }
    }

    /// Drops everything remembered about `id`, as a key. Returns `true` if a row existed.
    pub fn forget(&mut self, id: NodeId) -> bool {
        self.rows.remove(&id).is_some()
    }

    /// Drops all history.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Number of elements with at least one entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if nothing is remembered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
