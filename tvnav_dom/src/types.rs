// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public handle and flag types for the document: node identifiers, frame
//! identifiers, and element flags.

/// Identifier for an element in a [`Document`](crate::Document).
///
/// This is a small, copyable handle that stays stable while the element is
/// attached but becomes invalid once the element is removed.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On append, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// ### Liveness
///
/// Use [`Document::is_alive`](crate::Document::is_alive) to check whether a `NodeId` still refers
/// to an attached element. Stale `NodeId`s never alias a different live element because the
/// generation must match. Focus history and override resolution rely on this to drop references
/// to detached elements.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Identifier for an embedded browsing context (an iframe's document).
///
/// Frame identifiers are allocated by whoever owns the set of documents (for
/// example `tvnav::FrameHost`). An [`Element`](crate::Element) carrying a
/// `FrameId` is an iframe element: focusing it hands control to that frame.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u32);

bitflags::bitflags! {
    /// Element flags controlling rendering and interactivity.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Element is rendered. Hiding an element hides its whole subtree.
        const VISIBLE  = 0b0000_0001;
        /// Element is disabled and cannot take focus. Not inherited.
        const DISABLED = 0b0000_0010;
    }
}

impl Default for ElementFlags {
    fn default() -> Self {
        Self::VISIBLE
    }
}
