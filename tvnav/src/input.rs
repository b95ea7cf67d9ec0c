// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw key input and the key-code-to-direction table.

use smallvec::SmallVec;
use tvnav_dom::NodeId;

use crate::direction::Direction;

/// Well-known raw key codes.
pub mod keys {
    /// Keyboard left arrow.
    pub const ARROW_LEFT: u32 = 37;
    /// Keyboard up arrow.
    pub const ARROW_UP: u32 = 38;
    /// Keyboard right arrow.
    pub const ARROW_RIGHT: u32 = 39;
    /// Keyboard down arrow.
    pub const ARROW_DOWN: u32 = 40;

    /// OS navigation key: up.
    pub const NAVIGATION_UP: u32 = 138;
    /// OS navigation key: down.
    pub const NAVIGATION_DOWN: u32 = 139;
    /// OS navigation key: left.
    pub const NAVIGATION_LEFT: u32 = 140;
    /// OS navigation key: right.
    pub const NAVIGATION_RIGHT: u32 = 141;
    /// OS navigation key: accept.
    pub const NAVIGATION_ACCEPT: u32 = 142;

    /// Gamepad A button.
    pub const GAMEPAD_A: u32 = 195;

    /// Gamepad D-pad up.
    pub const GAMEPAD_DPAD_UP: u32 = 203;
    /// Gamepad D-pad down.
    pub const GAMEPAD_DPAD_DOWN: u32 = 204;
    /// Gamepad D-pad left.
    pub const GAMEPAD_DPAD_LEFT: u32 = 205;
    /// Gamepad D-pad right.
    pub const GAMEPAD_DPAD_RIGHT: u32 = 206;

    /// Gamepad left thumbstick up.
    pub const GAMEPAD_LEFT_THUMBSTICK_UP: u32 = 211;
    /// Gamepad left thumbstick down.
    pub const GAMEPAD_LEFT_THUMBSTICK_DOWN: u32 = 212;
    /// Gamepad left thumbstick right.
    pub const GAMEPAD_LEFT_THUMBSTICK_RIGHT: u32 = 213;
    /// Gamepad left thumbstick left.
    pub const GAMEPAD_LEFT_THUMBSTICK_LEFT: u32 = 214;
}

type Codes = SmallVec<[u32; 8]>;

/// Mutable table from raw key codes to directions.
///
/// [`Default`] seeds keyboard arrows, OS navigation keys, the gamepad D-pad
/// and the left thumbstick. Codes are matched in [`Direction::ALL`] order, so a
/// code pushed under two directions maps to the earlier one.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KeyCodeMap {
    up: Codes,
    down: Codes,
    left: Codes,
    right: Codes,
}

impl Default for KeyCodeMap {
    fn default() -> Self {
        use keys::*;
        let mut map = Self::empty();
        map.up.extend([ARROW_UP, NAVIGATION_UP, GAMEPAD_DPAD_UP, GAMEPAD_LEFT_THUMBSTICK_UP]);
        map.down.extend([
            ARROW_DOWN,
            NAVIGATION_DOWN,
            GAMEPAD_DPAD_DOWN,
            GAMEPAD_LEFT_THUMBSTICK_DOWN,
        ]);
        map.left.extend([
            ARROW_LEFT,
            NAVIGATION_LEFT,
            GAMEPAD_DPAD_LEFT,
            GAMEPAD_LEFT_THUMBSTICK_LEFT,
        ]);
        map.right.extend([
            ARROW_RIGHT,
            NAVIGATION_RIGHT,
            GAMEPAD_DPAD_RIGHT,
            GAMEPAD_LEFT_THUMBSTICK_RIGHT,
        ]);
        map
    }
}

impl KeyCodeMap {
    /// A table with no codes at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            up: SmallVec::new(),
            down: SmallVec::new(),
            left: SmallVec::new(),
            right: SmallVec::new(),
        }
    }

    fn slot(&self, direction: Direction) -> &Codes {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        }
    }

    fn slot_mut(&mut self, direction: Direction) -> &mut Codes {
        match direction {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }

    /// Codes mapped to `direction`, in insertion order.
    #[must_use]
    pub fn codes(&self, direction: Direction) -> &[u32] {
        self.slot(direction)
    }

    /// Maps `code` to `direction`. Pushing a code already present is a no-op.
    pub fn push(&mut self, direction: Direction, code: u32) {
        let codes = self.slot_mut(direction);
        if !codes.contains(&code) {
            codes.push(code);
        }
    }

    /// Unmaps `code` from `direction`. Returns `true` if it was mapped.
    pub fn remove(&mut self, direction: Direction, code: u32) -> bool {
        let codes = self.slot_mut(direction);
        let before = codes.len();
        codes.retain(|c| *c != code);
        codes.len() != before
    }

    /// The direction `code` maps to, if any.
    #[must_use]
    pub fn direction_for(&self, code: u32) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&d| self.slot(d).contains(&code))
    }
}

/// Whether a key went down or came up.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyState {
    /// Key pressed (including auto-repeat).
    Down,
    /// Key released.
    Up,
}

/// A raw key event as delivered by the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyInput {
    /// Raw key code.
    pub code: u32,
    /// Press or release.
    pub state: KeyState,
    /// Set when an element-level handler already consumed the event.
    pub default_prevented: bool,
}

impl KeyInput {
    /// A key press that nothing has handled yet.
    #[must_use]
    pub const fn down(code: u32) -> Self {
        Self {
            code,
            state: KeyState::Down,
            default_prevented: false,
        }
    }

    /// A key release that nothing has handled yet.
    #[must_use]
    pub const fn up(code: u32) -> Self {
        Self {
            code,
            state: KeyState::Up,
            default_prevented: false,
        }
    }

    /// Marks the event as already handled.
    #[must_use]
    pub const fn prevented(mut self) -> Self {
        self.default_prevented = true;
        self
    }
}

/// What a call to [`Navigator::handle_key`](crate::Navigator::handle_key) did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    /// Not a navigation key, navigation is disabled, or the event was prevented.
    Ignored,
    /// A direction was recognized but focus did not move.
    Unchanged,
    /// A focus-changing listener vetoed the move.
    Cancelled,
    /// Focus moved to this element.
    Moved(NodeId),
    /// Nothing in this frame; an exit was posted to the parent.
    ExitRequested,
    /// An accept key was released over this element; the host should click it.
    Activate(NodeId),
}

/// Tracks accept-key presses so only a matched, unprevented release activates.
#[derive(Clone, Debug, Default)]
pub(crate) struct AcceptTracker {
    pending: Option<u32>,
}

impl AcceptTracker {
    pub(crate) fn key_down(&mut self, input: &KeyInput) {
        self.pending = (!input.default_prevented).then_some(input.code);
    }

    /// Returns `true` if this release completes an unprevented press of the same key.
    pub(crate) fn key_up(&mut self, input: &KeyInput) -> bool {
        let pressed = self.pending.take() == Some(input.code);
        pressed && !input.default_prevented
    }

    pub(crate) fn clear(&mut self) {
        self.pending = None;
    }
}
