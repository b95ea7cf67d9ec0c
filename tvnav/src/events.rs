// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus-change events and their listeners.
//!
//! A move fires two events:
//!
//! - [`FocusChangingEvent`], before anything is mutated. Every registered
//!   changing listener runs, in registration order; if any returns
//!   [`Verdict::Cancel`], the move is abandoned and no further event fires.
//! - [`FocusChangedEvent`], after focus and history are updated.
//!
//! Cancellation is a return value, not a flag on a shared event object.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use tvnav_dom::NodeId;

use crate::direction::Direction;

/// Payload of the cancellable pre-move event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FocusChangingEvent {
    /// Requested direction.
    pub direction: Direction,
    /// Raw key code, when the move came from key input.
    pub key_code: Option<u32>,
    /// Focused element before the move.
    pub previous_focus_element: Option<NodeId>,
    /// Element that would receive focus.
    pub next_focus_element: NodeId,
}

/// Payload of the informational post-move event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FocusChangedEvent {
    /// Direction of the move.
    pub direction: Direction,
    /// Raw key code, when the move came from key input.
    pub key_code: Option<u32>,
    /// Focused element before the move.
    pub previous_focus_element: Option<NodeId>,
    /// Element now focused.
    pub focused_element: NodeId,
}

/// A changing listener's answer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Verdict {
    /// Let the move proceed.
    #[default]
    Allow,
    /// Veto the move.
    Cancel,
}

/// Handle returned when registering a listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type ChangingFn = Box<dyn FnMut(&FocusChangingEvent) -> Verdict>;
type ChangedFn = Box<dyn FnMut(&FocusChangedEvent)>;

/// Both listener lists, sharing one id space.
#[derive(Default)]
pub(crate) struct Listeners {
    next: u64,
    changing: Vec<(ListenerId, ChangingFn)>,
    changed: Vec<(ListenerId, ChangedFn)>,
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("changing", &self.changing.len())
            .field("changed", &self.changed.len())
            .finish_non_exhaustive()
    }
}

impl Listeners {
    fn next_id(&mut self) -> ListenerId {
        self.next += 1;
        ListenerId(self.next)
    }

    pub(crate) fn on_changing(&mut self, f: ChangingFn) -> ListenerId {
        let id = self.next_id();
        self.changing.push((id, f));
        id
    }

    pub(crate) fn on_changed(&mut self, f: ChangedFn) -> ListenerId {
        let id = self.next_id();
        self.changed.push((id, f));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.changing.len() + self.changed.len();
        self.changing.retain(|(l, _)| *l != id);
        self.changed.retain(|(l, _)| *l != id);
        self.changing.len() + self.changed.len() != before
    }

    /// Runs every changing listener; any cancel vetoes.
    pub(crate) fn dispatch_changing(&mut self, event: &FocusChangingEvent) -> Verdict {
        let mut verdict = Verdict::Allow;
        for (_, f) in &mut self.changing {
            if f(event) == Verdict::Cancel {
                verdict = Verdict::Cancel;
            }
        }
        verdict
    }

    pub(crate) fn dispatch_changed(&mut self, event: &FocusChangedEvent) {
        for (_, f) in &mut self.changed {
            f(event);
        }
    }
}
