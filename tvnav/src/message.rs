// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Messages exchanged between the navigators of nested frames.
//!
//! Delivery is fire-and-forget: a navigator appends [`Envelope`]s to its outbox
//! and carries on. Whoever owns the frame tree (see [`FrameHost`](crate::FrameHost))
//! drains outboxes and hands each message to the addressed navigator with the
//! [`Origin`] it came from. A message that is never delivered leaves focus
//! parked on the iframe element, which is the accepted degraded state.

use kurbo::Rect;
use tvnav_dom::FrameId;

use crate::direction::Direction;

/// A cross-frame navigation message.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FrameMessage {
    /// Parent to child: focus entered the frame moving in `direction`.
    Enter {
        /// Direction of the move.
        direction: Direction,
        /// Raw key code, when the move came from key input.
        key_code: Option<u32>,
        /// Reference rect the move started from, in the child's coordinates.
        rect: Option<Rect>,
    },
    /// Child to parent: nothing left in the frame towards `direction`.
    Exit {
        /// Direction of the move.
        direction: Direction,
        /// Raw key code, when the move came from key input.
        key_code: Option<u32>,
    },
}

/// Where an outgoing message is addressed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// The embedding document.
    Parent,
    /// A child frame of this document.
    Frame(FrameId),
}

/// Where an incoming message came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    /// The embedding document.
    Parent,
    /// A child frame of this document.
    Frame(FrameId),
}

/// An addressed outgoing message.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Envelope {
    /// Destination.
    pub route: Route,
    /// Payload.
    pub message: FrameMessage,
}
