// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A frame tree: documents with their navigators, and message delivery between them.
//!
//! [`FrameHost`] plays the role a browser plays for nested iframes. Each frame
//! owns a [`Document`] and a [`Navigator`]. Key input goes to the innermost frame
//! holding focus, and [`pump`](FrameHost::pump) moves messages between the
//! navigators of parent and child frames until none are left.
//!
//! ## Example
//!
//! ```
//! use kurbo::Rect;
//! use tvnav::{FrameHost, InputOutcome, KeyInput, keys};
//! use tvnav_dom::{Document, Element};
//!
//! let mut top = Document::new(Rect::new(0.0, 0.0, 1000.0, 500.0));
//! let root = top.root();
//! let menu = top.append(
//!     root,
//!     Element::new("button").with_bounds(Rect::new(0.0, 0.0, 100.0, 100.0)),
//! );
//! let iframe = top.append(
//!     root,
//!     Element::new("iframe").with_bounds(Rect::new(200.0, 0.0, 600.0, 400.0)),
//! );
//! let mut inner = Document::new(Rect::new(0.0, 0.0, 400.0, 400.0));
//! let inner_root = inner.root();
//! let play = inner.append(
//!     inner_root,
//!     Element::new("button").with_bounds(Rect::new(50.0, 0.0, 150.0, 100.0)),
//! );
//!
//! let mut host = FrameHost::new(top);
//! let child = host.attach(host.top(), iframe, inner).unwrap();
//! host.frame_mut(host.top()).unwrap().document.focus(menu);
//!
//! // Right from the menu focuses the iframe, then focus enters the frame.
//! assert_eq!(host.handle_key(KeyInput::down(keys::ARROW_RIGHT)), InputOutcome::Moved(iframe));
//! host.pump();
//! assert_eq!(host.focused_frame(), child);
//! assert_eq!(host.frame(child).unwrap().document.active_element(), Some(play));
//! ```

use alloc::vec::Vec;

use tvnav_dom::{Document, FrameId, NodeId};

use crate::input::{InputOutcome, KeyInput};
use crate::message::{Envelope, Origin, Route};
use crate::navigator::Navigator;

/// Upper bound on delivery rounds per [`FrameHost::pump`] call.
pub const MAX_PUMP_ROUNDS: usize = 64;

/// One document in a [`FrameHost`].
#[derive(Debug)]
pub struct Frame {
    /// The frame's document.
    pub document: Document,
    /// The frame's focus engine.
    pub navigator: Navigator,
    parent: Option<FrameId>,
    reachable: bool,
}

impl Frame {
    /// Frame embedding this one; `None` for the top frame.
    #[must_use]
    pub fn parent(&self) -> Option<FrameId> {
        self.parent
    }

    /// Whether messages addressed to this frame are delivered.
    #[must_use]
    pub fn is_reachable(&self) -> bool {
        self.reachable
    }
}

/// Owner of a tree of frames.
#[derive(Debug)]
pub struct FrameHost {
    frames: Vec<Frame>,
}

impl FrameHost {
    /// A host whose top frame shows `document`.
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self {
            frames: alloc::vec![Frame {
                document,
                navigator: Navigator::new(),
                parent: None,
                reachable: true,
            }],
        }
    }

    /// The top frame.
    #[must_use]
    pub fn top(&self) -> FrameId {
        FrameId(0)
    }

    /// Loads `document` into `element` of frame `parent`.
    ///
    /// `element` becomes an iframe element for the new frame, whose navigator
    /// is marked embedded. Returns `None` if `parent` is unknown or `element`
    /// is not attached in it.
    pub fn attach(
        &mut self,
        parent: FrameId,
        element: NodeId,
        document: Document,
    ) -> Option<FrameId> {
        let id = FrameId(u32::try_from(self.frames.len()).ok()?);
        let host = self.frames.get_mut(parent.0 as usize)?;
        host.document.element_mut(element)?.frame = Some(id);
        let mut navigator = Navigator::new();
        navigator.set_embedded(true);
        self.frames.push(Frame {
            document,
            navigator,
            parent: Some(parent),
            reachable: true,
        });
        Some(id)
    }

    /// The frame `id`.
    #[must_use]
    pub fn frame(&self, id: FrameId) -> Option<&Frame> {
        self.frames.get(id.0 as usize)
    }

    /// The frame `id`, mutably.
    pub fn frame_mut(&mut self, id: FrameId) -> Option<&mut Frame> {
        self.frames.get_mut(id.0 as usize)
    }

    /// Marks `id` as reachable or not (cross-origin, failed to load, ...).
    ///
    /// Messages to an unreachable frame are dropped and key input stops at its
    /// iframe element. Returns `false` if `id` is unknown.
    pub fn set_reachable(&mut self, id: FrameId, reachable: bool) -> bool {
        self.frame_mut(id).map(|f| f.reachable = reachable).is_some()
    }

    /// The innermost reachable frame holding focus.
    #[must_use]
    pub fn focused_frame(&self) -> FrameId {
        let mut current = self.top();
        while let Some(child) = self.focused_child(current) {
            current = child;
        }
        current
    }

    fn focused_child(&self, id: FrameId) -> Option<FrameId> {
        let frame = self.frame(id)?;
        let active = frame.document.active_element()?;
        let child = frame.document.element(active)?.frame?;
        self.frame(child)
            .filter(|c| c.reachable && c.parent == Some(id))
            .map(|_| child)
    }

    /// Delivers `input` to the navigator of the focused frame.
    ///
    /// Messages this produces are delivered by the next [`pump`](Self::pump).
    pub fn handle_key(&mut self, input: KeyInput) -> InputOutcome {
        let id = self.focused_frame();
        match self.frame_mut(id) {
            Some(frame) => frame.navigator.handle_key(&mut frame.document, input),
            None => InputOutcome::Ignored,
        }
    }

    /// Delivers queued messages until no frame has any left.
    ///
    /// Runs at most [`MAX_PUMP_ROUNDS`] rounds. Returns the number of messages
    /// delivered; dropped messages are not counted.
    pub fn pump(&mut self) -> usize {
        let mut delivered = 0;
        for _ in 0..MAX_PUMP_ROUNDS {
            let mut batch: Vec<(FrameId, Envelope)> = Vec::new();
            for (frame, idx) in self.frames.iter_mut().zip(0_u32..) {
                let source = FrameId(idx);
                batch.extend(frame.navigator.take_outbox().into_iter().map(|e| (source, e)));
            }
            if batch.is_empty() {
                break;
            }
            for (source, envelope) in batch {
                if self.deliver(source, envelope) {
                    delivered += 1;
                }
            }
        }
        delivered
    }

    fn deliver(&mut self, source: FrameId, envelope: Envelope) -> bool {
        let (target, origin) = match envelope.route {
            Route::Parent => match self.frame(source).and_then(Frame::parent) {
                Some(parent) => (parent, Origin::Frame(source)),
                None => return false,
            },
            Route::Frame(child) => match self.frame(child) {
                Some(c) if c.parent == Some(source) => (child, Origin::Parent),
                _ => return false,
            },
        };
        let Some(frame) = self.frame_mut(target) else {
            return false;
        };
        if !frame.reachable {
            #[cfg(feature = "tracing")]
            tracing::debug!(?source, ?target, "dropping message to unreachable frame");
            return false;
        }
        let outcome = frame
            .navigator
            .handle_message(&mut frame.document, origin, envelope.message);
        if matches!(origin, Origin::Frame(_)) && matches!(outcome, InputOutcome::Moved(_)) {
            self.blur_from(source);
        }
        true
    }

    /// Clears focus in `id` and every frame focused below it.
    fn blur_from(&mut self, id: FrameId) {
        let mut next = Some(id);
        while let Some(current) = next {
            next = self.focused_child(current);
            if let Some(frame) = self.frame_mut(current) {
                frame.document.blur();
            }
        }
    }
}
