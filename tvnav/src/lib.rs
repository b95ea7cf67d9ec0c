// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=tvnav --heading-base-level=0

//! tvnav: spatial (directional) focus navigation for remote- and gamepad-driven UIs.
//!
//! On a 10-foot screen there is no pointer. Up/Down/Left/Right is the whole
//! interaction model, and something has to decide which element gets focus
//! next. This crate decides, from 2-D geometry, author overrides, and a memory
//! of how focus got where it is. It also hands focus across nested frames.
//!
//! The document itself comes from [`tvnav_dom`]: a headless element tree with
//! layout boxes, tab indices, disabled and hidden flags, and a focused element.
//!
//! ## How a move is resolved
//!
//! 1. Nothing focused: the first focusable element in scope.
//! 2. An override attribute on the focused element (`data-focus-right="#next"`)
//!    that matches a focusable element in scope.
//! 3. Otherwise every focusable element in scope is scored against the
//!    reference rectangle: candidates must lie ahead and overlap its
//!    [`shadow`](geometry::shadow); larger overlap wins, then smaller distance,
//!    then document order.
//! 4. If focus arrived here from the opposite direction and that element is
//!    still where it was and scores comparably, it wins ("go back the way you came").
//!
//! A focus root bounds the search. Moves that would leave it do nothing.
//!
//! ## API overview
//!
//! - [`Navigator`]: the per-document engine. [`find_next_focus_element`](Navigator::find_next_focus_element)
//!   is pure; [`move_focus`](Navigator::move_focus) and [`handle_key`](Navigator::handle_key)
//!   fire [`FocusChangingEvent`] (cancellable via [`Verdict::Cancel`]) and
//!   [`FocusChangedEvent`].
//! - [`NavigatorConfig`]: key bindings ([`KeyCodeMap`]), accept codes, focusable
//!   selectors, override prefix, enabled flag.
//! - [`FocusRegistry`], [`FocusHistory`]: eligibility and directional memory.
//! - [`geometry`]: pure scoring functions.
//! - [`FrameHost`], [`FrameMessage`]: nested documents and the enter/exit protocol.
//!
//! ## Example
//!
//! ```
//! use kurbo::Rect;
//! use tvnav::{Direction, InputOutcome, KeyInput, NavigateOptions, Navigator, keys};
//! use tvnav_dom::{Document, Element};
//!
//! let mut doc = Document::new(Rect::new(0.0, 0.0, 1280.0, 720.0));
//! let root = doc.root();
//! let tile = |x: f64| Element::new("button").with_bounds(Rect::new(x, 100.0, x + 200.0, 300.0));
//! let a = doc.append(root, tile(100.0));
//! let b = doc.append(root, tile(400.0));
//!
//! let mut nav = Navigator::new();
//! // Nothing focused yet: the first focusable element is the target.
//! assert_eq!(nav.move_focus(&mut doc, Direction::Right, &NavigateOptions::new()), Some(a));
//!
//! assert_eq!(
//!     nav.handle_key(&mut doc, KeyInput::down(keys::ARROW_RIGHT)),
//!     InputOutcome::Moved(b)
//! );
//! assert_eq!(
//!     nav.find_next_focus_element(&doc, Direction::Left, &NavigateOptions::new()),
//!     Some(a)
//! );
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to Kurbo's `std`.
//! - `libm`: `no_std` numeric support through Kurbo.
//! - `serde`: `Serialize`/`Deserialize` for [`NavigatorConfig`], [`KeyCodeMap`] and [`Direction`].
//! - `tracing`: debug events for resolutions, vetoes, and frame hand-off.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod direction;
mod events;
mod history;
mod host;
mod input;
mod message;
mod navigator;
mod registry;
mod resolve;

pub mod geometry;

pub use config::{DEFAULT_OVERRIDE_PREFIX, NavigatorConfig};
pub use direction::{Direction, UnknownDirection};
pub use events::{FocusChangedEvent, FocusChangingEvent, ListenerId, Verdict};
pub use history::{FocusHistory, HistoryEntry};
pub use host::{Frame, FrameHost, MAX_PUMP_ROUNDS};
pub use input::{InputOutcome, KeyCodeMap, KeyInput, KeyState, keys};
pub use message::{Envelope, FrameMessage, Origin, Route};
pub use navigator::{Navigator, Phase};
pub use registry::FocusRegistry;
pub use resolve::{NavigateOptions, Resolution, ResolutionSource};
