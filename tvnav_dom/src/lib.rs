// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=tvnav_dom --heading-base-level=0

//! tvnav DOM: a small, headless document model for spatial focus navigation.
//!
//! The focus engine in `tvnav` needs exactly what a browser document would give it:
//! a tree of elements in document order, a layout box per element, a notion of
//! "disabled", "hidden" and tab index, a single focused element, and enough of a
//! selector language to resolve author overrides such as `data-focus-left="#home"`.
//! This crate provides that and nothing more.
//!
//! ## Not a layout engine
//!
//! This crate does not measure or arrange anything.
//! Upstream code computes positions and sizes and writes them into
//! [`Element::bounds`] (viewport coordinates). The engine reads those boxes at the
//! moment it resolves a move and never caches them.
//!
//! ## API overview
//!
//! - [`Document`]: element arena with a root (`body`) spanning the viewport.
//! - [`Element`]: tag, id, [`ClassList`], attributes, bounds, [`ElementFlags`], tab index, frame.
//! - [`NodeId`]: generational handle. Stale handles never alias a live element.
//! - [`FrameId`]: handle of an embedded document; an element carrying one is an iframe.
//! - [`SelectorList`] / [`Selector`]: compound selectors (`tag#id.class[attr=value]`), comma lists.
//!
//! ## Example
//!
//! ```
//! use kurbo::Rect;
//! use tvnav_dom::{Document, Element, SelectorList};
//!
//! let mut doc = Document::new(Rect::new(0.0, 0.0, 1280.0, 720.0));
//! let root = doc.root();
//! let play = doc.append(
//!     root,
//!     Element::new("button")
//!         .with_id("play")
//!         .with_bounds(Rect::new(100.0, 100.0, 300.0, 160.0)),
//! );
//!
//! let selector: SelectorList = "#play".parse().unwrap();
//! assert_eq!(doc.query_selector(root, &selector), Some(play));
//!
//! assert!(doc.focus(play));
//! assert_eq!(doc.active_element(), Some(play));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod document;
mod element;
mod selector;
mod types;

pub use document::{Descendants, Document};
pub use element::{ClassList, Element};
pub use selector::{AttributeMatch, Selector, SelectorError, SelectorList};
pub use types::{ElementFlags, FrameId, NodeId};
