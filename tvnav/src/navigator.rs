// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The navigator: one focus engine per document.
//!
//! A move runs `Idle → Resolving → Dispatching → Idle`:
//!
//! 1. Custom-selector matches in scope get a tab index ([`FocusRegistry::discover`]).
//! 2. A candidate is resolved. No candidate means no events and no state change.
//! 3. [`FocusChangingEvent`] goes to every changing listener. Any veto
//!    abandons the move before anything is mutated.
//! 4. Focus moves, history is recorded, and an iframe target is sent
//!    [`FrameMessage::Enter`].
//! 5. [`FocusChangedEvent`] goes to every changed listener.
//!
//! Because nothing is mutated before the veto and everything is committed before
//! the changed event, a panicking listener unwinds either with no state touched
//! or with the move fully applied. The phase is reset at the start of every call.

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;
use smallvec::SmallVec;
use tvnav_dom::{Document, ElementFlags, NodeId, SelectorError};

use crate::config::NavigatorConfig;
use crate::direction::Direction;
use crate::events::{FocusChangedEvent, FocusChangingEvent, ListenerId, Listeners, Verdict};
use crate::geometry::entry_edge;
use crate::history::FocusHistory;
use crate::input::{AcceptTracker, InputOutcome, KeyCodeMap, KeyInput, KeyState};
use crate::message::{Envelope, FrameMessage, Origin, Route};
use crate::registry::FocusRegistry;
use crate::resolve::{NavigateOptions, Reference, Resolution, Resolver};

/// Where the navigator is in a move.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// No move in progress.
    #[default]
    Idle,
    /// Looking up a candidate.
    Resolving,
    /// Listeners are running.
    Dispatching,
}

/// How a move ended, before it is mapped to a public outcome.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Step {
    NotFound { whole_document: bool },
    AlreadyFocused,
    Cancelled,
    Moved(NodeId),
}

/// Spatial focus engine for one document.
///
/// The navigator does not own the [`Document`]; every operation borrows it.
/// It owns the configuration (key bindings, accept codes, focusable selectors,
/// override prefix, enabled flag, focus root), the focus history, listeners,
/// and the outbox of cross-frame messages.
pub struct Navigator {
    enabled: bool,
    key_codes: KeyCodeMap,
    accept_codes: SmallVec<[u32; 4]>,
    override_prefix: String,
    registry: FocusRegistry,
    focus_root: Option<NodeId>,
    history: FocusHistory,
    listeners: Listeners,
    accept: AcceptTracker,
    embedded: bool,
    outbox: VecDeque<Envelope>,
    phase: Phase,
}

impl core::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Navigator")
            .field("enabled", &self.enabled)
            .field("focus_root", &self.focus_root)
            .field("embedded", &self.embedded)
            .field("phase", &self.phase)
            .field("history", &self.history.len())
            .field("outbox", &self.outbox.len())
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::from_parts(NavigatorConfig::default(), FocusRegistry::new())
    }
}

impl Navigator {
    /// A navigator with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A navigator with `config`. Fails if a focusable selector does not parse.
    pub fn with_config(config: NavigatorConfig) -> Result<Self, SelectorError> {
        let mut registry = FocusRegistry::new();
        for selector in &config.focusable_selectors {
            registry.push_selector(selector)?;
        }
        Ok(Self::from_parts(config, registry))
    }

    fn from_parts(config: NavigatorConfig, registry: FocusRegistry) -> Self {
        Self {
            enabled: config.enabled,
            key_codes: config.key_codes,
            accept_codes: config.accept_codes,
            override_prefix: config.override_prefix,
            registry,
            focus_root: None,
            history: FocusHistory::new(),
            listeners: Listeners::default(),
            accept: AcceptTracker::default(),
            embedded: false,
            outbox: VecDeque::new(),
            phase: Phase::Idle,
        }
    }

    /// Snapshot of the current configuration.
    #[must_use]
    pub fn config(&self) -> NavigatorConfig {
        NavigatorConfig {
            enabled: self.enabled,
            key_codes: self.key_codes.clone(),
            accept_codes: self.accept_codes.clone(),
            focusable_selectors: self.registry.selectors().to_vec(),
            override_prefix: self.override_prefix.clone(),
        }
    }

    /// Restores the default configuration and drops all state.
    ///
    /// History, listeners, the focus root, pending accept presses and the
    /// outbox are cleared. Whether the navigator is embedded is kept.
    pub fn reset(&mut self) {
        let embedded = self.embedded;
        *self = Self::default();
        self.embedded = embedded;
    }

    /// Whether key input moves focus.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Turns key-driven navigation on or off.
    ///
    /// Explicit calls such as [`move_focus`](Self::move_focus) and cross-frame
    /// messages are not affected.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.accept.clear();
        }
        self.enabled = enabled;
    }

    /// Global scope bound, if any.
    #[must_use]
    pub fn focus_root(&self) -> Option<NodeId> {
        self.focus_root
    }

    /// Sets or clears the global scope bound.
    pub fn set_focus_root(&mut self, root: Option<NodeId>) {
        self.focus_root = root;
    }

    /// Directional key bindings.
    #[must_use]
    pub fn key_code_map(&self) -> &KeyCodeMap {
        &self.key_codes
    }

    /// Mutable directional key bindings.
    pub fn key_code_map_mut(&mut self) -> &mut KeyCodeMap {
        &mut self.key_codes
    }

    /// Codes that activate the focused element.
    #[must_use]
    pub fn accept_codes(&self) -> &[u32] {
        &self.accept_codes
    }

    /// Mutable accept codes.
    pub fn accept_codes_mut(&mut self) -> &mut SmallVec<[u32; 4]> {
        &mut self.accept_codes
    }

    /// Focusable registry.
    #[must_use]
    pub fn registry(&self) -> &FocusRegistry {
        &self.registry
    }

    /// Mutable focusable registry.
    pub fn registry_mut(&mut self) -> &mut FocusRegistry {
        &mut self.registry
    }

    /// Focus history.
    #[must_use]
    pub fn history(&self) -> &FocusHistory {
        &self.history
    }

    /// Current phase. Anything but [`Phase::Idle`] between calls means a
    /// listener unwound mid-move.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns `true` if this navigator runs inside a frame.
    #[must_use]
    pub fn is_embedded(&self) -> bool {
        self.embedded
    }

    /// Marks this navigator as running inside a frame, so that running out of
    /// candidates posts [`FrameMessage::Exit`] to the parent.
    pub fn set_embedded(&mut self, embedded: bool) {
        self.embedded = embedded;
    }

    /// Registers a listener for the cancellable pre-move event.
    pub fn on_focus_changing(
        &mut self,
        listener: impl FnMut(&FocusChangingEvent) -> Verdict + 'static,
    ) -> ListenerId {
        self.listeners.on_changing(Box::new(listener))
    }

    /// Registers a listener for the post-move event.
    pub fn on_focus_changed(
        &mut self,
        listener: impl FnMut(&FocusChangedEvent) + 'static,
    ) -> ListenerId {
        self.listeners.on_changed(Box::new(listener))
    }

    /// Unregisters a listener. Returns `true` if it was registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Drains outgoing cross-frame messages, oldest first.
    pub fn take_outbox(&mut self) -> Vec<Envelope> {
        self.outbox.drain(..).collect()
    }

    /// Returns `true` if messages are waiting in the outbox.
    #[must_use]
    pub fn has_outgoing(&self) -> bool {
        !self.outbox.is_empty()
    }

    fn resolver<'a>(&'a self, doc: &'a Document) -> Resolver<'a> {
        Resolver {
            doc,
            registry: &self.registry,
            override_prefix: &self.override_prefix,
            focus_root: self.focus_root,
        }
    }

    /// Resolves the next focus target without side effects.
    #[must_use]
    pub fn resolve(
        &self,
        doc: &Document,
        direction: Direction,
        options: &NavigateOptions,
    ) -> Option<Resolution> {
        self.resolver(doc).resolve(direction, options, |at| {
            self.history.peek(doc, at, direction)
        })
    }

    /// The element a move in `direction` would focus, without side effects.
    #[must_use]
    pub fn find_next_focus_element(
        &self,
        doc: &Document,
        direction: Direction,
        options: &NavigateOptions,
    ) -> Option<NodeId> {
        self.resolve(doc, direction, options).map(|r| r.element)
    }

    /// Resolves and performs a move, firing events.
    ///
    /// Returns the newly focused element, or `None` if focus did not move.
    pub fn move_focus(
        &mut self,
        doc: &mut Document,
        direction: Direction,
        options: &NavigateOptions,
    ) -> Option<NodeId> {
        match self.step(doc, direction, None, options) {
            Step::Moved(id) => Some(id),
            Step::NotFound { whole_document } => {
                self.exit_if_embedded(whole_document, direction, None);
                None
            }
            Step::AlreadyFocused | Step::Cancelled => None,
        }
    }

    /// Handles a raw key event.
    pub fn handle_key(&mut self, doc: &mut Document, input: KeyInput) -> InputOutcome {
        self.phase = Phase::Idle;
        if !self.enabled {
            return InputOutcome::Ignored;
        }
        if self.accept_codes.contains(&input.code) {
            return match input.state {
                KeyState::Down => {
                    self.accept.key_down(&input);
                    InputOutcome::Ignored
                }
                KeyState::Up => {
                    let completed = self.accept.key_up(&input);
                    match doc.active_element() {
                        Some(id) if completed => InputOutcome::Activate(id),
                        _ => InputOutcome::Ignored,
                    }
                }
            };
        }
        if input.default_prevented || input.state == KeyState::Up {
            return InputOutcome::Ignored;
        }
        let Some(direction) = self.key_codes.direction_for(input.code) else {
            return InputOutcome::Ignored;
        };
        let key_code = Some(input.code);
        match self.step(doc, direction, key_code, &NavigateOptions::new()) {
            Step::Moved(id) => InputOutcome::Moved(id),
            Step::Cancelled => InputOutcome::Cancelled,
            Step::AlreadyFocused => InputOutcome::Unchanged,
            Step::NotFound { whole_document } => {
                if self.exit_if_embedded(whole_document, direction, key_code) {
                    InputOutcome::ExitRequested
                } else {
                    InputOutcome::Unchanged
                }
            }
        }
    }

    /// Handles a cross-frame message.
    ///
    /// - [`FrameMessage::Enter`] from the parent resolves from the entered edge
    ///   of the viewport, first from the strip in line with the incoming rect
    ///   and then from the whole edge. If the document root is disabled or
    ///   hidden, or nothing is found, an exit goes straight back.
    /// - [`FrameMessage::Exit`] from a child frame resumes from that frame's
    ///   iframe element; if nothing is found here either, this navigator is
    ///   itself embedded, and no focus root bounds the search, the exit is
    ///   passed upward.
    ///
    /// Messages from an unexpected origin are ignored.
    pub fn handle_message(
        &mut self,
        doc: &mut Document,
        origin: Origin,
        message: FrameMessage,
    ) -> InputOutcome {
        self.phase = Phase::Idle;
        match (origin, message) {
            (
                Origin::Parent,
                FrameMessage::Enter {
                    direction,
                    key_code,
                    rect,
                },
            ) => self.enter(doc, direction, key_code, rect),
            (
                Origin::Frame(frame),
                FrameMessage::Exit {
                    direction,
                    key_code,
                },
            ) => {
                let Some(host) = doc.find_frame(frame) else {
                    return InputOutcome::Ignored;
                };
                #[cfg(feature = "tracing")]
                tracing::debug!(?frame, ?direction, "focus left child frame");
                let options = NavigateOptions::new().with_reference_element(host);
                match self.step(doc, direction, key_code, &options) {
                    Step::Moved(id) => InputOutcome::Moved(id),
                    Step::Cancelled => InputOutcome::Cancelled,
                    Step::AlreadyFocused => InputOutcome::Unchanged,
                    Step::NotFound { whole_document } => {
                        if self.exit_if_embedded(whole_document, direction, key_code) {
                            InputOutcome::ExitRequested
                        } else {
                            InputOutcome::Unchanged
                        }
                    }
                }
            }
            _ => InputOutcome::Ignored,
        }
    }

    fn enter(
        &mut self,
        doc: &mut Document,
        direction: Direction,
        key_code: Option<u32>,
        rect: Option<Rect>,
    ) -> InputOutcome {
        #[cfg(feature = "tracing")]
        tracing::debug!(?direction, "focus entered frame");
        let root = doc.root();
        let body_usable = doc
            .element(root)
            .is_some_and(|e| !e.is_disabled() && e.flags.contains(ElementFlags::VISIBLE));
        if !body_usable {
            self.post_exit(direction, key_code);
            return InputOutcome::ExitRequested;
        }
        let viewport = doc.viewport();
        let strip = entry_edge(viewport, direction, rect);
        let mut step = self.step(
            doc,
            direction,
            key_code,
            &NavigateOptions::new().with_reference_rect(strip),
        );
        // Nothing in line with the incoming rect: try the whole edge.
        if rect.is_some() && matches!(step, Step::NotFound { .. }) {
            let edge = entry_edge(viewport, direction, None);
            step = self.step(
                doc,
                direction,
                key_code,
                &NavigateOptions::new().with_reference_rect(edge),
            );
        }
        match step {
            Step::Moved(id) => InputOutcome::Moved(id),
            Step::Cancelled => InputOutcome::Cancelled,
            Step::AlreadyFocused => InputOutcome::Unchanged,
            Step::NotFound { .. } => {
                self.post_exit(direction, key_code);
                InputOutcome::ExitRequested
            }
        }
    }

    fn post_exit(&mut self, direction: Direction, key_code: Option<u32>) {
        #[cfg(feature = "tracing")]
        tracing::debug!(?direction, "posting exit to parent");
        self.outbox.push_back(Envelope {
            route: Route::Parent,
            message: FrameMessage::Exit {
                direction,
                key_code,
            },
        });
    }

    fn exit_if_embedded(
        &mut self,
        whole_document: bool,
        direction: Direction,
        key_code: Option<u32>,
    ) -> bool {
        if self.embedded && whole_document {
            self.post_exit(direction, key_code);
            true
        } else {
            false
        }
    }

    fn step(
        &mut self,
        doc: &mut Document,
        direction: Direction,
        key_code: Option<u32>,
        options: &NavigateOptions,
    ) -> Step {
        self.phase = Phase::Resolving;

        let scope = options
            .focus_root
            .or(self.focus_root)
            .unwrap_or_else(|| doc.root());
        if doc.is_alive(scope) {
            self.registry.discover(doc, scope);
        }
        let whole_document = scope == doc.root();

        let reference = Reference::from_options(doc, options);
        let resolution = {
            let doc: &Document = doc;
            let resolver = Resolver {
                doc,
                registry: &self.registry,
                override_prefix: &self.override_prefix,
                focus_root: self.focus_root,
            };
            let history = &mut self.history;
            resolver.resolve(direction, options, |at| history.lookup(doc, at, direction))
        };

        let Some(resolution) = resolution else {
            #[cfg(feature = "tracing")]
            tracing::trace!(?direction, "no candidate");
            self.phase = Phase::Idle;
            return Step::NotFound { whole_document };
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(
            ?direction,
            element = ?resolution.element,
            source = ?resolution.source,
            "resolved"
        );

        let previous = doc.active_element();
        if previous == Some(resolution.element) {
            self.phase = Phase::Idle;
            return Step::AlreadyFocused;
        }

        self.phase = Phase::Dispatching;
        let changing = FocusChangingEvent {
            direction,
            key_code,
            previous_focus_element: previous,
            next_focus_element: resolution.element,
        };
        if self.listeners.dispatch_changing(&changing) == Verdict::Cancel {
            #[cfg(feature = "tracing")]
            tracing::debug!(?direction, element = ?resolution.element, "move vetoed");
            self.phase = Phase::Idle;
            return Step::Cancelled;
        }

        // Resolved candidates are alive, so this only fails on a broken document.
        if !doc.focus(resolution.element) {
            self.phase = Phase::Idle;
            return Step::NotFound { whole_document };
        }
        if let Some(from) = reference.element
            && let Some(from_rect) = doc.rect(from)
        {
            self.history
                .record(from, from_rect, resolution.element, direction);
        }
        if let Some(frame) = doc.element(resolution.element).and_then(|e| e.frame) {
            let origin = resolution.rect.origin().to_vec2();
            self.outbox.push_back(Envelope {
                route: Route::Frame(frame),
                message: FrameMessage::Enter {
                    direction,
                    key_code,
                    rect: reference.rect.map(|r| r - origin),
                },
            });
            #[cfg(feature = "tracing")]
            tracing::debug!(?frame, ?direction, "posting enter to child frame");
        }

        let changed = FocusChangedEvent {
            direction,
            key_code,
            previous_focus_element: previous,
            focused_element: resolution.element,
        };
        self.listeners.dispatch_changed(&changed);
        self.phase = Phase::Idle;
        Step::Moved(resolution.element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::keys;
    use tvnav_dom::Element;

    fn row() -> (Document, [NodeId; 3]) {
        let mut doc = Document::new(Rect::new(0.0, 0.0, 1000.0, 500.0));
        let root = doc.root();
        let ids = [0.0, 200.0, 400.0].map(|x| {
            doc.append(
                root,
                Element::new("button").with_bounds(Rect::new(x, 0.0, x + 100.0, 100.0)),
            )
        });
        (doc, ids)
    }

    #[test]
    fn key_input_moves_and_reports() {
        let (mut doc, [a, b, _]) = row();
        doc.focus(a);
        let mut nav = Navigator::new();
        assert_eq!(
            nav.handle_key(&mut doc, KeyInput::down(keys::ARROW_RIGHT)),
            InputOutcome::Moved(b)
        );
        assert_eq!(doc.active_element(), Some(b));
        assert_eq!(nav.phase(), Phase::Idle);
        // Releases and unknown codes do nothing.
        assert_eq!(
            nav.handle_key(&mut doc, KeyInput::up(keys::ARROW_RIGHT)),
            InputOutcome::Ignored
        );
        assert_eq!(nav.handle_key(&mut doc, KeyInput::down(9999)), InputOutcome::Ignored);
        assert_eq!(
            nav.handle_key(&mut doc, KeyInput::down(keys::ARROW_UP)),
            InputOutcome::Unchanged
        );
    }

    #[test]
    fn disabled_or_prevented_input_is_ignored() {
        let (mut doc, [a, ..]) = row();
        doc.focus(a);
        let mut nav = Navigator::new();
        assert_eq!(
            nav.handle_key(&mut doc, KeyInput::down(keys::ARROW_RIGHT).prevented()),
            InputOutcome::Ignored
        );
        nav.set_enabled(false);
        assert_eq!(
            nav.handle_key(&mut doc, KeyInput::down(keys::ARROW_RIGHT)),
            InputOutcome::Ignored
        );
        assert_eq!(doc.active_element(), Some(a));
        // Explicit moves still work.
        assert!(nav.move_focus(&mut doc, Direction::Right, &NavigateOptions::new()).is_some());
    }

    #[test]
    fn accept_activates_focused_element_on_release() {
        let (mut doc, [a, ..]) = row();
        doc.focus(a);
        let mut nav = Navigator::new();
        assert_eq!(
            nav.handle_key(&mut doc, KeyInput::down(keys::GAMEPAD_A)),
            InputOutcome::Ignored
        );
        assert_eq!(
            nav.handle_key(&mut doc, KeyInput::up(keys::GAMEPAD_A)),
            InputOutcome::Activate(a)
        );
        nav.handle_key(&mut doc, KeyInput::down(keys::GAMEPAD_A).prevented());
        assert_eq!(
            nav.handle_key(&mut doc, KeyInput::up(keys::GAMEPAD_A)),
            InputOutcome::Ignored
        );
    }

    #[test]
    fn custom_key_codes() {
        let (mut doc, [a, b, _]) = row();
        doc.focus(a);
        let mut nav = Navigator::new();
        nav.key_code_map_mut().push(Direction::Right, 68);
        assert_eq!(nav.handle_key(&mut doc, KeyInput::down(68)), InputOutcome::Moved(b));
    }

    #[test]
    fn embedded_navigator_exits_when_nothing_is_left() {
        let (mut doc, [_, _, c]) = row();
        doc.focus(c);
        let mut nav = Navigator::new();
        assert_eq!(
            nav.handle_key(&mut doc, KeyInput::down(keys::ARROW_RIGHT)),
            InputOutcome::Unchanged
        );
        assert!(!nav.has_outgoing());

        nav.set_embedded(true);
        assert_eq!(
            nav.handle_key(&mut doc, KeyInput::down(keys::ARROW_RIGHT)),
            InputOutcome::ExitRequested
        );
        assert_eq!(
            nav.take_outbox(),
            [Envelope {
                route: Route::Parent,
                message: FrameMessage::Exit {
                    direction: Direction::Right,
                    key_code: Some(keys::ARROW_RIGHT),
                },
            }]
        );
    }

    #[test]
    fn reset_restores_defaults_but_keeps_embedding() {
        let (mut doc, [a, b, _]) = row();
        doc.focus(a);
        let mut nav = Navigator::new();
        nav.set_embedded(true);
        nav.set_enabled(false);
        nav.set_focus_root(Some(b));
        nav.registry_mut().push_selector(".tile").unwrap();
        nav.on_focus_changing(|_| Verdict::Cancel);
        nav.move_focus(&mut doc, Direction::Right, &NavigateOptions::new());

        nav.reset();
        assert!(nav.enabled());
        assert!(nav.is_embedded());
        assert_eq!(nav.focus_root(), None);
        assert!(nav.registry().selectors().is_empty());
        assert!(!nav.has_outgoing());
        assert_eq!(nav.config(), NavigatorConfig::default());
        assert_eq!(
            nav.move_focus(&mut doc, Direction::Right, &NavigateOptions::new()),
            Some(b)
        );
    }

    #[test]
    fn with_config_rejects_bad_selectors() {
        let config = NavigatorConfig {
            focusable_selectors: alloc::vec![String::from("div ~ p")],
            ..NavigatorConfig::default()
        };
        assert!(Navigator::with_config(config).is_err());
    }
}
