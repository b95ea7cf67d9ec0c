// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Candidate resolution: overrides, geometry, and remembered moves.
//!
//! Resolution runs in priority order:
//!
//! 1. **First focus.** With no reference element and no reference rect (nothing
//!    focused, or only the document root focused), the first focusable element
//!    in scope wins.
//! 2. **Override.** The reference element's `data-focus-<direction>` attribute
//!    (prefix configurable) is parsed as a selector list and queried within the
//!    scope. A focusable match other than the reference wins outright.
//!    Anything else falls through silently.
//! 3. **Geometry.** Every focusable element in scope except the reference is
//!    scored with [`geometry::score`](crate::geometry::score); the best strict
//!    winner in document order is kept.
//! 4. **History.** If the reference remembers an element for this direction and
//!    that element scored comparably to the winner, the remembered element
//!    wins instead.
//!
//! Nothing here mutates the document. Eligibility is recomputed per call.

use alloc::format;

use kurbo::Rect;
use tvnav_dom::{Document, NodeId, SelectorList};

use crate::direction::Direction;
use crate::geometry::{Score, score};
use crate::history::HistoryEntry;
use crate::registry::FocusRegistry;

/// Per-call overrides for a resolution.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct NavigateOptions {
    /// Element to navigate from instead of the focused element.
    pub reference_element: Option<NodeId>,
    /// Rectangle to navigate from instead of the reference element's layout box.
    ///
    /// Without a [`reference_element`](Self::reference_element), the override
    /// and history steps are skipped.
    pub reference_rect: Option<Rect>,
    /// Scope for this call only, instead of the navigator's focus root.
    pub focus_root: Option<NodeId>,
}

impl NavigateOptions {
    /// Options that change nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigates from `element`.
    #[must_use]
    pub fn with_reference_element(mut self, element: NodeId) -> Self {
        self.reference_element = Some(element);
        self
    }

    /// Navigates from `rect`.
    #[must_use]
    pub fn with_reference_rect(mut self, rect: Rect) -> Self {
        self.reference_rect = Some(rect);
        self
    }

    /// Bounds this call to the subtree at `root`.
    #[must_use]
    pub fn with_focus_root(mut self, root: NodeId) -> Self {
        self.focus_root = Some(root);
        self
    }
}

/// Which rule produced a [`Resolution`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResolutionSource {
    /// Nothing was focused; first focusable element in scope.
    FirstFocus,
    /// An override attribute on the reference element.
    Override,
    /// A remembered move, preferred over the geometric winner.
    History,
    /// Best geometric score.
    Geometry,
}

/// Outcome of a successful resolution.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Resolution {
    /// Element that should receive focus.
    pub element: NodeId,
    /// Its layout box at resolution time.
    pub rect: Rect,
    /// Its score, for geometric and remembered resolutions.
    pub score: Option<Score>,
    /// Rule that produced it.
    pub source: ResolutionSource,
}

/// Where a resolution starts from.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Reference {
    pub(crate) element: Option<NodeId>,
    pub(crate) rect: Option<Rect>,
}

impl Reference {
    /// Works out the reference for `options`.
    ///
    /// An explicit reference element that is no longer attached is ignored.
    /// The focused element is used only when neither an element nor a rect is
    /// given, and the document root never counts as a reference.
    pub(crate) fn from_options(doc: &Document, options: &NavigateOptions) -> Self {
        let explicit = options.reference_element.filter(|&id| doc.is_alive(id));
        let element = match (explicit, options.reference_rect) {
            (Some(id), _) => Some(id),
            (None, Some(_)) => None,
            (None, None) => doc.active_element(),
        }
        .filter(|&id| id != doc.root());
        let rect = options
            .reference_rect
            .or_else(|| element.and_then(|id| doc.rect(id)));
        Self { element, rect }
    }
}

/// Borrowed view of everything a resolution reads.
#[derive(Debug)]
pub(crate) struct Resolver<'a> {
    pub(crate) doc: &'a Document,
    pub(crate) registry: &'a FocusRegistry,
    pub(crate) override_prefix: &'a str,
    pub(crate) focus_root: Option<NodeId>,
}

impl Resolver<'_> {
    /// Scope for `options`: per-call root, else global root, else the document root.
    pub(crate) fn scope(&self, options: &NavigateOptions) -> NodeId {
        options
            .focus_root
            .or(self.focus_root)
            .unwrap_or_else(|| self.doc.root())
    }

    /// Resolves the next focus target.
    ///
    /// `remembered` is asked for the history entry of the reference element,
    /// once, and only when geometry actually runs from a reference element.
    pub(crate) fn resolve(
        &self,
        direction: Direction,
        options: &NavigateOptions,
        remembered: impl FnOnce(NodeId) -> Option<HistoryEntry>,
    ) -> Option<Resolution> {
        let scope = self.scope(options);
        if !self.doc.is_alive(scope) {
            return None;
        }
        let reference = Reference::from_options(self.doc, options);

        let Some(reference_rect) = reference.rect else {
            return self.first_focus(scope);
        };

        if let Some(element) = reference.element
            && let Some(found) = self.override_target(element, direction, scope)
        {
            return Some(found);
        }

        let mut best: Option<(NodeId, Rect, Score)> = None;
        let mut remembered_hit: Option<(NodeId, Rect, Score)> = None;
        let remembered = reference.element.and_then(remembered);

        for candidate in self.registry.query_all(self.doc, scope) {
            if Some(candidate) == reference.element {
                continue;
            }
            let Some(rect) = self.doc.rect(candidate) else {
                continue;
            };
            let Some(s) = score(reference_rect, rect, direction) else {
                continue;
            };
            if remembered.is_some_and(|entry| entry.element == candidate) {
                remembered_hit = Some((candidate, rect, s));
            }
            if best.is_none_or(|(_, _, incumbent)| s.beats(&incumbent)) {
                best = Some((candidate, rect, s));
            }
        }

        let (element, rect, s) = best?;
        if let Some((hit, hit_rect, hit_score)) = remembered_hit
            && hit != element
            && hit_score.is_comparable_to(&s)
        {
            return Some(Resolution {
                element: hit,
                rect: hit_rect,
                score: Some(hit_score),
                source: ResolutionSource::History,
            });
        }
        Some(Resolution {
            element,
            rect,
            score: Some(s),
            source: ResolutionSource::Geometry,
        })
    }

    fn first_focus(&self, scope: NodeId) -> Option<Resolution> {
        let element = self.registry.query_all(self.doc, scope).next()?;
        Some(Resolution {
            element,
            rect: self.doc.rect(element)?,
            score: None,
            source: ResolutionSource::FirstFocus,
        })
    }

    fn override_target(
        &self,
        reference: NodeId,
        direction: Direction,
        scope: NodeId,
    ) -> Option<Resolution> {
        let name = format!("{}{}", self.override_prefix, direction.name());
        let value = self.doc.element(reference)?.attribute(&name)?;
        let selectors = value.parse::<SelectorList>().ok()?;
        let element = self
            .doc
            .query_selector_all(scope, &selectors)
            .find(|&id| id != reference && self.registry.is_focusable(self.doc, id))?;
        Some(Resolution {
            element,
            rect: self.doc.rect(element)?,
            score: None,
            source: ResolutionSource::Override,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tvnav_dom::Element;

    fn button(doc: &mut Document, parent: NodeId, x: f64, y: f64) -> NodeId {
        doc.append(
            parent,
            Element::new("button").with_bounds(Rect::new(x, y, x + 100.0, y + 100.0)),
        )
    }

    fn resolver<'a>(doc: &'a Document, registry: &'a FocusRegistry) -> Resolver<'a> {
        Resolver {
            doc,
            registry,
            override_prefix: "data-focus-",
            focus_root: None,
        }
    }

    #[test]
    fn first_focus_when_nothing_is_focused() {
        let mut doc = Document::new(Rect::new(0.0, 0.0, 1000.0, 1000.0));
        let root = doc.root();
        let hidden = doc.append(root, Element::new("button"));
        let first = button(&mut doc, root, 300.0, 300.0);
        let _second = button(&mut doc, root, 0.0, 0.0);
        let registry = FocusRegistry::new();
        let r = resolver(&doc, &registry)
            .resolve(Direction::Left, &NavigateOptions::new(), |_| None)
            .unwrap();
        assert_eq!(r.element, first);
        assert_eq!(r.source, ResolutionSource::FirstFocus);
        assert_ne!(r.element, hidden);

        // Focusing the root counts as nothing focused.
        doc.focus(root);
        let r = resolver(&doc, &registry)
            .resolve(Direction::Left, &NavigateOptions::new(), |_| None)
            .unwrap();
        assert_eq!(r.source, ResolutionSource::FirstFocus);
    }

    #[test]
    fn override_wins_and_bad_overrides_fall_through() {
        let mut doc = Document::new(Rect::new(0.0, 0.0, 1000.0, 1000.0));
        let root = doc.root();
        let center = button(&mut doc, root, 200.0, 200.0);
        let right = button(&mut doc, root, 400.0, 200.0);
        let far = doc.append(
            root,
            Element::new("button")
                .with_id("far")
                .with_bounds(Rect::new(800.0, 800.0, 900.0, 900.0)),
        );
        let registry = FocusRegistry::new();
        doc.focus(center);

        doc.element_mut(center)
            .unwrap()
            .set_attribute("data-focus-right", "#far");
        let r = resolver(&doc, &registry)
            .resolve(Direction::Right, &NavigateOptions::new(), |_| None)
            .unwrap();
        assert_eq!((r.element, r.source), (far, ResolutionSource::Override));

        for bad in ["#missing", "div >", "", "button:not(x)"] {
            doc.element_mut(center)
                .unwrap()
                .set_attribute("data-focus-right", bad);
            let r = resolver(&doc, &registry)
                .resolve(Direction::Right, &NavigateOptions::new(), |_| None)
                .unwrap();
            assert_eq!((r.element, r.source), (right, ResolutionSource::Geometry), "{bad}");
        }

        // Disabled override target falls through too.
        doc.element_mut(center)
            .unwrap()
            .set_attribute("data-focus-right", "#far");
        doc.element_mut(far).unwrap().set_disabled(true);
        let r = resolver(&doc, &registry)
            .resolve(Direction::Right, &NavigateOptions::new(), |_| None)
            .unwrap();
        assert_eq!(r.element, right);
    }

    #[test]
    fn override_skips_ineligible_matches() {
        let mut doc = Document::new(Rect::new(0.0, 0.0, 1000.0, 1000.0));
        let root = doc.root();
        let center = button(&mut doc, root, 200.0, 200.0);
        let _right = button(&mut doc, root, 400.0, 200.0);
        let tile = |x: f64| {
            Element::new("button")
                .with_class("tile")
                .with_bounds(Rect::new(x, 800.0, x + 100.0, 900.0))
        };
        let first = doc.append(root, tile(0.0));
        let second = doc.append(root, tile(200.0));
        doc.element_mut(first).unwrap().set_disabled(true);
        doc.element_mut(center)
            .unwrap()
            .set_attribute("data-focus-right", ".tile");
        doc.focus(center);
        let registry = FocusRegistry::new();

        let r = resolver(&doc, &registry)
            .resolve(Direction::Right, &NavigateOptions::new(), |_| None)
            .unwrap();
        assert_eq!((r.element, r.source), (second, ResolutionSource::Override));

        // The reference itself is skipped as a match, not as the whole override.
        doc.element_mut(center).unwrap().set_attribute("data-focus-right", "button");
        let r = resolver(&doc, &registry)
            .resolve(Direction::Right, &NavigateOptions::new(), |_| None)
            .unwrap();
        assert_eq!(r.source, ResolutionSource::Override);
        assert_ne!(r.element, center);
    }

    #[test]
    fn reference_rect_without_element_skips_override() {
        let mut doc = Document::new(Rect::new(0.0, 0.0, 1000.0, 1000.0));
        let root = doc.root();
        let a = button(&mut doc, root, 0.0, 0.0);
        let b = button(&mut doc, root, 200.0, 0.0);
        doc.element_mut(a)
            .unwrap()
            .set_attribute("data-focus-right", "#nowhere");
        doc.focus(a);
        let registry = FocusRegistry::new();
        let options = NavigateOptions::new().with_reference_rect(Rect::new(-50.0, 0.0, -50.0, 100.0));
        let r = resolver(&doc, &registry)
            .resolve(Direction::Right, &options, |_| panic!("no history without an element"))
            .unwrap();
        // Focused element is not excluded when only a rect is given.
        assert_eq!(r.element, a);
        assert_ne!(r.element, b);
    }

    #[test]
    fn dead_scope_yields_nothing() {
        let mut doc = Document::new(Rect::new(0.0, 0.0, 1000.0, 1000.0));
        let root = doc.root();
        let panel = doc.append(root, Element::new("div"));
        let _a = button(&mut doc, panel, 0.0, 0.0);
        doc.remove(panel);
        let registry = FocusRegistry::new();
        let options = NavigateOptions::new().with_focus_root(panel);
        assert!(
            resolver(&doc, &registry)
                .resolve(Direction::Right, &options, |_| None)
                .is_none()
        );
    }
}
