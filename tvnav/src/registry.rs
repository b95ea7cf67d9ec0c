// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focusable registry: which elements in a scope may receive focus.
//!
//! Eligibility is recomputed on every query; nothing here is cached between
//! calls because the document can change between any two moves.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use tvnav_dom::{Document, NodeId, SelectorError, SelectorList};

/// Decides which elements are focus targets.
///
/// An element is focusable when all of the following hold:
/// - It is attached and rendered (it and every ancestor are visible).
/// - It is not disabled.
/// - Its bounds are non-empty.
/// - Its explicit tab index is not `-1`.
/// - Its effective tab index is `>= 0`, or it matches one of the custom
///   [`selectors`](Self::selectors).
#[derive(Clone, Debug, Default)]
pub struct FocusRegistry {
    sources: Vec<String>,
    selectors: Vec<SelectorList>,
}

impl FocusRegistry {
    /// Creates a registry with no custom selectors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom focusable selector (for example `".tile"`).
    pub fn push_selector(&mut self, selector: &str) -> Result<(), SelectorError> {
        let parsed = selector.parse::<SelectorList>()?;
        self.sources.push(selector.to_string());
        self.selectors.push(parsed);
        Ok(())
    }

    /// Removes all custom selectors.
    pub fn clear_selectors(&mut self) {
        self.sources.clear();
        self.selectors.clear();
    }

    /// Custom selectors, as they were pushed.
    #[must_use]
    pub fn selectors(&self) -> &[String] {
        &self.sources
    }

    fn matches_custom(&self, doc: &Document, id: NodeId) -> bool {
        doc.element(id)
            .is_some_and(|e| self.selectors.iter().any(|s| s.matches(e)))
    }

    /// Returns `true` if `id` is a focus target right now.
    #[must_use]
    pub fn is_focusable(&self, doc: &Document, id: NodeId) -> bool {
        let Some(element) = doc.element(id) else {
            return false;
        };
        if element.is_disabled() || element.bounds.is_zero_area() || !doc.is_rendered(id) {
            return false;
        }
        match element.tab_index {
            Some(-1) => false,
            _ if element.effective_tab_index().is_some_and(|t| t >= 0) => true,
            _ => element.tab_index.is_none() && self.matches_custom(doc, id),
        }
    }

    /// Focusable elements strictly inside `scope`, lazily, in document order.
    pub fn query_all<'a>(
        &'a self,
        doc: &'a Document,
        scope: NodeId,
    ) -> impl Iterator<Item = NodeId> + 'a {
        doc.descendants(scope)
            .filter(move |&id| self.is_focusable(doc, id))
    }

    /// Gives custom-selector matches without an explicit tab index a tab index of `0`.
    ///
    /// Resolution already treats such elements as tab index `0`; this makes
    /// the assignment visible to anything else reading the document. Author
    /// tab indices (including `-1`) are never overwritten. Returns the number
    /// of elements updated.
    pub fn discover(&self, doc: &mut Document, scope: NodeId) -> usize {
        if self.selectors.is_empty() {
            return 0;
        }
        let found: Vec<NodeId> = doc
            .descendants(scope)
            .filter(|&id| {
                doc.element(id).is_some_and(|e| {
                    e.tab_index.is_none() && e.effective_tab_index().is_none()
                }) && self.matches_custom(doc, id)
            })
            .collect();
        for &id in &found {
            if let Some(e) = doc.element_mut(id) {
                e.tab_index = Some(0);
            }
        }
        found.len()
    }
}
