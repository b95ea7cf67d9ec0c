// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element data: tag, identity, classes, attributes, and layout snapshot.

use alloc::borrow::ToOwned;
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;

use crate::types::{ElementFlags, FrameId};

/// Tags that take focus without an explicit tab index.
const NATIVELY_FOCUSABLE: &[&str] = &["button", "input", "select", "textarea", "iframe"];

/// An owned, sorted, deduplicated set of class names.
///
/// Membership is O(log n); subset checks are O(n+m) via merge walk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassList(Box<[String]>);

impl ClassList {
    /// Constructs a class list from an iterator, sorting and deduplicating.
    #[must_use]
    pub fn from_names<S: Into<String>>(iter: impl IntoIterator<Item = S>) -> Self {
        let mut names: Vec<String> = iter.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        Self(names.into_boxed_slice())
    }

    /// Returns `true` if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the classes as a sorted slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Returns `true` if the list contains `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.binary_search_by(|c| c.as_str().cmp(name)).is_ok()
    }

    /// Returns `true` if every class in `self` is also in `other`.
    #[must_use]
    pub fn is_subset_of(&self, other: &Self) -> bool {
        let needles = self.as_slice();
        let haystack = other.as_slice();
        let mut i = 0;
        let mut j = 0;
        while i < needles.len() && j < haystack.len() {
            match needles[i].cmp(&haystack[j]) {
                core::cmp::Ordering::Less => return false,
                core::cmp::Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
                core::cmp::Ordering::Greater => j += 1,
            }
        }
        i == needles.len()
    }

    /// Returns a new list with `name` added.
    #[must_use]
    pub fn with(&self, name: &str) -> Self {
        Self::from_names(self.0.iter().cloned().chain(core::iter::once(name.to_owned())))
    }
}

/// A single element of a [`Document`](crate::Document).
///
/// Geometry is a snapshot of the element's layout box in viewport
/// coordinates, kept current by whatever layout system hosts the document.
/// The focus engine reads it at resolution time and never caches it.
#[derive(Clone, Debug)]
pub struct Element {
    tag: String,
    id: Option<String>,
    classes: ClassList,
    attributes: BTreeMap<String, String>,
    /// Layout box in viewport coordinates.
    pub bounds: Rect,
    /// Rendering and interactivity flags.
    pub flags: ElementFlags,
    /// Explicit tab index; `None` means "use the tag's default".
    pub tab_index: Option<i32>,
    /// Embedded browsing context, when this element is an iframe.
    pub frame: Option<FrameId>,
}

impl Element {
    /// Creates an element with the given tag (lower-cased), empty bounds, and default flags.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            classes: ClassList::default(),
            attributes: BTreeMap::new(),
            bounds: Rect::ZERO,
            flags: ElementFlags::default(),
            tab_index: None,
            frame: None,
        }
    }

    /// Sets the element id.
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_owned());
        self
    }

    /// Adds a class.
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes = self.classes.with(class);
        self
    }

    /// Sets an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Sets the layout box.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    /// Sets an explicit tab index.
    #[must_use]
    pub fn with_tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = Some(tab_index);
        self
    }

    /// Sets the flags.
    #[must_use]
    pub fn with_flags(mut self, flags: ElementFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Marks this element as the host of an embedded frame.
    #[must_use]
    pub fn with_frame(mut self, frame: FrameId) -> Self {
        self.frame = Some(frame);
        self
    }

    /// Lower-case tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Element id, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Class list.
    #[must_use]
    pub fn classes(&self) -> &ClassList {
        &self.classes
    }

    /// Attribute value, if present.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Sets (or replaces) an attribute value.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_owned(), value.to_owned());
    }

    /// Removes an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    /// Returns `true` if the element is disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.flags.contains(ElementFlags::DISABLED)
    }

    /// Sets or clears [`ElementFlags::DISABLED`].
    pub fn set_disabled(&mut self, disabled: bool) {
        self.flags.set(ElementFlags::DISABLED, disabled);
    }

    /// Effective tab index.
    ///
    /// The explicit value when set; otherwise `Some(0)` for natively focusable
    /// tags (and anchors carrying `href`), otherwise `None`.
    #[must_use]
    pub fn effective_tab_index(&self) -> Option<i32> {
        if self.tab_index.is_some() {
            return self.tab_index;
        }
        let native = NATIVELY_FOCUSABLE.contains(&self.tag.as_str())
            || (self.tag == "a" && self.attributes.contains_key("href"));
        native.then_some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_list_sorts_and_dedups() {
        let list = ClassList::from_names(["tile", "hero", "tile"]);
        assert_eq!(list.as_slice(), &["hero", "tile"]);
        assert!(list.contains("tile"));
        assert!(!list.contains("row"));
    }

    #[test]
    fn class_list_subset() {
        let needles = ClassList::from_names(["a", "c"]);
        let haystack = ClassList::from_names(["a", "b", "c"]);
        assert!(needles.is_subset_of(&haystack));
        assert!(!haystack.is_subset_of(&needles));
        assert!(ClassList::default().is_subset_of(&needles));
    }

    #[test]
    fn effective_tab_index_uses_tag_defaults() {
        assert_eq!(Element::new("BUTTON").effective_tab_index(), Some(0));
        assert_eq!(Element::new("div").effective_tab_index(), None);
        assert_eq!(Element::new("a").effective_tab_index(), None);
        assert_eq!(
            Element::new("a")
                .with_attribute("href", "#")
                .effective_tab_index(),
            Some(0)
        );
        assert_eq!(
            Element::new("button")
                .with_tab_index(-1)
                .effective_tab_index(),
            Some(-1)
        );
        assert_eq!(
            Element::new("div").with_tab_index(3).effective_tab_index(),
            Some(3)
        );
    }
}
