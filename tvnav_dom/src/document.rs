// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The document: an arena of elements with a single focused element.

use alloc::vec;
use alloc::vec::Vec;

use kurbo::Rect;

use crate::element::Element;
use crate::selector::SelectorList;
use crate::types::{ElementFlags, FrameId, NodeId};

#[derive(Clone, Debug)]
struct Node {
    element: Element,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// A tree of [`Element`]s plus the focused element.
///
/// The root element (`body`) is created with the document and spans the
/// viewport. It cannot be removed.
#[derive(Clone, Debug)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    active: Option<NodeId>,
}

impl Document {
    /// Creates a document whose root element covers `viewport`.
    #[must_use]
    pub fn new(viewport: Rect) -> Self {
        let root = Node {
            element: Element::new("body").with_bounds(viewport),
            parent: None,
            children: Vec::new(),
        };
        Self {
            slots: vec![Slot {
                generation: 1,
                node: Some(root),
            }],
            free: Vec::new(),
            root: NodeId::new(0, 1),
            active: None,
        }
    }

    /// Root element.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Viewport rectangle (the root element's bounds).
    #[must_use]
    pub fn viewport(&self) -> Rect {
        self.rect(self.root).unwrap_or(Rect::ZERO)
    }

    /// Returns `true` if `id` refers to an attached element.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.node.as_mut()
    }

    /// Appends `element` as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a live element.
    #[track_caller]
    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        assert!(self.is_alive(parent), "parent {parent:?} is not attached");
        let node = Node {
            element,
            parent: Some(parent),
            children: Vec::new(),
        };
        let id = if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.node = Some(node);
            NodeId::new(idx, slot.generation)
        } else {
            let idx = u32::try_from(self.slots.len()).expect("document slot count fits in u32");
            self.slots.push(Slot {
                generation: 1,
                node: Some(node),
            });
            NodeId::new(idx, 1)
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        id
    }

    /// Detaches `id` and its whole subtree.
    ///
    /// Every [`NodeId`] inside the subtree becomes stale. If focus was inside
    /// the subtree it is cleared. Returns `false` for the root or a dead id.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.root || !self.is_alive(id) {
            return false;
        }
        if let Some(active) = self.active
            && self.is_inclusive_ancestor(id, active)
        {
            self.active = None;
        }
        if let Some(parent) = self.node(id).and_then(|n| n.parent)
            && let Some(p) = self.node_mut(parent)
        {
            p.children.retain(|&c| c != id);
        }
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let slot = &mut self.slots[n.idx()];
            if let Some(node) = slot.node.take() {
                stack.extend(node.children);
                self.free.push(n.0);
            }
        }
        true
    }

    /// Element data for `id`.
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id).map(|n| &n.element)
    }

    /// Mutable element data for `id`.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.node_mut(id).map(|n| &mut n.element)
    }

    /// Current layout box of `id`.
    #[must_use]
    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        self.element(id).map(|e| e.bounds)
    }

    /// Updates the layout box of `id`. Returns `false` if `id` is dead.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) -> bool {
        self.element_mut(id).map(|e| e.bounds = bounds).is_some()
    }

    /// Parent of `id`.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Children of `id` in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Returns `true` if `ancestor` is `node` or one of its ancestors.
    #[must_use]
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.parent(id);
        }
        false
    }

    /// Returns `true` if `id` and all of its ancestors are visible.
    #[must_use]
    pub fn is_rendered(&self, id: NodeId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let mut cur = Some(id);
        while let Some(n) = cur {
            match self.element(n) {
                Some(e) if e.flags.contains(ElementFlags::VISIBLE) => cur = self.parent(n),
                _ => return false,
            }
        }
        true
    }

    /// Pre-order traversal of the strict descendants of `scope`, in document order.
    ///
    /// The iterator is lazy and restartable: each call walks the current tree.
    #[must_use]
    pub fn descendants(&self, scope: NodeId) -> Descendants<'_> {
        let mut stack = Vec::new();
        stack.extend(self.children(scope).iter().rev().copied());
        Descendants { doc: self, stack }
    }

    /// First element in `scope` (inclusive) matching `selectors`, in document order.
    #[must_use]
    pub fn query_selector(&self, scope: NodeId, selectors: &SelectorList) -> Option<NodeId> {
        self.query_selector_all(scope, selectors).next()
    }

    /// All elements in `scope` (inclusive) matching `selectors`, in document order.
    pub fn query_selector_all<'a>(
        &'a self,
        scope: NodeId,
        selectors: &'a SelectorList,
    ) -> impl Iterator<Item = NodeId> + 'a {
        let head = self.is_alive(scope).then_some(scope);
        head.into_iter()
            .chain(self.descendants(scope))
            .filter(move |&id| self.element(id).is_some_and(|e| selectors.matches(e)))
    }

    /// The iframe element hosting `frame`, if any.
    #[must_use]
    pub fn find_frame(&self, frame: FrameId) -> Option<NodeId> {
        self.descendants(self.root)
            .find(|&id| self.element(id).is_some_and(|e| e.frame == Some(frame)))
    }

    /// The focused element, if any and still attached.
    #[must_use]
    pub fn active_element(&self) -> Option<NodeId> {
        self.active.filter(|&id| self.is_alive(id))
    }

    /// Focuses `id`. Returns `false` (and leaves focus unchanged) if `id` is dead.
    ///
    /// This is the raw focus primitive; eligibility is the caller's business.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        self.active = Some(id);
        true
    }

    /// Clears focus.
    pub fn blur(&mut self) {
        self.active = None;
    }
}

/// Iterator returned by [`Document::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        // Push children in reverse order so pops follow document order.
        self.stack
            .extend(self.doc.children(id).iter().rev().copied());
        Some(id)
    }
}
