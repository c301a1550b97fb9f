// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A flat simulated document.
//!
//! Elements live in document coordinates and document order. The viewport
//! is a window of fixed size scrolled vertically. [`SimPage`] answers the
//! controller's [`Layout`] queries and applies presentation edits to each
//! element's class list and custom properties.

use std::collections::{BTreeMap, BTreeSet};

use gazette_core::backend::{Layout, Presenter};
use gazette_core::changes::Changes;
use gazette_core::discovery::classify;
use gazette_core::element::{Candidate, Category, NodeKey};
use gazette_core::markup::{Edit, edits};
use kurbo::{Rect, Size, Vec2};

/// One element of the simulated document.
#[derive(Clone, Debug)]
pub struct SimElement {
    /// Identity handed to the controller.
    pub node: NodeKey,
    /// Current class list, including classes added by presentation.
    pub classes: BTreeSet<String>,
    /// Custom properties set by presentation.
    pub vars: BTreeMap<String, String>,
    rect: Rect,
    attached: bool,
}

impl SimElement {
    /// Bounds in document coordinates.
    #[must_use]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Whether the element is still in the document.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

/// The simulated document and viewport.
#[derive(Clone, Debug)]
pub struct SimPage {
    elements: Vec<SimElement>,
    viewport: Size,
    scroll_y: f64,
    next_key: u64,
}

impl SimPage {
    /// Creates an empty page scrolled to the top.
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            elements: Vec::new(),
            viewport,
            scroll_y: 0.0,
            next_key: 1,
        }
    }

    /// Appends an element to the end of the document.
    pub fn insert(&mut self, classes: &[&str], rect: Rect) -> NodeKey {
        let node = NodeKey(self.next_key);
        self.next_key += 1;
        self.elements.push(SimElement {
            node,
            classes: classes.iter().map(|c| (*c).to_owned()).collect(),
            vars: BTreeMap::new(),
            rect,
            attached: true,
        });
        node
    }

    /// Removes an element from layout. Its record stays for inspection.
    pub fn detach(&mut self, node: NodeKey) {
        if let Some(e) = self.element_mut(node) {
            e.attached = false;
        }
    }

    /// Moves an element to new document bounds.
    pub fn set_rect(&mut self, node: NodeKey, rect: Rect) {
        if let Some(e) = self.element_mut(node) {
            e.rect = rect;
        }
    }

    /// Current vertical scroll offset.
    #[must_use]
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Scrolls the viewport, clamped at the top of the document.
    pub fn set_scroll_y(&mut self, offset: f64) {
        self.scroll_y = offset.max(0.0);
    }

    /// Viewport size.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Looks up an element.
    #[must_use]
    pub fn element(&self, node: NodeKey) -> Option<&SimElement> {
        self.elements.iter().find(|e| e.node == node)
    }

    fn element_mut(&mut self, node: NodeKey) -> Option<&mut SimElement> {
        self.elements.iter_mut().find(|e| e.node == node)
    }

    /// Returns `true` if `node` currently carries `class`.
    #[must_use]
    pub fn has_class(&self, node: NodeKey, class: &str) -> bool {
        self.element(node).is_some_and(|e| e.classes.contains(class))
    }

    /// Returns a custom property of `node`.
    #[must_use]
    pub fn var(&self, node: NodeKey, name: &str) -> Option<&str> {
        self.element(node)?.vars.get(name).map(String::as_str)
    }

    /// Attached elements carrying `class`, in document order.
    #[must_use]
    pub fn nodes_with_class(&self, class: &str) -> Vec<NodeKey> {
        self.elements
            .iter()
            .filter(|e| e.attached && e.classes.contains(class))
            .map(|e| e.node)
            .collect()
    }

    /// Candidates for every attached element in `nodes`, or in the whole
    /// document when `nodes` is `None`.
    ///
    /// Ordinals count earlier attached elements of the same category, so
    /// grid and resource items alternate in document order.
    #[must_use]
    pub fn candidates(&self, nodes: Option<&[NodeKey]>) -> Vec<Candidate> {
        let mut seen = [0_u32; Category::ALL.len()];
        let mut out = Vec::new();
        for e in self.elements.iter().filter(|e| e.attached) {
            let Some(category) = classify(e.classes.iter().map(String::as_str)) else {
                continue;
            };
            let at = Category::ALL
                .iter()
                .position(|c| *c == category)
                .unwrap_or_default();
            let ordinal = seen[at];
            seen[at] += 1;
            if nodes.is_none_or(|n| n.contains(&e.node)) {
                out.push(Candidate::new(e.node, category).with_ordinal(ordinal));
            }
        }
        out
    }

    /// Whether `node` meets `threshold` inside the viewport shrunk by
    /// `bottom_inset`.
    ///
    /// Returns `None` for unknown or detached elements. Zero-area elements
    /// intersect when their origin lies inside the root.
    #[must_use]
    pub fn intersects(&self, node: NodeKey, threshold: f64, bottom_inset: f64) -> Option<bool> {
        let bounds = self.bounds(node)?;
        let root = Rect::new(
            0.0,
            0.0,
            self.viewport.width,
            (self.viewport.height - bottom_inset).max(0.0),
        );
        let area = bounds.area();
        if area <= 0.0 {
            return Some(root.contains(bounds.origin()));
        }
        let overlap = bounds.intersect(root).area();
        Some(overlap > 0.0 && overlap / area >= threshold)
    }
}

impl Layout for SimPage {
    fn bounds(&self, node: NodeKey) -> Option<Rect> {
        let e = self.element(node)?;
        e.attached.then(|| e.rect - Vec2::new(0.0, self.scroll_y))
    }

    fn viewport_height(&self) -> f64 {
        self.viewport.height
    }
}

impl Presenter for SimPage {
    fn apply(&mut self, changes: &Changes) {
        for (node, edit) in edits(changes) {
            let Some(e) = self.element_mut(node) else {
                continue;
            };
            match edit {
                Edit::AddClass(c) => {
                    e.classes.insert(c.to_owned());
                }
                Edit::RemoveClass(c) => {
                    e.classes.remove(c);
                }
                Edit::SetVar(name, value) => {
                    e.vars.insert(name.to_owned(), value);
                }
                Edit::ClearVar(name) => {
                    e.vars.remove(name);
                }
            }
        }
    }
}
