// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node identity, geometry, and candidate collection.
//!
//! [`NodeMap`] gives each tracked element a [`NodeKey`], stamped on the
//! element as a `data-gazette-key` attribute so identity survives lookups
//! through fresh JS wrappers. [`DomLayout`] answers the controller's
//! geometry queries from `getBoundingClientRect()`.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;

use gazette_core::backend::Layout;
use gazette_core::discovery::{STATIC_SELECTOR, TRACKABLE_SELECTOR, classify};
use gazette_core::element::{Candidate, Category, NodeKey};
use kurbo::Rect;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{Document, Element, NodeList, Window};

/// Attribute carrying an element's [`NodeKey`].
pub const KEY_ATTRIBUTE: &str = "data-gazette-key";

/// Maps [`NodeKey`]s to live elements.
#[derive(Debug, Default)]
pub struct NodeMap {
    elements: BTreeMap<NodeKey, Element>,
    next: u64,
}

impl NodeMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the key stamped on `el`, if it belongs to this map.
    #[must_use]
    pub fn key_of(&self, el: &Element) -> Option<NodeKey> {
        let key = parse_key(&el.get_attribute(KEY_ATTRIBUTE)?)?;
        self.elements.contains_key(&key).then_some(key)
    }

    /// Returns the key for `el`, assigning one on first sight.
    pub fn key_for(&mut self, el: &Element) -> NodeKey {
        if let Some(key) = self.key_of(el) {
            return key;
        }
        let key = NodeKey(self.next);
        self.next += 1;
        let _ = el.set_attribute(KEY_ATTRIBUTE, &key.0.to_string());
        self.elements.insert(key, el.clone());
        key
    }

    /// Returns the element for `key`.
    #[must_use]
    pub fn element(&self, key: NodeKey) -> Option<&Element> {
        self.elements.get(&key)
    }

    /// Forgets every element and removes the key attributes.
    pub fn clear(&mut self) {
        for el in self.elements.values() {
            let _ = el.remove_attribute(KEY_ATTRIBUTE);
        }
        self.elements.clear();
    }
}

/// Parses a [`KEY_ATTRIBUTE`] value.
pub(crate) fn parse_key(value: &str) -> Option<NodeKey> {
    value.trim().parse().ok().map(NodeKey)
}

/// Converts DOM rectangle components to a [`Rect`].
pub(crate) fn rect_from_xywh(x: f64, y: f64, width: f64, height: f64) -> Rect {
    Rect::new(x, y, x + width, y + height)
}

/// [`Layout`] backed by the live document.
pub struct DomLayout {
    window: Window,
    nodes: Rc<RefCell<NodeMap>>,
}

impl core::fmt::Debug for DomLayout {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomLayout").finish_non_exhaustive()
    }
}

impl DomLayout {
    /// Creates a layout reading from `window`.
    #[must_use]
    pub fn new(window: Window, nodes: Rc<RefCell<NodeMap>>) -> Self {
        Self { window, nodes }
    }

    /// Current vertical scroll offset.
    #[must_use]
    pub fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }
}

impl Layout for DomLayout {
    fn bounds(&self, node: NodeKey) -> Option<Rect> {
        let nodes = self.nodes.borrow();
        let el = nodes.element(node)?;
        if !el.is_connected() {
            return None;
        }
        let r = el.get_bounding_client_rect();
        Some(rect_from_xywh(r.x(), r.y(), r.width(), r.height()))
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0)
    }
}

/// Selector for every element that may become a candidate.
pub(crate) fn candidate_selector() -> String {
    format!("{TRACKABLE_SELECTOR}, {STATIC_SELECTOR}")
}

fn elements(list: &NodeList) -> impl Iterator<Item = Element> + '_ {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
}

/// Collects candidates from the whole document, in document order.
///
/// Ordinals count earlier elements of the same category. With `only`
/// set, the result is restricted to those keys (ordinals still count the
/// whole document).
pub(crate) fn document_candidates(
    document: &Document,
    nodes: &mut NodeMap,
    only: Option<&[NodeKey]>,
) -> Result<Vec<Candidate>, JsValue> {
    let list = document.query_selector_all(&candidate_selector())?;
    let mut seen = [0_u32; Category::ALL.len()];
    let mut out = Vec::new();
    for el in elements(&list) {
        let class_name = el.class_name();
        let Some(category) = classify(class_name.split_ascii_whitespace()) else {
            continue;
        };
        let at = Category::ALL
            .iter()
            .position(|c| *c == category)
            .unwrap_or_default();
        let ordinal = seen[at];
        seen[at] += 1;
        let key = nodes.key_for(&el);
        if only.is_none_or(|keys| keys.contains(&key)) {
            out.push(Candidate::new(key, category).with_ordinal(ordinal));
        }
    }
    Ok(out)
}

/// Keys for `root` and every trackable descendant of it.
pub(crate) fn subtree_keys(root: &Element, nodes: &mut NodeMap) -> Result<Vec<NodeKey>, JsValue> {
    let mut keys = Vec::new();
    if root.matches(TRACKABLE_SELECTOR)? {
        keys.push(nodes.key_for(root));
    }
    let list = root.query_selector_all(TRACKABLE_SELECTOR)?;
    keys.extend(elements(&list).map(|el| nodes.key_for(&el)));
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_parse() {
        assert_eq!(parse_key("17"), Some(NodeKey(17)));
        assert_eq!(parse_key(" 3 "), Some(NodeKey(3)));
        assert_eq!(parse_key("x"), None);
        assert_eq!(parse_key("-1"), None);
    }

    #[test]
    fn rect_conversion() {
        assert_eq!(
            rect_from_xywh(10.0, -20.0, 100.0, 50.0),
            Rect::new(10.0, -20.0, 110.0, 30.0)
        );
    }

    #[test]
    fn selector_covers_roles_and_markers() {
        let s = candidate_selector();
        for class in [".grid-item", ".resource-item", ".calendar-item", ".section", ".fade-in-up"] {
            assert!(s.contains(class), "missing {class} in {s}");
        }
    }
}
