// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM presentation.
//!
//! Applies [`Changes`] batches to tracked elements as class-list and
//! custom-property edits. The stylesheet supplies the actual motion.

use alloc::rc::Rc;
use core::cell::RefCell;

use gazette_core::backend::Presenter;
use gazette_core::changes::Changes;
use gazette_core::markup::{Edit, edits};
use wasm_bindgen::JsCast as _;
use web_sys::{Element, HtmlElement};

use crate::dom::NodeMap;

/// Presents controller output on live elements.
pub struct DomPresenter {
    nodes: Rc<RefCell<NodeMap>>,
}

impl core::fmt::Debug for DomPresenter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomPresenter").finish_non_exhaustive()
    }
}

impl DomPresenter {
    /// Creates a presenter resolving nodes through `nodes`.
    #[must_use]
    pub fn new(nodes: Rc<RefCell<NodeMap>>) -> Self {
        Self { nodes }
    }
}

fn apply_edit(el: &Element, edit: &Edit) {
    match edit {
        Edit::AddClass(c) => {
            let _ = el.class_list().add_1(c);
        }
        Edit::RemoveClass(c) => {
            let _ = el.class_list().remove_1(c);
        }
        Edit::SetVar(name, value) => {
            if let Some(html) = el.dyn_ref::<HtmlElement>() {
                let _ = html.style().set_property(name, value);
            }
        }
        Edit::ClearVar(name) => {
            if let Some(html) = el.dyn_ref::<HtmlElement>() {
                let _ = html.style().remove_property(name);
            }
        }
    }
}

impl Presenter for DomPresenter {
    fn apply(&mut self, changes: &Changes) {
        let nodes = self.nodes.borrow();
        for (node, edit) in edits(changes) {
            // Nodes removed from the map since the batch was recorded.
            let Some(el) = nodes.element(node) else {
                continue;
            };
            apply_edit(el, &edit);
        }
    }
}
