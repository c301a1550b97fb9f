// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `IntersectionObserver` adapter.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use gazette_core::backend::{IntersectionEntry, Observer};
use gazette_core::config::ControllerConfig;
use gazette_core::element::NodeKey;
use js_sys::{Array, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Window};

use crate::dom::{NodeMap, rect_from_xywh};

type EntriesClosure = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// [`Observer`] backed by one browser `IntersectionObserver`.
///
/// The root margin shrinks the viewport bottom by the configured inset, and
/// the threshold is the configured intersection ratio.
pub struct DomObserver {
    io: IntersectionObserver,
    nodes: Rc<RefCell<NodeMap>>,
    _callback: EntriesClosure,
}

impl core::fmt::Debug for DomObserver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomObserver")
            .field("io", &"IntersectionObserver")
            .finish_non_exhaustive()
    }
}

impl DomObserver {
    /// Creates an observer delivering entries to `on_entries`.
    ///
    /// Returns `None` when the browser has no `IntersectionObserver`, in
    /// which case the controller should run degraded.
    pub fn new(
        window: &Window,
        config: &ControllerConfig,
        nodes: Rc<RefCell<NodeMap>>,
        mut on_entries: impl FnMut(Vec<IntersectionEntry>) + 'static,
    ) -> Option<Self> {
        if !Reflect::has(window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false) {
            return None;
        }

        let map = Rc::clone(&nodes);
        let callback = Closure::wrap(Box::new(move |entries: Array, _: IntersectionObserver| {
            let converted = {
                let map = map.borrow();
                entries
                    .iter()
                    .filter_map(|e| e.dyn_into::<IntersectionObserverEntry>().ok())
                    .filter_map(|e| {
                        let node = map.key_of(&e.target())?;
                        let r = e.bounding_client_rect();
                        Some(IntersectionEntry {
                            node,
                            is_intersecting: e.is_intersecting(),
                            bounds: rect_from_xywh(r.x(), r.y(), r.width(), r.height()),
                        })
                    })
                    .collect::<Vec<_>>()
            };
            if !converted.is_empty() {
                on_entries(converted);
            }
        }) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(config.threshold));
        init.set_root_margin(&config.root_margin());
        let io =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .ok()?;

        Some(Self {
            io,
            nodes,
            _callback: callback,
        })
    }
}

impl Observer for DomObserver {
    fn observe(&mut self, node: NodeKey) {
        if let Some(el) = self.nodes.borrow().element(node) {
            self.io.observe(el);
        }
    }

    fn disconnect(&mut self) {
        self.io.disconnect();
    }
}
