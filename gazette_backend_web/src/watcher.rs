// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `MutationObserver` fallback discovery.

use alloc::boxed::Box;
use alloc::vec::Vec;

use gazette_core::discovery::StructureWatcher;
use js_sys::Array;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use web_sys::{Element, MutationObserver, MutationObserverInit, MutationRecord, Node};

type RecordsClosure = Closure<dyn FnMut(Array, MutationObserver)>;

/// Watches a subtree for inserted elements.
///
/// Each callback hands the inserted element roots, in record order, to the
/// closure given at construction.
pub struct MutationWatcher {
    target: Node,
    observer: MutationObserver,
    watching: bool,
    _callback: RecordsClosure,
}

impl core::fmt::Debug for MutationWatcher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MutationWatcher")
            .field("watching", &self.watching)
            .finish_non_exhaustive()
    }
}

impl MutationWatcher {
    /// Creates a watcher for `target` that is not yet watching.
    pub fn new(
        target: Node,
        mut on_inserted: impl FnMut(Vec<Element>) + 'static,
    ) -> Result<Self, wasm_bindgen::JsValue> {
        let callback = Closure::wrap(Box::new(move |records: Array, _: MutationObserver| {
            let mut inserted = Vec::new();
            for record in records.iter().filter_map(|r| r.dyn_into::<MutationRecord>().ok()) {
                let added = record.added_nodes();
                inserted.extend(
                    (0..added.length())
                        .filter_map(|i| added.get(i))
                        .filter_map(|n| n.dyn_into::<Element>().ok()),
                );
            }
            if !inserted.is_empty() {
                on_inserted(inserted);
            }
        }) as Box<dyn FnMut(Array, MutationObserver)>);
        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target,
            observer,
            watching: false,
            _callback: callback,
        })
    }

    /// Returns `true` between [`watch`](StructureWatcher::watch) and
    /// [`disconnect`](StructureWatcher::disconnect).
    #[must_use]
    pub fn is_watching(&self) -> bool {
        self.watching
    }
}

impl StructureWatcher for MutationWatcher {
    fn watch(&mut self) {
        if self.watching {
            return;
        }
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        self.watching = self
            .observer
            .observe_with_options(&self.target, &init)
            .is_ok();
    }

    fn disconnect(&mut self) {
        self.observer.disconnect();
        self.watching = false;
    }
}
