// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page-level wiring of the visibility controller.
//!
//! [`ScrollAnimations`] owns one controller and every browser hook that
//! feeds it: the intersection observer, a passive `scroll` listener, the
//! `dynamicContentLoaded` listener, the structural fallback watcher, and the
//! deadline timer. Each hook runs one controller call and then flushes the
//! drained changes to the presenter, the optional trace sink, and the timer.
//!
//! All hooks fire from browser tasks, never from inside another hook, so the
//! shared state's `RefCell`s are never borrowed re-entrantly.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;

use gazette_content::BATCH_RENDERED_EVENT;
use gazette_core::backend::{IntersectionEntry, Presenter as _};
use gazette_core::changes::RescanReport;
use gazette_core::config::ControllerConfig;
use gazette_core::controller::VisibilityController;
use gazette_core::discovery::{DiscoverySource, StructureWatcher as _};
use gazette_core::element::NodeKey;
use gazette_core::trace::{TraceSink, emit_to};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{AddEventListenerOptions, Document, Element, Event, Node, Window};

use crate::dom::{DomLayout, NodeMap, document_candidates, subtree_keys};
use crate::observer::DomObserver;
use crate::presenter::DomPresenter;
use crate::timer::DeadlineTimer;
use crate::watcher::MutationWatcher;
use crate::{MathRandom, now};

type EventClosure = Closure<dyn FnMut(Event)>;

struct Shared {
    document: Document,
    nodes: Rc<RefCell<NodeMap>>,
    controller: RefCell<VisibilityController<DomObserver>>,
    presenter: RefCell<DomPresenter>,
    layout: DomLayout,
    rng: RefCell<MathRandom>,
    sink: RefCell<Option<Box<dyn TraceSink>>>,
    watcher: RefCell<Option<MutationWatcher>>,
    timer: DeadlineTimer,
}

fn report(err: &JsValue) {
    web_sys::console::error_2(&JsValue::from_str("[gazette] discovery failed:"), err);
}

impl Shared {
    /// Presents, traces, and schedules whatever the last call produced.
    fn flush(&self) {
        let changes = self.controller.borrow_mut().take_changes();
        if !changes.is_empty() {
            self.presenter.borrow_mut().apply(&changes);
            if let Some(sink) = self.sink.borrow_mut().as_mut() {
                emit_to(&changes, sink.as_mut());
            }
        }
        match self.controller.borrow().next_deadline() {
            Some(at) => self.timer.arm(at, now()),
            None => self.timer.cancel(),
        }
    }

    fn discover(
        &self,
        source: DiscoverySource,
        only: Option<&[NodeKey]>,
    ) -> Result<RescanReport, JsValue> {
        let candidates = document_candidates(&self.document, &mut self.nodes.borrow_mut(), only)?;
        let report = self.controller.borrow_mut().rescan(source, candidates);
        self.flush();
        Ok(report)
    }

    fn on_intersections(&self, entries: &[IntersectionEntry]) {
        self.controller.borrow_mut().on_intersections(entries, now());
        self.flush();
    }

    fn on_scroll(&self) {
        let offset = self.layout.scroll_y();
        self.controller.borrow_mut().on_scroll(
            offset,
            &self.layout,
            &mut *self.rng.borrow_mut(),
            now(),
        );
        self.flush();
    }

    fn on_inserted(&self, inserted: &[Element]) {
        let keys: Vec<NodeKey> = {
            let mut nodes = self.nodes.borrow_mut();
            inserted
                .iter()
                .filter_map(|el| subtree_keys(el, &mut nodes).ok())
                .flatten()
                .collect()
        };
        if keys.is_empty() {
            return;
        }
        if let Err(err) = self.discover(DiscoverySource::Structural, Some(&keys)) {
            report(&err);
        }
    }

    fn on_deadline(&self) {
        self.timer.fired();
        self.controller.borrow_mut().advance(now());
        self.flush();
    }
}

/// The installed scroll-animation system of one page.
///
/// Dropping it tears everything down.
pub struct ScrollAnimations {
    shared: Rc<Shared>,
    window: Window,
    on_scroll: EventClosure,
    on_content: EventClosure,
    installed: bool,
}

impl core::fmt::Debug for ScrollAnimations {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollAnimations")
            .field("controller", &*self.shared.controller.borrow())
            .field("timer", &self.shared.timer)
            .field("installed", &self.installed)
            .finish_non_exhaustive()
    }
}

impl ScrollAnimations {
    /// Sets up the controller on the current page.
    ///
    /// Registers every candidate already in the document, starts the
    /// structural watcher, and listens for scrolling and rendered batches.
    /// Without `IntersectionObserver` support the system installs degraded:
    /// every hook is wired but nothing is ever animated.
    ///
    /// # Errors
    ///
    /// Fails when there is no window or document, or when a listener cannot
    /// be attached.
    pub fn install(
        config: ControllerConfig,
        sink: Option<Box<dyn TraceSink>>,
    ) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let target: Node = match document.body() {
            Some(body) => body.into(),
            None => document.clone().into(),
        };
        let nodes = Rc::new(RefCell::new(NodeMap::new()));

        let shared = Rc::new_cyclic(|weak: &Weak<Shared>| {
            let w = weak.clone();
            let observer = DomObserver::new(&window, &config, Rc::clone(&nodes), move |entries| {
                if let Some(s) = w.upgrade() {
                    s.on_intersections(&entries);
                }
            });
            let controller = VisibilityController::with_observer(config, observer);

            let watcher = if controller.is_degraded() {
                None
            } else {
                let w = weak.clone();
                MutationWatcher::new(target, move |inserted| {
                    if let Some(s) = w.upgrade() {
                        s.on_inserted(&inserted);
                    }
                })
                .ok()
            };

            let w = weak.clone();
            let timer = DeadlineTimer::new(move || {
                if let Some(s) = w.upgrade() {
                    s.on_deadline();
                }
            });

            Shared {
                document: document.clone(),
                nodes: Rc::clone(&nodes),
                controller: RefCell::new(controller),
                presenter: RefCell::new(DomPresenter::new(Rc::clone(&nodes))),
                layout: DomLayout::new(window.clone(), Rc::clone(&nodes)),
                rng: RefCell::new(MathRandom),
                sink: RefCell::new(sink),
                watcher: RefCell::new(watcher),
                timer,
            }
        });

        let candidates = document_candidates(&document, &mut nodes.borrow_mut(), None)?;
        shared.controller.borrow_mut().register_static(candidates);
        if let Some(watcher) = shared.watcher.borrow_mut().as_mut() {
            watcher.watch();
        }
        shared.flush();

        let w = Rc::downgrade(&shared);
        let on_scroll = Closure::wrap(Box::new(move |_: Event| {
            if let Some(s) = w.upgrade() {
                s.on_scroll();
            }
        }) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        window.add_event_listener_with_callback_and_add_event_listener_options(
            "scroll",
            on_scroll.as_ref().unchecked_ref(),
            &options,
        )?;

        let w = Rc::downgrade(&shared);
        let on_content = Closure::wrap(Box::new(move |_: Event| {
            if let Some(s) = w.upgrade()
                && let Err(err) = s.discover(DiscoverySource::Notification, None)
            {
                report(&err);
            }
        }) as Box<dyn FnMut(Event)>);
        document.add_event_listener_with_callback(
            BATCH_RENDERED_EVENT,
            on_content.as_ref().unchecked_ref(),
        )?;

        Ok(Self {
            shared,
            window,
            on_scroll,
            on_content,
            installed: true,
        })
    }

    /// Returns `true` if the browser lacks `IntersectionObserver`.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.shared.controller.borrow().is_degraded()
    }

    /// Number of tracked elements.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.shared.controller.borrow().len()
    }

    /// Scans the document for untracked candidates now.
    ///
    /// Render layers that cannot dispatch `dynamicContentLoaded` may call
    /// this directly after inserting content.
    ///
    /// # Errors
    ///
    /// Fails when the document query fails.
    pub fn rescan(&self) -> Result<RescanReport, JsValue> {
        self.shared.discover(DiscoverySource::Notification, None)
    }

    /// Replaces the trace sink.
    pub fn set_sink(&self, sink: Option<Box<dyn TraceSink>>) {
        *self.shared.sink.borrow_mut() = sink;
    }

    /// Removes every listener and observer and forgets all tracked elements.
    ///
    /// Elements keep the classes they currently carry. Calling this twice
    /// is a no-op.
    pub fn teardown(&mut self) {
        if !self.installed {
            return;
        }
        self.installed = false;
        let _ = self
            .window
            .remove_event_listener_with_callback("scroll", self.on_scroll.as_ref().unchecked_ref());
        let _ = self.shared.document.remove_event_listener_with_callback(
            BATCH_RENDERED_EVENT,
            self.on_content.as_ref().unchecked_ref(),
        );
        if let Some(watcher) = self.shared.watcher.borrow_mut().as_mut() {
            watcher.disconnect();
        }
        self.shared.controller.borrow_mut().teardown();
        self.shared.timer.cancel();
        self.shared.nodes.borrow_mut().clear();
    }
}

impl Drop for ScrollAnimations {
    fn drop(&mut self) {
        self.teardown();
    }
}
