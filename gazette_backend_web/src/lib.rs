// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for the Gazette visibility controller.
//!
//! This crate connects [`gazette_core`] to browser APIs:
//!
//! - [`ScrollAnimations`]: installs the controller on a page and owns every
//!   browser hook it needs
//! - [`DomObserver`]: `IntersectionObserver` adapter
//! - [`DomPresenter`]: class-list and custom-property edits
//! - [`MutationWatcher`]: structural fallback discovery
//! - [`ConsoleSink`]: trace output to the browser console
//! - [`announce`]: the notification render layers dispatch after inserting
//!   a batch

#![no_std]

extern crate alloc;

mod animations;
mod console;
mod dom;
mod observer;
mod presenter;
mod timer;
mod watcher;

pub use animations::ScrollAnimations;
pub use console::ConsoleSink;
pub use dom::{DomLayout, KEY_ATTRIBUTE, NodeMap};
pub use gazette_core::backend::Presenter;
pub use observer::DomObserver;
pub use presenter::DomPresenter;
pub use watcher::MutationWatcher;

use gazette_content::{BATCH_RENDERED_EVENT, BatchRendered};
use gazette_core::backend::RandomSource;
use gazette_core::time::HostTime;
use js_sys::{Object, Reflect};
use wasm_bindgen::JsValue;
use web_sys::{CustomEvent, CustomEventInit, Document};

/// Returns the current host time from `performance.now()`.
#[must_use]
pub fn now() -> HostTime {
    let ms = timer::performance_now();
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "performance.now() returns small positive f64; µs fits in u64"
    )]
    let us = (ms * 1000.0) as u64;
    HostTime(us)
}

/// [`RandomSource`] backed by `Math.random()`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MathRandom;

impl RandomSource for MathRandom {
    fn next_unit(&mut self) -> f64 {
        js_sys::Math::random()
    }
}

/// Dispatches `dynamicContentLoaded` on `document`.
///
/// The event detail is `{ type, count }`, where `type` is the backend table
/// the batch came from.
///
/// # Errors
///
/// Fails if the event cannot be constructed or dispatched.
pub fn announce(document: &Document, batch: &BatchRendered) -> Result<(), JsValue> {
    let detail = Object::new();
    Reflect::set(&detail, &"type".into(), &batch.kind.table().into())?;
    Reflect::set(&detail, &"count".into(), &JsValue::from(batch.count))?;

    let init = CustomEventInit::new();
    init.set_detail(&detail);
    let event = CustomEvent::new_with_event_init_dict(BATCH_RENDERED_EVENT, &init)?;
    document.dispatch_event(&event)?;
    Ok(())
}
