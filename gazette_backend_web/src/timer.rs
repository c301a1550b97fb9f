// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-shot deadline timer over `setTimeout`.
//!
//! The controller exposes its next flight deadline; [`DeadlineTimer`] keeps
//! exactly one `setTimeout` armed for it and re-arms only when the deadline
//! changes.

use alloc::boxed::Box;
use core::cell::{Cell, RefCell};

use gazette_core::time::HostTime;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "setTimeout")]
    fn set_timeout(callback: &JsValue, ms: i32) -> i32;

    #[wasm_bindgen(js_name = "clearTimeout")]
    fn clear_timeout(id: i32);
}

/// Whole milliseconds to wait from `now` until `at`, rounded up.
pub(crate) fn timeout_ms(at: HostTime, now: HostTime) -> i32 {
    let micros = at.saturating_duration_since(now).micros();
    i32::try_from(micros.div_ceil(1000)).unwrap_or(i32::MAX)
}

pub(crate) struct DeadlineTimer {
    closure: RefCell<Option<Closure<dyn FnMut()>>>,
    armed: Cell<Option<(HostTime, i32)>>,
}

impl core::fmt::Debug for DeadlineTimer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DeadlineTimer")
            .field("armed_for", &self.armed.get().map(|(at, _)| at))
            .finish()
    }
}

impl DeadlineTimer {
    /// Creates a timer that calls `on_fire` when an armed deadline passes.
    pub(crate) fn new(on_fire: impl FnMut() + 'static) -> Self {
        Self {
            closure: RefCell::new(Some(Closure::wrap(
                Box::new(on_fire) as Box<dyn FnMut()>
            ))),
            armed: Cell::new(None),
        }
    }

    /// Arms the timer for `at`, replacing any other deadline.
    pub(crate) fn arm(&self, at: HostTime, now: HostTime) {
        if self.armed.get().is_some_and(|(armed_at, _)| armed_at == at) {
            return;
        }
        self.cancel();
        if let Some(ref closure) = *self.closure.borrow() {
            let id = set_timeout(closure.as_ref().unchecked_ref(), timeout_ms(at, now));
            self.armed.set(Some((at, id)));
        }
    }

    /// Marks the armed deadline as fired without clearing it.
    pub(crate) fn fired(&self) {
        self.armed.set(None);
    }

    /// Cancels the armed deadline, if any.
    pub(crate) fn cancel(&self) {
        if let Some((_, id)) = self.armed.take() {
            clear_timeout(id);
        }
    }
}

impl Drop for DeadlineTimer {
    fn drop(&mut self) {
        self.cancel();
        self.closure.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_rounds_up() {
        assert_eq!(timeout_ms(HostTime(2_500), HostTime(1_000)), 2);
        assert_eq!(timeout_ms(HostTime(3_000), HostTime(1_000)), 2);
        assert_eq!(timeout_ms(HostTime(1_000), HostTime(1_000)), 0);
    }

    #[test]
    fn past_deadlines_fire_immediately() {
        assert_eq!(timeout_ms(HostTime(0), HostTime(5_000)), 0);
    }
}
