// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capability contract for host integrations.
//!
//! The controller is pure state. Everything it needs from the page comes in
//! through these traits, and everything it decides goes out as a
//! [`Changes`] batch:
//!
//! - **[`Observer`]**: the viewport-intersection mechanism. Its absence is
//!   modelled by constructing the controller without one, which makes the
//!   whole controller inert.
//! - **[`Layout`]**: read-only geometry: element bounds relative to the
//!   viewport and the viewport height.
//! - **[`RandomSource`]**: uniform samples for fly-away parameters.
//! - **[`Presenter`]**: applies a change batch to the presentation tree
//!   (CSS classes and custom properties on the web).
//! - **[`StructureWatcher`](crate::discovery::StructureWatcher)**: the
//!   fallback structural-change observer used for discovery.
//!
//! # Event loop pseudocode
//!
//! ```rust,ignore
//! fn on_scroll(offset: f64) {
//!     controller.on_scroll(offset, &layout, &mut rng, now());
//!     flush();
//! }
//!
//! fn on_intersections(entries: &[IntersectionEntry]) {
//!     controller.on_intersections(entries, now());
//!     flush();
//! }
//!
//! fn on_timer() {
//!     controller.advance(now());
//!     flush();
//! }
//!
//! fn flush() {
//!     let changes = controller.take_changes();
//!     presenter.apply(&changes);
//!     trace::emit(&changes, &mut tracer);
//!     if let Some(at) = controller.next_deadline() {
//!         arm_timer(at);
//!     }
//! }
//! ```

use kurbo::Rect;

use crate::changes::Changes;
use crate::element::NodeKey;

/// A viewport-intersection observation mechanism.
pub trait Observer {
    /// Starts delivering intersection entries for `node`.
    ///
    /// The controller calls this at most once per node per session.
    fn observe(&mut self, node: NodeKey);

    /// Stops all observation.
    fn disconnect(&mut self);
}

/// Read-only geometry of the page.
pub trait Layout {
    /// Returns the bounding box of `node` relative to the viewport's top-left
    /// corner, or `None` if the node is no longer in the document.
    fn bounds(&self, node: NodeKey) -> Option<Rect>;

    /// Returns the viewport height in logical pixels.
    fn viewport_height(&self) -> f64;
}

/// A source of uniform random samples.
pub trait RandomSource {
    /// Returns a sample uniformly distributed in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

/// Applies controller output to a presentation tree.
///
/// Both the DOM presenter and test doubles implement this trait.
pub trait Presenter {
    /// Applies every effect recorded in `changes`, in order.
    fn apply(&mut self, changes: &Changes);
}

/// One intersection observation for a tracked node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    /// The observed node.
    pub node: NodeKey,
    /// Whether the node currently intersects the (inset) viewport.
    pub is_intersecting: bool,
    /// The node's bounds at observation time, relative to the viewport.
    pub bounds: Rect,
}

/// A [`RandomSource`] backed by the `SplitMix64` generator.
///
/// Deterministic for a given seed, which makes fly-away parameters
/// reproducible in tests and recorded sessions.
#[derive(Clone, Debug)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    /// Creates a generator from a seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Returns the next raw 64-bit output.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

impl RandomSource for SplitMix64 {
    fn next_unit(&mut self) -> f64 {
        // Top 53 bits map exactly onto the f64 mantissa.
        (self.next_u64() >> 11) as f64 / (1_u64 << 53) as f64
    }
}

/// A [`RandomSource`] that replays a fixed list of samples, cycling.
///
/// Useful for pinning fly-away parameters in tests.
#[derive(Clone, Debug)]
pub struct ScriptedRandom<'a> {
    samples: &'a [f64],
    cursor: usize,
}

impl<'a> ScriptedRandom<'a> {
    /// Creates a source that yields `samples` in order, then starts over.
    ///
    /// # Panics
    ///
    /// Panics if `samples` is empty.
    #[must_use]
    pub fn new(samples: &'a [f64]) -> Self {
        assert!(!samples.is_empty(), "scripted random needs at least one sample");
        Self { samples, cursor: 0 }
    }
}

impl RandomSource for ScriptedRandom<'_> {
    fn next_unit(&mut self) -> f64 {
        let v = self.samples[self.cursor % self.samples.len()];
        self.cursor += 1;
        v
    }
}
