// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing for controller activity.
//!
//! [`TraceSink`] has one method per kind of controller effect, each with a
//! no-op default. [`Tracer`] wraps an optional `&mut dyn TraceSink`; with the
//! `trace` feature **off** every `Tracer` method compiles to nothing.
//!
//! The controller itself never calls a sink. Hosts replay each drained
//! [`Changes`] batch through [`emit`], so tracing sees exactly what the
//! presenter sees.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use crate::changes::{Changes, DramaticStart, FlightStart, Registered, RescanReport, Transition};
use crate::scroll::ScrollDirection;
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives controller trace events.
///
/// All methods have default no-op implementations.
pub trait TraceSink {
    /// Called when a node starts being tracked.
    fn on_registered(&mut self, e: &Registered) {
        _ = e;
    }

    /// Called for every state transition.
    fn on_transition(&mut self, e: &Transition) {
        _ = e;
    }

    /// Called when the scroll direction flips.
    fn on_direction_change(&mut self, direction: ScrollDirection, at: HostTime) {
        _ = (direction, at);
    }

    /// Called when a fly-away starts.
    fn on_flight(&mut self, e: &FlightStart) {
        _ = e;
    }

    /// Called when a flight's dramatic phase starts.
    fn on_dramatic(&mut self, e: &DramaticStart) {
        _ = e;
    }

    /// Called after each discovery pass.
    fn on_rescan(&mut self, e: &RescanReport) {
        _ = e;
    }
}

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

macro_rules! dispatch {
    ($self:ident, $method:ident ( $($arg:expr),* )) => {{
        #[cfg(feature = "trace")]
        if let Some(s) = &mut $self.sink {
            s.$method($($arg),*);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = ($($arg),*);
        }
    }};
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`Registered`] event.
    #[inline]
    pub fn registered(&mut self, e: &Registered) {
        dispatch!(self, on_registered(e));
    }

    /// Emits a [`Transition`] event.
    #[inline]
    pub fn transition(&mut self, e: &Transition) {
        dispatch!(self, on_transition(e));
    }

    /// Emits a direction change.
    #[inline]
    pub fn direction_change(&mut self, direction: ScrollDirection, at: HostTime) {
        dispatch!(self, on_direction_change(direction, at));
    }

    /// Emits a [`FlightStart`] event.
    #[inline]
    pub fn flight(&mut self, e: &FlightStart) {
        dispatch!(self, on_flight(e));
    }

    /// Emits a [`DramaticStart`] event.
    #[inline]
    pub fn dramatic(&mut self, e: &DramaticStart) {
        dispatch!(self, on_dramatic(e));
    }

    /// Emits a [`RescanReport`] event.
    #[inline]
    pub fn rescan(&mut self, e: &RescanReport) {
        dispatch!(self, on_rescan(e));
    }
}

/// Replays a change batch as trace events.
///
/// Order: rescans, registrations, direction changes, flights, transitions,
/// dramatic starts.
pub fn emit(changes: &Changes, tracer: &mut Tracer<'_>) {
    for e in &changes.rescans {
        tracer.rescan(e);
    }
    for e in &changes.registered {
        tracer.registered(e);
    }
    for &(direction, at) in &changes.direction_changes {
        tracer.direction_change(direction, at);
    }
    for e in &changes.flights {
        tracer.flight(e);
    }
    for e in &changes.transitions {
        tracer.transition(e);
    }
    for e in &changes.dramatic {
        tracer.dramatic(e);
    }
}

/// Replays a change batch directly into a sink, bypassing [`Tracer`].
///
/// Unlike [`emit`], this works without the `trace` feature.
pub fn emit_to(changes: &Changes, sink: &mut dyn TraceSink) {
    for e in &changes.rescans {
        sink.on_rescan(e);
    }
    for e in &changes.registered {
        sink.on_registered(e);
    }
    for &(direction, at) in &changes.direction_changes {
        sink.on_direction_change(direction, at);
    }
    for e in &changes.flights {
        sink.on_flight(e);
    }
    for e in &changes.transitions {
        sink.on_transition(e);
    }
    for e in &changes.dramatic {
        sink.on_dramatic(e);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::DiscoverySource;
    use crate::element::{ElementId, Entrance, NodeKey, Visibility};
    use alloc::vec;
    use alloc::vec::Vec;

    #[derive(Default)]
    struct Log {
        lines: Vec<&'static str>,
    }

    impl TraceSink for Log {
        fn on_registered(&mut self, _: &Registered) {
            self.lines.push("registered");
        }
        fn on_transition(&mut self, _: &Transition) {
            self.lines.push("transition");
        }
        fn on_direction_change(&mut self, _: ScrollDirection, _: HostTime) {
            self.lines.push("direction");
        }
        fn on_rescan(&mut self, _: &RescanReport) {
            self.lines.push("rescan");
        }
    }

    fn sample() -> Changes {
        let id = ElementId {
            idx: 0,
            generation: 0,
        };
        Changes {
            registered: vec![Registered {
                id,
                node: NodeKey(1),
                entrance: Entrance::Fade,
                source: DiscoverySource::Static,
            }],
            transitions: vec![Transition {
                id,
                node: NodeKey(1),
                from: Visibility::Hidden,
                to: Visibility::Visible,
                at: HostTime(5),
            }],
            direction_changes: vec![(ScrollDirection::Up, HostTime(9))],
            rescans: vec![RescanReport::default()],
            ..Changes::default()
        }
    }

    #[test]
    fn emit_to_replays_in_order() {
        let mut log = Log::default();
        emit_to(&sample(), &mut log);
        assert_eq!(log.lines, ["rescan", "registered", "direction", "transition"]);
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        emit(&sample(), &mut tracer);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        let mut log = Log::default();
        let mut tracer = Tracer::new(&mut log);
        emit(&sample(), &mut tracer);
        drop(tracer);
        assert_eq!(log.lines.len(), 4);
    }
}
