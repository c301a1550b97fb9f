// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Times are
//! printed in milliseconds.

use std::io::Write;

use gazette_core::changes::{DramaticStart, FlightStart, Registered, RescanReport, Transition};
use gazette_core::discovery::DiscoverySource;
use gazette_core::element::{HorizontalDirection, Visibility};
use gazette_core::scroll::ScrollDirection;
use gazette_core::time::HostTime;
use gazette_core::trace::TraceSink;

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn ms(t: HostTime) -> f64 {
    t.as_millis_f64()
}

pub(crate) fn visibility_name(v: Visibility) -> &'static str {
    match v {
        Visibility::Hidden => "hidden",
        Visibility::Visible => "visible",
        Visibility::FlyingAway => "flying-away",
    }
}

pub(crate) fn source_name(s: DiscoverySource) -> &'static str {
    match s {
        DiscoverySource::Static => "static",
        DiscoverySource::Notification => "notification",
        DiscoverySource::Structural => "structural",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_registered(&mut self, e: &Registered) {
        let _ = writeln!(
            self.writer,
            "[register] node={} slot={} entrance={} via={}",
            e.node.0,
            e.id.index(),
            e.entrance.class_name(),
            source_name(e.source),
        );
    }

    fn on_transition(&mut self, e: &Transition) {
        let _ = writeln!(
            self.writer,
            "[state] node={} {} -> {} at {:.1}ms",
            e.node.0,
            visibility_name(e.from),
            visibility_name(e.to),
            ms(e.at),
        );
    }

    fn on_direction_change(&mut self, direction: ScrollDirection, at: HostTime) {
        let dir = match direction {
            ScrollDirection::Up => "up",
            ScrollDirection::Down => "down",
        };
        let _ = writeln!(self.writer, "[scroll] direction={dir} at {:.1}ms", ms(at));
    }

    fn on_flight(&mut self, e: &FlightStart) {
        let side = match e.params.direction {
            HorizontalDirection::Left => "left",
            HorizontalDirection::Right => "right",
        };
        let _ = writeln!(
            self.writer,
            "[fly] node={} {side} {:.0}px {:+.1}deg dramatic={:.1}ms landed={:.1}ms",
            e.node.0,
            e.params.distance,
            e.params.rotation_deg,
            ms(e.dramatic_at),
            ms(e.landed_at),
        );
    }

    fn on_dramatic(&mut self, e: &DramaticStart) {
        let _ = writeln!(
            self.writer,
            "[dramatic] node={} at {:.1}ms",
            e.node.0,
            ms(e.at),
        );
    }

    fn on_rescan(&mut self, e: &RescanReport) {
        let _ = writeln!(
            self.writer,
            "[rescan] via={} discovered={} already={}",
            source_name(e.source),
            e.discovered,
            e.already_tracked,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gazette_core::element::{ElementId, NodeKey};

    #[test]
    fn pretty_print_transition() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_transition(&Transition {
            id: ElementId::from_raw(0, 0),
            node: NodeKey(42),
            from: Visibility::Visible,
            to: Visibility::FlyingAway,
            at: HostTime::from_millis(12),
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(output, "[state] node=42 visible -> flying-away at 12.0ms\n");
    }

    #[test]
    fn pretty_print_rescan() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_rescan(&RescanReport {
            source: DiscoverySource::Structural,
            discovered: 3,
            already_tracked: 1,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("via=structural"), "got: {output}");
        assert!(output.contains("discovered=3"), "got: {output}");
    }
}
