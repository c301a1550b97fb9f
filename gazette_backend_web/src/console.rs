// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser console trace output.

use alloc::format;
use alloc::string::String;

use gazette_core::changes::{DramaticStart, FlightStart, Registered, RescanReport, Transition};
use gazette_core::scroll::ScrollDirection;
use gazette_core::time::HostTime;
use gazette_core::trace::TraceSink;
use wasm_bindgen::JsValue;

/// A [`TraceSink`] that logs one `console.log` line per event.
///
/// Registrations are only logged when `verbose` is set; a page with a long
/// calendar would otherwise flood the console on load.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink {
    /// Also log every registration.
    pub verbose: bool,
}

impl ConsoleSink {
    /// Creates a sink that skips per-node registration lines.
    #[must_use]
    pub const fn new() -> Self {
        Self { verbose: false }
    }
}

fn log(line: &str) {
    web_sys::console::log_1(&JsValue::from_str(line));
}

fn registered_line(e: &Registered) -> String {
    format!(
        "[gazette] node {} tracked as {} ({:?})",
        e.node.0,
        e.entrance.class_name(),
        e.source
    )
}

fn transition_line(e: &Transition) -> String {
    format!(
        "[gazette] node {} {:?} -> {:?} at {:.1}ms",
        e.node.0,
        e.from,
        e.to,
        e.at.as_millis_f64()
    )
}

fn flight_line(e: &FlightStart) -> String {
    format!(
        "[gazette] node {} flies {:.1}px, {:.1}deg, lands at {:.1}ms",
        e.node.0,
        e.params.offset_x(),
        e.params.rotation_deg,
        e.landed_at.as_millis_f64()
    )
}

fn rescan_line(e: &RescanReport) -> String {
    format!(
        "[gazette] {:?} scan: {} new, {} already tracked",
        e.source, e.discovered, e.already_tracked
    )
}

impl TraceSink for ConsoleSink {
    fn on_registered(&mut self, e: &Registered) {
        if self.verbose {
            log(&registered_line(e));
        }
    }

    fn on_transition(&mut self, e: &Transition) {
        log(&transition_line(e));
    }

    fn on_direction_change(&mut self, direction: ScrollDirection, at: HostTime) {
        log(&format!(
            "[gazette] scrolling {direction:?} at {:.1}ms",
            at.as_millis_f64()
        ));
    }

    fn on_flight(&mut self, e: &FlightStart) {
        log(&flight_line(e));
    }

    fn on_dramatic(&mut self, e: &DramaticStart) {
        log(&format!("[gazette] node {} dramatic", e.node.0));
    }

    fn on_rescan(&mut self, e: &RescanReport) {
        log(&rescan_line(e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gazette_core::discovery::DiscoverySource;
    use gazette_core::element::{ElementId, FlyAway, HorizontalDirection, NodeKey, Visibility};

    #[test]
    fn transition_lines_name_both_states() {
        let line = transition_line(&Transition {
            id: ElementId::from_raw(0, 0),
            node: NodeKey(4),
            from: Visibility::Hidden,
            to: Visibility::Visible,
            at: HostTime(2_500),
        });
        assert_eq!(line, "[gazette] node 4 Hidden -> Visible at 2.5ms");
    }

    #[test]
    fn flight_lines_use_signed_offset() {
        let line = flight_line(&FlightStart {
            id: ElementId::from_raw(1, 0),
            node: NodeKey(9),
            params: FlyAway {
                direction: HorizontalDirection::Left,
                distance: 120.0,
                rotation_deg: -4.0,
            },
            dramatic_at: HostTime(0),
            landed_at: HostTime(950_000),
        });
        assert!(line.contains("-120.0px"), "unexpected line: {line}");
        assert!(line.ends_with("lands at 950.0ms"), "unexpected line: {line}");
    }

    #[test]
    fn rescan_lines_count_both_outcomes() {
        let line = rescan_line(&RescanReport {
            source: DiscoverySource::Structural,
            discovered: 3,
            already_tracked: 1,
        });
        assert_eq!(line, "[gazette] Structural scan: 3 new, 1 already tracked");
    }
}
