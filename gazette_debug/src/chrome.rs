// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//! Each tracked node gets its own track (`tid` = node key).
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use gazette_core::element::HorizontalDirection;
use gazette_core::scroll::ScrollDirection;
use gazette_core::time::HostTime;

use crate::pretty::{source_name, visibility_name};
use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Registrations and rescans carry no timestamp of their own; they are
/// placed at the latest time seen so far in the recording.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut clock = HostTime(0);

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::Registered(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Register",
                    "cat": "Discovery",
                    "ts": clock.micros(),
                    "pid": 0,
                    "tid": e.node.0,
                    "s": "t",
                    "args": {
                        "slot": e.id.index(),
                        "entrance": e.entrance.class_name(),
                        "source": source_name(e.source),
                    }
                }));
            }
            RecordedEvent::Transition(e) => {
                clock = clock.max(e.at);
                events.push(json!({
                    "ph": "i",
                    "name": visibility_name(e.to),
                    "cat": "State",
                    "ts": e.at.micros(),
                    "pid": 0,
                    "tid": e.node.0,
                    "s": "t",
                    "args": {
                        "from": visibility_name(e.from),
                    }
                }));
            }
            RecordedEvent::DirectionChange { direction, at } => {
                clock = clock.max(at);
                let name = match direction {
                    ScrollDirection::Up => "ScrollUp",
                    ScrollDirection::Down => "ScrollDown",
                };
                events.push(json!({
                    "ph": "i",
                    "name": name,
                    "cat": "Scroll",
                    "ts": at.micros(),
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                }));
            }
            RecordedEvent::Flight(e) => {
                let side = match e.params.direction {
                    HorizontalDirection::Left => "left",
                    HorizontalDirection::Right => "right",
                };
                events.push(json!({
                    "ph": "X",
                    "name": "FlyAway",
                    "cat": "Flight",
                    "ts": e.dramatic_at.micros(),
                    "dur": e.landed_at.saturating_duration_since(e.dramatic_at).micros(),
                    "pid": 0,
                    "tid": e.node.0,
                    "args": {
                        "direction": side,
                        "distance": e.params.distance,
                        "rotation_deg": e.params.rotation_deg,
                    }
                }));
            }
            RecordedEvent::Dramatic(e) => {
                clock = clock.max(e.at);
                events.push(json!({
                    "ph": "i",
                    "name": "Dramatic",
                    "cat": "Flight",
                    "ts": e.at.micros(),
                    "pid": 0,
                    "tid": e.node.0,
                    "s": "t",
                }));
            }
            RecordedEvent::Rescan(r) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Rescan",
                    "cat": "Discovery",
                    "ts": clock.micros(),
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "source": source_name(r.source),
                        "discovered": r.discovered,
                        "already_tracked": r.already_tracked,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use gazette_core::changes::{FlightStart, Registered, Transition};
    use gazette_core::discovery::DiscoverySource;
    use gazette_core::element::{ElementId, Entrance, FlyAway, NodeKey, Visibility};
    use gazette_core::trace::TraceSink;

    #[test]
    fn export_produces_valid_json() {
        let id = ElementId::from_raw(0, 0);
        let mut rec = RecorderSink::new();
        rec.on_transition(&Transition {
            id,
            node: NodeKey(7),
            from: Visibility::Hidden,
            to: Visibility::Visible,
            at: HostTime(1_000),
        });
        rec.on_registered(&Registered {
            id,
            node: NodeKey(8),
            entrance: Entrance::Fade,
            source: DiscoverySource::Notification,
        });
        rec.on_flight(&FlightStart {
            id,
            node: NodeKey(7),
            params: FlyAway {
                direction: HorizontalDirection::Right,
                distance: 90.0,
                rotation_deg: 4.0,
            },
            dramatic_at: HostTime(2_000),
            landed_at: HostTime(802_000),
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0]["name"], "visible");
        assert_eq!(parsed[0]["tid"], 7);

        // Untimed events sit at the latest time seen.
        assert_eq!(parsed[1]["name"], "Register");
        assert_eq!(parsed[1]["ts"], 1_000);

        assert_eq!(parsed[2]["ph"], "X");
        assert_eq!(parsed[2]["dur"], 800_000);
        assert_eq!(parsed[2]["args"]["direction"], "right");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
