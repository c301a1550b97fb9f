// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].

use gazette_core::changes::{DramaticStart, FlightStart, Registered, RescanReport, Transition};
use gazette_core::discovery::DiscoverySource;
use gazette_core::element::{ElementId, Entrance, FlyAway, HorizontalDirection, NodeKey, Visibility};
use gazette_core::scroll::ScrollDirection;
use gazette_core::time::HostTime;
use gazette_core::trace::TraceSink;

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_REGISTERED: u8 = 1;
const TAG_TRANSITION: u8 = 2;
const TAG_DIRECTION: u8 = 3;
const TAG_FLIGHT: u8 = 4;
const TAG_DRAMATIC: u8 = 5;
const TAG_RESCAN: u8 = 6;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_element(&mut self, id: ElementId, node: NodeKey) {
        self.write_u32(id.index());
        self.write_u32(id.generation());
        self.write_u64(node.0);
    }

    fn write_visibility(&mut self, v: Visibility) {
        self.write_u8(match v {
            Visibility::Hidden => 0,
            Visibility::Visible => 1,
            Visibility::FlyingAway => 2,
        });
    }

    fn write_source(&mut self, s: DiscoverySource) {
        self.write_u8(match s {
            DiscoverySource::Static => 0,
            DiscoverySource::Notification => 1,
            DiscoverySource::Structural => 2,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_registered(&mut self, e: &Registered) {
        self.write_u8(TAG_REGISTERED);
        self.write_element(e.id, e.node);
        self.write_u8(match e.entrance {
            Entrance::FromLeft => 0,
            Entrance::FromRight => 1,
            Entrance::Fade => 2,
            Entrance::FromBelow => 3,
        });
        self.write_source(e.source);
    }

    fn on_transition(&mut self, e: &Transition) {
        self.write_u8(TAG_TRANSITION);
        self.write_element(e.id, e.node);
        self.write_visibility(e.from);
        self.write_visibility(e.to);
        self.write_u64(e.at.micros());
    }

    fn on_direction_change(&mut self, direction: ScrollDirection, at: HostTime) {
        self.write_u8(TAG_DIRECTION);
        self.write_u8(match direction {
            ScrollDirection::Up => 0,
            ScrollDirection::Down => 1,
        });
        self.write_u64(at.micros());
    }

    fn on_flight(&mut self, e: &FlightStart) {
        self.write_u8(TAG_FLIGHT);
        self.write_element(e.id, e.node);
        self.write_u8(match e.params.direction {
            HorizontalDirection::Left => 0,
            HorizontalDirection::Right => 1,
        });
        self.write_f64(e.params.distance);
        self.write_f64(e.params.rotation_deg);
        self.write_u64(e.dramatic_at.micros());
        self.write_u64(e.landed_at.micros());
    }

    fn on_dramatic(&mut self, e: &DramaticStart) {
        self.write_u8(TAG_DRAMATIC);
        self.write_element(e.id, e.node);
        self.write_u64(e.at.micros());
    }

    fn on_rescan(&mut self, e: &RescanReport) {
        self.write_u8(TAG_RESCAN);
        self.write_source(e.source);
        self.write_u32(e.discovered);
        self.write_u32(e.already_tracked);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`Registered`] event.
    Registered(Registered),
    /// A [`Transition`] event.
    Transition(Transition),
    /// A scroll direction flip.
    DirectionChange {
        /// New direction.
        direction: ScrollDirection,
        /// When the flip was observed.
        at: HostTime,
    },
    /// A [`FlightStart`] event.
    Flight(FlightStart),
    /// A [`DramaticStart`] event.
    Dramatic(DramaticStart),
    /// A [`RescanReport`].
    Rescan(RescanReport),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_time(&mut self) -> Option<HostTime> {
        self.read_u64().map(HostTime)
    }

    fn read_element(&mut self) -> Option<(ElementId, NodeKey)> {
        let index = self.read_u32()?;
        let generation = self.read_u32()?;
        let node = NodeKey(self.read_u64()?);
        Some((ElementId::from_raw(index, generation), node))
    }

    fn read_visibility(&mut self) -> Option<Visibility> {
        Some(match self.read_u8()? {
            0 => Visibility::Hidden,
            1 => Visibility::Visible,
            _ => Visibility::FlyingAway,
        })
    }

    fn read_source(&mut self) -> Option<DiscoverySource> {
        Some(match self.read_u8()? {
            0 => DiscoverySource::Static,
            1 => DiscoverySource::Notification,
            _ => DiscoverySource::Structural,
        })
    }

    fn decode_registered(&mut self) -> Option<RecordedEvent> {
        let (id, node) = self.read_element()?;
        let entrance = match self.read_u8()? {
            0 => Entrance::FromLeft,
            1 => Entrance::FromRight,
            2 => Entrance::Fade,
            _ => Entrance::FromBelow,
        };
        Some(RecordedEvent::Registered(Registered {
            id,
            node,
            entrance,
            source: self.read_source()?,
        }))
    }

    fn decode_transition(&mut self) -> Option<RecordedEvent> {
        let (id, node) = self.read_element()?;
        Some(RecordedEvent::Transition(Transition {
            id,
            node,
            from: self.read_visibility()?,
            to: self.read_visibility()?,
            at: self.read_time()?,
        }))
    }

    fn decode_direction(&mut self) -> Option<RecordedEvent> {
        let direction = match self.read_u8()? {
            0 => ScrollDirection::Up,
            _ => ScrollDirection::Down,
        };
        Some(RecordedEvent::DirectionChange {
            direction,
            at: self.read_time()?,
        })
    }

    fn decode_flight(&mut self) -> Option<RecordedEvent> {
        let (id, node) = self.read_element()?;
        let direction = match self.read_u8()? {
            0 => HorizontalDirection::Left,
            _ => HorizontalDirection::Right,
        };
        Some(RecordedEvent::Flight(FlightStart {
            id,
            node,
            params: FlyAway {
                direction,
                distance: self.read_f64()?,
                rotation_deg: self.read_f64()?,
            },
            dramatic_at: self.read_time()?,
            landed_at: self.read_time()?,
        }))
    }

    fn decode_dramatic(&mut self) -> Option<RecordedEvent> {
        let (id, node) = self.read_element()?;
        Some(RecordedEvent::Dramatic(DramaticStart {
            id,
            node,
            at: self.read_time()?,
        }))
    }

    fn decode_rescan(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Rescan(RescanReport {
            source: self.read_source()?,
            discovered: self.read_u32()?,
            already_tracked: self.read_u32()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_REGISTERED => self.decode_registered(),
            TAG_TRANSITION => self.decode_transition(),
            TAG_DIRECTION => self.decode_direction(),
            TAG_FLIGHT => self.decode_flight(),
            TAG_DRAMATIC => self.decode_dramatic(),
            TAG_RESCAN => self.decode_rescan(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
