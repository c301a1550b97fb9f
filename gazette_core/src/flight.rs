// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fly-away parameters and pending flight phases.
//!
//! A flight has two deadlines: the end of the stagger delay, when the
//! dramatic phase starts, and the end of the dramatic phase, when the element
//! returns to hidden. Flights are kept in a small vector; the number in the
//! air at once is bounded by the number of visible elements.

use alloc::vec::Vec;

use crate::backend::RandomSource;
use crate::config::ControllerConfig;
use crate::element::{FlyAway, HorizontalDirection};
use crate::time::{Duration, HostTime};

/// Draws fresh fly-away parameters.
///
/// Samples, in order: direction, distance, rotation.
#[must_use]
pub fn draw_fly_away(config: &ControllerConfig, rng: &mut dyn RandomSource) -> FlyAway {
    let direction = if rng.next_unit() < 0.5 {
        HorizontalDirection::Left
    } else {
        HorizontalDirection::Right
    };
    let span = config.max_distance - config.min_distance;
    let distance = config.min_distance + rng.next_unit() * span;
    let max = config.max_rotation_deg;
    let rotation_deg = (rng.next_unit() * 2.0 * max - max) * direction.sign();
    FlyAway {
        direction,
        distance,
        rotation_deg,
    }
}

/// Draws a stagger delay in `[0, max_stagger)`.
#[must_use]
pub fn draw_stagger(config: &ControllerConfig, rng: &mut dyn RandomSource) -> Duration {
    Duration::from_millis_f64(rng.next_unit() * config.max_stagger.as_millis_f64())
}

/// Which deadline of a flight has come due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    Dramatic,
    Landed,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Flight {
    pub(crate) slot: u32,
    pub(crate) dramatic_at: HostTime,
    pub(crate) landed_at: HostTime,
    pub(crate) dramatic_started: bool,
}

impl Flight {
    pub(crate) fn new(slot: u32, start: HostTime, stagger: Duration, dramatic: Duration) -> Self {
        let dramatic_at = start + stagger;
        Self {
            slot,
            dramatic_at,
            landed_at: dramatic_at + dramatic,
            dramatic_started: false,
        }
    }

    fn next_deadline(&self) -> (HostTime, Phase) {
        if self.dramatic_started {
            (self.landed_at, Phase::Landed)
        } else {
            (self.dramatic_at, Phase::Dramatic)
        }
    }
}

/// Pending flights, fired in deadline order.
#[derive(Debug, Default)]
pub(crate) struct FlightQueue {
    flights: Vec<Flight>,
}

impl FlightQueue {
    pub(crate) fn push(&mut self, flight: Flight) {
        self.flights.push(flight);
    }

    pub(crate) fn cancel(&mut self, slot: u32) -> bool {
        let before = self.flights.len();
        self.flights.retain(|f| f.slot != slot);
        self.flights.len() != before
    }

    pub(crate) fn clear(&mut self) {
        self.flights.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.flights.len()
    }

    pub(crate) fn next_deadline(&self) -> Option<HostTime> {
        self.flights.iter().map(|f| f.next_deadline().0).min()
    }

    /// Pops the earliest phase due at or before `now`.
    ///
    /// Ties go to the flight that started first.
    pub(crate) fn pop_due(&mut self, now: HostTime) -> Option<(u32, Phase, HostTime)> {
        let (pos, (at, phase)) = self
            .flights
            .iter()
            .map(Flight::next_deadline)
            .enumerate()
            .filter(|(_, (at, _))| *at <= now)
            .min_by_key(|(_, (at, _))| *at)?;
        let slot = self.flights[pos].slot;
        match phase {
            Phase::Dramatic => self.flights[pos].dramatic_started = true,
            Phase::Landed => {
                self.flights.remove(pos);
            }
        }
        Some((slot, phase, at))
    }
}
