// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scroll visibility controller.
//!
//! [`VisibilityController`] decides, for every tracked element, whether it is
//! hidden, visible, or flying away. It reacts to three inputs:
//!
//! - intersection entries from the host's [`Observer`],
//! - scroll offset samples, which update the scroll direction and may start
//!   fly-aways,
//! - the passage of time, via [`advance`](VisibilityController::advance),
//!   which fires the pending phases of each flight.
//!
//! # State machine
//!
//! ```text
//!            intersecting
//!   Hidden ───────────────► Visible
//!     ▲  ◄───────────────── │  │
//!     │   left viewport and │  │ scrolling up and top edge
//!     │   (not scrolling up │  │ within trigger distance of
//!     │   or above y = 0)   │  │ viewport bottom
//!     │                        ▼
//!     └────────────────── FlyingAway
//!        stagger + dramatic
//!        phase elapsed
//! ```
//!
//! With [`FlightInterruption::CancelOnEntry`] an intersection entry also
//! moves `FlyingAway` straight back to `Visible`.
//!
//! Every effect is recorded in a [`Changes`] batch drained with
//! [`take_changes`](VisibilityController::take_changes).

use alloc::vec::Vec;

use crate::backend::{IntersectionEntry, Layout, Observer, RandomSource};
use crate::changes::{Changes, DramaticStart, FlightStart, Registered, RescanReport, Transition};
use crate::config::{ControllerConfig, FlightInterruption};
use crate::discovery::DiscoverySource;
use crate::element::{Candidate, Category, ElementId, Entrance, FlyAway, NodeKey, Visibility};
use crate::flight::{Flight, FlightQueue, Phase, draw_fly_away, draw_stagger};
use crate::registry::{Insert, Registry};
use crate::scroll::{ScrollDirection, ScrollTracker};
use crate::time::HostTime;

/// Result of offering a node for tracking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registration {
    /// The node is now tracked and observed.
    New(ElementId),
    /// The node was already tracked; nothing changed.
    AlreadyTracked(ElementId),
    /// The controller has no observation mechanism; nothing is tracked.
    Inert,
}

/// Tracks element visibility and plays fly-away exits.
///
/// Generic over the intersection [`Observer`]. Constructing the controller
/// without one ([`degraded`](Self::degraded)) yields an inert controller that
/// accepts every call and never changes any element.
pub struct VisibilityController<O> {
    config: ControllerConfig,
    observer: Option<O>,
    registry: Registry,
    scroll: ScrollTracker,
    flights: FlightQueue,
    changes: Changes,
}

impl<O> core::fmt::Debug for VisibilityController<O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VisibilityController")
            .field("config", &self.config)
            .field("degraded", &self.observer.is_none())
            .field("tracked", &self.registry.len())
            .field("visible", &self.registry.visible().len())
            .field("in_flight", &self.flights.len())
            .field("direction", &self.scroll.direction())
            .finish_non_exhaustive()
    }
}

impl<O: Observer> VisibilityController<O> {
    /// Creates a controller that registers nodes with `observer`.
    #[must_use]
    pub fn new(config: ControllerConfig, observer: O) -> Self {
        Self::with_observer(config, Some(observer))
    }

    /// Creates an inert controller for environments without an observation
    /// mechanism.
    #[must_use]
    pub fn degraded(config: ControllerConfig) -> Self {
        Self::with_observer(config, None)
    }

    /// Creates a controller from an optional observer.
    #[must_use]
    pub fn with_observer(config: ControllerConfig, observer: Option<O>) -> Self {
        Self {
            config,
            observer,
            registry: Registry::default(),
            scroll: ScrollTracker::new(),
            flights: FlightQueue::default(),
            changes: Changes::default(),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Returns `true` if there is no observation mechanism.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.observer.is_none()
    }

    /// Returns the observer, if any.
    #[must_use]
    pub fn observer(&self) -> Option<&O> {
        self.observer.as_ref()
    }

    // -- Registration --

    /// Offers one node for tracking.
    ///
    /// The first registration of a node assigns its entrance animation and
    /// starts observing it. Later registrations of the same node are no-ops,
    /// whatever category they carry.
    pub fn register(&mut self, candidate: Candidate, source: DiscoverySource) -> Registration {
        let Some(observer) = self.observer.as_mut() else {
            return Registration::Inert;
        };
        match self
            .registry
            .insert(candidate.node, candidate.category, candidate.ordinal)
        {
            Insert::Existing(id) => Registration::AlreadyTracked(id),
            Insert::New(id) => {
                observer.observe(candidate.node);
                self.changes.registered.push(Registered {
                    id,
                    node: candidate.node,
                    entrance: self.registry.entrance[id.idx as usize],
                    source,
                });
                Registration::New(id)
            }
        }
    }

    /// Registers the nodes present at setup.
    pub fn register_static(
        &mut self,
        candidates: impl IntoIterator<Item = Candidate>,
    ) -> RescanReport {
        self.rescan(DiscoverySource::Static, candidates)
    }

    /// Registers every candidate that is not tracked yet.
    ///
    /// Safe to call any number of times with overlapping candidate sets.
    pub fn rescan(
        &mut self,
        source: DiscoverySource,
        candidates: impl IntoIterator<Item = Candidate>,
    ) -> RescanReport {
        let mut report = RescanReport {
            source,
            ..RescanReport::default()
        };
        if self.is_degraded() {
            return report;
        }
        for candidate in candidates {
            match self.register(candidate, source) {
                Registration::New(_) => report.discovered += 1,
                Registration::AlreadyTracked(_) => report.already_tracked += 1,
                Registration::Inert => {}
            }
        }
        self.changes.rescans.push(report);
        report
    }

    // -- Event handling --

    /// Applies a batch of intersection entries.
    ///
    /// Entries for nodes that are not tracked are ignored.
    pub fn on_intersections(&mut self, entries: &[IntersectionEntry], now: HostTime) {
        for entry in entries {
            let Some(slot) = self.registry.slot_of(entry.node) else {
                continue;
            };
            match self.registry.visibility[slot as usize] {
                Visibility::Hidden => {
                    if entry.is_intersecting {
                        self.transition(slot, Visibility::Visible, now);
                    }
                }
                Visibility::Visible => {
                    let above_viewport = entry.bounds.y1 < 0.0;
                    if !entry.is_intersecting
                        && (self.scroll.direction() != ScrollDirection::Up || above_viewport)
                    {
                        self.transition(slot, Visibility::Hidden, now);
                    }
                }
                Visibility::FlyingAway => {
                    if entry.is_intersecting
                        && self.config.interruption == FlightInterruption::CancelOnEntry
                        && self.flights.cancel(slot)
                    {
                        self.transition(slot, Visibility::Visible, now);
                    }
                }
            }
        }
    }

    /// Applies a scroll offset sample.
    ///
    /// While scrolling up, every visible element whose top edge lies within
    /// the trigger distance of the viewport bottom starts flying away.
    /// Elements are checked in registration order; nodes that no longer have
    /// layout are skipped.
    pub fn on_scroll(
        &mut self,
        offset: f64,
        layout: &dyn Layout,
        rng: &mut dyn RandomSource,
        now: HostTime,
    ) {
        if self.is_degraded() {
            return;
        }
        if let Some(direction) = self.scroll.update(offset) {
            self.changes.direction_changes.push((direction, now));
        }
        if self.scroll.direction() != ScrollDirection::Up {
            return;
        }
        let trigger = layout.viewport_height() - self.config.fly_trigger_distance;
        let due: Vec<u32> = self
            .registry
            .visible()
            .iter()
            .copied()
            .filter(|&slot| {
                layout
                    .bounds(self.registry.node[slot as usize])
                    .is_some_and(|b| b.y0 > trigger)
            })
            .collect();
        for slot in due {
            self.start_flight(slot, rng, now);
        }
    }

    /// Fires every flight phase due at or before `now`.
    pub fn advance(&mut self, now: HostTime) {
        while let Some((slot, phase, at)) = self.flights.pop_due(now) {
            match phase {
                Phase::Dramatic => self.changes.dramatic.push(DramaticStart {
                    id: self.registry.id(slot),
                    node: self.registry.node[slot as usize],
                    at,
                }),
                Phase::Landed => self.transition(slot, Visibility::Hidden, at),
            }
        }
    }

    /// Returns when [`advance`](Self::advance) next has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<HostTime> {
        self.flights.next_deadline()
    }

    /// Drains the effects recorded since the last call.
    pub fn take_changes(&mut self) -> Changes {
        core::mem::take(&mut self.changes)
    }

    /// Disconnects the observer and forgets every tracked element.
    ///
    /// Pending flights are dropped and the scroll tracker resets. Handles
    /// issued before the teardown become stale. The controller may be
    /// populated again afterwards.
    pub fn teardown(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer.disconnect();
        }
        self.registry.clear();
        self.flights.clear();
        self.scroll = ScrollTracker::new();
        self.changes = Changes::default();
    }

    // -- Queries --

    /// Number of tracked elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns `true` if nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    /// Number of flights in the air.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.flights.len()
    }

    /// Current scroll direction.
    #[must_use]
    pub fn direction(&self) -> ScrollDirection {
        self.scroll.direction()
    }

    /// Handle of a tracked node.
    #[must_use]
    pub fn id_of(&self, node: NodeKey) -> Option<ElementId> {
        self.registry.slot_of(node).map(|slot| self.registry.id(slot))
    }

    /// Node behind a handle, if the handle is still current.
    #[must_use]
    pub fn node_of(&self, id: ElementId) -> Option<NodeKey> {
        self.registry
            .resolve(id)
            .map(|slot| self.registry.node[slot as usize])
    }

    /// Visibility of a tracked node.
    #[must_use]
    pub fn visibility(&self, node: NodeKey) -> Option<Visibility> {
        self.slot_field(node, |r, i| r.visibility[i])
    }

    /// Entrance assigned to a tracked node.
    #[must_use]
    pub fn entrance(&self, node: NodeKey) -> Option<Entrance> {
        self.slot_field(node, |r, i| r.entrance[i])
    }

    /// Category a tracked node was registered with.
    #[must_use]
    pub fn category(&self, node: NodeKey) -> Option<Category> {
        self.slot_field(node, |r, i| r.category[i])
    }

    /// Fly-away parameters of a node that is currently flying away.
    #[must_use]
    pub fn fly_away(&self, node: NodeKey) -> Option<FlyAway> {
        self.slot_field(node, |r, i| r.fly[i]).flatten()
    }

    /// Tracked nodes in registration order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.registry.node.iter().copied()
    }

    // -- Internals --

    fn slot_field<T>(&self, node: NodeKey, f: impl FnOnce(&Registry, usize) -> T) -> Option<T> {
        self.registry
            .slot_of(node)
            .map(|slot| f(&self.registry, slot as usize))
    }

    fn transition(&mut self, slot: u32, to: Visibility, at: HostTime) {
        let from = self.registry.set_visibility(slot, to);
        self.changes.transitions.push(Transition {
            id: self.registry.id(slot),
            node: self.registry.node[slot as usize],
            from,
            to,
            at,
        });
    }

    fn start_flight(&mut self, slot: u32, rng: &mut dyn RandomSource, now: HostTime) {
        let params = draw_fly_away(&self.config, rng);
        let stagger = draw_stagger(&self.config, rng);
        let flight = Flight::new(slot, now, stagger, self.config.dramatic);
        self.flights.push(flight);
        self.transition(slot, Visibility::FlyingAway, now);
        self.registry.fly[slot as usize] = Some(params);
        self.changes.flights.push(FlightStart {
            id: self.registry.id(slot),
            node: self.registry.node[slot as usize],
            params,
            dramatic_at: flight.dramatic_at,
            landed_at: flight.landed_at,
        });
    }
}
