// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observable effects of controller operations.

use alloc::vec::Vec;

use crate::discovery::DiscoverySource;
use crate::element::{ElementId, Entrance, FlyAway, NodeKey, Visibility};
use crate::scroll::ScrollDirection;
use crate::time::HostTime;

/// A newly tracked element and the entrance it was given.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Registered {
    /// Registry handle.
    pub id: ElementId,
    /// The node.
    pub node: NodeKey,
    /// Assigned entrance animation.
    pub entrance: Entrance,
    /// Which discovery path found it.
    pub source: DiscoverySource,
}

/// A state-machine transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Registry handle.
    pub id: ElementId,
    /// The node.
    pub node: NodeKey,
    /// State before.
    pub from: Visibility,
    /// State after.
    pub to: Visibility,
    /// When the transition happened.
    pub at: HostTime,
}

/// The start of a fly-away, with its freshly drawn parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlightStart {
    /// Registry handle.
    pub id: ElementId,
    /// The node.
    pub node: NodeKey,
    /// Animation parameters.
    pub params: FlyAway,
    /// When the dramatic phase will start.
    pub dramatic_at: HostTime,
    /// When the element will be hidden again.
    pub landed_at: HostTime,
}

/// The start of a flight's dramatic phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DramaticStart {
    /// Registry handle.
    pub id: ElementId,
    /// The node.
    pub node: NodeKey,
    /// When the phase started.
    pub at: HostTime,
}

/// Summary of one discovery pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RescanReport {
    /// Which discovery path ran.
    pub source: DiscoverySource,
    /// Candidates that were not tracked before.
    pub discovered: u32,
    /// Candidates that were already tracked.
    pub already_tracked: u32,
}

/// Effects accumulated since the last [`take_changes`].
///
/// Within each list, entries appear in the order they happened. A presenter
/// applying the batch processes registrations first, then flights, then
/// dramatic starts, then transitions; see [`markup::edits`].
///
/// Drain once per controller call. Lists from separate calls are not
/// interleaved, so a merged batch can reorder edits to the same node.
///
/// [`markup::edits`]: crate::markup::edits
///
/// [`take_changes`]: crate::controller::VisibilityController::take_changes
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Changes {
    /// Newly tracked elements.
    pub registered: Vec<Registered>,
    /// Flights that started; each is paired with a `Visible -> FlyingAway`
    /// entry in `transitions`.
    pub flights: Vec<FlightStart>,
    /// State transitions in the order they happened.
    pub transitions: Vec<Transition>,
    /// Dramatic phases that started.
    pub dramatic: Vec<DramaticStart>,
    /// Direction changes observed while processing scroll samples.
    pub direction_changes: Vec<(ScrollDirection, HostTime)>,
    /// Discovery passes.
    pub rescans: Vec<RescanReport>,
}

impl Changes {
    /// Returns `true` if nothing happened.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
            && self.flights.is_empty()
            && self.transitions.is_empty()
            && self.dramatic.is_empty()
            && self.direction_changes.is_empty()
            && self.rescans.is_empty()
    }

    /// Appends `other` to this batch.
    pub fn extend(&mut self, other: Self) {
        self.registered.extend(other.registered);
        self.flights.extend(other.flights);
        self.transitions.extend(other.transitions);
        self.dramatic.extend(other.dramatic);
        self.direction_changes.extend(other.direction_changes);
        self.rescans.extend(other.rescans);
    }

    /// Returns the transitions recorded for `node`, in order.
    pub fn transitions_for(&self, node: NodeKey) -> impl Iterator<Item = &Transition> + '_ {
        self.transitions.iter().filter(move |t| t.node == node)
    }
}
