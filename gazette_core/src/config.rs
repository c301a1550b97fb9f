// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Controller tuning.

use alloc::format;
use alloc::string::String;

use crate::time::Duration;

/// What happens when a flying element re-enters the viewport mid-flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FlightInterruption {
    /// Ignore intersection events for flying elements. The flight always
    /// completes and the element ends up hidden.
    #[default]
    RunToCompletion,
    /// An intersection entry cancels the pending flight phases and makes the
    /// element visible again immediately.
    CancelOnEntry,
}

/// Configuration for the [`VisibilityController`](crate::controller::VisibilityController).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControllerConfig {
    /// Minimum intersection ratio (0.0–1.0) for an element to count as
    /// intersecting.
    pub threshold: f64,
    /// How far the viewport's bottom edge is pulled in for intersection
    /// tests, in logical pixels.
    pub bottom_inset: f64,
    /// While scrolling up, a visible element flies away once its top edge is
    /// closer than this to the viewport's bottom edge.
    pub fly_trigger_distance: f64,
    /// Upper bound (exclusive) of the random delay before the dramatic phase.
    pub max_stagger: Duration,
    /// Length of the dramatic fly-away phase.
    pub dramatic: Duration,
    /// Shortest fly-away travel, in logical pixels.
    pub min_distance: f64,
    /// Longest fly-away travel, in logical pixels.
    pub max_distance: f64,
    /// Largest fly-away rotation magnitude, in degrees.
    pub max_rotation_deg: f64,
    /// Policy for intersection entries that arrive mid-flight.
    pub interruption: FlightInterruption,
}

impl ControllerConfig {
    /// Default configuration for the newsletter pages.
    #[must_use]
    pub const fn web() -> Self {
        Self {
            threshold: 0.1,
            bottom_inset: 50.0,
            fly_trigger_distance: 200.0,
            max_stagger: Duration::from_millis(150),
            dramatic: Duration::from_millis(800),
            min_distance: 80.0,
            max_distance: 140.0,
            max_rotation_deg: 15.0,
            interruption: FlightInterruption::RunToCompletion,
        }
    }

    /// Returns the CSS `rootMargin` string for the browser observer.
    #[must_use]
    pub fn root_margin(&self) -> String {
        format!("0px 0px -{}px 0px", self.bottom_inset)
    }

    /// Longest possible flight, stagger included.
    #[must_use]
    pub fn max_flight(&self) -> Duration {
        self.max_stagger + self.dramatic
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::web()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_margin_insets_bottom_only() {
        assert_eq!(ControllerConfig::web().root_margin(), "0px 0px -50px 0px");
    }

    #[test]
    fn max_flight_is_stagger_plus_dramatic() {
        assert_eq!(
            ControllerConfig::default().max_flight(),
            Duration::from_millis(950)
        );
    }
}
