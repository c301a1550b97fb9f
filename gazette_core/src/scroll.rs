// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-direction tracking.

/// Vertical scroll direction of the most recent scroll sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    /// The offset decreased (content moves back toward the top of the page).
    Up,
    /// The offset increased or stayed the same.
    #[default]
    Down,
}

/// Derives a [`ScrollDirection`] from successive scroll offsets.
///
/// The first sample is compared against an offset of zero, matching a page
/// that starts at the top.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScrollTracker {
    last_offset: f64,
    direction: ScrollDirection,
}

impl ScrollTracker {
    /// Creates a tracker at offset zero, heading down.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_offset: 0.0,
            direction: ScrollDirection::Down,
        }
    }

    /// Records a new offset sample.
    ///
    /// Returns the new direction if it differs from the previous one.
    pub fn update(&mut self, offset: f64) -> Option<ScrollDirection> {
        let next = if offset < self.last_offset {
            ScrollDirection::Up
        } else {
            ScrollDirection::Down
        };
        self.last_offset = offset;
        if next == self.direction {
            None
        } else {
            self.direction = next;
            Some(next)
        }
    }

    /// Returns the current direction.
    #[must_use]
    pub const fn direction(&self) -> ScrollDirection {
        self.direction
    }

    /// Returns the most recent offset sample.
    #[must_use]
    pub const fn last_offset(&self) -> f64 {
        self.last_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_down_at_top() {
        let t = ScrollTracker::new();
        assert_eq!(t.direction(), ScrollDirection::Down);
        assert_eq!(t.last_offset(), 0.0);
    }

    #[test]
    fn reports_only_changes() {
        let mut t = ScrollTracker::new();
        assert_eq!(t.update(100.0), None, "still heading down");
        assert_eq!(t.update(50.0), Some(ScrollDirection::Up));
        assert_eq!(t.update(20.0), None, "still heading up");
        assert_eq!(t.update(80.0), Some(ScrollDirection::Down));
    }

    #[test]
    fn equal_offset_counts_as_down() {
        let mut t = ScrollTracker::new();
        t.update(300.0);
        t.update(200.0);
        assert_eq!(t.update(200.0), Some(ScrollDirection::Down));
    }
}
