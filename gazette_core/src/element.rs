// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trackable element identity, categories, and per-element state.

use core::fmt;

/// Host-assigned identity of a DOM node.
///
/// The controller never interprets the value. The web backend stamps it on
/// the element as a `data-gazette-key` attribute so intersection entries and
/// mutation records can be mapped back without holding JS references in core.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeKey(pub u64);

impl fmt::Debug for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeKey({})", self.0)
    }
}

/// A handle to a tracked element in the controller's registry.
///
/// Contains a slot index and the session generation. Handles minted before a
/// [`teardown`](crate::controller::VisibilityController::teardown) carry an
/// older generation and no longer resolve.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl ElementId {
    /// Reassembles a handle from [`index`](Self::index) and
    /// [`generation`](Self::generation), e.g. when decoding a recording.
    ///
    /// The result only resolves if it names a live slot of the current session.
    #[inline]
    #[must_use]
    pub const fn from_raw(index: u32, generation: u32) -> Self {
        Self {
            idx: index,
            generation,
        }
    }

    /// Returns the registration slot, which is also the registration order.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the session generation.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({}@gen{})", self.idx, self.generation)
    }
}

/// The role a node plays on the page, decided once at registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// An announcement card in the main grid.
    GridItem,
    /// An entry in the resource list.
    ResourceItem,
    /// A day cell or event in the calendar grid.
    CalendarItem,
    /// A page section.
    Section,
    /// Any other element that simply fades in.
    GenericFade,
}

impl Category {
    /// All categories, in a fixed order usable as an array index.
    pub const ALL: [Self; 5] = [
        Self::GridItem,
        Self::ResourceItem,
        Self::CalendarItem,
        Self::Section,
        Self::GenericFade,
    ];

    /// Returns the CSS class render layers put on nodes of this category.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::GridItem => "grid-item",
            Self::ResourceItem => "resource-item",
            Self::CalendarItem => "calendar-item",
            Self::Section => "section",
            Self::GenericFade => "fade-in",
        }
    }

    pub(crate) const fn slot(self) -> usize {
        match self {
            Self::GridItem => 0,
            Self::ResourceItem => 1,
            Self::CalendarItem => 2,
            Self::Section => 3,
            Self::GenericFade => 4,
        }
    }

    /// Picks the entrance animation for the `ordinal`-th node of this category.
    ///
    /// Grid and resource items alternate sides, starting from the left.
    #[must_use]
    pub const fn entrance(self, ordinal: u32) -> Entrance {
        match self {
            Self::GridItem | Self::ResourceItem => {
                if ordinal % 2 == 0 {
                    Entrance::FromLeft
                } else {
                    Entrance::FromRight
                }
            }
            Self::CalendarItem | Self::GenericFade => Entrance::Fade,
            Self::Section => Entrance::FromBelow,
        }
    }
}

/// Entrance animation variant assigned at registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entrance {
    /// Slide in from the left while fading.
    FromLeft,
    /// Slide in from the right while fading.
    FromRight,
    /// Plain fade.
    Fade,
    /// Rise from below while fading.
    FromBelow,
}

impl Entrance {
    /// Returns the CSS class that selects this animation.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::FromLeft => "fade-in-left",
            Self::FromRight => "fade-in-right",
            Self::Fade => "fade-in",
            Self::FromBelow => "fade-in-up",
        }
    }
}

/// Per-element visibility state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Not shown; waiting for an intersection entry.
    #[default]
    Hidden,
    /// Settled in its entrance state.
    Visible,
    /// Playing the exit animation.
    FlyingAway,
}

/// Horizontal travel of a fly-away.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HorizontalDirection {
    /// Toward negative x.
    Left,
    /// Toward positive x.
    Right,
}

impl HorizontalDirection {
    /// Returns `-1.0` for left and `1.0` for right.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Animation parameters of one fly-away.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlyAway {
    /// Which way the element travels.
    pub direction: HorizontalDirection,
    /// Travel distance in logical pixels (always positive).
    pub distance: f64,
    /// Rotation in degrees, signed to follow `direction`.
    pub rotation_deg: f64,
}

impl FlyAway {
    /// Signed horizontal offset in logical pixels.
    #[must_use]
    pub fn offset_x(&self) -> f64 {
        self.distance * self.direction.sign()
    }
}

/// A node offered to the controller for tracking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// Identity of the node.
    pub node: NodeKey,
    /// Role of the node.
    pub category: Category,
    /// Position among nodes of the same category in document order, when the
    /// host knows it. Without it the controller counts registrations.
    pub ordinal: Option<u32>,
}

impl Candidate {
    /// Creates a candidate whose ordinal is left to the controller.
    #[must_use]
    pub const fn new(node: NodeKey, category: Category) -> Self {
        Self {
            node,
            category,
            ordinal: None,
        }
    }

    /// Sets the document-order ordinal.
    #[must_use]
    pub const fn with_ordinal(mut self, ordinal: u32) -> Self {
        self.ordinal = Some(ordinal);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_and_resource_items_alternate() {
        for category in [Category::GridItem, Category::ResourceItem] {
            assert_eq!(category.entrance(0), Entrance::FromLeft);
            assert_eq!(category.entrance(1), Entrance::FromRight);
            assert_eq!(category.entrance(6), Entrance::FromLeft);
        }
    }

    #[test]
    fn fixed_entrances() {
        assert_eq!(Category::CalendarItem.entrance(3), Entrance::Fade);
        assert_eq!(Category::Section.entrance(1), Entrance::FromBelow);
        assert_eq!(Category::GenericFade.entrance(0), Entrance::Fade);
    }

    #[test]
    fn category_slots_are_distinct() {
        let mut seen = [false; 5];
        for c in Category::ALL {
            assert!(!seen[c.slot()], "slot reused by {c:?}");
            seen[c.slot()] = true;
        }
    }

    #[test]
    fn fly_offset_follows_direction() {
        let fly = FlyAway {
            direction: HorizontalDirection::Left,
            distance: 100.0,
            rotation_deg: -4.0,
        };
        assert_eq!(fly.offset_x(), -100.0);
    }
}
