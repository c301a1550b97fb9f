// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Discovery of trackable nodes.
//!
//! New nodes reach the controller along three paths, all funnelled through
//! [`VisibilityController::rescan`](crate::controller::VisibilityController::rescan):
//!
//! - [`DiscoverySource::Static`]: the one-time scan at setup.
//! - [`DiscoverySource::Notification`]: a render layer announced a finished
//!   batch (`dynamicContentLoaded` on the web).
//! - [`DiscoverySource::Structural`]: a [`StructureWatcher`] saw nodes being
//!   inserted. This is the fallback for render layers that never announce.

use crate::element::Category;

/// Which discovery path produced a set of candidates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DiscoverySource {
    /// Initial scan of nodes present at setup.
    Static,
    /// Explicit "content loaded" notification from a render layer.
    #[default]
    Notification,
    /// Structural-change observation.
    Structural,
}

/// A structural-change observation capability.
///
/// Implementations report inserted subtrees to the host, which turns them
/// into candidates and calls `rescan` with [`DiscoverySource::Structural`].
pub trait StructureWatcher {
    /// Begins watching the document for inserted nodes.
    fn watch(&mut self);

    /// Stops watching.
    fn disconnect(&mut self);
}

/// CSS selector matching every node a render layer may hand over.
pub const TRACKABLE_SELECTOR: &str = ".grid-item, .resource-item, .calendar-item, .section";

/// CSS selector matching nodes that carry an entrance marker in static markup.
pub const STATIC_SELECTOR: &str = ".fade-in, .fade-in-up";

/// Derives a category from a node's class list.
///
/// Render-layer roles win over static entrance markers, so a section that
/// also carries `fade-in` is still a [`Category::Section`].
#[must_use]
pub fn classify<'a>(classes: impl IntoIterator<Item = &'a str>) -> Option<Category> {
    let mut fallback = None;
    for class in classes {
        match class {
            "grid-item" => return Some(Category::GridItem),
            "resource-item" => return Some(Category::ResourceItem),
            "calendar-item" => return Some(Category::CalendarItem),
            "section" => return Some(Category::Section),
            // Static markup (e.g. the footer) uses the section entrance.
            "fade-in-up" => fallback = Some(Category::Section),
            "fade-in" => fallback = fallback.or(Some(Category::GenericFade)),
            _ => {}
        }
    }
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_are_recognized() {
        assert_eq!(classify(["grid-item", "reverse"]), Some(Category::GridItem));
        assert_eq!(classify(["resource-item"]), Some(Category::ResourceItem));
        assert_eq!(classify(["calendar-item"]), Some(Category::CalendarItem));
        assert_eq!(classify(["section"]), Some(Category::Section));
    }

    #[test]
    fn role_beats_marker() {
        assert_eq!(classify(["fade-in", "section"]), Some(Category::Section));
    }

    #[test]
    fn static_markers() {
        assert_eq!(classify(["footer", "fade-in-up"]), Some(Category::Section));
        assert_eq!(classify(["see-more-container", "fade-in"]), Some(Category::GenericFade));
        assert_eq!(classify(["fade-in", "fade-in-up"]), Some(Category::Section));
    }

    #[test]
    fn unrelated_nodes_are_ignored() {
        assert_eq!(classify(["spacer"]), None);
        assert_eq!(classify(core::iter::empty()), None);
    }
}
