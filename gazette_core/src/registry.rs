// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays storage for tracked elements.
//!
//! Slots are handed out in registration order and never reused within a
//! session, so the slot index doubles as the registration ordinal. A sorted
//! side list of visible slots keeps scroll handling proportional to the
//! number of visible elements.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::element::{Category, ElementId, Entrance, FlyAway, NodeKey, Visibility};

/// Outcome of inserting a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Insert {
    New(ElementId),
    Existing(ElementId),
}

#[derive(Debug, Default)]
pub(crate) struct Registry {
    // -- Per-slot data --
    pub(crate) node: Vec<NodeKey>,
    pub(crate) category: Vec<Category>,
    pub(crate) entrance: Vec<Entrance>,
    pub(crate) visibility: Vec<Visibility>,
    pub(crate) fly: Vec<Option<FlyAway>>,

    // -- Indexes --
    by_node: BTreeMap<NodeKey, u32>,
    visible: Vec<u32>,
    ordinals: [u32; 5],

    generation: u32,
}

impl Registry {
    pub(crate) fn len(&self) -> usize {
        self.node.len()
    }

    pub(crate) fn id(&self, slot: u32) -> ElementId {
        ElementId {
            idx: slot,
            generation: self.generation,
        }
    }

    pub(crate) fn slot_of(&self, node: NodeKey) -> Option<u32> {
        self.by_node.get(&node).copied()
    }

    pub(crate) fn resolve(&self, id: ElementId) -> Option<u32> {
        (id.generation == self.generation && (id.idx as usize) < self.len()).then_some(id.idx)
    }

    /// Tracks `node`, or returns its existing handle.
    ///
    /// `ordinal` overrides the per-category registration count.
    pub(crate) fn insert(
        &mut self,
        node: NodeKey,
        category: Category,
        ordinal: Option<u32>,
    ) -> Insert {
        if let Some(slot) = self.slot_of(node) {
            return Insert::Existing(self.id(slot));
        }
        let counter = &mut self.ordinals[category.slot()];
        let ordinal = ordinal.unwrap_or(*counter);
        *counter += 1;

        let slot = u32::try_from(self.len()).unwrap_or(u32::MAX);
        self.node.push(node);
        self.category.push(category);
        self.entrance.push(category.entrance(ordinal));
        self.visibility.push(Visibility::Hidden);
        self.fly.push(None);
        self.by_node.insert(node, slot);
        Insert::New(self.id(slot))
    }

    /// Sets a slot's visibility, keeping the visible index in sync.
    ///
    /// Returns the previous state.
    pub(crate) fn set_visibility(&mut self, slot: u32, to: Visibility) -> Visibility {
        let i = slot as usize;
        let from = core::mem::replace(&mut self.visibility[i], to);
        let was = from == Visibility::Visible;
        let is = to == Visibility::Visible;
        if was != is {
            match self.visible.binary_search(&slot) {
                Ok(pos) if !is => {
                    self.visible.remove(pos);
                }
                Err(pos) if is => self.visible.insert(pos, slot),
                _ => {}
            }
        }
        if to != Visibility::FlyingAway {
            self.fly[i] = None;
        }
        from
    }

    /// Visible slots in registration order.
    pub(crate) fn visible(&self) -> &[u32] {
        &self.visible
    }

    /// Drops every element and invalidates outstanding handles.
    pub(crate) fn clear(&mut self) {
        self.node.clear();
        self.category.clear();
        self.entrance.clear();
        self.visibility.clear();
        self.fly.clear();
        self.by_node.clear();
        self.visible.clear();
        self.ordinals = [0; 5];
        self.generation = self.generation.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_idempotent() {
        let mut r = Registry::default();
        let Insert::New(id) = r.insert(NodeKey(9), Category::Section, None) else {
            panic!("first insert must be new");
        };
        assert_eq!(
            r.insert(NodeKey(9), Category::GridItem, None),
            Insert::Existing(id)
        );
        assert_eq!(r.len(), 1);
        assert_eq!(r.category[0], Category::Section, "first role sticks");
    }

    #[test]
    fn ordinals_are_per_category() {
        let mut r = Registry::default();
        r.insert(NodeKey(1), Category::GridItem, None);
        r.insert(NodeKey(2), Category::ResourceItem, None);
        r.insert(NodeKey(3), Category::GridItem, None);
        r.insert(NodeKey(4), Category::ResourceItem, None);
        assert_eq!(
            r.entrance,
            [
                Entrance::FromLeft,
                Entrance::FromLeft,
                Entrance::FromRight,
                Entrance::FromRight,
            ]
        );
    }

    #[test]
    fn explicit_ordinal_wins() {
        let mut r = Registry::default();
        r.insert(NodeKey(1), Category::GridItem, Some(3));
        assert_eq!(r.entrance[0], Entrance::FromRight);
    }

    #[test]
    fn visible_index_stays_sorted() {
        let mut r = Registry::default();
        for k in 0..4 {
            r.insert(NodeKey(k), Category::CalendarItem, None);
        }
        r.set_visibility(2, Visibility::Visible);
        r.set_visibility(0, Visibility::Visible);
        r.set_visibility(3, Visibility::Visible);
        assert_eq!(r.visible(), &[0, 2, 3]);
        r.set_visibility(2, Visibility::FlyingAway);
        assert_eq!(r.visible(), &[0, 3]);
        r.set_visibility(0, Visibility::Hidden);
        assert_eq!(r.visible(), &[3]);
    }

    #[test]
    fn clear_invalidates_handles() {
        let mut r = Registry::default();
        let Insert::New(id) = r.insert(NodeKey(1), Category::Section, None) else {
            panic!("first insert must be new");
        };
        assert_eq!(r.resolve(id), Some(0));
        r.clear();
        assert_eq!(r.resolve(id), None);
        let Insert::New(again) = r.insert(NodeKey(1), Category::Section, None) else {
            panic!("cleared registry forgets nodes");
        };
        assert_ne!(again, id, "generation differs");
    }
}
