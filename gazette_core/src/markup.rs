// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Class and style edits that present a [`Changes`] batch.
//!
//! Every presenter (the DOM one, the simulator) turns a batch into the same
//! sequence of [`Edit`]s via [`edits`], so the stylesheet contract lives in
//! one place:
//!
//! | effect            | edits                                                     |
//! |-------------------|-----------------------------------------------------------|
//! | registered        | add entrance class                                        |
//! | flight start      | remove `visible`, add `fly-away`, set `--fly-x` and `--fly-rotation` |
//! | dramatic start    | add `fly-away-dramatic`                                   |
//! | → `Visible`       | remove fly-away classes, add `visible`                    |
//! | → `Hidden`        | remove `visible` and fly-away classes, clear variables    |
//!
//! Edits are ordered registered, flights, dramatic starts, transitions.
//! Within one controller call that is the order the effects happen, so hosts
//! drain and present after every call. Two calls merged into one batch can
//! present a node's later flight before its earlier landing.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::changes::Changes;
use crate::element::{NodeKey, Visibility};

/// Class marking an element as shown.
pub const VISIBLE: &str = "visible";
/// Class applied for the whole fly-away.
pub const FLY_AWAY: &str = "fly-away";
/// Class applied once the stagger delay has elapsed.
pub const FLY_AWAY_DRAMATIC: &str = "fly-away-dramatic";
/// Horizontal offset variable, e.g. `-112.5px`.
pub const FLY_X_VAR: &str = "--fly-x";
/// Rotation variable, e.g. `7.25deg`.
pub const FLY_ROTATION_VAR: &str = "--fly-rotation";

/// One DOM mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Edit {
    /// Add a class.
    AddClass(&'static str),
    /// Remove a class.
    RemoveClass(&'static str),
    /// Set a custom property.
    SetVar(&'static str, String),
    /// Remove a custom property.
    ClearVar(&'static str),
}

/// Translates a batch into per-node edits.
#[must_use]
pub fn edits(changes: &Changes) -> Vec<(NodeKey, Edit)> {
    let mut out = Vec::new();
    for r in &changes.registered {
        out.push((r.node, Edit::AddClass(r.entrance.class_name())));
    }
    for f in &changes.flights {
        out.push((f.node, Edit::RemoveClass(VISIBLE)));
        out.push((f.node, Edit::AddClass(FLY_AWAY)));
        out.push((
            f.node,
            Edit::SetVar(FLY_X_VAR, format!("{}px", f.params.offset_x())),
        ));
        out.push((
            f.node,
            Edit::SetVar(FLY_ROTATION_VAR, format!("{}deg", f.params.rotation_deg)),
        ));
    }
    for d in &changes.dramatic {
        out.push((d.node, Edit::AddClass(FLY_AWAY_DRAMATIC)));
    }
    for t in &changes.transitions {
        match t.to {
            Visibility::Visible => {
                out.push((t.node, Edit::RemoveClass(FLY_AWAY)));
                out.push((t.node, Edit::RemoveClass(FLY_AWAY_DRAMATIC)));
                out.push((t.node, Edit::AddClass(VISIBLE)));
            }
            Visibility::Hidden => {
                out.push((t.node, Edit::RemoveClass(VISIBLE)));
                out.push((t.node, Edit::RemoveClass(FLY_AWAY)));
                out.push((t.node, Edit::RemoveClass(FLY_AWAY_DRAMATIC)));
                out.push((t.node, Edit::ClearVar(FLY_X_VAR)));
                out.push((t.node, Edit::ClearVar(FLY_ROTATION_VAR)));
            }
            // The flight start already carries the edits.
            Visibility::FlyingAway => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::{DramaticStart, FlightStart, Transition};
    use crate::element::{ElementId, FlyAway, HorizontalDirection};
    use crate::time::HostTime;
    use alloc::string::ToString;
    use alloc::vec;

    fn classes_after(changes: &Changes, node: NodeKey) -> Vec<&'static str> {
        let mut classes = Vec::new();
        for (n, edit) in edits(changes) {
            if n != node {
                continue;
            }
            match edit {
                Edit::AddClass(c) if !classes.contains(&c) => classes.push(c),
                Edit::RemoveClass(c) => classes.retain(|&k| k != c),
                _ => {}
            }
        }
        classes
    }

    fn flight(node: NodeKey) -> FlightStart {
        FlightStart {
            id: ElementId::from_raw(0, 0),
            node,
            params: FlyAway {
                direction: HorizontalDirection::Right,
                distance: 80.0,
                rotation_deg: 3.0,
            },
            dramatic_at: HostTime(100),
            landed_at: HostTime(900),
        }
    }

    fn transition(node: NodeKey, from: Visibility, to: Visibility, at: u64) -> Transition {
        Transition {
            id: ElementId::from_raw(0, 0),
            node,
            from,
            to,
            at: HostTime(at),
        }
    }

    #[test]
    fn flight_sets_signed_offset() {
        let changes = Changes {
            flights: vec![FlightStart {
                id: ElementId::from_raw(0, 0),
                node: NodeKey(1),
                params: FlyAway {
                    direction: HorizontalDirection::Left,
                    distance: 112.5,
                    rotation_deg: -7.25,
                },
                dramatic_at: HostTime(0),
                landed_at: HostTime(0),
            }],
            ..Changes::default()
        };
        let e = edits(&changes);
        assert_eq!(e[0], (NodeKey(1), Edit::RemoveClass(VISIBLE)));
        assert_eq!(e[1], (NodeKey(1), Edit::AddClass(FLY_AWAY)));
        assert_eq!(e[2], (NodeKey(1), Edit::SetVar(FLY_X_VAR, "-112.5px".to_string())));
        assert_eq!(e[3], (NodeKey(1), Edit::SetVar(FLY_ROTATION_VAR, "-7.25deg".to_string())));
    }

    #[test]
    fn landing_clears_everything() {
        let changes = Changes {
            transitions: vec![Transition {
                id: ElementId::from_raw(0, 0),
                node: NodeKey(2),
                from: Visibility::FlyingAway,
                to: Visibility::Hidden,
                at: HostTime(0),
            }],
            ..Changes::default()
        };
        let e = edits(&changes);
        assert_eq!(e.len(), 5);
        assert!(e.contains(&(NodeKey(2), Edit::RemoveClass(FLY_AWAY_DRAMATIC))));
        assert!(e.contains(&(NodeKey(2), Edit::ClearVar(FLY_X_VAR))));
    }

    #[test]
    fn flying_away_transition_is_silent() {
        let changes = Changes {
            transitions: vec![Transition {
                id: ElementId::from_raw(0, 0),
                node: NodeKey(3),
                from: Visibility::Visible,
                to: Visibility::FlyingAway,
                at: HostTime(0),
            }],
            ..Changes::default()
        };
        assert!(edits(&changes).is_empty());
    }

    #[test]
    fn departure_in_one_call_leaves_node_flying() {
        let node = NodeKey(5);
        let changes = Changes {
            flights: vec![flight(node)],
            transitions: vec![transition(node, Visibility::Visible, Visibility::FlyingAway, 0)],
            ..Changes::default()
        };
        assert_eq!(classes_after(&changes, node), [FLY_AWAY]);
    }

    #[test]
    fn overdue_dramatic_and_landing_in_one_call_leave_node_clean() {
        let node = NodeKey(6);
        let changes = Changes {
            dramatic: vec![DramaticStart {
                id: ElementId::from_raw(0, 0),
                node,
                at: HostTime(100),
            }],
            transitions: vec![transition(node, Visibility::FlyingAway, Visibility::Hidden, 900)],
            ..Changes::default()
        };
        assert!(classes_after(&changes, node).is_empty());
    }
}
