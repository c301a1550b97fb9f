// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll visibility controller for the Gazette newsletter front end.
//!
//! `gazette_core` decides which page elements are shown, hidden, or playing
//! a fly-away exit, from viewport intersections and scroll direction alone.
//! It is `no_std` compatible (with `alloc`) and owns no platform handles:
//! everything it reads comes in through capability traits, and everything it
//! decides goes out as a [`Changes`](changes::Changes) batch.
//!
//! # Architecture
//!
//! ```text
//!   Render layer ──► Candidate ──► rescan() / register_static()
//!                                        │
//!   Observer ──► IntersectionEntry ──► on_intersections()
//!   scroll event ──► offset ──────────► on_scroll() ◄── Layout, RandomSource
//!   timer ──► HostTime ───────────────► advance()
//!                                        │
//!                                        ▼
//!                                take_changes() ──► Presenter::apply()
//!                                        │
//!                                        └──────► trace::emit()
//! ```
//!
//! **[`controller`]**: The state machine and its registry.
//!
//! **[`element`]**: Node keys, handles, categories, entrance variants,
//! visibility states, and fly-away parameters.
//!
//! **[`backend`]**: Capability traits hosts implement, plus deterministic
//! random sources.
//!
//! **[`discovery`]**: Discovery paths, the structural watcher capability,
//! and class-list classification.
//!
//! **[`changes`]**: The effect batch produced by controller operations.
//!
//! **[`markup`]**: The class and custom-property edits presenters apply.
//!
//! **[`config`]**: Thresholds, distances, and timings.
//!
//! **[`scroll`]**: Scroll-direction tracking.
//!
//! **[`time`]**: Microsecond host time.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) and the zero-overhead
//! [`Tracer`](trace::Tracer).
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod changes;
pub mod config;
pub mod controller;
pub mod discovery;
pub mod element;
mod flight;
pub mod markup;
mod registry;
pub mod scroll;
pub mod time;
pub mod trace;

pub use flight::{draw_fly_away, draw_stagger};
