// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Content records and the store contract behind the Gazette newsletter.
//!
//! The newsletter shows three kinds of editor-managed content:
//! announcements, calendar events, and resource sections. This crate defines
//! their [`record`] types, the [`ContentStore`](store::ContentStore) contract
//! the admin panel and render layers talk to, an in-memory
//! [`MemoryStore`](store::MemoryStore), and the [`BatchRendered`]
//! notification render layers send after inserting a batch of nodes.

pub mod error;
pub mod record;
pub mod store;

pub use error::ContentError;
pub use record::ContentKind;

/// Name of the document event that announces a rendered batch.
pub const BATCH_RENDERED_EVENT: &str = "dynamicContentLoaded";

/// A render layer finished inserting `count` nodes of one kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct BatchRendered {
    /// Which layer rendered.
    pub kind: ContentKind,
    /// Number of items inserted.
    pub count: usize,
}

impl BatchRendered {
    /// Creates a notification for a batch of `count` records.
    #[must_use]
    pub const fn new(kind: ContentKind, count: usize) -> Self {
        Self { kind, count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_serializes_as_event_detail() {
        let batch = BatchRendered::new(ContentKind::CalendarEvent, 4);
        let json = serde_json::to_string(&batch).unwrap();
        assert_eq!(json, r#"{"kind":"calendar_event","count":4}"#);
    }
}
