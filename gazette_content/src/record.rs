// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Record types, one per backend table.
//!
//! Field names follow the backend's snake_case columns so records serialize
//! straight into rows. Optional columns are omitted when unset.

use core::cmp::Ordering;
use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// The three content tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// `announcements`, rendered into the grid.
    Announcement,
    /// `calendar_events`, rendered into the calendar list.
    CalendarEvent,
    /// `resource_sections`, rendered into the resources column.
    ResourceSection,
}

impl ContentKind {
    /// All kinds, in render order.
    pub const ALL: [Self; 3] = [Self::Announcement, Self::CalendarEvent, Self::ResourceSection];

    /// Backend table name.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Announcement => "announcements",
            Self::CalendarEvent => "calendar_events",
            Self::ResourceSection => "resource_sections",
        }
    }

    /// Class the render layer puts on each item it inserts.
    #[must_use]
    pub const fn item_class(self) -> &'static str {
        match self {
            Self::Announcement => "grid-item",
            Self::CalendarEvent => "calendar-item",
            Self::ResourceSection => "resource-item",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Announcement => "announcement",
            Self::CalendarEvent => "calendar event",
            Self::ResourceSection => "resource section",
        })
    }
}

/// Image placement within an announcement card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Image first.
    #[default]
    Normal,
    /// Text first.
    Reverse,
}

/// A grid announcement.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    /// Store-assigned id; ignored on create.
    #[serde(default)]
    pub id: String,
    /// Headline.
    pub title: String,
    /// Body text, formatted for display.
    pub description: String,
    /// Extra paragraphs shown under the description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Public URL of the image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Path of the uploaded image in the bucket, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    /// Card layout.
    #[serde(default)]
    pub layout: Layout,
    /// Sort key within the table.
    #[serde(default)]
    pub display_order: i32,
    /// Creation timestamp, as stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp, as stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A dated calendar entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Store-assigned id; ignored on create.
    #[serde(default)]
    pub id: String,
    /// Headline.
    pub title: String,
    /// Body text, formatted for display.
    pub description: String,
    /// `YYYY-MM-DD`.
    pub event_date: String,
    /// Optional external link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    /// Sort key within the table.
    #[serde(default)]
    pub display_order: i32,
    /// Creation timestamp, as stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp, as stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A resources column entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSection {
    /// Store-assigned id; ignored on create.
    #[serde(default)]
    pub id: String,
    /// Headline.
    pub title: String,
    /// Body text, formatted for display.
    pub description: String,
    /// Public URL of the image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Path of the uploaded image in the bucket, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    /// Sort key within the table.
    #[serde(default)]
    pub display_order: i32,
    /// Creation timestamp, as stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp, as stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// An image in the bucket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredImage {
    /// Bucket-relative path, `{millis}_{file_name}`.
    pub path: String,
    /// Public URL.
    pub url: String,
}

/// Behavior shared by the three record types.
pub trait Record: Clone {
    /// Table the record lives in.
    const KIND: ContentKind;

    /// Store-assigned id.
    fn id(&self) -> &str;

    /// Overwrites the id.
    fn set_id(&mut self, id: String);

    /// Path of an attached image that should go away with the record.
    fn image_path(&self) -> Option<&str> {
        None
    }

    /// Listing order.
    fn list_order(&self, other: &Self) -> Ordering;

    /// Checks the record before it is written.
    fn validate(&self) -> Result<(), ContentError>;
}

fn require_text(kind: ContentKind, title: &str, description: &str) -> Result<(), ContentError> {
    if title.trim().is_empty() {
        return Err(ContentError::Validation {
            kind,
            reason: "title is blank",
        });
    }
    if description.trim().is_empty() {
        return Err(ContentError::Validation {
            kind,
            reason: "description is blank",
        });
    }
    Ok(())
}

/// Returns `true` for an existing calendar date written as `YYYY-MM-DD`.
///
/// The shape is checked separately because the parser also accepts
/// single-digit months and days and signed years.
#[must_use]
pub fn is_iso_date(s: &str) -> bool {
    let shaped = s.len() == 10
        && s.bytes()
            .enumerate()
            .all(|(i, b)| if i == 4 || i == 7 { b == b'-' } else { b.is_ascii_digit() });
    shaped && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

impl Record for Announcement {
    const KIND: ContentKind = ContentKind::Announcement;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn image_path(&self) -> Option<&str> {
        self.image_path.as_deref()
    }

    fn list_order(&self, other: &Self) -> Ordering {
        self.display_order.cmp(&other.display_order)
    }

    fn validate(&self) -> Result<(), ContentError> {
        require_text(Self::KIND, &self.title, &self.description)
    }
}

impl Record for CalendarEvent {
    const KIND: ContentKind = ContentKind::CalendarEvent;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn list_order(&self, other: &Self) -> Ordering {
        self.event_date
            .cmp(&other.event_date)
            .then(self.display_order.cmp(&other.display_order))
    }

    fn validate(&self) -> Result<(), ContentError> {
        require_text(Self::KIND, &self.title, &self.description)?;
        if !is_iso_date(&self.event_date) {
            return Err(ContentError::Validation {
                kind: Self::KIND,
                reason: "event_date must be YYYY-MM-DD",
            });
        }
        Ok(())
    }
}

impl Record for ResourceSection {
    const KIND: ContentKind = ContentKind::ResourceSection;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn image_path(&self) -> Option<&str> {
        self.image_path.as_deref()
    }

    fn list_order(&self, other: &Self) -> Ordering {
        self.display_order.cmp(&other.display_order)
    }

    fn validate(&self) -> Result<(), ContentError> {
        require_text(Self::KIND, &self.title, &self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_serializes_lowercase() {
        let a = Announcement {
            title: "Welcome".into(),
            description: "Hello".into(),
            layout: Layout::Reverse,
            ..Announcement::default()
        };
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["layout"], "reverse");
        assert!(json.get("image_url").is_none(), "unset columns are omitted");
    }

    #[test]
    fn rows_deserialize_with_missing_optionals() {
        let row = r#"{"id":"7","title":"Fair","description":"Booths","event_date":"2026-03-14"}"#;
        let e: CalendarEvent = serde_json::from_str(row).unwrap();
        assert_eq!(e.id, "7");
        assert_eq!(e.display_order, 0);
        assert_eq!(e.link_url, None);
    }

    #[test]
    fn iso_dates() {
        assert!(is_iso_date("2026-01-31"));
        assert!(!is_iso_date("2026-13-01"));
        assert!(!is_iso_date("2026-00-10"));
        assert!(!is_iso_date("2026/01/31"));
        assert!(!is_iso_date("26-01-31"));
        assert!(!is_iso_date("2026-1-031"));
        assert!(!is_iso_date("+026-01-31"));
    }

    #[test]
    fn impossible_days_are_rejected() {
        assert!(is_iso_date("2024-02-29"), "leap day in a leap year");
        for date in ["2026-02-31", "2025-02-29", "2026-04-31", "2026-01-00", "2026-01-32"] {
            assert!(!is_iso_date(date), "{date} is not a calendar date");
        }
    }

    #[test]
    fn blank_fields_fail_validation() {
        let s = ResourceSection {
            title: "  ".into(),
            description: "x".into(),
            ..ResourceSection::default()
        };
        assert_eq!(
            s.validate(),
            Err(ContentError::Validation {
                kind: ContentKind::ResourceSection,
                reason: "title is blank",
            })
        );
    }

    #[test]
    fn events_order_by_date_then_display_order() {
        let at = |date: &str, order| CalendarEvent {
            event_date: date.into(),
            display_order: order,
            ..CalendarEvent::default()
        };
        assert_eq!(at("2026-02-01", 5).list_order(&at("2026-03-01", 0)), Ordering::Less);
        assert_eq!(at("2026-02-01", 5).list_order(&at("2026-02-01", 1)), Ordering::Greater);
    }

    #[test]
    fn kind_names() {
        assert_eq!(ContentKind::CalendarEvent.table(), "calendar_events");
        assert_eq!(ContentKind::Announcement.item_class(), "grid-item");
        assert_eq!(ContentKind::ResourceSection.to_string(), "resource section");
    }
}
