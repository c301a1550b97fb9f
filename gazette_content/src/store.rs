// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The store contract and its in-memory implementation.
//!
//! [`ContentStore`] mirrors the backend's table API: list, get, create,
//! update and delete per record kind, plus image upload and removal in a
//! single bucket. Deleting a record that owns an image removes the image
//! first.

use std::collections::BTreeMap;

use crate::error::ContentError;
use crate::record::{Announcement, CalendarEvent, Record, ResourceSection, StoredImage};

/// CRUD for newsletter content and its images.
pub trait ContentStore {
    /// Announcements by `display_order`.
    fn list_announcements(&self) -> Vec<Announcement>;
    /// One announcement.
    fn get_announcement(&self, id: &str) -> Result<Announcement, ContentError>;
    /// Inserts an announcement and returns it with its new id.
    fn create_announcement(&mut self, record: Announcement) -> Result<Announcement, ContentError>;
    /// Replaces an announcement.
    fn update_announcement(
        &mut self,
        id: &str,
        record: Announcement,
    ) -> Result<Announcement, ContentError>;
    /// Removes an announcement and its image.
    fn delete_announcement(&mut self, id: &str) -> Result<(), ContentError>;

    /// Calendar events by `event_date`, then `display_order`.
    fn list_events(&self) -> Vec<CalendarEvent>;
    /// One calendar event.
    fn get_event(&self, id: &str) -> Result<CalendarEvent, ContentError>;
    /// Inserts a calendar event and returns it with its new id.
    fn create_event(&mut self, record: CalendarEvent) -> Result<CalendarEvent, ContentError>;
    /// Replaces a calendar event.
    fn update_event(
        &mut self,
        id: &str,
        record: CalendarEvent,
    ) -> Result<CalendarEvent, ContentError>;
    /// Removes a calendar event.
    fn delete_event(&mut self, id: &str) -> Result<(), ContentError>;

    /// Resource sections by `display_order`.
    fn list_sections(&self) -> Vec<ResourceSection>;
    /// One resource section.
    fn get_section(&self, id: &str) -> Result<ResourceSection, ContentError>;
    /// Inserts a resource section and returns it with its new id.
    fn create_section(&mut self, record: ResourceSection)
        -> Result<ResourceSection, ContentError>;
    /// Replaces a resource section.
    fn update_section(
        &mut self,
        id: &str,
        record: ResourceSection,
    ) -> Result<ResourceSection, ContentError>;
    /// Removes a resource section and its image.
    fn delete_section(&mut self, id: &str) -> Result<(), ContentError>;

    /// Stores `bytes` as `{now_millis}_{file_name}`.
    fn upload_image(
        &mut self,
        file_name: &str,
        bytes: Vec<u8>,
        now_millis: u64,
    ) -> Result<StoredImage, ContentError>;
    /// Removes a stored image.
    fn delete_image(&mut self, path: &str) -> Result<(), ContentError>;
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Rows of one kind in insertion order.
#[derive(Debug)]
struct Table<R> {
    rows: Vec<R>,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<R: Record> Table<R> {
    fn list(&self) -> Vec<R> {
        let mut rows = self.rows.clone();
        // Stable: ties keep insertion order.
        rows.sort_by(R::list_order);
        rows
    }

    fn position(&self, id: &str) -> Result<usize, ContentError> {
        self.rows
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| ContentError::NotFound {
                kind: R::KIND,
                id: id.to_owned(),
            })
    }

    fn get(&self, id: &str) -> Result<R, ContentError> {
        Ok(self.rows[self.position(id)?].clone())
    }

    /// Expects a validated record.
    fn create(&mut self, mut record: R, id: String) -> R {
        record.set_id(id);
        self.rows.push(record.clone());
        record
    }

    fn update(&mut self, id: &str, mut record: R) -> Result<R, ContentError> {
        let at = self.position(id)?;
        record.validate()?;
        record.set_id(id.to_owned());
        self.rows[at] = record.clone();
        Ok(record)
    }

    fn image_of(&self, id: &str) -> Result<Option<String>, ContentError> {
        Ok(self.rows[self.position(id)?].image_path().map(str::to_owned))
    }

    fn remove(&mut self, id: &str) -> Result<R, ContentError> {
        let at = self.position(id)?;
        Ok(self.rows.remove(at))
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// Bucket URL prefix used by [`MemoryStore::new`].
pub const DEFAULT_IMAGE_BASE: &str = "memory://newsletter-images/";

/// A [`ContentStore`] held entirely in memory.
///
/// Ids are sequential decimal strings shared across all tables.
#[derive(Debug)]
pub struct MemoryStore {
    announcements: Table<Announcement>,
    events: Table<CalendarEvent>,
    sections: Table<ResourceSection>,
    images: BTreeMap<String, Vec<u8>>,
    image_base: String,
    next_id: u64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store with [`DEFAULT_IMAGE_BASE`] URLs.
    #[must_use]
    pub fn new() -> Self {
        Self::with_image_base(DEFAULT_IMAGE_BASE)
    }

    /// Creates an empty store whose image URLs start with `base`.
    #[must_use]
    pub fn with_image_base(base: impl Into<String>) -> Self {
        Self {
            announcements: Table::default(),
            events: Table::default(),
            sections: Table::default(),
            images: BTreeMap::new(),
            image_base: base.into(),
            next_id: 1,
        }
    }

    /// Bytes stored at `path`.
    #[must_use]
    pub fn image(&self, path: &str) -> Option<&[u8]> {
        self.images.get(path).map(Vec::as_slice)
    }

    /// Number of stored images.
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    fn fresh_id(&mut self) -> String {
        let id = self.next_id;
        self.next_id += 1;
        id.to_string()
    }

    /// Drops the image a deleted record pointed at.
    ///
    /// An image that is already gone is not an error.
    fn release_image(&mut self, path: Option<&str>) {
        if let Some(path) = path {
            self.images.remove(path);
        }
    }
}

impl ContentStore for MemoryStore {
    fn list_announcements(&self) -> Vec<Announcement> {
        self.announcements.list()
    }

    fn get_announcement(&self, id: &str) -> Result<Announcement, ContentError> {
        self.announcements.get(id)
    }

    fn create_announcement(&mut self, record: Announcement) -> Result<Announcement, ContentError> {
        record.validate()?;
        let id = self.fresh_id();
        Ok(self.announcements.create(record, id))
    }

    fn update_announcement(
        &mut self,
        id: &str,
        record: Announcement,
    ) -> Result<Announcement, ContentError> {
        self.announcements.update(id, record)
    }

    fn delete_announcement(&mut self, id: &str) -> Result<(), ContentError> {
        let path = self.announcements.image_of(id)?;
        self.release_image(path.as_deref());
        self.announcements.remove(id).map(drop)
    }

    fn list_events(&self) -> Vec<CalendarEvent> {
        self.events.list()
    }

    fn get_event(&self, id: &str) -> Result<CalendarEvent, ContentError> {
        self.events.get(id)
    }

    fn create_event(&mut self, record: CalendarEvent) -> Result<CalendarEvent, ContentError> {
        record.validate()?;
        let id = self.fresh_id();
        Ok(self.events.create(record, id))
    }

    fn update_event(
        &mut self,
        id: &str,
        record: CalendarEvent,
    ) -> Result<CalendarEvent, ContentError> {
        self.events.update(id, record)
    }

    fn delete_event(&mut self, id: &str) -> Result<(), ContentError> {
        self.events.remove(id).map(drop)
    }

    fn list_sections(&self) -> Vec<ResourceSection> {
        self.sections.list()
    }

    fn get_section(&self, id: &str) -> Result<ResourceSection, ContentError> {
        self.sections.get(id)
    }

    fn create_section(
        &mut self,
        record: ResourceSection,
    ) -> Result<ResourceSection, ContentError> {
        record.validate()?;
        let id = self.fresh_id();
        Ok(self.sections.create(record, id))
    }

    fn update_section(
        &mut self,
        id: &str,
        record: ResourceSection,
    ) -> Result<ResourceSection, ContentError> {
        self.sections.update(id, record)
    }

    fn delete_section(&mut self, id: &str) -> Result<(), ContentError> {
        let path = self.sections.image_of(id)?;
        self.release_image(path.as_deref());
        self.sections.remove(id).map(drop)
    }

    fn upload_image(
        &mut self,
        file_name: &str,
        bytes: Vec<u8>,
        now_millis: u64,
    ) -> Result<StoredImage, ContentError> {
        if file_name.trim().is_empty() || file_name.contains('/') {
            return Err(ContentError::InvalidImageName(file_name.to_owned()));
        }
        let path = format!("{now_millis}_{file_name}");
        if self.images.contains_key(&path) {
            return Err(ContentError::ImageExists(path));
        }
        let url = format!("{}{path}", self.image_base);
        self.images.insert(path.clone(), bytes);
        Ok(StoredImage { path, url })
    }

    fn delete_image(&mut self, path: &str) -> Result<(), ContentError> {
        self.images
            .remove(path)
            .map(drop)
            .ok_or_else(|| ContentError::ImageNotFound(path.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ContentKind;

    fn announcement(title: &str, order: i32) -> Announcement {
        Announcement {
            title: title.into(),
            description: "body".into(),
            display_order: order,
            ..Announcement::default()
        }
    }

    #[test]
    fn ids_are_sequential_across_tables() {
        let mut s = MemoryStore::new();
        let a = s.create_announcement(announcement("a", 0)).unwrap();
        let e = s
            .create_event(CalendarEvent {
                title: "t".into(),
                description: "d".into(),
                event_date: "2026-05-01".into(),
                ..CalendarEvent::default()
            })
            .unwrap();
        assert_eq!(a.id, "1");
        assert_eq!(e.id, "2");
    }

    #[test]
    fn list_orders_by_display_order_stably() {
        let mut s = MemoryStore::new();
        s.create_announcement(announcement("late", 2)).unwrap();
        s.create_announcement(announcement("first", 0)).unwrap();
        s.create_announcement(announcement("tie", 2)).unwrap();
        let titles: Vec<_> = s.list_announcements().into_iter().map(|a| a.title).collect();
        assert_eq!(titles, ["first", "late", "tie"]);
    }

    #[test]
    fn invalid_create_does_not_consume_an_id() {
        let mut s = MemoryStore::new();
        let err = s.create_announcement(announcement("", 0)).unwrap_err();
        assert!(matches!(err, ContentError::Validation { .. }), "got {err:?}");
        assert_eq!(s.create_announcement(announcement("ok", 0)).unwrap().id, "1");
    }

    #[test]
    fn update_keeps_id_and_rejects_unknown() {
        let mut s = MemoryStore::new();
        let a = s.create_announcement(announcement("old", 0)).unwrap();
        let updated = s.update_announcement(&a.id, announcement("new", 1)).unwrap();
        assert_eq!(updated.id, a.id);
        assert_eq!(s.get_announcement(&a.id).unwrap().title, "new");
        assert_eq!(
            s.update_announcement("99", announcement("x", 0)),
            Err(ContentError::NotFound {
                kind: ContentKind::Announcement,
                id: "99".into(),
            })
        );
    }

    #[test]
    fn upload_names_and_duplicates() {
        let mut s = MemoryStore::with_image_base("https://cdn.test/");
        let img = s.upload_image("flyer.png", vec![1, 2, 3], 1_700).unwrap();
        assert_eq!(img.path, "1700_flyer.png");
        assert_eq!(img.url, "https://cdn.test/1700_flyer.png");
        assert_eq!(s.image(&img.path), Some(&[1, 2, 3][..]));
        assert_eq!(
            s.upload_image("flyer.png", vec![], 1_700),
            Err(ContentError::ImageExists("1700_flyer.png".into()))
        );
        assert!(matches!(
            s.upload_image("a/b.png", vec![], 1),
            Err(ContentError::InvalidImageName(_))
        ));
    }

    #[test]
    fn deleting_a_record_removes_its_image() {
        let mut s = MemoryStore::new();
        let img = s.upload_image("p.jpg", vec![9], 5).unwrap();
        let a = s
            .create_announcement(Announcement {
                image_url: Some(img.url.clone()),
                image_path: Some(img.path.clone()),
                ..announcement("pic", 0)
            })
            .unwrap();
        s.delete_announcement(&a.id).unwrap();
        assert_eq!(s.image_count(), 0);
        assert!(s.list_announcements().is_empty());
    }

    #[test]
    fn delete_tolerates_missing_image() {
        let mut s = MemoryStore::new();
        let r = s
            .create_section(ResourceSection {
                title: "Library".into(),
                description: "Hours".into(),
                image_path: Some("gone.png".into()),
                ..ResourceSection::default()
            })
            .unwrap();
        assert_eq!(s.delete_section(&r.id), Ok(()));
        assert_eq!(
            s.delete_section(&r.id),
            Err(ContentError::NotFound {
                kind: ContentKind::ResourceSection,
                id: r.id,
            })
        );
    }

    #[test]
    fn delete_image_reports_missing() {
        let mut s = MemoryStore::new();
        assert_eq!(
            s.delete_image("nope"),
            Err(ContentError::ImageNotFound("nope".into()))
        );
    }

    #[test]
    fn events_list_by_date() {
        let mut s = MemoryStore::new();
        for (title, date) in [("b", "2026-04-02"), ("a", "2026-04-01")] {
            s.create_event(CalendarEvent {
                title: title.into(),
                description: "d".into(),
                event_date: date.into(),
                ..CalendarEvent::default()
            })
            .unwrap();
        }
        let titles: Vec<_> = s.list_events().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, ["a", "b"]);
    }

    #[test]
    fn nonexistent_event_dates_are_not_stored() {
        let mut s = MemoryStore::new();
        for date in ["2026-02-31", "2025-02-29", "2026-04-31"] {
            let created = s.create_event(CalendarEvent {
                title: "t".into(),
                description: "d".into(),
                event_date: date.into(),
                ..CalendarEvent::default()
            });
            assert_eq!(
                created,
                Err(ContentError::Validation {
                    kind: ContentKind::CalendarEvent,
                    reason: "event_date must be YYYY-MM-DD",
                }),
                "{date} was accepted"
            );
        }
        assert!(s.list_events().is_empty(), "nothing was stored");
    }
}
