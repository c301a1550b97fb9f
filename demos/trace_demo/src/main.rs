// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted newsletter session that exercises the tracing pipeline.
//!
//! Renders a small newsletter from an in-memory store into a simulated page,
//! scrolls down and back up, and records every controller effect to both a
//! [`PrettyPrintSink`](gazette_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](gazette_debug::recorder::RecorderSink). The recording is
//! then exported as a Chrome trace.

use std::fs::File;
use std::io::BufWriter;

use gazette_content::record::{Announcement, CalendarEvent};
use gazette_content::store::{ContentStore, MemoryStore};
use gazette_content::{BatchRendered, ContentKind};
use gazette_core::config::ControllerConfig;
use gazette_core::time::Duration;
use gazette_core::trace::{Tracer, emit, emit_to};
use gazette_debug::pretty::PrettyPrintSink;
use gazette_debug::recorder::RecorderSink;
use gazette_sim::{SimPage, Simulation};
use kurbo::{Rect, Size};

const VIEWPORT: Size = Size::new(1200.0, 800.0);
const CARD_HEIGHT: f64 = 300.0;
const CARD_GAP: f64 = 50.0;
const FRAME: Duration = Duration::from_millis(16);

struct Sinks {
    pretty: PrettyPrintSink,
    recorder: RecorderSink,
}

impl Sinks {
    fn drain(&mut self, sim: &mut Simulation) {
        let changes = sim.take_log();
        emit(&changes, &mut Tracer::new(&mut self.pretty));
        emit_to(&changes, &mut self.recorder);
    }
}

fn seed(store: &mut MemoryStore) {
    let announcements = [
        ("Spring fair", "Booths open at 10am. Details at https://example.org/fair."),
        ("Library hours", "Extended through finals week."),
        ("Volunteers wanted", "Write to help@example.org to sign up."),
        ("Bus route change", "Route 4 skips Elm St until May."),
    ];
    for (order, (title, description)) in (0..).zip(announcements) {
        store
            .create_announcement(Announcement {
                title: title.into(),
                description: description.into(),
                display_order: order,
                ..Announcement::default()
            })
            .expect("seed announcement is valid");
    }
    for (date, title) in [("2026-05-02", "Board meeting"), ("2026-05-16", "Field day")] {
        store
            .create_event(CalendarEvent {
                title: title.into(),
                description: "All welcome.".into(),
                event_date: date.into(),
                ..CalendarEvent::default()
            })
            .expect("seed event is valid");
    }
}

fn card(row: u32) -> Rect {
    let top = 350.0 + f64::from(row) * (CARD_HEIGHT + CARD_GAP);
    Rect::new(0.0, top, VIEWPORT.width, top + CARD_HEIGHT)
}

fn main() {
    let mut store = MemoryStore::new();
    seed(&mut store);

    let mut sinks = Sinks {
        pretty: PrettyPrintSink::new(Box::new(std::io::stdout())),
        recorder: RecorderSink::new(),
    };

    // -- static markup -----------------------------------------------------
    let mut page = SimPage::new(VIEWPORT);
    page.insert(&["section", "fade-in"], Rect::new(0.0, 0.0, VIEWPORT.width, 300.0));
    let mut sim = Simulation::new(page, ControllerConfig::web(), 7);
    sim.install();
    sinks.drain(&mut sim);

    // -- announcements: rendered, then announced -----------------------------
    let announcements = store.list_announcements();
    let mut row = 0_u32;
    for a in &announcements {
        println!("render {:>2}: {}", a.id, gazette_text::format(&a.description));
        sim.insert(&[ContentKind::Announcement.item_class()], card(row));
        row += 1;
    }
    sim.notify(BatchRendered::new(ContentKind::Announcement, announcements.len()));
    sinks.drain(&mut sim);

    // -- calendar: rendered without a notification ---------------------------
    let events = store.list_events();
    for e in &events {
        println!("render {:>2}: {} on {}", e.id, e.title, e.event_date);
        sim.insert(&[ContentKind::CalendarEvent.item_class()], card(row));
        row += 1;
    }
    sim.deliver_mutations();
    sinks.drain(&mut sim);

    // -- scroll down, then back up -----------------------------------------
    let bottom = card(row).y1 - VIEWPORT.height;
    let steps = 24_u32;
    let offsets = (0..=steps)
        .map(|i| bottom * f64::from(i) / f64::from(steps))
        .chain((0..=steps).rev().map(|i| bottom * f64::from(i) / f64::from(steps)));
    for offset in offsets {
        sim.scroll_to(offset);
        sim.advance_by(FRAME);
        sinks.drain(&mut sim);
    }
    sim.settle();
    sinks.drain(&mut sim);

    // -- export Chrome trace -----------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    gazette_debug::chrome::export(sinks.recorder.as_bytes(), &mut writer)
        .expect("failed to write Chrome trace");

    println!(
        "Wrote {path} ({} tracked, {} bytes recorded)",
        sim.controller().len(),
        sinks.recorder.as_bytes().len()
    );
}
