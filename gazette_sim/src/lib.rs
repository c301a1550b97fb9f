// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless driver for the Gazette visibility controller.
//!
//! [`Simulation`] couples a [`VisibilityController`] with a [`SimPage`] and
//! plays the host's part: it evaluates intersections against the page
//! geometry, forwards scroll offsets, fires flight deadlines from a virtual
//! clock, and applies every change batch to the page's class lists. All
//! effects are also accumulated in a log for inspection or tracing.
//!
//! Intersection reporting follows the browser: a node is reported once when
//! it starts being observed and again whenever its intersecting state flips.
//! "Intersecting" means the visible fraction inside the inset viewport is at
//! least the configured threshold.

pub mod page;

use std::collections::BTreeMap;

use gazette_content::BatchRendered;
use gazette_core::backend::{
    IntersectionEntry, Layout, Observer, Presenter, RandomSource, SplitMix64,
};
use gazette_core::changes::{Changes, RescanReport};
use gazette_core::config::ControllerConfig;
use gazette_core::controller::VisibilityController;
use gazette_core::discovery::{DiscoverySource, StructureWatcher};
use gazette_core::element::NodeKey;
use gazette_core::time::{Duration, HostTime};

pub use page::{SimElement, SimPage};

/// Records which nodes the controller asked to observe.
#[derive(Clone, Debug, Default)]
pub struct SimObserver {
    observed: Vec<NodeKey>,
    disconnects: u32,
}

impl SimObserver {
    /// Observed nodes in observation order.
    #[must_use]
    pub fn observed(&self) -> &[NodeKey] {
        &self.observed
    }

    /// Number of [`disconnect`](Observer::disconnect) calls.
    #[must_use]
    pub fn disconnects(&self) -> u32 {
        self.disconnects
    }
}

impl Observer for SimObserver {
    fn observe(&mut self, node: NodeKey) {
        self.observed.push(node);
    }

    fn disconnect(&mut self) {
        self.observed.clear();
        self.disconnects += 1;
    }
}

/// Queues inserted nodes while watching.
#[derive(Clone, Debug, Default)]
pub struct SimWatcher {
    watching: bool,
    pending: Vec<NodeKey>,
}

impl SimWatcher {
    /// Whether insertions are currently recorded.
    #[must_use]
    pub fn is_watching(&self) -> bool {
        self.watching
    }

    fn record(&mut self, node: NodeKey) {
        if self.watching {
            self.pending.push(node);
        }
    }

    fn drain(&mut self) -> Vec<NodeKey> {
        core::mem::take(&mut self.pending)
    }
}

impl StructureWatcher for SimWatcher {
    fn watch(&mut self) {
        self.watching = true;
    }

    fn disconnect(&mut self) {
        self.watching = false;
        self.pending.clear();
    }
}

/// A controller driven against a simulated page with a virtual clock.
#[derive(Debug)]
pub struct Simulation<R = SplitMix64> {
    page: SimPage,
    controller: VisibilityController<SimObserver>,
    watcher: SimWatcher,
    rng: R,
    reported: BTreeMap<NodeKey, bool>,
    log: Changes,
    now: HostTime,
}

impl Simulation<SplitMix64> {
    /// Creates a simulation with a seeded random source.
    #[must_use]
    pub fn new(page: SimPage, config: ControllerConfig, seed: u64) -> Self {
        Self::with_rng(page, config, SplitMix64::new(seed))
    }
}

impl<R: RandomSource> Simulation<R> {
    /// Creates a simulation drawing fly-away parameters from `rng`.
    #[must_use]
    pub fn with_rng(page: SimPage, config: ControllerConfig, rng: R) -> Self {
        Self::build(page, VisibilityController::new(config, SimObserver::default()), rng)
    }

    /// Creates a simulation whose host has no intersection observer.
    #[must_use]
    pub fn degraded(page: SimPage, config: ControllerConfig, rng: R) -> Self {
        Self::build(page, VisibilityController::degraded(config), rng)
    }

    fn build(page: SimPage, controller: VisibilityController<SimObserver>, rng: R) -> Self {
        Self {
            page,
            controller,
            watcher: SimWatcher::default(),
            rng,
            reported: BTreeMap::new(),
            log: Changes::default(),
            now: HostTime(0),
        }
    }

    // -- Accessors --

    /// The simulated page.
    #[must_use]
    pub fn page(&self) -> &SimPage {
        &self.page
    }

    /// The controller under test.
    #[must_use]
    pub fn controller(&self) -> &VisibilityController<SimObserver> {
        &self.controller
    }

    /// The structural watcher.
    #[must_use]
    pub fn watcher(&self) -> &SimWatcher {
        &self.watcher
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> HostTime {
        self.now
    }

    /// Every effect since the last [`take_log`](Self::take_log).
    #[must_use]
    pub fn log(&self) -> &Changes {
        &self.log
    }

    /// Drains the effect log.
    pub fn take_log(&mut self) -> Changes {
        core::mem::take(&mut self.log)
    }

    // -- Setup --

    /// Registers everything already on the page and starts watching for
    /// insertions.
    pub fn install(&mut self) -> RescanReport {
        let report = self.controller.register_static(self.page.candidates(None));
        if !self.controller.is_degraded() {
            self.watcher.watch();
        }
        self.flush();
        self.deliver_intersections();
        report
    }

    /// Inserts an element, as a render layer would.
    pub fn insert(&mut self, classes: &[&str], rect: kurbo::Rect) -> NodeKey {
        let node = self.page.insert(classes, rect);
        self.watcher.record(node);
        node
    }

    /// Mutable access to the page for geometry changes.
    pub fn page_mut(&mut self) -> &mut SimPage {
        &mut self.page
    }

    // -- Discovery --

    /// Handles a render layer's batch notification.
    ///
    /// Only elements carrying the batch kind's item class are scanned.
    /// Anything else inserted since is left to [`Self::deliver_mutations`].
    pub fn notify(&mut self, batch: BatchRendered) -> RescanReport {
        let scope = self.page.nodes_with_class(batch.kind.item_class());
        let report = self
            .controller
            .rescan(DiscoverySource::Notification, self.page.candidates(Some(&scope)));
        self.flush();
        self.deliver_intersections();
        report
    }

    /// Delivers queued insertions to the controller.
    pub fn deliver_mutations(&mut self) -> RescanReport {
        let inserted = self.watcher.drain();
        let report = self.controller.rescan(
            DiscoverySource::Structural,
            self.page.candidates(Some(&inserted)),
        );
        self.flush();
        self.deliver_intersections();
        report
    }

    // -- Events --

    /// Scrolls to `offset` at the current time.
    pub fn scroll_to(&mut self, offset: f64) {
        self.page.set_scroll_y(offset);
        let offset = self.page.scroll_y();
        self.controller
            .on_scroll(offset, &self.page, &mut self.rng, self.now);
        self.flush();
        self.deliver_intersections();
    }

    /// Reports a synthetic intersection entry for `node`, bypassing the
    /// page geometry.
    ///
    /// Later geometry-driven reports treat this as the last reported state.
    pub fn force_intersection(&mut self, node: NodeKey, is_intersecting: bool) {
        let Some(bounds) = self.page.bounds(node) else {
            return;
        };
        self.reported.insert(node, is_intersecting);
        self.controller.on_intersections(
            &[IntersectionEntry {
                node,
                is_intersecting,
                bounds,
            }],
            self.now,
        );
        self.flush();
    }

    /// Moves the clock forward, firing every flight phase that falls due.
    pub fn advance_by(&mut self, duration: Duration) {
        self.now = self.now + duration;
        self.controller.advance(self.now);
        self.flush();
    }

    /// Runs the clock until no flight is pending.
    pub fn settle(&mut self) {
        while let Some(deadline) = self.controller.next_deadline() {
            self.now = self.now.max(deadline);
            self.controller.advance(self.now);
            self.flush();
        }
    }

    /// Tears the controller down and stops watching.
    pub fn teardown(&mut self) {
        self.controller.teardown();
        self.watcher.disconnect();
        self.reported.clear();
    }

    // -- Host plumbing --

    fn flush(&mut self) {
        let changes = self.controller.take_changes();
        if changes.is_empty() {
            return;
        }
        self.page.apply(&changes);
        self.log.extend(changes);
    }

    fn deliver_intersections(&mut self) {
        let Some(observer) = self.controller.observer() else {
            return;
        };
        let config = self.controller.config();
        let mut entries = Vec::new();
        for &node in observer.observed() {
            let Some(is) = self
                .page
                .intersects(node, config.threshold, config.bottom_inset)
            else {
                continue;
            };
            if self.reported.get(&node) == Some(&is) {
                continue;
            }
            let Some(bounds) = self.page.bounds(node) else {
                continue;
            };
            entries.push(IntersectionEntry {
                node,
                is_intersecting: is,
                bounds,
            });
        }
        if entries.is_empty() {
            return;
        }
        for e in &entries {
            self.reported.insert(e.node, e.is_intersecting);
        }
        self.controller.on_intersections(&entries, self.now);
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gazette_content::ContentKind;
    use gazette_core::element::{Entrance, Visibility};
    use gazette_core::markup::{FLY_AWAY, FLY_X_VAR, VISIBLE};
    use kurbo::{Rect, Size};

    const VH: f64 = 800.0;

    fn page() -> SimPage {
        SimPage::new(Size::new(400.0, VH))
    }

    fn band(top: f64, height: f64) -> Rect {
        Rect::new(0.0, top, 400.0, top + height)
    }

    fn states(sim: &Simulation<impl RandomSource>, node: NodeKey) -> Vec<(Visibility, Visibility)> {
        sim.log().transitions_for(node).map(|t| (t.from, t.to)).collect()
    }

    #[test]
    fn three_sections_scenario() {
        let mut p = page();
        let s1 = p.insert(&["section"], band(3000.0, 300.0));
        let s2 = p.insert(&["section"], band(1100.0, 300.0));
        let s3 = p.insert(&["section"], band(4000.0, 300.0));
        let mut sim = Simulation::new(p, ControllerConfig::web(), 7);
        sim.install();

        for s in [s1, s2, s3] {
            assert_eq!(sim.controller().entrance(s), Some(Entrance::FromBelow));
            assert!(sim.page().has_class(s, "fade-in-up"));
        }

        sim.force_intersection(s2, true);
        assert_eq!(sim.controller().visibility(s1), Some(Visibility::Hidden));
        assert_eq!(sim.controller().visibility(s2), Some(Visibility::Visible));
        assert_eq!(sim.controller().visibility(s3), Some(Visibility::Hidden));

        // Down to 500 (top at 600), then up by 50: top at VH - 150.
        sim.scroll_to(500.0);
        assert_eq!(sim.controller().visibility(s2), Some(Visibility::Visible));
        sim.scroll_to(450.0);
        assert_eq!(sim.page().bounds(s2).map(|r| r.y0), Some(VH - 150.0));
        assert_eq!(sim.controller().visibility(s2), Some(Visibility::FlyingAway));
        assert!(sim.page().has_class(s2, FLY_AWAY));
        assert!(!sim.page().has_class(s2, VISIBLE));
        assert!(sim.page().var(s2, FLY_X_VAR).is_some());

        sim.advance_by(Duration::from_millis(950));
        assert_eq!(sim.controller().visibility(s2), Some(Visibility::Hidden));
        assert!(!sim.page().has_class(s2, FLY_AWAY));
        assert_eq!(
            states(&sim, s2),
            [
                (Visibility::Hidden, Visibility::Visible),
                (Visibility::Visible, Visibility::FlyingAway),
                (Visibility::FlyingAway, Visibility::Hidden),
            ]
        );
        assert!(states(&sim, s1).is_empty(), "#1 never changes");
        assert!(states(&sim, s3).is_empty(), "#3 never changes");
    }

    #[test]
    fn repeated_discovery_observes_once() {
        let mut p = page();
        let g = p.insert(&["grid-item"], band(100.0, 200.0));
        let mut sim = Simulation::new(p, ControllerConfig::web(), 1);
        let first = sim.install();
        let again = sim.notify(BatchRendered::new(ContentKind::Announcement, 1));
        let third = sim.notify(BatchRendered::new(ContentKind::Announcement, 1));

        assert_eq!(first.discovered, 1);
        assert_eq!((again.discovered, again.already_tracked), (0, 1));
        assert_eq!((third.discovered, third.already_tracked), (0, 1));
        let observer = sim.controller().observer().unwrap();
        assert_eq!(observer.observed(), [g], "one observation entry");
        assert_eq!(sim.log().registered.len(), 1, "one animation assignment");
        assert_eq!(sim.controller().entrance(g), Some(Entrance::FromLeft));
    }

    #[test]
    fn downward_exit_never_flies() {
        let mut p = page();
        let s = p.insert(&["section"], band(300.0, 300.0));
        let mut sim = Simulation::new(p, ControllerConfig::web(), 3);
        sim.install();
        assert_eq!(sim.controller().visibility(s), Some(Visibility::Visible));

        sim.scroll_to(400.0);
        assert_eq!(sim.controller().visibility(s), Some(Visibility::Visible));
        sim.scroll_to(700.0);
        assert_eq!(
            states(&sim, s),
            [
                (Visibility::Hidden, Visibility::Visible),
                (Visibility::Visible, Visibility::Hidden),
            ]
        );
        assert!(sim.log().flights.is_empty());
    }

    #[test]
    fn grid_items_alternate() {
        let mut sim = Simulation::new(page(), ControllerConfig::web(), 5);
        sim.install();
        let items: Vec<_> = (0..5)
            .map(|i| sim.insert(&["grid-item"], band(2000.0 + f64::from(i) * 400.0, 300.0)))
            .collect();
        sim.notify(BatchRendered::new(ContentKind::Announcement, items.len()));

        let entrances: Vec<_> = items
            .iter()
            .map(|&n| sim.controller().entrance(n))
            .collect();
        assert_eq!(
            entrances,
            [
                Some(Entrance::FromLeft),
                Some(Entrance::FromRight),
                Some(Entrance::FromLeft),
                Some(Entrance::FromRight),
                Some(Entrance::FromLeft),
            ]
        );
        assert!(sim.page().has_class(items[1], "fade-in-right"));
    }

    #[test]
    fn notification_scans_only_its_kind() {
        let mut sim = Simulation::new(page(), ControllerConfig::web(), 6);
        sim.install();
        let g = sim.insert(&["grid-item"], band(2000.0, 300.0));
        let c = sim.insert(&["calendar-item"], band(2400.0, 80.0));
        let report = sim.notify(BatchRendered::new(ContentKind::Announcement, 1));

        assert_eq!(report.discovered, 1);
        assert_eq!(sim.controller().entrance(g), Some(Entrance::FromLeft));
        assert_eq!(sim.controller().visibility(c), None);

        let fallback = sim.deliver_mutations();
        assert_eq!((fallback.discovered, fallback.already_tracked), (1, 1));
        assert_eq!(sim.controller().entrance(c), Some(Entrance::Fade));
    }

    #[test]
    fn missing_observer_changes_nothing() {
        let mut p = page();
        let s = p.insert(&["section"], band(100.0, 300.0));
        let mut sim = Simulation::degraded(p, ControllerConfig::web(), SplitMix64::new(9));
        let report = sim.install();
        let g = sim.insert(&["grid-item"], band(200.0, 100.0));
        sim.notify(BatchRendered::new(ContentKind::Announcement, 1));
        sim.deliver_mutations();
        sim.force_intersection(s, true);
        sim.scroll_to(300.0);
        sim.scroll_to(100.0);
        sim.settle();

        assert_eq!(report.discovered, 0);
        assert!(sim.log().is_empty(), "no effects at all");
        assert!(!sim.watcher().is_watching());
        for n in [s, g] {
            assert_eq!(sim.controller().visibility(n), None);
            assert!(!sim.page().has_class(n, VISIBLE));
        }
    }

    #[test]
    fn structural_insertions_are_picked_up() {
        let mut sim = Simulation::new(page(), ControllerConfig::web(), 2);
        sim.install();
        assert!(sim.watcher().is_watching());
        let c = sim.insert(&["calendar-item"], band(200.0, 80.0));
        let spacer = sim.insert(&["spacer"], band(300.0, 80.0));
        let report = sim.deliver_mutations();

        assert_eq!(report.source, DiscoverySource::Structural);
        assert_eq!(report.discovered, 1);
        assert_eq!(sim.controller().entrance(c), Some(Entrance::Fade));
        assert_eq!(sim.controller().visibility(spacer), None);
        // Within the viewport, so the first report shows it.
        assert_eq!(sim.controller().visibility(c), Some(Visibility::Visible));
    }

    #[test]
    fn detached_node_does_not_fly() {
        let mut p = page();
        let s = p.insert(&["section"], band(700.0, 300.0));
        let mut sim = Simulation::new(p, ControllerConfig::web(), 4);
        sim.install();
        sim.scroll_to(100.0);
        assert_eq!(sim.controller().visibility(s), Some(Visibility::Visible));

        sim.page_mut().detach(s);
        sim.scroll_to(50.0);
        assert_eq!(sim.controller().in_flight(), 0);
        assert_eq!(sim.controller().visibility(s), Some(Visibility::Visible));
    }

    #[test]
    fn settle_lands_every_flight() {
        let mut p = page();
        let a = p.insert(&["resource-item"], band(700.0, 300.0));
        let b = p.insert(&["resource-item"], band(710.0, 300.0));
        let mut sim = Simulation::new(p, ControllerConfig::web(), 11);
        sim.install();
        sim.scroll_to(100.0);
        sim.scroll_to(60.0);
        assert_eq!(sim.controller().in_flight(), 2);

        sim.settle();
        assert_eq!(sim.controller().in_flight(), 0);
        assert_eq!(sim.controller().visibility(a), Some(Visibility::Hidden));
        assert_eq!(sim.controller().visibility(b), Some(Visibility::Hidden));
        let max = ControllerConfig::web().max_flight();
        assert!(sim.now() <= HostTime(0) + max, "landed by {:?}", sim.now());
        assert_eq!(sim.log().dramatic.len(), 2);
    }

    #[test]
    fn teardown_disconnects() {
        let mut p = page();
        p.insert(&["section"], band(100.0, 300.0));
        let mut sim = Simulation::new(p, ControllerConfig::web(), 6);
        sim.install();
        sim.teardown();
        assert!(sim.controller().is_empty());
        assert!(!sim.watcher().is_watching());
        assert_eq!(sim.controller().observer().unwrap().disconnects(), 1);
    }
}
