//! Cooperative scheduler for dashboard panels.
//!
//! A [`Session`] owns every panel and the shared replay position. The host
//! calls [`Session::advance`] with the time elapsed since the session started;
//! each panel whose period has come up ticks once, in registration order, so
//! ticks never overlap. A failing panel shows the error text and is ticked
//! again on its next period; the other panels are unaffected.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::clock::SharedTimestamp;
use crate::config::DashboardConfig;
use crate::datasource::Dataset;
use crate::panels::{
    ClassifierPanel, ConstellationPanel, Control, ERROR_TEXT, KpiGrid, LossPanel, Panel, RayPanel,
    RbsSliderPanel, SchedulingPanel, TogglePanel, load_pairs,
};
use crate::rays::{RayAnimator, Scene};
use crate::render::RenderUpdate;

struct Slot {
    panel: Box<dyn Panel>,
    next_due: Duration,
    ticks: u64,
    failures: u64,
    failing: bool,
}

/// Tick and error counters of one panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelStats {
    /// Panel id.
    pub id: String,
    /// Ticks run.
    pub ticks: u64,
    /// Ticks that returned an error.
    pub failures: u64,
}

/// Panels plus the replay position they share.
pub struct Session {
    slots: Vec<Slot>,
    clock: SharedTimestamp,
}

impl Session {
    /// Create a session without panels.
    pub fn new(clock: SharedTimestamp) -> Self {
        Self {
            slots: Vec::new(),
            clock,
        }
    }

    /// Build the standard dashboard over `dataset`.
    ///
    /// The KPI grid is registered first so that lookup panels due in the same
    /// round read the timestamp it just published.
    pub fn standard(config: &DashboardConfig, dataset: Arc<Dataset>) -> Self {
        let clock = SharedTimestamp::new();
        let lookup_interval = config.lookup.interval();
        let scene = match &config.scene {
            Some(path) => Scene::from_file(path).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "using demo ray scene");
                Scene::demo()
            }),
            None => Scene::demo(),
        };

        let mut session = Self::new(clock.clone());
        session.register(KpiGrid::new(&dataset, &config.kpi, clock.clone()));
        session.register(RbsSliderPanel::new(
            &dataset,
            clock.clone(),
            &config.slider,
            lookup_interval,
        ));
        session.register(ClassifierPanel::new(
            &dataset,
            clock.clone(),
            lookup_interval,
        ));
        session.register(SchedulingPanel::new(&dataset, clock, lookup_interval));
        session.register(TogglePanel::new(lookup_interval));
        session.register(LossPanel::new(&config.loss));
        session.register(RayPanel::new(RayAnimator::new(scene, config.rays.clone())));
        session.register(ConstellationPanel::new(
            load_pairs(config.constellation.dir.as_deref()),
            config.constellation.interval(),
        ));
        info!(panels = ?session.panel_ids(), "session ready");
        session
    }

    /// Add a panel; it first ticks on the next [`advance`](Self::advance).
    pub fn register(&mut self, panel: impl Panel + 'static) {
        debug!(panel = panel.id(), interval = ?panel.interval(), "panel registered");
        self.slots.push(Slot {
            panel: Box::new(panel),
            next_due: Duration::ZERO,
            ticks: 0,
            failures: 0,
            failing: false,
        });
    }

    /// Shared replay position.
    pub fn clock(&self) -> &SharedTimestamp {
        &self.clock
    }

    /// Panel ids in registration order.
    pub fn panel_ids(&self) -> Vec<&str> {
        self.slots.iter().map(|slot| slot.panel.id()).collect()
    }

    /// Tick every panel that is due at `now` and collect their updates.
    ///
    /// A panel runs at most once per call. Periods missed by a late call are
    /// dropped rather than replayed in a burst.
    pub fn advance(&mut self, now: Duration) -> Vec<RenderUpdate> {
        let mut updates = Vec::new();
        for slot in &mut self.slots {
            if now < slot.next_due {
                continue;
            }
            let interval = slot.panel.interval().max(Duration::from_millis(1));
            slot.next_due += interval;
            if slot.next_due <= now {
                slot.next_due = now + interval;
            }
            slot.ticks += 1;

            match slot.panel.tick() {
                Ok(panel_updates) => {
                    if slot.failing {
                        slot.failing = false;
                        info!(panel = slot.panel.id(), "panel recovered");
                        updates.push(RenderUpdate::text(slot.panel.id(), ""));
                    }
                    updates.extend(panel_updates);
                }
                Err(err) => {
                    slot.failures += 1;
                    slot.failing = true;
                    warn!(panel = slot.panel.id(), error = %err, "panel tick failed");
                    updates.push(RenderUpdate::text(slot.panel.id(), ERROR_TEXT));
                }
            }
        }
        updates
    }

    /// Earliest time at which some panel is due.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.slots.iter().map(|slot| slot.next_due).min()
    }

    /// Route a control action to the panel `id`.
    pub fn control(&mut self, id: &str, control: Control) -> Vec<RenderUpdate> {
        match self.slots.iter_mut().find(|slot| slot.panel.id() == id) {
            Some(slot) => {
                debug!(panel = id, ?control, "control");
                slot.panel.control(control)
            }
            None => {
                warn!(panel = id, ?control, "control for unknown panel");
                Vec::new()
            }
        }
    }

    /// Tick and error counters per panel.
    pub fn stats(&self) -> Vec<PanelStats> {
        self.slots
            .iter()
            .map(|slot| PanelStats {
                id: slot.panel.id().to_string(),
                ticks: slot.ticks,
                failures: slot.failures,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::datasource::MemoryStore;
    use crate::error::Error;
    use crate::panels::{NO_DATA, NOT_AVAILABLE, keys};

    struct Counter {
        id: &'static str,
        interval: Duration,
        fail_on: Option<u64>,
        count: u64,
    }

    impl Counter {
        fn new(id: &'static str, interval_ms: u64) -> Self {
            Self {
                id,
                interval: Duration::from_millis(interval_ms),
                fail_on: None,
                count: 0,
            }
        }
    }

    impl Panel for Counter {
        fn id(&self) -> &str {
            self.id
        }

        fn interval(&self) -> Duration {
            self.interval
        }

        fn tick(&mut self) -> crate::error::Result<Vec<RenderUpdate>> {
            self.count += 1;
            if self.fail_on == Some(self.count) {
                return Err(Error::InvalidValue {
                    metric: self.id.to_string(),
                    reason: "boom".to_string(),
                });
            }
            Ok(vec![RenderUpdate::scalar(self.id, self.count as f64)])
        }
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn panels_tick_on_their_own_periods() {
        let mut session = Session::new(SharedTimestamp::new());
        session.register(Counter::new("fast", 50));
        session.register(Counter::new("slow", 500));

        for step in 0..=20 {
            session.advance(ms(step * 50));
        }
        let stats = session.stats();
        assert_eq!(stats[0].ticks, 21);
        assert_eq!(stats[1].ticks, 3);
        assert_eq!(session.next_deadline(), Some(ms(1050)));
    }

    #[test]
    fn late_advance_runs_each_panel_once() {
        let mut session = Session::new(SharedTimestamp::new());
        session.register(Counter::new("fast", 50));
        session.advance(ms(0));
        let updates = session.advance(ms(1000));
        assert_eq!(updates.len(), 1);
        assert_eq!(session.next_deadline(), Some(ms(1050)));
    }

    #[test]
    fn failing_panel_shows_error_and_others_continue() {
        let mut session = Session::new(SharedTimestamp::new());
        let mut flaky = Counter::new("flaky", 100);
        flaky.fail_on = Some(2);
        session.register(flaky);
        session.register(Counter::new("steady", 100));

        let mut board = Board::new();
        board.apply_all(session.advance(ms(0)));
        board.apply_all(session.advance(ms(100)));
        assert_eq!(board.text("flaky"), Some(ERROR_TEXT));
        assert_eq!(board.scalar("steady"), Some(2.0));

        board.apply_all(session.advance(ms(200)));
        assert_eq!(board.text("flaky"), Some(""));
        assert_eq!(board.scalar("flaky"), Some(3.0));
        assert_eq!(session.stats()[0].failures, 1);
    }

    #[test]
    fn control_routes_by_id() {
        let mut session = Session::new(SharedTimestamp::new());
        session.register(TogglePanel::new(ms(500)));
        let updates = session.control(keys::TOGGLE, Control::Toggle);
        assert_eq!(updates[0], RenderUpdate::text(keys::TOGGLE, "On"));
        assert!(session.control("missing", Control::Reset).is_empty());
    }

    #[test]
    fn empty_store_shows_placeholders_on_every_tick() {
        let dataset = Arc::new(Dataset::load(&MemoryStore::new()));
        let mut session = Session::standard(&DashboardConfig::default(), dataset);
        assert_eq!(
            session.panel_ids(),
            [
                keys::KPI,
                keys::RBS_ASSIGNED,
                keys::CLASSIFIER,
                keys::SCHEDULING,
                keys::TOGGLE,
                keys::LOSS,
                keys::RAYS,
                keys::CONSTELLATION,
            ]
        );
        let mut board = Board::new();
        for step in 0..10 {
            let updates = session.advance(ms(step * 500));
            assert!(updates.contains(&RenderUpdate::text(keys::CLASSIFIER, NO_DATA)));
            assert!(updates.contains(&RenderUpdate::text(keys::SCHEDULING, NOT_AVAILABLE)));
            assert!(updates.contains(&RenderUpdate::scalar(keys::RBS_ASSIGNED, 0.0)));
            assert!(updates.contains(&RenderUpdate::text("kpi/UL SINR", NO_DATA)));
            board.apply_all(updates);
        }
        assert!(session.stats().iter().all(|stats| stats.failures == 0));
        assert_eq!(board.text(keys::KPI), None);
        assert!(board.chart("loss").is_some());
    }

    #[test]
    fn lookups_follow_the_kpi_grid() {
        let store = MemoryStore::new();
        let record = |ms: u32, value: f64| {
            serde_json::json!({
                "unix_epoch": 1,
                "readable_timestamp": format!("2024-02-21 10:00:{:02}:{:03}", ms / 1000, ms % 1000),
                "value": value,
            })
        };
        let data: Vec<_> = (0..30).map(|i| record(i * 500, i as f64)).collect();
        store
            .upsert("csv", serde_json::json!({"_id": "ul_sinr", "data": data}))
            .unwrap();
        store
            .upsert(
                "csv",
                serde_json::json!({"_id": "slice_prb", "data": [record(0, 5.0), record(11_000, 40.0)]}),
            )
            .unwrap();

        let dataset = Arc::new(Dataset::load(&store));
        let mut session = Session::standard(&DashboardConfig::default(), dataset);
        let mut board = Board::new();
        board.apply_all(session.advance(ms(0)));
        assert_eq!(session.clock().current(), 36_010_000);
        assert_eq!(board.scalar(keys::RBS_ASSIGNED), Some(40.0));
    }
}
