#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod catalog;
mod resolver;
mod scheduler;
mod tracker;

use geom::Duration;
use tfl::Prediction;

pub use self::catalog::{Catalog, Waypoint};
pub use self::resolver::resolve;
pub use self::scheduler::RefreshScheduler;
pub use self::tracker::{PositionTracker, TrackedPosition};

/// Tunables for the tracking pipeline. Settings rather than constants so
/// tests can drive ticks deterministically, without real timers.
#[derive(Clone, Copy)]
pub struct Config {
    /// How often displayed positions refresh. Independent of (and much
    /// shorter than) the feed's poll interval.
    pub refresh_interval: Duration,
    /// Weight of the newly resolved coordinate when easing each train
    /// toward its latest target.
    pub smoothing: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::seconds(1.0),
            smoothing: 0.1,
        }
    }
}

pub type UpdateFn = Box<dyn FnMut(&[TrackedPosition])>;

/// Everything one map view owns about one line: the station catalog, the
/// per-train display state, and the refresh timer. Constructed when the
/// view starts and dropped when it goes away. No globals, so two
/// independent maps can coexist.
pub struct LiveModel {
    catalog: Catalog,
    tracker: PositionTracker,
    scheduler: RefreshScheduler,
    /// The most recent successful batch. Refresh ticks keep smoothing
    /// against this even when it's stale; that's what animates trains
    /// between polls.
    latest: Vec<Prediction>,
    last_error: Option<String>,
    on_update: Option<UpdateFn>,
}

impl LiveModel {
    pub fn new(catalog: Catalog, config: Config) -> Self {
        Self {
            catalog,
            tracker: PositionTracker::new(config.smoothing),
            scheduler: RefreshScheduler::new(config.refresh_interval),
            latest: Vec::new(),
            last_error: None,
            on_update: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Begin refreshing. The callback, if any, fires after every pass of
    /// `advance` that ran at least one tick.
    pub fn start(&mut self, on_update: Option<UpdateFn>) {
        self.on_update = on_update;
        self.scheduler.start();
    }

    /// Stops the timer and drops the callback. Until the next start(),
    /// nothing mutates and nothing fires; the last snapshot stays
    /// readable.
    pub fn stop(&mut self) {
        self.scheduler.stop();
        self.on_update = None;
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Feed in elapsed wall-clock time, running any refresh ticks that
    /// came due. Returns true if displayed positions were recomputed.
    pub fn advance(&mut self, dt: Duration) -> bool {
        let ticks = self.scheduler.advance(dt);
        for _ in 0..ticks {
            self.tracker.tick(&self.latest, &self.catalog);
        }
        if ticks == 0 {
            return false;
        }
        if let Some(ref mut on_update) = self.on_update {
            on_update(self.tracker.positions());
        }
        true
    }

    /// A new batch from the feed. Takes effect on the next tick.
    pub fn record_arrivals(&mut self, batch: Vec<Prediction>) {
        self.latest = batch;
        self.last_error = None;
    }

    /// A failed fetch: skip the update and keep showing what we had.
    /// Stale-but-valid beats a blank map.
    pub fn record_fetch_error(&mut self, err: String) {
        self.last_error = Some(err);
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The raw predictions behind the current display, for list views.
    pub fn latest_arrivals(&self) -> &[Prediction] {
        &self.latest
    }

    /// The latest smoothed snapshot, in batch order. Safe to call any
    /// time; never blocks.
    pub fn positions(&self) -> &[TrackedPosition] {
        self.tracker.positions()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use tfl::{Direction, PredictionId};

    use super::*;

    fn test_model() -> LiveModel {
        let catalog = Catalog::load(
            "id,name,x,y\n\
             a,Origin Junction,0,0\n\
             b,Target Junction,100,0\n"
                .as_bytes(),
        )
        .unwrap();
        LiveModel::new(catalog, Config::default())
    }

    fn record(id: &str, location: &str) -> Prediction {
        Prediction {
            id: PredictionId(id.to_string()),
            vehicle_id: "001".to_string(),
            current_location: location.to_string(),
            station_name: String::new(),
            destination_name: String::new(),
            direction: Direction::Outbound,
            time_to_station: 60,
            platform_name: String::new(),
            towards: String::new(),
            expected_arrival: None,
        }
    }

    fn ids(positions: &[TrackedPosition]) -> Vec<PredictionId> {
        positions.iter().map(|pos| pos.id.clone()).collect()
    }

    #[test]
    fn fetch_failure_keeps_the_previous_set() {
        let mut live = test_model();
        live.start(None);
        live.record_arrivals(vec![
            record("1", "At Origin Junction"),
            record("2", "At Target Junction"),
        ]);
        live.advance(Duration::seconds(1.0));
        let before = ids(live.positions());

        live.record_fetch_error("GET /Line/northern/Arrivals failed: 503".to_string());
        live.advance(Duration::seconds(1.0));
        assert_eq!(ids(live.positions()), before);
        assert_eq!(
            live.last_error(),
            Some("GET /Line/northern/Arrivals failed: 503")
        );

        // The next good batch clears the error
        live.record_arrivals(vec![record("1", "At Origin Junction")]);
        assert_eq!(live.last_error(), None);
    }

    #[test]
    fn tracked_ids_are_a_subset_of_the_latest_batch() {
        let mut live = test_model();
        live.start(None);
        live.record_arrivals(vec![
            record("1", "At Origin Junction"),
            record("2", "Sidings"),
        ]);
        live.advance(Duration::seconds(1.0));
        assert_eq!(ids(live.positions()), vec![PredictionId("1".to_string())]);

        live.record_arrivals(vec![record("3", "At Target Junction")]);
        live.advance(Duration::seconds(1.0));
        assert_eq!(ids(live.positions()), vec![PredictionId("3".to_string())]);
    }

    #[test]
    fn repeated_ticks_ease_toward_a_stale_target() {
        let mut live = test_model();
        live.start(None);
        live.record_arrivals(vec![record("1", "At Origin Junction")]);
        live.advance(Duration::seconds(1.0));

        live.record_arrivals(vec![record("1", "At Target Junction")]);
        live.advance(Duration::seconds(1.0));
        let first = live.positions()[0].pt.x();

        // No new data, just time passing
        live.advance(Duration::seconds(5.0));
        let later = live.positions()[0].pt.x();
        assert!(later > first && later < 100.0);
    }

    #[test]
    fn stop_halts_ticks_and_callbacks() {
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);

        let mut live = test_model();
        live.start(Some(Box::new(move |_| {
            *counter.borrow_mut() += 1;
        })));
        live.record_arrivals(vec![record("1", "At Origin Junction")]);
        assert!(live.advance(Duration::seconds(1.0)));
        assert_eq!(*calls.borrow(), 1);

        live.stop();
        assert!(!live.advance(Duration::seconds(10.0)));
        assert_eq!(*calls.borrow(), 1);
        // The snapshot survives for anything still drawing it
        assert_eq!(live.positions().len(), 1);
    }

    #[test]
    fn between_report_on_the_real_table() {
        let catalog = Catalog::northern_line().unwrap();
        let mut live = LiveModel::new(catalog, Config::default());
        live.start(None);
        let mut train = record("1", "Between Bank and London Bridge");
        train.destination_name = "Morden Underground Station".to_string();
        live.record_arrivals(vec![train]);
        live.advance(Duration::seconds(1.0));
        // Bank is at (60, 90), London Bridge at (60, 100)
        assert_eq!(live.positions()[0].pt, geom::Pt2D::new(60.0, 95.0));
    }
}
