#[macro_use]
extern crate log;

mod components;
mod viewer;

use abstutil::Timer;
use anyhow::Result;
use geom::Duration;
use serde::{Deserialize, Serialize};
use structopt::StructOpt;
use widgetry::{Canvas, Color, EventCtx, GfxCtx, Settings, SharedAppState};

use model::{Catalog, LiveModel};
use tfl::{Client, FeedEvent, LineStatus, Poller, PredictionId};

#[derive(StructOpt)]
struct Args {
    /// TfL line id to track
    #[structopt(long, default_value = "northern")]
    line: String,
    /// Override the built-in station table with a CSV of id,name,x,y
    #[structopt(long)]
    stations: Option<String>,
    /// Seconds between refreshes of displayed positions
    #[structopt(long, default_value = "1")]
    refresh_secs: f64,
    /// Seconds between fetches of arrival predictions
    #[structopt(long, default_value = "10")]
    arrivals_secs: u64,
    /// Seconds between fetches of the line status
    #[structopt(long, default_value = "60")]
    status_secs: u64,
}

impl Args {
    fn catalog(&self) -> Result<Catalog> {
        if let Some(ref path) = self.stations {
            let bytes = fs_err::read(path)?;
            return Catalog::load(&bytes[..]);
        }
        Catalog::northern_line()
    }
}

fn run(settings: Settings) {
    abstutil::logger::setup();

    let args = Args::from_iter(abstutil::cli_args());

    widgetry::run(settings, move |ctx| {
        let catalog = args.catalog().unwrap();
        info!(
            "Tracking the {} line with {} stations",
            args.line,
            catalog.waypoints().len()
        );

        let config = model::Config {
            refresh_interval: Duration::seconds(args.refresh_secs),
            ..model::Config::default()
        };
        let client = Client::new(&args.line).unwrap();
        let feed = Poller::spawn(
            client,
            std::time::Duration::from_secs(args.arrivals_secs),
            std::time::Duration::from_secs(args.status_secs),
        );

        let mut app = App::new(ctx, LiveModel::new(catalog, config), feed);
        app.restore_savestate(ctx);
        let states = vec![viewer::Viewer::new_state(ctx, &mut app)];
        (app, states)
    });
}

pub fn main() {
    run(Settings::new("Tube Spotting"));
}

pub struct App {
    live: LiveModel,
    feed: Poller,

    /// Display-only: the line's current status, once we've heard it
    status: Option<LineStatus>,
    last_updated: Option<chrono::DateTime<chrono::Local>>,
    selected: Option<PredictionId>,
}

impl SharedAppState for App {
    fn draw_default(&self, g: &mut GfxCtx) {
        g.clear(Color::BLACK);
    }

    fn before_quit(&self, canvas: &Canvas) {
        let ss = Savestate {
            cam_x: canvas.cam_x,
            cam_y: canvas.cam_y,
            cam_zoom: canvas.cam_zoom,
        };
        abstio::write_json("data/save_map.json".to_string(), &ss);
    }
}

pub type Transition = widgetry::Transition<App>;

impl App {
    pub fn new(ctx: &mut EventCtx, live: LiveModel, feed: Poller) -> Self {
        let bounds = live.catalog().bounds();
        ctx.canvas.map_dims = (bounds.max_x, bounds.max_y);
        ctx.canvas.center_on_map_pt(bounds.center());

        Self {
            live,
            feed,

            status: None,
            last_updated: None,
            selected: None,
        }
    }

    pub fn restore_savestate(&mut self, ctx: &mut EventCtx) {
        if let Ok(savestate) = abstio::maybe_read_json::<Savestate>(
            "data/save_map.json".to_string(),
            &mut Timer::throwaway(),
        ) {
            ctx.canvas.cam_x = savestate.cam_x;
            ctx.canvas.cam_y = savestate.cam_y;
            ctx.canvas.cam_zoom = savestate.cam_zoom;
        }
    }

    /// Apply everything the poller produced since the last event.
    /// Returns true if anything changed.
    fn drain_feed(&mut self) -> bool {
        let mut changed = false;
        for event in self.feed.drain() {
            changed = true;
            match event {
                FeedEvent::Arrivals(batch) => {
                    self.live.record_arrivals(batch);
                    self.last_updated = Some(chrono::Local::now());
                }
                FeedEvent::Status(statuses) => {
                    self.status = statuses.into_iter().next();
                }
                FeedEvent::Error(err) => {
                    self.live.record_fetch_error(err);
                }
            }
        }
        changed
    }
}

#[derive(Serialize, Deserialize)]
pub struct Savestate {
    cam_x: f64,
    cam_y: f64,
    cam_zoom: f64,
}
