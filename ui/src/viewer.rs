use geom::{Circle, Distance, PolyLine, Polygon, Pt2D};
use widgetry::mapspace::{ObjectID, World, WorldOutcome};
use widgetry::{
    Color, EventCtx, GeomBatch, GfxCtx, HorizontalAlignment, Key, Line, Outcome, Panel, State,
    UpdateType, VerticalAlignment, Widget,
};

use tfl::Direction;

use crate::components::{describe, status};
use crate::{App, Transition};

pub struct Viewer {
    panel: Panel,
    world: World<Obj>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Obj {
    Station(usize),
    Train(usize),
}
impl ObjectID for Obj {}

impl Viewer {
    pub fn new_state(ctx: &mut EventCtx, app: &mut App) -> Box<dyn State<App>> {
        app.live.start(None);

        let mut state = Self {
            panel: Panel::new_builder(Widget::col(vec![
                Line("Tube Spotting").small_heading().into_widget(ctx),
                Widget::placeholder(ctx, "controls"),
                Widget::placeholder(ctx, "status"),
            ]))
            .aligned(HorizontalAlignment::Right, VerticalAlignment::Top)
            .build(ctx),
            world: World::unbounded(),
        };
        state.update_controls(ctx, app);
        state.on_tick(ctx, app);
        Box::new(state)
    }

    fn on_tick(&mut self, ctx: &mut EventCtx, app: &App) {
        self.world = make_world(ctx, app);
        self.panel.replace(ctx, "status", status::render(ctx, app));
    }

    fn update_controls(&mut self, ctx: &mut EventCtx, app: &App) {
        let label = if app.live.is_running() {
            "pause live updates"
        } else {
            "resume live updates"
        };
        let controls = ctx
            .style()
            .btn_outline
            .text(label)
            .hotkey(Key::Space)
            .build_def(ctx);
        self.panel.replace(ctx, "controls", controls);
    }
}

impl State<App> for Viewer {
    fn event(&mut self, ctx: &mut EventCtx, app: &mut App) -> Transition {
        ctx.canvas_movement();

        if app.drain_feed() {
            self.on_tick(ctx, app);
        }

        if let Some(dt) = ctx.input.nonblocking_is_update_event() {
            ctx.input.use_update_event();
            if app.live.advance(dt) {
                self.on_tick(ctx, app);
            }
        }

        if let WorldOutcome::ClickedObject(Obj::Train(idx)) = self.world.event(ctx) {
            app.selected = app.live.positions().get(idx).map(|train| train.id.clone());
            self.on_tick(ctx, app);
        }

        match self.panel.event(ctx) {
            Outcome::Clicked(x) => match x.as_ref() {
                "pause live updates" => {
                    app.live.stop();
                    self.update_controls(ctx, app);
                }
                "resume live updates" => {
                    app.live.start(None);
                    self.update_controls(ctx, app);
                }
                "deselect" => {
                    app.selected = None;
                    self.on_tick(ctx, app);
                }
                _ => unreachable!(),
            },
            _ => {}
        }

        if app.live.is_running() {
            ctx.request_update(UpdateType::Game);
        }

        Transition::Keep
    }

    fn draw(&self, g: &mut GfxCtx, _: &App) {
        self.world.draw(g);
        self.panel.draw(g);
    }
}

fn make_world(ctx: &mut EventCtx, app: &App) -> World<Obj> {
    let catalog = app.live.catalog();
    let bounds = catalog.bounds();
    let mut world = World::bounded(&bounds);

    let mut batch = GeomBatch::new();
    batch.push(Color::grey(0.1), bounds.get_rectangle());
    for pl in track_segments() {
        batch.push(Color::grey(0.5), pl.make_polygons(Distance::meters(0.8)));
    }
    world.draw_master_batch(ctx, batch);

    for (idx, wp) in catalog.waypoints().iter().enumerate() {
        world
            .add(Obj::Station(idx))
            .hitbox(Circle::new(wp.pt, Distance::meters(1.2)).to_polygon())
            .draw_color(Color::WHITE)
            .hover_alpha(0.5)
            .tooltip(describe::waypoint(wp))
            .build(ctx);
    }

    for (idx, train) in app.live.positions().iter().enumerate() {
        let color = if app.selected.as_ref() == Some(&train.id) {
            Color::CYAN
        } else {
            match train.direction {
                Direction::Inbound => Color::RED,
                Direction::Outbound => Color::ORANGE,
            }
        };
        world
            .add(Obj::Train(idx))
            .hitbox(train_block(train.pt))
            .draw_color(color)
            .hover_alpha(0.5)
            .tooltip(describe::train(train))
            .clickable()
            .build(ctx);
    }

    world.initialize_hover(ctx);
    world
}

fn train_block(pt: Pt2D) -> Polygon {
    let size = 3.0;
    Polygon::rectangle(size, size).translate(pt.x() - size / 2.0, pt.y() - size / 2.0)
}

/// The branch layout of the schematic. This matches the printed diagram,
/// not geography, and deliberately so -- see the station table.
fn track_segments() -> Vec<PolyLine> {
    let branches: Vec<Vec<(f64, f64)>> = vec![
        // High Barnet to Kentish Town
        vec![(50.0, 5.0), (50.0, 55.0)],
        // Mill Hill East spur
        vec![(50.0, 25.0), (65.0, 25.0)],
        // Edgware down to Camden Town
        vec![(30.0, 5.0), (30.0, 45.0), (40.0, 55.0)],
        // Camden Town to Leicester Square
        vec![(40.0, 55.0), (40.0, 85.0)],
        // Bank branch
        vec![(40.0, 85.0), (60.0, 90.0), (60.0, 105.0), (50.0, 110.0)],
        // Charing Cross branch
        vec![(40.0, 85.0), (40.0, 100.0), (50.0, 110.0)],
        // Kennington to Morden
        vec![(50.0, 110.0), (50.0, 165.0)],
    ];
    branches
        .into_iter()
        .map(|pts| {
            PolyLine::unchecked_new(pts.into_iter().map(|(x, y)| Pt2D::new(x, y)).collect())
        })
        .collect()
}
