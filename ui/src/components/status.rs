use widgetry::{Color, EventCtx, Line, Text, Widget};

use model::TrackedPosition;
use tfl::Prediction;

use super::describe;
use crate::App;

/// The side panel: service status, train counts, the next few arrivals,
/// and details for whichever train is selected.
pub fn render(ctx: &mut EventCtx, app: &App) -> Widget {
    let mut col = Vec::new();

    let mut txt = Text::new();
    match app
        .status
        .as_ref()
        .and_then(|status| status.line_statuses.first())
    {
        Some(detail) => {
            let color = if detail.status_severity_description == "Good Service" {
                Color::GREEN
            } else {
                Color::ORANGE
            };
            txt.add_line(
                Line(format!("Service: {}", detail.status_severity_description)).fg(color),
            );
        }
        None => {
            txt.add_line(Line("Service: waiting for data"));
        }
    }
    txt.add_line(Line(format!(
        "{} active trains",
        app.live.positions().len()
    )));
    if let Some(time) = app.last_updated {
        txt.add_line(Line(format!("Updated {}", time.format("%H:%M:%S"))).small());
    }
    if let Some(err) = app.live.last_error() {
        txt.add_line(Line(format!("Showing stale data: {err}")).fg(Color::ORANGE));
    }
    txt.add_line(Line("Southbound trains").fg(Color::RED));
    txt.add_line(Line("Northbound trains").fg(Color::ORANGE));
    col.push(txt.into_widget(ctx));

    col.push(next_trains(ctx, app));

    if let Some(train) = selected_train(app) {
        let mut txt = Text::from(Line(format!("Train {}", train.vehicle_id)).small_heading());
        if !train.current_location.is_empty() {
            txt.add_line(Line(train.current_location.clone()));
        }
        txt.add_line(Line(format!("To {}", train.destination_name)));
        if let Some(prediction) = app
            .live
            .latest_arrivals()
            .iter()
            .find(|prediction| prediction.id == train.id)
        {
            if !prediction.platform_name.is_empty() {
                txt.add_line(Line(format!("Platform: {}", prediction.platform_name)));
            }
        }
        txt.add_line(Line(format!(
            "Arriving in {}",
            describe::arrival(train.time_to_station)
        )));
        txt.add_line(Line(describe::direction(train.direction)));
        col.push(txt.into_widget(ctx));
        col.push(ctx.style().btn_outline.text("deselect").build_def(ctx));
    }

    Widget::col(col)
}

fn next_trains(ctx: &mut EventCtx, app: &App) -> Widget {
    let mut soonest: Vec<&Prediction> = app.live.latest_arrivals().iter().collect();
    soonest.sort_by_key(|prediction| prediction.time_to_station);

    let mut txt = Text::from(Line("Next trains").small_heading());
    if soonest.is_empty() {
        txt.add_line(Line("Nothing scheduled"));
    }
    for prediction in soonest.into_iter().take(3) {
        txt.add_line(Line(format!(
            "{} ({})",
            prediction.destination_name,
            describe::arrival(prediction.time_to_station)
        )));
    }
    txt.into_widget(ctx)
}

fn selected_train(app: &App) -> Option<&TrackedPosition> {
    let id = app.selected.as_ref()?;
    app.live.positions().iter().find(|train| &train.id == id)
}
