use widgetry::{Line, Text};

use model::{TrackedPosition, Waypoint};
use tfl::Direction;

pub fn waypoint(wp: &Waypoint) -> Text {
    let mut txt = Text::from(Line(wp.name.clone()));
    txt.add_line(Line(format!("Id: {}", wp.id)).small());
    txt
}

pub fn train(train: &TrackedPosition) -> Text {
    let mut txt = Text::from(Line(format!("Train {}", train.vehicle_id)));
    if !train.current_location.is_empty() {
        txt.add_line(Line(train.current_location.clone()));
    }
    txt.add_line(Line(format!("To {}", train.destination_name)));
    txt.add_line(Line(format!(
        "{}, arriving in {}",
        direction(train.direction),
        arrival(train.time_to_station)
    )));
    txt
}

/// The line runs north-south, so in/outbound reads better as a compass
/// direction.
pub fn direction(direction: Direction) -> &'static str {
    match direction {
        Direction::Inbound => "Southbound",
        Direction::Outbound => "Northbound",
    }
}

pub fn arrival(seconds: u32) -> String {
    let minutes = (f64::from(seconds) / 60.0).round() as i64;
    if minutes == 0 {
        "less than a minute".to_string()
    } else if minutes == 1 {
        "1 minute".to_string()
    } else {
        format!("{minutes} minutes")
    }
}
