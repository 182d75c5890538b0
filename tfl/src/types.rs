use chrono::{DateTime, Utc};
use serde::Deserialize;

/// The stable identity of one predicted train run. The feed reuses
/// `vehicleId` across records (one physical train serves several
/// predicted stops), so this is the only safe key for following a train
/// between polls.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub struct PredictionId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
}

/// One arrival prediction from `/Line/{line}/Arrivals`. Only the fields
/// the tracker and UI consume; serde ignores the rest of the payload.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub id: PredictionId,
    pub vehicle_id: String,
    /// Free text, e.g. "Between Bank and London Bridge". Not always sent.
    #[serde(default)]
    pub current_location: String,
    /// The station this prediction is for, e.g. "Bank Underground
    /// Station". Also not always sent.
    #[serde(default)]
    pub station_name: String,
    #[serde(default)]
    pub destination_name: String,
    pub direction: Direction,
    /// Seconds until arrival at the predicted station.
    pub time_to_station: u32,
    #[serde(default)]
    pub platform_name: String,
    #[serde(default)]
    pub towards: String,
    #[serde(default)]
    pub expected_arrival: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStatus {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mode_name: String,
    #[serde(default)]
    pub line_statuses: Vec<LineStatusDetail>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStatusDetail {
    pub status_severity: i32,
    pub status_severity_description: String,
    #[serde(default)]
    pub reason: Option<String>,
}
