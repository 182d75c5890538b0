use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::{LineStatus, Prediction};

pub const BASE_URL: &str = "https://api.tfl.gov.uk";

/// Thin blocking client for the TfL Unified API. No retries; the poller
/// just tries again next cycle.
pub struct Client {
    http: reqwest::blocking::Client,
    base_url: String,
    line: String,
}

impl Client {
    pub fn new(line: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()?;
        Ok(Self {
            http,
            base_url: BASE_URL.to_string(),
            line: line.to_string(),
        })
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    /// All arrival predictions for the line. Records that don't
    /// deserialize are skipped; one malformed prediction shouldn't blank
    /// the whole map.
    pub fn arrivals(&self) -> Result<Vec<Prediction>> {
        let url = format!("{}/Line/{}/Arrivals", self.base_url, self.line);
        let raw: Vec<serde_json::Value> = self.get(&url)?;
        Ok(decode_predictions(raw))
    }

    pub fn line_status(&self) -> Result<Vec<LineStatus>> {
        let url = format!("{}/Line/{}/Status", self.base_url, self.line);
        self.get(&url)
    }

    /// Arrivals at a single station.
    pub fn station_arrivals(&self, station_id: &str) -> Result<Vec<Prediction>> {
        let url = format!("{}/StopPoint/{}/Arrivals", self.base_url, station_id);
        let raw: Vec<serde_json::Value> = self.get(&url)?;
        Ok(decode_predictions(raw))
    }

    fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self
            .http
            .get(url)
            .send()
            .with_context(|| format!("GET {url}"))?;
        ensure!(
            resp.status().is_success(),
            "GET {} failed: {}",
            url,
            resp.status()
        );
        resp.json().with_context(|| format!("decoding {url}"))
    }
}

fn decode_predictions(raw: Vec<serde_json::Value>) -> Vec<Prediction> {
    let mut result = Vec::new();
    for value in raw {
        match serde_json::from_value::<Prediction>(value) {
            Ok(prediction) => result.push(prediction),
            Err(err) => {
                warn!("Skipping a malformed prediction: {err}");
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PredictionId;

    #[test]
    fn malformed_predictions_are_skipped() {
        let raw: Vec<serde_json::Value> = serde_json::from_str(
            r#"[
                {"id": "123", "vehicleId": "001",
                 "currentLocation": "At platform",
                 "destinationName": "Morden Underground Station",
                 "direction": "inbound", "timeToStation": 60},
                {"vehicleId": "002"},
                {"id": "456", "vehicleId": "003", "direction": "outbound",
                 "timeToStation": 0}
            ]"#,
        )
        .unwrap();

        let decoded = decode_predictions(raw);
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].id, PredictionId("123".to_string()));
        assert_eq!(decoded[0].current_location, "At platform");
        // Optional fields default instead of killing the record
        assert_eq!(decoded[1].current_location, "");
        assert_eq!(decoded[1].destination_name, "");
    }
}
