use std::collections::BTreeMap;

use geom::Pt2D;
use tfl::{Direction, Prediction, PredictionId};

use crate::catalog::Catalog;
use crate::resolver;

/// A train with a smoothed, displayable coordinate. Recomputed wholesale
/// every refresh tick; nothing here is persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedPosition {
    pub id: PredictionId,
    pub vehicle_id: String,
    pub pt: Pt2D,
    pub destination_name: String,
    pub direction: Direction,
    pub time_to_station: u32,
    pub current_location: String,
}

/// Keeps per-train display state across refresh ticks. The feed's
/// location strings move in discrete hops (one station or section at a
/// time); the tracker turns those hops into gradual motion by blending
/// each newly resolved coordinate with the previous displayed one.
pub struct PositionTracker {
    /// Weight of the newly resolved coordinate in the blend.
    smoothing: f64,
    /// Last displayed coordinate per train, keyed by prediction id --
    /// never by vehicleId, which repeats across records.
    prev: BTreeMap<PredictionId, Pt2D>,
    positions: Vec<TrackedPosition>,
}

impl PositionTracker {
    pub fn new(smoothing: f64) -> Self {
        Self {
            smoothing,
            prev: BTreeMap::new(),
            positions: Vec::new(),
        }
    }

    /// Recompute every train's displayed position from the latest batch.
    /// Trains whose location can't be resolved are dropped for this
    /// tick, and trains missing from the batch are forgotten
    /// immediately; there's no grace period in either direction.
    pub fn tick(&mut self, batch: &[Prediction], catalog: &Catalog) -> &[TrackedPosition] {
        let alpha = self.smoothing;
        let mut positions = Vec::new();
        for train in batch {
            let station_hint = if train.station_name.is_empty() {
                None
            } else {
                Some(train.station_name.as_str())
            };
            let resolved = match resolver::resolve(
                &train.current_location,
                &train.destination_name,
                station_hint,
                catalog,
            ) {
                Some(pt) => pt,
                None => continue,
            };
            let pt = match self.prev.get(&train.id) {
                Some(prev) => Pt2D::new(
                    resolved.x() * alpha + prev.x() * (1.0 - alpha),
                    resolved.y() * alpha + prev.y() * (1.0 - alpha),
                ),
                // First sighting; there's nothing to ease from
                None => resolved,
            };
            positions.push(TrackedPosition {
                id: train.id.clone(),
                vehicle_id: train.vehicle_id.clone(),
                pt,
                destination_name: train.destination_name.clone(),
                direction: train.direction,
                time_to_station: train.time_to_station,
                current_location: train.current_location.clone(),
            });
        }

        self.prev = positions.iter().map(|pos| (pos.id.clone(), pos.pt)).collect();
        self.positions = positions;
        &self.positions
    }

    /// The latest smoothed snapshot, in batch order.
    pub fn positions(&self) -> &[TrackedPosition] {
        &self.positions
    }
}
