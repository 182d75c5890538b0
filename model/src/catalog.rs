use std::collections::BTreeSet;

use anyhow::Result;
use geom::{Bounds, Pt2D};
use serde::Deserialize;

/// A named, coordinate-tagged point on the schematic map. Coordinates
/// are schematic units matching the printed line diagram, not geography.
#[derive(Clone, Debug, PartialEq)]
pub struct Waypoint {
    pub id: String,
    pub name: String,
    pub pt: Pt2D,
}

/// The ordered station table for one line, plus the last-resort phrase
/// table. Loaded once at startup; lookups always scan in insertion
/// order, so the first occurrence of a duplicated name wins.
pub struct Catalog {
    waypoints: Vec<Waypoint>,
    phrases: Vec<(String, Pt2D)>,
}

impl Catalog {
    /// The Northern line table baked into the binary.
    pub fn northern_line() -> Result<Self> {
        Self::load(include_str!("../data/northern_line.csv").as_bytes())
    }

    pub fn load<R: std::io::Read>(reader: R) -> Result<Self> {
        let mut waypoints = Vec::new();
        let mut seen_ids = BTreeSet::new();
        let mut seen_names = BTreeSet::new();
        for rec in csv::Reader::from_reader(reader).deserialize() {
            let rec: Row = rec?;
            // The source tables contain duplicates, and nobody's
            // confirmed which coordinate is authoritative. Keep every
            // row and let insertion order break ties.
            if !seen_ids.insert(rec.id.clone()) {
                warn!("Duplicate waypoint id {} ({})", rec.id, rec.name);
            }
            if !seen_names.insert(rec.name.clone()) {
                warn!("Duplicate waypoint name {}", rec.name);
            }
            waypoints.push(Waypoint {
                id: rec.id,
                name: rec.name,
                pt: Pt2D::new(rec.x, rec.y),
            });
        }
        ensure!(!waypoints.is_empty(), "the station table is empty");
        Ok(Self {
            waypoints,
            phrases: known_phrases(),
        })
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Generic location phrases, only consulted after every
    /// station-based rule has failed. Ordered; the specific entries come
    /// before catch-alls like "Between".
    pub fn phrases(&self) -> &[(String, Pt2D)] {
        &self.phrases
    }

    /// Schematic bounds with a margin, for the canvas and the world.
    pub fn bounds(&self) -> Bounds {
        let mut b = Bounds::new();
        for wp in &self.waypoints {
            b.update(wp.pt);
        }
        for (_, pt) in &self.phrases {
            b.update(*pt);
        }
        let (min_x, min_y, max_x, max_y) = (b.min_x, b.min_y, b.max_x, b.max_y);
        b.update(Pt2D::new(min_x - 10.0, min_y - 10.0));
        b.update(Pt2D::new(max_x + 10.0, max_y + 10.0));
        b
    }
}

#[derive(Deserialize)]
struct Row {
    id: String,
    name: String,
    x: f64,
    y: f64,
}

fn known_phrases() -> Vec<(String, Pt2D)> {
    vec![
        ("Between Moorgate and Bank", 55.0, 90.0),
        ("Between Bank and London Bridge", 60.0, 97.0),
        ("Between Leicester Square and Charing Cross", 40.0, 87.0),
        ("Between Charing Cross and Embankment", 40.0, 92.0),
        ("Between Embankment and Waterloo", 40.0, 97.0),
        ("Between Waterloo and Kennington", 45.0, 105.0),
        ("Between London Bridge and Borough", 60.0, 102.0),
        ("Between Borough and Kennington", 55.0, 107.0),
        ("At Kennington Underground Station", 50.0, 110.0),
        ("At platform", 50.0, 110.0),
        ("Approaching", 50.0, 107.0),
        ("At", 50.0, 110.0),
        ("Leaving", 50.0, 112.0),
        ("Between", 50.0, 112.0),
    ]
    .into_iter()
    .map(|(phrase, x, y)| (phrase.to_string(), Pt2D::new(x, y)))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_loads() {
        let catalog = Catalog::northern_line().unwrap();
        assert_eq!(catalog.waypoints().len(), 46);
        assert_eq!(catalog.waypoints()[0].name, "High Barnet");
    }

    #[test]
    fn duplicates_survive_in_order() {
        let catalog = Catalog::load(
            "id,name,x,y\n\
             a,Bank,60,90\n\
             a,Bank,10,10\n"
                .as_bytes(),
        )
        .unwrap();
        // Both rows kept; the first one is what lookups will find
        assert_eq!(catalog.waypoints().len(), 2);
        assert_eq!(catalog.waypoints()[0].pt, Pt2D::new(60.0, 90.0));
    }

    #[test]
    fn empty_table_is_an_error() {
        assert!(Catalog::load("id,name,x,y\n".as_bytes()).is_err());
    }
}
