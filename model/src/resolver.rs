use geom::Pt2D;

use crate::catalog::{Catalog, Waypoint};

/// Schematic units to shift a train shy of a destination we can only
/// guess it's heading toward. Up is toward the top of the diagram.
const APPROACH_OFFSET: f64 = 2.0;

/// Turn a free-text location report into a schematic coordinate. The
/// rules run in a fixed order and the first one to produce a coordinate
/// wins; `None` means the train just isn't drawn this tick.
///
/// The feed's location strings have no schema, so every rule is
/// substring-based and deliberately permissive. A short station name can
/// match inside an unrelated longer phrase; that's an accepted trade for
/// coverage.
pub fn resolve(
    location: &str,
    destination: &str,
    station_hint: Option<&str>,
    catalog: &Catalog,
) -> Option<Pt2D> {
    // A "Between A and B" report pins the train to the midpoint of A and
    // B. This has to run before the plain name scan, because the text
    // always contains a full station name too.
    if let Some(pt) = resolve_between(location, catalog) {
        return Some(pt);
    }

    // The location text names a station outright
    for wp in catalog.waypoints() {
        if location.contains(&wp.name) {
            return Some(wp.pt);
        }
    }

    // The feed sometimes supplies the predicted station separately
    if let Some(hint) = station_hint {
        if let Some(wp) = fuzzy_match(strip_suffix(hint), catalog) {
            return Some(wp.pt);
        }
    }

    // Last station-based guess: park the train just short of wherever
    // it's headed
    if let Some(wp) = fuzzy_match(strip_suffix(destination), catalog) {
        return Some(Pt2D::new(wp.pt.x(), wp.pt.y() - APPROACH_OFFSET));
    }

    // Generic phrases like "At platform"
    for (phrase, pt) in catalog.phrases() {
        if location.contains(phrase.as_str()) {
            return Some(*pt);
        }
    }

    None
}

/// Both fragments of "Between A and B" have to match a waypoint, or the
/// whole rule fails. Extra " and "s in the text are ignored past the
/// second fragment.
fn resolve_between(location: &str, catalog: &Catalog) -> Option<Pt2D> {
    if !location.contains("Between") {
        return None;
    }
    let rest = location.replacen("Between ", "", 1);
    let mut fragments = rest.split(" and ");
    let first = fuzzy_match(fragments.next()?, catalog)?;
    let second = fuzzy_match(fragments.next()?, catalog)?;
    Some(Pt2D::new(
        (first.pt.x() + second.pt.x()) / 2.0,
        (first.pt.y() + second.pt.y()) / 2.0,
    ))
}

/// Substring containment in both directions, first match in catalog
/// order. An empty needle would match everything via `contains`, so bail
/// out instead.
fn fuzzy_match<'a>(text: &str, catalog: &'a Catalog) -> Option<&'a Waypoint> {
    if text.is_empty() {
        return None;
    }
    catalog
        .waypoints()
        .iter()
        .find(|wp| text.contains(&wp.name) || wp.name.contains(text))
}

fn strip_suffix(name: &str) -> &str {
    name.strip_suffix(" Underground Station").unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn catalog() -> Catalog {
        Catalog::load(
            "id,name,x,y\n\
             940GZZLUBNK,Bank,60,90\n\
             940GZZLULNB,London Bridge,60,95\n\
             940GZZLUMDN,Morden,50,165\n"
                .as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn station_name_in_location_text_wins() {
        let catalog = catalog();
        assert_eq!(
            resolve("At Bank Underground Station", "", None, &catalog),
            Some(Pt2D::new(60.0, 90.0))
        );
    }

    #[test]
    fn between_two_stations_is_the_midpoint() {
        let catalog = catalog();
        assert_eq!(
            resolve("Between Bank and London Bridge", "", None, &catalog),
            Some(Pt2D::new(60.0, 92.5))
        );
    }

    #[test]
    fn between_with_one_unknown_endpoint_falls_back_to_the_name_scan() {
        let catalog = catalog();
        assert_eq!(
            resolve("Between Bank and Nowhere", "", None, &catalog),
            Some(Pt2D::new(60.0, 90.0))
        );
    }

    #[test]
    fn station_hint_beats_destination() {
        let catalog = catalog();
        assert_eq!(
            resolve(
                "Somewhere unknown",
                "Morden Underground Station",
                Some("Bank Underground Station"),
                &catalog
            ),
            Some(Pt2D::new(60.0, 90.0))
        );
    }

    #[test]
    fn destination_fallback_stops_short() {
        let catalog = catalog();
        assert_eq!(
            resolve("Somewhere unknown", "Morden Underground Station", None, &catalog),
            Some(Pt2D::new(50.0, 163.0))
        );
    }

    #[test]
    fn generic_phrases_are_a_last_resort() {
        let catalog = catalog();
        assert_eq!(
            resolve("At platform", "", None, &catalog),
            Some(Pt2D::new(50.0, 110.0))
        );
    }

    #[test]
    fn unresolvable_location_is_none() {
        let catalog = catalog();
        assert_eq!(resolve("Sidings", "Depot", None, &catalog), None);
    }

    #[test]
    fn empty_strings_never_match() {
        let catalog = catalog();
        assert_eq!(resolve("", "", Some(""), &catalog), None);
    }
}
