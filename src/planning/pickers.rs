use crate::models::{Coordinates, Station};

/// Station selection primitives. All pickers scan the slice in order and
/// keep the first station on equal distance, so selection is deterministic
/// for a fixed provider payload.

fn nearest_matching<'a, F>(
    stations: &'a [Station],
    point: Coordinates,
    keep: F,
) -> Option<&'a Station>
where
    F: Fn(&Station) -> bool,
{
    let mut best: Option<(&Station, f64)> = None;
    for station in stations.iter().filter(|s| keep(s)) {
        let d = station.position.distance_meters_to(&point);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((station, d)),
        }
    }
    best.map(|(s, _)| s)
}

/// Closest station regardless of availability.
pub fn closest(stations: &[Station], point: Coordinates) -> Option<&Station> {
    nearest_matching(stations, point, |_| true)
}

/// Closest station with at least one bike to pick up.
pub fn closest_with_bikes(stations: &[Station], point: Coordinates) -> Option<&Station> {
    nearest_matching(stations, point, Station::has_bikes)
}

/// Closest station with at least one free stand to drop at.
pub fn closest_with_stands(stations: &[Station], point: Coordinates) -> Option<&Station> {
    nearest_matching(stations, point, Station::has_stands)
}

/// Stations of one network, for per-contract picks.
pub fn in_contract(stations: &[Station], contract: &str) -> Vec<Station> {
    stations
        .iter()
        .filter(|s| s.in_contract(contract))
        .cloned()
        .collect()
}
