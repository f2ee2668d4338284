use std::sync::Arc;
use veloplan::models::{ItineraryRequest, LegMode};
use veloplan::planning::{ItineraryService, PlannerOptions, INTER_CITY_MSG};
use veloplan::services::StationSource;

mod common;

use common::{station, FakeGeocoder, FakeRouting, FakeStations};

// All geometry sits on the equator where 0.001 degrees of longitude is about
// 111.2 meters. Walking moves at 1 m/s; riding at 5 m/s unless a test says
// otherwise.

fn geocoder() -> Arc<FakeGeocoder> {
    FakeGeocoder::new(&[
        ("Home", 0.0, 0.0),
        ("Office", 0.0, 0.02),
        ("Faraway", 0.0, 0.2),
    ])
}

fn service(stations: Arc<FakeStations>, bike_speed: f64) -> ItineraryService {
    ItineraryService::new(
        geocoder(),
        FakeRouting::new(1.0, bike_speed),
        stations as Arc<dyn StationSource>,
        PlannerOptions::default(),
    )
}

fn request(origin: &str, destination: &str) -> ItineraryRequest {
    ItineraryRequest {
        origin: origin.to_string(),
        destination: destination.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn same_network_trip_selects_the_bike_plan() {
    let stations = FakeStations::new(vec![
        station("alpha", "lyon", 0.001, 5, 2),
        station("beta", "lyon", 0.019, 1, 5),
    ]);
    let service = service(stations, 5.0);

    let resp = service.plan(&request("Home", "Office")).await;

    assert!(resp.success, "{}", resp.message);
    assert!(resp.use_bike);
    assert_eq!(resp.bike_from.as_deref(), Some("alpha"));
    assert_eq!(resp.bike_to.as_deref(), Some("beta"));
    assert_eq!(resp.origin_contract.as_deref(), Some("lyon"));
    assert!(resp.dest_contract.is_none());
    assert!(resp.bike_plan_duration_sec < resp.walk_only_duration_sec);

    // Walk, ride, walk
    assert_eq!(resp.segments.len(), 3);
    assert_eq!(resp.segments[0].mode, LegMode::Walk);
    assert_eq!(resp.segments[1].mode, LegMode::Bike);
    assert_eq!(resp.segments[1].contract.as_deref(), Some("lyon"));
    assert_eq!(resp.segments[2].mode, LegMode::Walk);

    assert_eq!(
        resp.message,
        "Bike plan selected: 10 min vs walking 37 min (saves ~27 min)."
    );
    assert!(resp
        .instructions
        .iter()
        .any(|i| i == "Walk to station 'alpha'."));
    assert!(resp
        .instructions
        .iter()
        .any(|i| i == "Ride to station 'beta'."));
    assert!(!resp.instructions.iter().any(|i| i == INTER_CITY_MSG));
}

#[tokio::test]
async fn no_stations_at_all_falls_back_to_walking() {
    let service = service(FakeStations::new(Vec::new()), 5.0);

    let resp = service.plan(&request("Home", "Office")).await;

    assert!(resp.success);
    assert!(!resp.use_bike);
    assert_eq!(
        resp.message,
        "There is no useful JCDecaux network in the area."
    );
    assert!(resp.walk_only_duration_sec > 0.0);
    assert_eq!(resp.segments.len(), 1);
    assert_eq!(resp.segments[0].mode, LegMode::Walk);
}

#[tokio::test]
async fn inter_city_trip_picks_the_destination_network() {
    // Lyon around the origin, Paris around the destination. The origin-side
    // plan barely loses to walking; riding inside Paris wins; the five-leg
    // plan exists but cannot beat the Paris plan by its required margin.
    let stations = FakeStations::new(vec![
        station("L1", "lyon", 0.001, 3, 0),
        station("L2", "lyon", 0.0005, 0, 3),
        station("P1", "paris", 0.18, 4, 2),
        station("P2", "paris", 0.199, 1, 6),
    ]);
    let service = service(stations, 5.0);

    let resp = service.plan(&request("Home", "Faraway")).await;

    assert!(resp.success, "{}", resp.message);
    assert!(resp.use_bike);
    assert_eq!(resp.dest_contract.as_deref(), Some("paris"));
    assert!(resp.origin_contract.is_none());
    assert_eq!(resp.bike_from.as_deref(), Some("P1"));
    assert_eq!(resp.bike_to.as_deref(), Some("P2"));

    // Notice sits right after the header lines
    assert_eq!(resp.instructions[2], INTER_CITY_MSG);
    assert!(resp.message.starts_with("[Inter-city] Bike plan selected:"));
    assert!(resp
        .instructions
        .iter()
        .any(|i| i == "Walk to station 'P1' (first station in the destination network)."));
}

#[tokio::test]
async fn inter_city_trip_selects_the_both_ends_plan_when_it_clears_the_bar() {
    // Both networks have a usable pair and a fast bike (10 m/s). Riding
    // through both networks with a short transfer walk beats walking and
    // beats either single-network plan by well over the stricter margin.
    let stations = FakeStations::new(vec![
        station("A1", "lyon", 0.001, 5, 0),
        station("A2", "lyon", 0.09, 0, 5),
        station("B1", "paris", 0.11, 5, 0),
        station("B2", "paris", 0.199, 0, 5),
    ]);
    let service = service(stations, 10.0);

    let resp = service.plan(&request("Home", "Faraway")).await;

    assert!(resp.success, "{}", resp.message);
    assert!(resp.use_bike);
    assert_eq!(resp.origin_contract.as_deref(), Some("lyon"));
    assert_eq!(resp.dest_contract.as_deref(), Some("paris"));
    assert_eq!(resp.bike_from.as_deref(), Some("A1"));
    assert_eq!(resp.bike_to.as_deref(), Some("B2"));

    // Walk, ride, transfer walk, ride, walk
    let modes: Vec<LegMode> = resp.segments.iter().map(|s| s.mode).collect();
    assert_eq!(
        modes,
        vec![
            LegMode::Walk,
            LegMode::Bike,
            LegMode::Walk,
            LegMode::Bike,
            LegMode::Walk
        ]
    );
    assert_eq!(resp.segments[1].contract.as_deref(), Some("lyon"));
    assert_eq!(resp.segments[3].contract.as_deref(), Some("paris"));

    assert_eq!(resp.instructions[2], INTER_CITY_MSG);
    assert!(resp.message.starts_with("[Inter-city] Bike plan selected:"));
    assert!(resp
        .instructions
        .iter()
        .any(|i| i == "Walk (inter-city) to station 'B1'."));

    // Clearly ahead of both walking and any single-network plan
    assert!(resp.bike_plan_duration_sec < 5000.0);
    assert!(resp.walk_only_duration_sec > 22000.0);
}

#[tokio::test]
async fn single_station_network_degenerates_to_walking() {
    // One station holds both the bikes and the stands. The zero-length ride
    // candidate is still built, but it cannot beat walking plus the buffer.
    let stations = FakeStations::new(vec![station("solo", "lyon", 0.001, 2, 2)]);
    let service = service(stations, 5.0);

    let resp = service.plan(&request("Home", "Office")).await;

    assert!(resp.success, "{}", resp.message);
    assert!(!resp.use_bike);
    assert_eq!(resp.message, "Bike is not worthwhile for this route.");
}

#[tokio::test]
async fn unknown_origin_text_fails_cleanly() {
    let stations = FakeStations::new(vec![station("alpha", "lyon", 0.001, 5, 2)]);
    let service = service(stations, 5.0);

    let resp = service.plan(&request("Atlantis", "Office")).await;

    assert!(!resp.success);
    assert_eq!(resp.message, "Could not geocode Origin address.");
    assert!(resp.instructions.is_empty());
}

#[tokio::test]
async fn unknown_destination_text_fails_cleanly() {
    let stations = FakeStations::new(vec![station("alpha", "lyon", 0.001, 5, 2)]);
    let service = service(stations, 5.0);

    let resp = service.plan(&request("Home", "Atlantis")).await;

    assert!(!resp.success);
    assert_eq!(resp.message, "Could not geocode Destination address.");
}

#[tokio::test]
async fn slow_bike_falls_back_to_walking() {
    let stations = FakeStations::new(vec![
        station("alpha", "lyon", 0.001, 5, 2),
        station("beta", "lyon", 0.019, 1, 5),
    ]);
    // Riding no faster than walking: detours to stations cannot pay off
    let service = service(stations, 1.0);

    let resp = service.plan(&request("Home", "Office")).await;

    assert!(resp.success);
    assert!(!resp.use_bike);
    assert_eq!(resp.message, "Bike is not worthwhile for this route.");
    assert!(resp
        .instructions
        .iter()
        .any(|i| i.contains("bike is not feasible")));
}

#[tokio::test]
async fn explicit_coordinates_skip_geocoding() {
    let stations = FakeStations::new(vec![
        station("alpha", "lyon", 0.001, 5, 2),
        station("beta", "lyon", 0.019, 1, 5),
    ]);
    let service = service(stations, 5.0);

    // Texts the geocoder does not know; coordinates carry the trip
    let req = ItineraryRequest {
        origin: "somewhere".to_string(),
        destination: "elsewhere".to_string(),
        origin_lat: 0.0000001,
        origin_lon: 0.0,
        dest_lat: 0.0,
        dest_lon: 0.02,
        ..Default::default()
    };

    let resp = service.plan(&req).await;
    assert!(resp.success, "{}", resp.message);
    assert!(resp.use_bike);
}

#[tokio::test]
async fn debug_flag_surfaces_station_candidates() {
    let stations = FakeStations::new(vec![
        station("alpha", "lyon", 0.001, 5, 2),
        station("beta", "lyon", 0.019, 1, 5),
        station("gamma", "lyon", 0.002, 2, 0),
        station("empty", "lyon", 0.0001, 0, 0),
    ]);
    let service = service(stations, 5.0);

    let mut req = request("Home", "Office");
    req.debug = true;

    let resp = service.plan(&req).await;
    let debug = resp.debug.expect("debug info requested");

    assert_eq!(debug.origin_resolved_lat, 0.0);
    assert_eq!(debug.dest_resolved_lon, 0.02);

    // Ranked by distance from the origin, stations without bikes excluded
    let from_names: Vec<&str> = debug.bike_from_top3.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(from_names, vec!["alpha", "gamma", "beta"]);

    // Destination side only keeps stations with free stands
    let to_names: Vec<&str> = debug.bike_to_top3.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(to_names, vec!["beta", "alpha"]);
    assert!(debug.bike_from_top3[0].distance_meters > 100.0);
}

#[tokio::test]
async fn inter_city_debug_pools_both_networks() {
    // P0 belongs to the destination network but sits near the origin; the
    // candidate lists pool both networks, so it must show up on the
    // origin side.
    let stations = FakeStations::new(vec![
        station("L1", "lyon", 0.001, 3, 0),
        station("L2", "lyon", 0.0005, 0, 3),
        station("P0", "paris", 0.003, 2, 0),
        station("P1", "paris", 0.18, 4, 2),
        station("P2", "paris", 0.199, 1, 6),
    ]);
    let service = service(stations, 5.0);

    let mut req = request("Home", "Faraway");
    req.debug = true;

    let resp = service.plan(&req).await;
    let debug = resp.debug.expect("debug info requested");

    let from_names: Vec<&str> = debug.bike_from_top3.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(from_names, vec!["L1", "P0", "P1"]);

    let to_names: Vec<&str> = debug.bike_to_top3.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(to_names, vec!["P2", "P1", "L2"]);
}

#[tokio::test]
async fn debug_stays_off_by_default() {
    let stations = FakeStations::new(vec![
        station("alpha", "lyon", 0.001, 5, 2),
        station("beta", "lyon", 0.019, 1, 5),
    ]);
    let service = service(stations, 5.0);

    let resp = service.plan(&request("Home", "Office")).await;
    assert!(resp.debug.is_none());
}
