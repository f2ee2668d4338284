use crate::error::Result;
use crate::models::{
    Coordinates, ItineraryRequest, ItineraryResponse, LegMode, Route, RouteSegment, Station,
    TravelProfile,
};
use crate::services::RoutingCore;

/// Notice inserted into the instruction list when the two endpoints belong
/// to different bike-share networks.
pub const INTER_CITY_MSG: &str =
    "The origin and destination are in different JCDecaux networks (inter-city).";

/// Candidate itinerary builders. Each builder routes its own legs, sums the
/// unrounded totals and emits the instruction list; acceptance against the
/// walking baseline is the planner's job, not theirs.

fn start_line(req: &ItineraryRequest) -> String {
    format!("Start point: {}", req.origin)
}

fn end_line(req: &ItineraryRequest) -> String {
    format!("End point: {}", req.destination)
}

fn base_response(baseline: &Route) -> ItineraryResponse {
    ItineraryResponse {
        success: true,
        walk_only_duration_sec: baseline.duration_secs,
        walk_only_distance_meters: baseline.distance_meters,
        ..Default::default()
    }
}

/// Plain walking itinerary, used when no bike plan exists or none beats
/// walking. `reason` becomes the response message.
pub fn walk_only(
    req: &ItineraryRequest,
    baseline: &Route,
    reason: Option<&str>,
) -> ItineraryResponse {
    let mut resp = base_response(baseline);
    resp.message = reason
        .unwrap_or("Walking is the best option for this route.")
        .to_string();
    resp.use_bike = false;
    resp.walk1_coords = baseline.latlng_pairs();
    resp.walk1_distance_meters = baseline.distance_meters;
    resp.segments = vec![RouteSegment::new(
        LegMode::Walk,
        None,
        "Origin",
        "Destination",
        baseline,
    )];
    resp.instructions = vec![
        start_line(req),
        "Walk to the destination (bike is not feasible in this scenario).".to_string(),
        end_line(req),
    ];
    resp
}

/// Walk, ride within one network, walk. Serves both the same-network case
/// and the origin-side single-network case.
pub async fn origin_only(
    routing: &dyn RoutingCore,
    req: &ItineraryRequest,
    origin: Coordinates,
    dest: Coordinates,
    baseline: &Route,
    contract: &str,
    pickup: &Station,
    drop: &Station,
) -> Result<ItineraryResponse> {
    let walk1 = routing
        .route(TravelProfile::FootWalking, origin, pickup.position)
        .await?;
    let bike = routing
        .route(TravelProfile::CyclingRegular, pickup.position, drop.position)
        .await?;
    let walk2 = routing
        .route(TravelProfile::FootWalking, drop.position, dest)
        .await?;

    let mut resp = base_response(baseline);
    resp.use_bike = true;
    resp.origin_contract = Some(contract.to_string());
    resp.bike_from = Some(pickup.name.clone());
    resp.bike_to = Some(drop.name.clone());
    resp.bike_plan_duration_sec = walk1.duration_secs + bike.duration_secs + walk2.duration_secs;
    resp.bike_plan_distance_meters =
        walk1.distance_meters + bike.distance_meters + walk2.distance_meters;
    resp.walk1_coords = walk1.latlng_pairs();
    resp.bike_coords = bike.latlng_pairs();
    resp.walk2_coords = walk2.latlng_pairs();
    resp.walk1_distance_meters = walk1.distance_meters;
    resp.bike_distance_meters = bike.distance_meters;
    resp.walk2_distance_meters = walk2.distance_meters;
    resp.segments = vec![
        RouteSegment::new(LegMode::Walk, None, "Origin", &pickup.name, &walk1),
        RouteSegment::new(LegMode::Bike, Some(contract), &pickup.name, &drop.name, &bike),
        RouteSegment::new(LegMode::Walk, None, &drop.name, "Destination", &walk2),
    ];
    resp.instructions = vec![
        start_line(req),
        format!("Origin contract: {}", contract),
        format!("Walk to station '{}'.", pickup.name),
        format!("Ride to station '{}'.", drop.name),
        "Walk to the destination.".to_string(),
        end_line(req),
    ];
    Ok(resp)
}

/// Long walk into the destination network, then ride to the destination.
pub async fn destination_only(
    routing: &dyn RoutingCore,
    req: &ItineraryRequest,
    origin: Coordinates,
    dest: Coordinates,
    baseline: &Route,
    contract: &str,
    pickup: &Station,
    drop: &Station,
) -> Result<ItineraryResponse> {
    let walk1 = routing
        .route(TravelProfile::FootWalking, origin, pickup.position)
        .await?;
    let bike = routing
        .route(TravelProfile::CyclingRegular, pickup.position, drop.position)
        .await?;
    let walk2 = routing
        .route(TravelProfile::FootWalking, drop.position, dest)
        .await?;

    let mut resp = base_response(baseline);
    resp.use_bike = true;
    resp.dest_contract = Some(contract.to_string());
    resp.bike_from = Some(pickup.name.clone());
    resp.bike_to = Some(drop.name.clone());
    resp.bike_plan_duration_sec = walk1.duration_secs + bike.duration_secs + walk2.duration_secs;
    resp.bike_plan_distance_meters =
        walk1.distance_meters + bike.distance_meters + walk2.distance_meters;
    resp.walk1_coords = walk1.latlng_pairs();
    resp.bike_coords = bike.latlng_pairs();
    resp.walk2_coords = walk2.latlng_pairs();
    resp.walk1_distance_meters = walk1.distance_meters;
    resp.bike_distance_meters = bike.distance_meters;
    resp.walk2_distance_meters = walk2.distance_meters;
    resp.segments = vec![
        RouteSegment::new(LegMode::Walk, None, "Origin", &pickup.name, &walk1),
        RouteSegment::new(LegMode::Bike, Some(contract), &pickup.name, &drop.name, &bike),
        RouteSegment::new(LegMode::Walk, None, &drop.name, "Destination", &walk2),
    ];
    resp.instructions = vec![
        start_line(req),
        format!("Destination contract: {}", contract),
        format!(
            "Walk to station '{}' (first station in the destination network).",
            pickup.name
        ),
        format!("Ride to station '{}'.", drop.name),
        "Walk to the destination.".to_string(),
        end_line(req),
    ];
    Ok(resp)
}

/// Ride within the origin network, walk the inter-city gap, ride within the
/// destination network. Five legs; the leg-triple fields carry the first
/// walk, the first ride and the last walk, the full sequence lives in
/// `segments`.
#[allow(clippy::too_many_arguments)]
pub async fn both_ends(
    routing: &dyn RoutingCore,
    req: &ItineraryRequest,
    origin: Coordinates,
    dest: Coordinates,
    baseline: &Route,
    origin_contract: &str,
    dest_contract: &str,
    origin_pickup: &Station,
    origin_drop: &Station,
    dest_pickup: &Station,
    dest_drop: &Station,
) -> Result<ItineraryResponse> {
    let walk1 = routing
        .route(TravelProfile::FootWalking, origin, origin_pickup.position)
        .await?;
    let bike1 = routing
        .route(
            TravelProfile::CyclingRegular,
            origin_pickup.position,
            origin_drop.position,
        )
        .await?;
    let walk_mid = routing
        .route(
            TravelProfile::FootWalking,
            origin_drop.position,
            dest_pickup.position,
        )
        .await?;
    let bike2 = routing
        .route(
            TravelProfile::CyclingRegular,
            dest_pickup.position,
            dest_drop.position,
        )
        .await?;
    let walk2 = routing
        .route(TravelProfile::FootWalking, dest_drop.position, dest)
        .await?;

    let mut resp = base_response(baseline);
    resp.use_bike = true;
    resp.origin_contract = Some(origin_contract.to_string());
    resp.dest_contract = Some(dest_contract.to_string());
    resp.bike_from = Some(origin_pickup.name.clone());
    resp.bike_to = Some(dest_drop.name.clone());
    resp.bike_plan_duration_sec = walk1.duration_secs
        + bike1.duration_secs
        + walk_mid.duration_secs
        + bike2.duration_secs
        + walk2.duration_secs;
    resp.bike_plan_distance_meters = walk1.distance_meters
        + bike1.distance_meters
        + walk_mid.distance_meters
        + bike2.distance_meters
        + walk2.distance_meters;
    resp.walk1_coords = walk1.latlng_pairs();
    resp.bike_coords = bike1.latlng_pairs();
    resp.walk2_coords = walk2.latlng_pairs();
    resp.walk1_distance_meters = walk1.distance_meters;
    resp.bike_distance_meters = bike1.distance_meters + bike2.distance_meters;
    resp.walk2_distance_meters = walk2.distance_meters;
    resp.segments = vec![
        RouteSegment::new(LegMode::Walk, None, "Origin", &origin_pickup.name, &walk1),
        RouteSegment::new(
            LegMode::Bike,
            Some(origin_contract),
            &origin_pickup.name,
            &origin_drop.name,
            &bike1,
        ),
        RouteSegment::new(
            LegMode::Walk,
            None,
            &origin_drop.name,
            &dest_pickup.name,
            &walk_mid,
        ),
        RouteSegment::new(
            LegMode::Bike,
            Some(dest_contract),
            &dest_pickup.name,
            &dest_drop.name,
            &bike2,
        ),
        RouteSegment::new(LegMode::Walk, None, &dest_drop.name, "Destination", &walk2),
    ];
    resp.instructions = vec![
        start_line(req),
        format!("Origin contract: {}", origin_contract),
        format!("Destination contract: {}", dest_contract),
        format!("Walk to station '{}'.", origin_pickup.name),
        format!("Ride to station '{}'.", origin_drop.name),
        format!("Walk (inter-city) to station '{}'.", dest_pickup.name),
        format!("Ride to station '{}'.", dest_drop.name),
        "Walk to the destination.".to_string(),
        end_line(req),
    ];
    Ok(resp)
}
