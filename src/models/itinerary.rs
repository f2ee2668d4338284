use crate::models::{Coordinates, Route};
use serde::{Deserialize, Serialize};

/// Inbound planning request. Zero/zero coordinates mean "geocode the text".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItineraryRequest {
    pub origin: String,
    pub destination: String,
    pub origin_lat: f64,
    pub origin_lon: f64,
    pub dest_lat: f64,
    pub dest_lon: f64,
    pub debug: bool,
}

impl ItineraryRequest {
    pub fn origin_point(&self) -> Coordinates {
        Coordinates {
            lat: self.origin_lat,
            lng: self.origin_lon,
        }
    }

    pub fn dest_point(&self) -> Coordinates {
        Coordinates {
            lat: self.dest_lat,
            lng: self.dest_lon,
        }
    }

    pub fn origin_unresolved(&self) -> bool {
        self.origin_lat == 0.0 && self.origin_lon == 0.0
    }

    pub fn dest_unresolved(&self) -> bool {
        self.dest_lat == 0.0 && self.dest_lon == 0.0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LegMode {
    Walk,
    Bike,
}

/// One leg of an itinerary, for the map client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSegment {
    pub mode: LegMode,
    /// Bike-share network for bike legs; `None` for walking legs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract: Option<String>,
    /// Station name, or "Origin" / "Destination".
    pub from_name: String,
    pub to_name: String,
    pub coords: Vec<[f64; 2]>,
    pub distance_meters: f64,
    pub duration_sec: f64,
}

impl RouteSegment {
    pub fn new(
        mode: LegMode,
        contract: Option<&str>,
        from_name: &str,
        to_name: &str,
        route: &Route,
    ) -> Self {
        RouteSegment {
            mode,
            contract: contract.map(str::to_string),
            from_name: from_name.to_string(),
            to_name: to_name.to_string(),
            coords: route.latlng_pairs(),
            distance_meters: route.distance_meters,
            duration_sec: route.duration_secs,
        }
    }
}

/// Nearest-station candidate surfaced by the debug view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugStationChoice {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub bikes: u32,
    pub stands: u32,
    pub distance_meters: f64,
}

/// Extra diagnostics returned only when the request sets `debug`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    pub origin_resolved_lat: f64,
    pub origin_resolved_lon: f64,
    pub dest_resolved_lat: f64,
    pub dest_resolved_lon: f64,
    pub bike_from_top3: Vec<DebugStationChoice>,
    pub bike_to_top3: Vec<DebugStationChoice>,
}

/// Planning result. Always well-formed; `success` carries the outcome.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItineraryResponse {
    pub success: bool,
    pub message: String,
    pub instructions: Vec<String>,
    pub use_bike: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_contract: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dest_contract: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bike_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bike_to: Option<String>,
    pub walk_only_duration_sec: f64,
    pub bike_plan_duration_sec: f64,
    pub walk_only_distance_meters: f64,
    pub bike_plan_distance_meters: f64,
    pub walk1_coords: Vec<[f64; 2]>,
    pub bike_coords: Vec<[f64; 2]>,
    pub walk2_coords: Vec<[f64; 2]>,
    pub walk1_distance_meters: f64,
    pub bike_distance_meters: f64,
    pub walk2_distance_meters: f64,
    pub segments: Vec<RouteSegment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugInfo>,
}

impl ItineraryResponse {
    /// Structured failure body; the HTTP layer still answers 200.
    pub fn failed(message: impl Into<String>) -> Self {
        ItineraryResponse {
            success: false,
            message: message.into(),
            ..Default::default()
        }
    }
}
