use crate::models::Coordinates;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Travel profile understood by the ORS directions API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TravelProfile {
    #[default]
    FootWalking,
    CyclingRegular,
}

impl TravelProfile {
    /// Returns the ORS profile segment for the directions URL.
    pub fn ors_profile(&self) -> &'static str {
        match self {
            TravelProfile::FootWalking => "foot-walking",
            TravelProfile::CyclingRegular => "cycling-regular",
        }
    }
}

impl fmt::Display for TravelProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ors_profile())
    }
}

impl FromStr for TravelProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "foot-walking" | "walking" | "walk" => Ok(TravelProfile::FootWalking),
            "cycling-regular" | "cycling" | "bike" => Ok(TravelProfile::CyclingRegular),
            _ => Err(format!("Invalid travel profile: '{}'", s)),
        }
    }
}

/// One routed leg: duration, distance and the decoded geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub duration_secs: f64,
    pub distance_meters: f64,
    pub polyline: Vec<Coordinates>,
}

impl Route {
    /// Geometry as `[lat, lng]` pairs for map clients.
    pub fn latlng_pairs(&self) -> Vec<[f64; 2]> {
        self.polyline.iter().map(Coordinates::as_pair).collect()
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.duration_secs / 60.0).round() as i64
    }
}
