use crate::cache::{FetchedPage, UrlCache};
use crate::constants::TTL_ROUTE_SECONDS;
use crate::error::{excerpt, AppError, Result};
use crate::models::{Coordinates, Route, TravelProfile};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

const DIRECTIONS_BASE_URL: &str = "https://api.openrouteservice.org/v2/directions";

/// Computes a route for a travel profile between two coordinates.
#[async_trait]
pub trait RoutingCore: Send + Sync {
    async fn route(&self, profile: TravelProfile, from: Coordinates, to: Coordinates)
        -> Result<Route>;
}

/// Thin wrapper around the ORS directions API: takes a profile and two
/// coordinates, returns a typed [`Route`] with duration, distance and the
/// decoded geometry. Results are cached for two minutes — the planner asks
/// for the same legs repeatedly within one request.
pub struct OrsRoutingService {
    proxy: Arc<UrlCache>,
}

impl OrsRoutingService {
    pub fn new(proxy: Arc<UrlCache>) -> Self {
        OrsRoutingService { proxy }
    }
}

#[async_trait]
impl RoutingCore for OrsRoutingService {
    async fn route(
        &self,
        profile: TravelProfile,
        from: Coordinates,
        to: Coordinates,
    ) -> Result<Route> {
        // GET directions API: coordinates are lon,lat ordered
        let url = format!(
            "{}/{}?start={},{}&end={},{}",
            DIRECTIONS_BASE_URL,
            profile.ors_profile(),
            from.lng,
            from.lat,
            to.lng,
            to.lat
        );

        let page = self
            .proxy
            .get_with_ttl(&url, TTL_ROUTE_SECONDS, false, false)
            .await;
        parse_directions_page(&page)
    }
}

fn parse_directions_page(page: &FetchedPage) -> Result<Route> {
    if page.status != 200 {
        return Err(AppError::from_page(page));
    }

    let trimmed = page.body.trim_start();
    if trimmed.is_empty() {
        return Err(AppError::MalformedResponse(
            "ORS directions empty response".to_string(),
        ));
    }
    if trimmed.starts_with('<') || trimmed.starts_with('(') {
        return Err(AppError::MalformedResponse(format!(
            "ORS directions non-JSON: {}",
            excerpt(trimmed)
        )));
    }

    let doc: DirectionsDoc = serde_json::from_str(&page.body).map_err(|e| {
        AppError::MalformedResponse(format!("ORS directions parse error: {}", e))
    })?;

    let feature = doc.features.first().ok_or_else(|| {
        AppError::MalformedResponse("ORS directions returned no routes".to_string())
    })?;
    let segment = feature.properties.segments.first().ok_or_else(|| {
        AppError::MalformedResponse("ORS directions route without segments".to_string())
    })?;

    let polyline = feature
        .geometry
        .coordinates
        .iter()
        .map(|pair| Coordinates {
            lat: pair[1],
            lng: pair[0],
        })
        .collect();

    Ok(Route {
        duration_secs: segment.duration,
        distance_meters: segment.distance,
        polyline,
    })
}

// ORS directions wire types (GeoJSON-shaped)

#[derive(Debug, Deserialize)]
struct DirectionsDoc {
    #[serde(default)]
    features: Vec<DirectionsFeature>,
}

#[derive(Debug, Deserialize)]
struct DirectionsFeature {
    properties: DirectionsProperties,
    geometry: LineGeometry,
}

#[derive(Debug, Deserialize)]
struct DirectionsProperties {
    #[serde(default)]
    segments: Vec<DirectionsSegment>,
}

#[derive(Debug, Deserialize)]
struct DirectionsSegment {
    duration: f64,
    distance: f64,
}

#[derive(Debug, Deserialize)]
struct LineGeometry {
    #[serde(default)]
    coordinates: Vec<[f64; 2]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "features": [{
            "properties": {"segments": [{"duration": 620.5, "distance": 850.2}]},
            "geometry": {"coordinates": [[4.8357, 45.764], [4.84, 45.77]]}
        }]
    }"#;

    #[test]
    fn test_parses_first_segment_and_geometry() {
        let page = FetchedPage::new("u", BODY, 200);
        let route = parse_directions_page(&page).unwrap();
        assert_eq!(route.duration_secs, 620.5);
        assert_eq!(route.distance_meters, 850.2);
        // lon,lat on the wire becomes lat,lng internally
        assert_eq!(route.polyline[0].lat, 45.764);
        assert_eq!(route.polyline[0].lng, 4.8357);
        assert_eq!(route.polyline.len(), 2);
    }

    #[test]
    fn test_empty_body_is_malformed() {
        let page = FetchedPage::new("u", "", 200);
        assert!(matches!(
            parse_directions_page(&page),
            Err(AppError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_html_body_is_malformed() {
        let page = FetchedPage::new("u", "<html>429</html>", 200);
        assert!(parse_directions_page(&page).is_err());
    }

    #[test]
    fn test_no_routes_is_malformed() {
        let page = FetchedPage::new("u", r#"{"features":[]}"#, 200);
        assert!(parse_directions_page(&page).is_err());
    }

    #[test]
    fn test_upstream_error_keeps_status() {
        let page = FetchedPage::new("u", "(HTTP 503 Service Unavailable)", 503);
        assert!(matches!(
            parse_directions_page(&page),
            Err(AppError::UpstreamHttp { status: 503, .. })
        ));
    }
}
