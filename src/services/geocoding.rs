use crate::cache::{FetchedPage, UrlCache};
use crate::constants::TTL_GEOCODE_SECONDS;
use crate::error::{excerpt, AppError, Result};
use crate::models::Coordinates;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

const GEOCODE_BASE_URL: &str = "https://api.openrouteservice.org/geocode/search";
/// Locality-grade result layers used for bare city-name queries.
const LOCALITY_LAYERS: &str = "locality,localadmin,county,region,macroregion";

/// Converts free-text place names to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` means the provider legitimately found nothing; malformed
    /// responses are hard errors, never silent "not found".
    async fn resolve(&self, text: &str) -> Result<Option<Coordinates>>;
}

/// Geocoding through the ORS search API, cached 24h via the URL cache.
///
/// A query that heuristically looks like a bare city name is first
/// restricted to locality-grade layers; if that restricted search returns
/// zero features the query is retried once without the restriction.
pub struct OrsGeocodingService {
    proxy: Arc<UrlCache>,
}

impl OrsGeocodingService {
    pub fn new(proxy: Arc<UrlCache>) -> Self {
        OrsGeocodingService { proxy }
    }

    async fn search(&self, url: &str) -> Result<Option<GeocodeDoc>> {
        let page = self
            .proxy
            .get_with_ttl(url, TTL_GEOCODE_SECONDS, false, false)
            .await;
        parse_geocode_page(&page)
    }
}

#[async_trait]
impl Geocoder for OrsGeocodingService {
    async fn resolve(&self, text: &str) -> Result<Option<Coordinates>> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let city_mode = is_likely_city_query(text);
        let mut base = format!(
            "{}?text={}&size=1",
            GEOCODE_BASE_URL,
            urlencoding::encode(text)
        );
        if let Some(code) = detect_country_code(text) {
            base.push_str("&boundary.country=");
            base.push_str(code);
        }

        let restricted = if city_mode {
            format!("{}&layers={}", base, LOCALITY_LAYERS)
        } else {
            base.clone()
        };

        let mut doc = self.search(&restricted).await?;

        // A restricted city search with no features gets one broad retry
        if city_mode && doc.as_ref().map_or(true, |d| d.features.is_empty()) {
            doc = self.search(&base).await?;
        }

        let Some(doc) = doc else { return Ok(None) };
        let Some(feature) = doc.features.first() else {
            return Ok(None);
        };

        match feature.geometry.coordinates.as_slice() {
            [lon, lat, ..] => Ok(Some(Coordinates { lat: *lat, lng: *lon })),
            _ => Err(AppError::MalformedResponse(
                "ORS geocode feature without a coordinate pair".to_string(),
            )),
        }
    }
}

fn parse_geocode_page(page: &FetchedPage) -> Result<Option<GeocodeDoc>> {
    if page.status != 200 {
        return Err(AppError::from_page(page));
    }

    let trimmed = page.body.trim_start();
    if trimmed.is_empty() {
        return Ok(None);
    }
    // HTML error pages and wrapped diagnostics are hard failures
    if trimmed.starts_with('<') || trimmed.starts_with('(') {
        return Err(AppError::MalformedResponse(format!(
            "ORS geocode non-JSON: {}",
            excerpt(trimmed)
        )));
    }

    let doc: GeocodeDoc = serde_json::from_str(&page.body).map_err(|e| {
        AppError::MalformedResponse(format!("ORS geocode parse error: {}", e))
    })?;
    Ok(Some(doc))
}

/// Bare city names have no comma, no digit and at most three tokens.
fn is_likely_city_query(s: &str) -> bool {
    if s.trim().is_empty() {
        return false;
    }
    if s.contains(',') {
        return false;
    }
    if s.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    s.split_whitespace().count() <= 3
}

/// Keyword-based country restriction for the handful of countries the
/// bike-share provider operates in. `None` leaves the search unrestricted.
fn detect_country_code(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    let contains_any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if contains_any(&["belgium", "belgique", "brussels", "bruxelles"]) {
        return Some("BE");
    }
    if contains_any(&["france", "paris", "lyon", "toulouse", "marseille"]) {
        return Some("FR");
    }
    if contains_any(&["spain", "españa", "madrid", "barcelona", "valencia", "sevilla"]) {
        return Some("ES");
    }
    if contains_any(&["ireland", "irlande", "dublin"]) {
        return Some("IE");
    }
    if lower.contains("luxembourg") {
        return Some("LU");
    }
    None
}

#[derive(Debug, Deserialize)]
struct GeocodeDoc {
    #[serde(default)]
    features: Vec<GeocodeFeature>,
}

#[derive(Debug, Deserialize)]
struct GeocodeFeature {
    geometry: PointGeometry,
}

#[derive(Debug, Deserialize)]
struct PointGeometry {
    #[serde(default)]
    coordinates: Vec<f64>,
}
