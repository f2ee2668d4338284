use crate::cache::{FetchedPage, UrlCache};
use crate::constants::{TTL_CONTRACTS_SECONDS, TTL_STATIONS_SECONDS};
use crate::error::{excerpt, AppError, Result};
use crate::models::{Contract, Coordinates, Station};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

pub const STATIONS_URL: &str = "https://api.jcdecaux.com/vls/v3/stations";
pub const CONTRACTS_URL: &str = "https://api.jcdecaux.com/vls/v3/contracts";

/// Key for the generic contracts payload cache.
pub const CONTRACTS_CACHE_KEY: &str = "jc:contracts";
const STATIONS_KEY_PREFIX: &str = "jc:stations:";

/// Generic stations payload key: contract normalized by trim + lowercase.
pub fn stations_cache_key(contract: &str) -> String {
    format!("{}{}", STATIONS_KEY_PREFIX, contract.trim().to_lowercase())
}

/// Recover the contract name embedded in a `jc:stations:{contract}` key.
pub fn contract_from_stations_key(key: &str) -> Result<&str> {
    key.strip_prefix(STATIONS_KEY_PREFIX)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| {
            AppError::InvalidRequest(format!("Invalid stations cache key: '{}'", key))
        })
}

pub fn stations_url_for(contract: &str) -> String {
    if contract.trim().is_empty() {
        STATIONS_URL.to_string()
    } else {
        format!("{}?contract={}", STATIONS_URL, urlencoding::encode(contract))
    }
}

/// Supplies the bike-share station universe and network metadata.
#[async_trait]
pub trait StationSource: Send + Sync {
    async fn all_stations(&self) -> Result<Vec<Station>>;
    async fn contracts(&self) -> Result<Vec<Contract>>;
    async fn stations(&self, contract: &str) -> Result<Vec<Station>>;
}

/// JCDecaux v3 repository. Station availability is cached 30s (it changes
/// continuously); contract metadata 1h. Each fetch rebuilds the entity list
/// wholesale, no incremental merge.
pub struct JcdecauxStationRepository {
    proxy: Arc<UrlCache>,
}

impl JcdecauxStationRepository {
    pub fn new(proxy: Arc<UrlCache>) -> Self {
        JcdecauxStationRepository { proxy }
    }

    async fn fetch_checked(&self, url: &str, ttl_seconds: f64) -> Result<String> {
        let page = self.proxy.get_with_ttl(url, ttl_seconds, false, false).await;
        checked_body(&page)
    }
}

#[async_trait]
impl StationSource for JcdecauxStationRepository {
    async fn all_stations(&self) -> Result<Vec<Station>> {
        let body = self.fetch_checked(STATIONS_URL, TTL_STATIONS_SECONDS).await?;
        parse_stations(&body)
    }

    async fn contracts(&self) -> Result<Vec<Contract>> {
        let body = self
            .fetch_checked(CONTRACTS_URL, TTL_CONTRACTS_SECONDS)
            .await?;
        serde_json::from_str(&body).map_err(|e| {
            AppError::MalformedResponse(format!("JCDecaux contracts parse error: {}", e))
        })
    }

    async fn stations(&self, contract: &str) -> Result<Vec<Station>> {
        let body = self
            .fetch_checked(&stations_url_for(contract), TTL_STATIONS_SECONDS)
            .await?;
        parse_stations(&body)
    }
}

/// Validate a provider body: 200, non-empty, JSON-shaped.
fn checked_body(page: &FetchedPage) -> Result<String> {
    if page.status != 200 {
        return Err(AppError::from_page(page));
    }
    let trimmed = page.body.trim_start();
    if trimmed.is_empty() {
        return Err(AppError::MalformedResponse(
            "JCDecaux empty response".to_string(),
        ));
    }
    if trimmed.starts_with('<') || trimmed.starts_with('(') {
        return Err(AppError::MalformedResponse(format!(
            "JCDecaux non-JSON: {}",
            excerpt(trimmed)
        )));
    }
    Ok(page.body.clone())
}

fn parse_stations(body: &str) -> Result<Vec<Station>> {
    let wire: Vec<StationWire> = serde_json::from_str(body).map_err(|e| {
        AppError::MalformedResponse(format!("JCDecaux stations parse error: {}", e))
    })?;
    Ok(wire.into_iter().map(Station::from).collect())
}

// JCDecaux v3 wire types. Nested availability and position fields default to
// zero rather than failing the whole payload.

#[derive(Debug, Deserialize)]
struct StationWire {
    #[serde(default)]
    name: String,
    #[serde(rename = "contractName", default)]
    contract_name: String,
    #[serde(default)]
    position: PositionWire,
    #[serde(rename = "totalStands", default)]
    total_stands: TotalStandsWire,
}

#[derive(Debug, Default, Deserialize)]
struct PositionWire {
    #[serde(default)]
    latitude: f64,
    #[serde(default)]
    longitude: f64,
}

#[derive(Debug, Default, Deserialize)]
struct TotalStandsWire {
    #[serde(default)]
    availabilities: AvailabilitiesWire,
}

#[derive(Debug, Default, Deserialize)]
struct AvailabilitiesWire {
    #[serde(default)]
    bikes: u32,
    #[serde(default)]
    stands: u32,
}

impl From<StationWire> for Station {
    fn from(w: StationWire) -> Self {
        Station {
            name: w.name,
            contract_name: w.contract_name,
            position: Coordinates {
                lat: w.position.latitude,
                lng: w.position.longitude,
            },
            bikes: w.total_stands.availabilities.bikes,
            stands: w.total_stands.availabilities.stands,
        }
    }
}
