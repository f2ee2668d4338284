use crate::cache::CacheLookup;
use crate::constants::{TTL_CONTRACTS_SECONDS, TTL_STATIONS_SECONDS};
use crate::error::{AppError, Result};
use crate::services::ProxyStatus;
use crate::AppState;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

/// Maintenance endpoints over the caching proxy. The GET endpoints return
/// the upstream body verbatim (or its diagnostic replacement) so they can be
/// poked with curl while debugging cache behavior.

#[derive(Debug, Deserialize)]
pub struct UrlQuery {
    pub url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlTtlQuery {
    pub url: String,
    #[serde(default)]
    pub ttl: f64,
    #[serde(default)]
    pub force_refresh: bool,
    #[serde(default)]
    pub extend_ttl: bool,
}

#[derive(Debug, Deserialize)]
pub struct KeyQuery {
    pub key: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct TtlQuery {
    pub ttl: f64,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ContractTtlQuery {
    pub contract: String,
    pub ttl: f64,
}

/// GET /proxy/get?url=...
/// Cached fetch with infinite expiration.
pub async fn get(State(state): State<Arc<AppState>>, Query(q): Query<UrlQuery>) -> String {
    state.proxy.get(&q.url).await.body
}

/// GET /proxy/get_ttl?url=...&ttl=60&forceRefresh=false&extendTtl=false
pub async fn get_with_ttl(
    State(state): State<Arc<AppState>>,
    Query(q): Query<UrlTtlQuery>,
) -> String {
    state
        .proxy
        .get_with_ttl(&q.url, q.ttl, q.force_refresh, q.extend_ttl)
        .await
        .body
}

/// GET /proxy/meta?url=...&ttl=60
/// Cache-decision metadata without the body.
pub async fn get_meta(
    State(state): State<Arc<AppState>>,
    Query(q): Query<UrlTtlQuery>,
) -> Json<CacheLookup> {
    Json(state.proxy.get_with_meta(&q.url, q.ttl).await)
}

/// DELETE /proxy/evict?url=...
pub async fn evict(State(state): State<Arc<AppState>>, Query(q): Query<UrlQuery>) -> Json<bool> {
    state.proxy.evict(&q.url).await;
    Json(true)
}

/// DELETE /proxy/evict_generic?key=jc:contracts
pub async fn evict_generic(
    State(state): State<Arc<AppState>>,
    Query(q): Query<KeyQuery>,
) -> Result<Json<bool>> {
    if q.key.trim().is_empty() {
        return Err(AppError::InvalidRequest("Missing key parameter".to_string()));
    }
    state.proxy.evict_generic(&q.key).await;
    Ok(Json(true))
}

/// GET /proxy/status
pub async fn status(State(state): State<Arc<AppState>>) -> Json<ProxyStatus> {
    Json(state.proxy.status().await)
}

/// GET /proxy/contracts?ttl=3600
/// Raw contracts payload through the generic cache.
pub async fn contracts_payload(
    State(state): State<Arc<AppState>>,
    Query(q): Query<TtlQuery>,
) -> Result<String> {
    let ttl = if q.ttl > 0.0 { q.ttl } else { TTL_CONTRACTS_SECONDS };
    state.proxy.contracts_payload(ttl).await
}

/// GET /proxy/stations?contract=lyon&ttl=30
/// Raw per-network stations payload through the generic cache.
pub async fn stations_payload(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ContractTtlQuery>,
) -> Result<String> {
    let ttl = if q.ttl > 0.0 { q.ttl } else { TTL_STATIONS_SECONDS };
    state.proxy.stations_payload(&q.contract, ttl).await
}
