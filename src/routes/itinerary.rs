use crate::error::Result;
use crate::models::{Contract, ItineraryRequest, ItineraryResponse, Station};
use crate::AppState;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

/// POST /itinerary
/// Plan a door-to-door trip, deciding between walking and a shared bike.
/// Always answers 200; failures are reported in the response body.
pub async fn plan_itinerary(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ItineraryRequest>,
) -> Json<ItineraryResponse> {
    tracing::info!(
        origin = %request.origin,
        destination = %request.destination,
        debug = request.debug,
        "Itinerary request"
    );

    let response = state.itineraries.plan(&request).await;
    tracing::info!(
        success = response.success,
        use_bike = response.use_bike,
        "Itinerary response: {}",
        response.message
    );
    Json(response)
}

/// GET /contracts
pub async fn list_contracts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Contract>>> {
    Ok(Json(state.stations.contracts().await?))
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct StationsQuery {
    pub contract: String,
}

/// GET /stations?contract=lyon
/// Without a contract the full station universe is returned.
pub async fn list_stations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StationsQuery>,
) -> Result<Json<Vec<Station>>> {
    let stations = if query.contract.trim().is_empty() {
        state.stations.all_stations().await?
    } else {
        state.stations.stations(&query.contract).await?
    };
    Ok(Json(stations))
}
