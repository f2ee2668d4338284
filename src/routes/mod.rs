pub mod debug;
pub mod itinerary;
pub mod proxy;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/itinerary", post(itinerary::plan_itinerary))
        .route("/contracts", get(itinerary::list_contracts))
        .route("/stations", get(itinerary::list_stations))
        .route("/ping", get(debug::ping))
        .route("/debug/health", get(debug::health_check))
        .route("/proxy/get", get(proxy::get))
        .route("/proxy/get_ttl", get(proxy::get_with_ttl))
        .route("/proxy/meta", get(proxy::get_meta))
        .route("/proxy/evict", delete(proxy::evict))
        .route("/proxy/evict_generic", delete(proxy::evict_generic))
        .route("/proxy/status", get(proxy::status))
        .route("/proxy/contracts", get(proxy::contracts_payload))
        .route("/proxy/stations", get(proxy::stations_payload))
        .with_state(state)
}
