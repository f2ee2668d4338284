use crate::AppState;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /ping
pub async fn ping() -> &'static str {
    "pong"
}

/// GET /debug/health - liveness plus a cache snapshot
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let cache = state.proxy.status().await;
    Json(json!({
        "status": "ok",
        "cache": {
            "hits": cache.hits,
            "misses": cache.misses,
            "items": cache.items,
        }
    }))
}
