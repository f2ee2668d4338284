use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use veloplan::cache::{Fetcher, UrlCache};
use veloplan::config::Config;
use veloplan::planning::ItineraryService;
use veloplan::services::{
    JcdecauxStationRepository, OrsGeocodingService, OrsRoutingService, ProxyService,
    StationSource, UpstreamGateway,
};
use veloplan::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "veloplan=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting veloplan API server");
    tracing::info!(contract = %config.default_contract, "Default JCDecaux contract");
    if config.ors_bearer.is_none() {
        tracing::warn!("ORS_BEARER is not set; geocoding and routing calls will fail");
    }
    if config.jcdecaux_api_key.is_none() {
        tracing::warn!("JCDECAUX_API_KEY is not set; station calls go out unauthenticated");
    }

    // One shared gateway and URL cache behind every upstream consumer
    let gateway: Arc<dyn Fetcher> = Arc::new(UpstreamGateway::new(
        config.ors_bearer.clone(),
        config.jcdecaux_api_key.clone(),
    ));
    let url_cache = Arc::new(UrlCache::new(gateway.clone()));

    // Domain services
    let geocoder = Arc::new(OrsGeocodingService::new(url_cache.clone()));
    let routing = Arc::new(OrsRoutingService::new(url_cache.clone()));
    let stations: Arc<dyn StationSource> =
        Arc::new(JcdecauxStationRepository::new(url_cache.clone()));

    let itineraries = ItineraryService::new(
        geocoder,
        routing,
        stations.clone(),
        config.planner_options(),
    );
    let proxy = ProxyService::new(url_cache, gateway);

    let state = Arc::new(AppState {
        itineraries,
        stations,
        proxy,
    });

    // Build router with CORS and tracing
    let app = Router::new()
        .nest("/api/v1", veloplan::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
