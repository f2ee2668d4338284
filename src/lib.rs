// Library exports for testing and reusability

pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod planning;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use error::{AppError, Result};

use planning::ItineraryService;
use services::{ProxyService, StationSource};
use std::sync::Arc;

// App state for sharing across the application
pub struct AppState {
    pub itineraries: ItineraryService,
    pub stations: Arc<dyn StationSource>,
    pub proxy: ProxyService,
}
