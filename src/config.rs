use crate::constants::*;
use crate::planning::PlannerOptions;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Bearer token for the routing/geocoding provider. Optional at startup;
    /// ORS calls fail cleanly at request time when it is absent.
    pub ors_bearer: Option<String>,
    /// JCDecaux API key, appended to bike-share URLs. Optional.
    pub jcdecaux_api_key: Option<String>,
    /// Network assumed when logging startup context.
    pub default_contract: String,
    pub small_buffer_secs: f64,
    pub both_ends_advantage_secs: f64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            ors_bearer: env::var("ORS_BEARER").ok().filter(|v| !v.trim().is_empty()),
            jcdecaux_api_key: env::var("JCDECAUX_API_KEY")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            default_contract: env::var("DEFAULT_CONTRACT")
                .unwrap_or_else(|_| DEFAULT_CONTRACT.to_string()),
            small_buffer_secs: env::var("SMALL_BUFFER_SECONDS")
                .unwrap_or_else(|_| DEFAULT_SMALL_BUFFER_SECONDS.to_string())
                .parse()
                .map_err(|_| "Invalid SMALL_BUFFER_SECONDS")?,
            both_ends_advantage_secs: env::var("BOTH_ENDS_ADVANTAGE_SECONDS")
                .unwrap_or_else(|_| DEFAULT_BOTH_ENDS_ADVANTAGE_SECONDS.to_string())
                .parse()
                .map_err(|_| "Invalid BOTH_ENDS_ADVANTAGE_SECONDS")?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn planner_options(&self) -> PlannerOptions {
        PlannerOptions {
            small_buffer_secs: self.small_buffer_secs,
            both_ends_advantage_secs: self.both_ends_advantage_secs,
        }
    }
}
