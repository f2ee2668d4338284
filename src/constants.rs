//! Stable application-wide constants.
//!
//! Values here are structural invariants and default fallbacks for
//! env-var-based configuration. They should rarely change. For tuning knobs
//! that are expected to vary per deployment (planner buffers, credentials),
//! see [`Config`](crate::config::Config) instead.

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";

// --- Cache TTLs (seconds) per upstream resource ---

/// Geocoding of a fixed text is treated as stable: 24 hours.
pub const TTL_GEOCODE_SECONDS: f64 = 86_400.0;
/// Directions are volatile but recur within one planning call: 2 minutes.
pub const TTL_ROUTE_SECONDS: f64 = 120.0;
/// Station availability changes continuously: 30 seconds.
pub const TTL_STATIONS_SECONDS: f64 = 30.0;
/// Contract (network) metadata rarely changes: 1 hour.
pub const TTL_CONTRACTS_SECONDS: f64 = 3_600.0;
/// Fallback TTL when a caller passes a non-positive TTL to the URL cache.
pub const DEFAULT_URL_TTL_SECONDS: f64 = 60.0;

// --- Planner thresholds (seconds, overridable via env) ---

/// Minimum advantage any bike plan must show over the walking baseline.
pub const DEFAULT_SMALL_BUFFER_SECONDS: f64 = 60.0;
/// Minimum advantage a both-ends plan must show over both the best
/// single-sided plan and the walking baseline.
pub const DEFAULT_BOTH_ENDS_ADVANTAGE_SECONDS: f64 = 120.0;

/// Network assumed for startup logging when DEFAULT_CONTRACT is not set.
pub const DEFAULT_CONTRACT: &str = "lyon";

// --- Upstream HTTP ---

/// User-Agent sent on every upstream request.
pub const HTTP_USER_AGENT: &str = "veloplan/0.1 (+local)";
/// Per-request timeout for upstream GET calls (seconds).
pub const UPSTREAM_TIMEOUT_SECONDS: u64 = 30;
/// Maximum number of body characters quoted in error messages.
pub const BODY_EXCERPT_CHARS: usize = 200;
