pub mod gateway;
pub mod geocoding;
pub mod proxy;
pub mod routing;
pub mod stations;

pub use gateway::UpstreamGateway;
pub use geocoding::{Geocoder, OrsGeocodingService};
pub use proxy::{ProxyService, ProxyStatus};
pub use routing::{OrsRoutingService, RoutingCore};
pub use stations::{JcdecauxStationRepository, StationSource};
