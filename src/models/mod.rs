pub mod coordinates;
pub mod itinerary;
pub mod route;
pub mod station;

pub use coordinates::Coordinates;
pub use itinerary::{
    DebugInfo, DebugStationChoice, ItineraryRequest, ItineraryResponse, LegMode, RouteSegment,
};
pub use route::{Route, TravelProfile};
pub use station::{Contract, Station};
