pub mod builders;
pub mod pickers;
pub mod planner;

pub use builders::INTER_CITY_MSG;
pub use planner::{ItineraryPlanner, PlannerOptions, StationContext};

use crate::error::Result;
use crate::models::{
    Coordinates, DebugInfo, DebugStationChoice, ItineraryRequest, ItineraryResponse, Station,
    TravelProfile,
};
use crate::planning::builders::walk_only;
use crate::services::{Geocoder, RoutingCore, StationSource};
use std::sync::Arc;

/// End-to-end itinerary pipeline: endpoint resolution, station discovery,
/// candidate planning and the optional debug view.
///
/// `plan` never fails at the type level; internal errors come back as a
/// structured failure body so the HTTP layer can keep answering 200.
pub struct ItineraryService {
    geocoder: Arc<dyn Geocoder>,
    routing: Arc<dyn RoutingCore>,
    stations: Arc<dyn StationSource>,
    planner: ItineraryPlanner,
}

impl ItineraryService {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        routing: Arc<dyn RoutingCore>,
        stations: Arc<dyn StationSource>,
        options: PlannerOptions,
    ) -> Self {
        let planner = ItineraryPlanner::new(routing.clone(), options);
        ItineraryService {
            geocoder,
            routing,
            stations,
            planner,
        }
    }

    pub async fn plan(&self, req: &ItineraryRequest) -> ItineraryResponse {
        match self.plan_inner(req).await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::error!("Itinerary planning failed: {}", e);
                ItineraryResponse::failed(format!("Error: {}", e))
            }
        }
    }

    async fn plan_inner(&self, req: &ItineraryRequest) -> Result<ItineraryResponse> {
        let origin = match self.resolve_endpoint(req.origin_point(), &req.origin).await? {
            Some(p) => p,
            None => return Ok(ItineraryResponse::failed("Could not geocode Origin address.")),
        };
        let dest = match self.resolve_endpoint(req.dest_point(), &req.destination).await? {
            Some(p) => p,
            None => {
                return Ok(ItineraryResponse::failed(
                    "Could not geocode Destination address.",
                ))
            }
        };

        let all = self.stations.all_stations().await?;
        if all.is_empty() {
            let baseline = self
                .routing
                .route(TravelProfile::FootWalking, origin, dest)
                .await?;
            return Ok(walk_only(
                req,
                &baseline,
                Some("There is no useful JCDecaux network in the area."),
            ));
        }

        let (Some(origin_anchor), Some(dest_anchor)) =
            (pickers::closest(&all, origin), pickers::closest(&all, dest))
        else {
            let baseline = self
                .routing
                .route(TravelProfile::FootWalking, origin, dest)
                .await?;
            return Ok(walk_only(
                req,
                &baseline,
                Some("No nearby JCDecaux stations were found."),
            ));
        };

        let ctx = StationContext {
            origin_contract: origin_anchor.contract_name.clone(),
            dest_contract: dest_anchor.contract_name.clone(),
            all,
        };

        let mut resp = self.planner.plan(req, origin, dest, &ctx).await?;
        if req.debug {
            resp.debug = Some(debug_info(&ctx, origin, dest));
        }
        Ok(resp)
    }

    /// Coordinates straight from the request, or geocoded from the text when
    /// the request left them at zero.
    async fn resolve_endpoint(
        &self,
        point: Coordinates,
        text: &str,
    ) -> Result<Option<Coordinates>> {
        if point.lat != 0.0 || point.lng != 0.0 {
            return Ok(Some(point));
        }
        self.geocoder.resolve(text).await
    }
}

/// Nearest-candidate diagnostics: the three closest stations with bikes
/// around the origin and the three closest with stands around the
/// destination. Both lists draw from the pooled origin and destination
/// networks, so an inter-city request can surface a destination-network
/// station near the origin.
fn debug_info(ctx: &StationContext, origin: Coordinates, dest: Coordinates) -> DebugInfo {
    let mut pool = pickers::in_contract(&ctx.all, &ctx.origin_contract);
    if ctx.inter_city() {
        pool.extend(pickers::in_contract(&ctx.all, &ctx.dest_contract));
    }

    DebugInfo {
        origin_resolved_lat: origin.lat,
        origin_resolved_lon: origin.lng,
        dest_resolved_lat: dest.lat,
        dest_resolved_lon: dest.lng,
        bike_from_top3: top3(&pool, origin, Station::has_bikes),
        bike_to_top3: top3(&pool, dest, Station::has_stands),
    }
}

fn top3<F>(stations: &[Station], point: Coordinates, keep: F) -> Vec<DebugStationChoice>
where
    F: Fn(&Station) -> bool,
{
    let mut ranked: Vec<(&Station, f64)> = stations
        .iter()
        .filter(|s| keep(s))
        .map(|s| (s, s.position.distance_meters_to(&point)))
        .collect();
    ranked.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.name.cmp(&b.0.name))
    });

    ranked
        .into_iter()
        .take(3)
        .map(|(s, d)| DebugStationChoice {
            name: s.name.clone(),
            lat: s.position.lat,
            lon: s.position.lng,
            bikes: s.bikes,
            stands: s.stands,
            distance_meters: (d * 10.0).round() / 10.0,
        })
        .collect()
}
