use crate::constants::{DEFAULT_BOTH_ENDS_ADVANTAGE_SECONDS, DEFAULT_SMALL_BUFFER_SECONDS};
use crate::error::Result;
use crate::models::{Coordinates, ItineraryRequest, ItineraryResponse, Station, TravelProfile};
use crate::planning::builders::{
    both_ends, destination_only, origin_only, walk_only, INTER_CITY_MSG,
};
use crate::planning::pickers;
use crate::services::RoutingCore;
use std::sync::Arc;

/// Acceptance thresholds for bike candidates, in seconds.
#[derive(Debug, Clone, Copy)]
pub struct PlannerOptions {
    /// A single-network plan must beat walking by more than this.
    pub small_buffer_secs: f64,
    /// A two-network plan must beat both walking and the best
    /// single-network plan by more than this.
    pub both_ends_advantage_secs: f64,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        PlannerOptions {
            small_buffer_secs: DEFAULT_SMALL_BUFFER_SECONDS,
            both_ends_advantage_secs: DEFAULT_BOTH_ENDS_ADVANTAGE_SECONDS,
        }
    }
}

/// Station universe around one request, with the network each endpoint
/// falls into.
#[derive(Debug, Clone)]
pub struct StationContext {
    pub all: Vec<Station>,
    pub origin_contract: String,
    pub dest_contract: String,
}

impl StationContext {
    pub fn inter_city(&self) -> bool {
        !self
            .origin_contract
            .eq_ignore_ascii_case(&self.dest_contract)
    }
}

/// Compares bike candidates against the walking baseline and picks the
/// winner.
///
/// Candidates are built in a fixed order (origin network, destination
/// network, both networks); the two cross-network strategies only exist when
/// the endpoints fall into different networks. Selection keeps the earliest
/// candidate on equal duration, so the result is deterministic.
pub struct ItineraryPlanner {
    routing: Arc<dyn RoutingCore>,
    options: PlannerOptions,
}

impl ItineraryPlanner {
    pub fn new(routing: Arc<dyn RoutingCore>, options: PlannerOptions) -> Self {
        ItineraryPlanner { routing, options }
    }

    pub async fn plan(
        &self,
        req: &ItineraryRequest,
        origin: Coordinates,
        dest: Coordinates,
        ctx: &StationContext,
    ) -> Result<ItineraryResponse> {
        let inter_city = ctx.inter_city();
        let baseline = self
            .routing
            .route(TravelProfile::FootWalking, origin, dest)
            .await?;

        let mut accepted: Vec<ItineraryResponse> = Vec::new();

        if let Some(candidate) = self.origin_only_candidate(req, origin, dest, &baseline, ctx).await? {
            if accepts_single_sided(
                candidate.bike_plan_duration_sec,
                baseline.duration_secs,
                self.options.small_buffer_secs,
            ) {
                accepted.push(candidate);
            }
        }

        if inter_city {
            if let Some(candidate) = self
                .destination_only_candidate(req, origin, dest, &baseline, ctx)
                .await?
            {
                if accepts_single_sided(
                    candidate.bike_plan_duration_sec,
                    baseline.duration_secs,
                    self.options.small_buffer_secs,
                ) {
                    accepted.push(candidate);
                }
            }

            // The bar for the five-leg plan is the best plan seen so far,
            // not just walking.
            let cap = accepted
                .iter()
                .map(|c| c.bike_plan_duration_sec)
                .fold(baseline.duration_secs, f64::min);
            if let Some(candidate) = self
                .both_ends_candidate(req, origin, dest, &baseline, ctx)
                .await?
            {
                if accepts_both_ends(
                    candidate.bike_plan_duration_sec,
                    cap,
                    self.options.both_ends_advantage_secs,
                ) {
                    accepted.push(candidate);
                }
            }
        }

        let Some(mut winner) = select_fastest(accepted) else {
            let reason = if inter_city {
                INTER_CITY_MSG
            } else {
                "Bike is not worthwhile for this route."
            };
            return Ok(walk_only(req, &baseline, Some(reason)));
        };

        if inter_city {
            annotate_inter_city(&mut winner);
        }
        winner.message = summary_message(
            winner.bike_plan_duration_sec,
            baseline.duration_secs,
            inter_city,
        );
        Ok(winner)
    }

    async fn origin_only_candidate(
        &self,
        req: &ItineraryRequest,
        origin: Coordinates,
        dest: Coordinates,
        baseline: &crate::models::Route,
        ctx: &StationContext,
    ) -> Result<Option<ItineraryResponse>> {
        let network = pickers::in_contract(&ctx.all, &ctx.origin_contract);
        let Some(pickup) = pickers::closest_with_bikes(&network, origin) else {
            return Ok(None);
        };
        let Some(drop) = pickers::closest_with_stands(&network, dest) else {
            return Ok(None);
        };

        origin_only(
            self.routing.as_ref(),
            req,
            origin,
            dest,
            baseline,
            &ctx.origin_contract,
            pickup,
            drop,
        )
        .await
        .map(Some)
    }

    async fn destination_only_candidate(
        &self,
        req: &ItineraryRequest,
        origin: Coordinates,
        dest: Coordinates,
        baseline: &crate::models::Route,
        ctx: &StationContext,
    ) -> Result<Option<ItineraryResponse>> {
        let network = pickers::in_contract(&ctx.all, &ctx.dest_contract);
        let Some(pickup) = pickers::closest_with_bikes(&network, origin) else {
            return Ok(None);
        };
        let Some(drop) = pickers::closest_with_stands(&network, dest) else {
            return Ok(None);
        };

        destination_only(
            self.routing.as_ref(),
            req,
            origin,
            dest,
            baseline,
            &ctx.dest_contract,
            pickup,
            drop,
        )
        .await
        .map(Some)
    }

    async fn both_ends_candidate(
        &self,
        req: &ItineraryRequest,
        origin: Coordinates,
        dest: Coordinates,
        baseline: &crate::models::Route,
        ctx: &StationContext,
    ) -> Result<Option<ItineraryResponse>> {
        let origin_net = pickers::in_contract(&ctx.all, &ctx.origin_contract);
        let dest_net = pickers::in_contract(&ctx.all, &ctx.dest_contract);

        let Some(origin_pickup) = pickers::closest_with_bikes(&origin_net, origin) else {
            return Ok(None);
        };
        // Drop as far toward the destination as the origin network allows,
        // then pick up again as close to that drop as possible.
        let Some(origin_drop) = pickers::closest_with_stands(&origin_net, dest) else {
            return Ok(None);
        };
        let Some(dest_pickup) = pickers::closest_with_bikes(&dest_net, origin_drop.position)
        else {
            return Ok(None);
        };
        let Some(dest_drop) = pickers::closest_with_stands(&dest_net, dest) else {
            return Ok(None);
        };

        both_ends(
            self.routing.as_ref(),
            req,
            origin,
            dest,
            baseline,
            &ctx.origin_contract,
            &ctx.dest_contract,
            origin_pickup,
            origin_drop,
            dest_pickup,
            dest_drop,
        )
        .await
        .map(Some)
    }
}

fn accepts_single_sided(total_secs: f64, baseline_secs: f64, buffer_secs: f64) -> bool {
    total_secs + buffer_secs < baseline_secs
}

fn accepts_both_ends(total_secs: f64, cap_secs: f64, advantage_secs: f64) -> bool {
    total_secs + advantage_secs < cap_secs
}

/// Earliest candidate wins ties, strict comparison.
fn select_fastest(candidates: Vec<ItineraryResponse>) -> Option<ItineraryResponse> {
    let mut best: Option<ItineraryResponse> = None;
    for candidate in candidates {
        match &best {
            Some(b) if candidate.bike_plan_duration_sec >= b.bike_plan_duration_sec => {}
            _ => best = Some(candidate),
        }
    }
    best
}

/// Insert the inter-city notice near the top of the instruction list.
fn annotate_inter_city(resp: &mut ItineraryResponse) {
    if resp.instructions.iter().any(|i| i == INTER_CITY_MSG) {
        return;
    }
    let at = resp.instructions.len().min(2);
    resp.instructions.insert(at, INTER_CITY_MSG.to_string());
}

/// Whole-minute summary; rounding is display-only, comparisons stay on raw
/// seconds.
fn summary_message(bike_secs: f64, walk_secs: f64, inter_city: bool) -> String {
    let bike_min = (bike_secs / 60.0).round() as i64;
    let walk_min = (walk_secs / 60.0).round() as i64;
    let saved_min = (walk_min - bike_min).max(0);
    let prefix = if inter_city { "[Inter-city] " } else { "" };
    format!(
        "{}Bike plan selected: {} min vs walking {} min (saves ~{} min).",
        prefix, bike_min, walk_min, saved_min
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_sided_acceptance_is_strict() {
        assert!(accepts_single_sided(1000.0, 1100.0, 60.0));
        assert!(!accepts_single_sided(1040.0, 1100.0, 60.0));
        assert!(!accepts_single_sided(1039.9, 1099.9, 60.0));
    }

    #[test]
    fn test_both_ends_needs_a_real_advantage() {
        assert!(accepts_both_ends(900.0, 1100.0, 120.0));
        assert!(!accepts_both_ends(980.0, 1100.0, 120.0));
    }

    #[test]
    fn test_selection_keeps_earliest_on_tie() {
        let mk = |name: &str, secs: f64| ItineraryResponse {
            bike_from: Some(name.to_string()),
            bike_plan_duration_sec: secs,
            ..Default::default()
        };
        let winner =
            select_fastest(vec![mk("a", 500.0), mk("b", 500.0), mk("c", 600.0)]).unwrap();
        assert_eq!(winner.bike_from.as_deref(), Some("a"));

        assert!(select_fastest(Vec::new()).is_none());
    }

    #[test]
    fn test_inter_city_notice_position() {
        let mut resp = ItineraryResponse {
            instructions: vec!["a".into(), "b".into(), "c".into()],
            ..Default::default()
        };
        annotate_inter_city(&mut resp);
        assert_eq!(resp.instructions[2], INTER_CITY_MSG);

        // Idempotent
        annotate_inter_city(&mut resp);
        assert_eq!(
            resp.instructions.iter().filter(|i| *i == INTER_CITY_MSG).count(),
            1
        );

        // Short lists append at the end
        let mut short = ItineraryResponse {
            instructions: vec!["only".into()],
            ..Default::default()
        };
        annotate_inter_city(&mut short);
        assert_eq!(short.instructions[1], INTER_CITY_MSG);
    }

    #[test]
    fn test_summary_rounds_to_whole_minutes() {
        assert_eq!(
            summary_message(623.0, 2224.0, false),
            "Bike plan selected: 10 min vs walking 37 min (saves ~27 min)."
        );
        assert_eq!(
            summary_message(601.0, 599.0, true),
            "[Inter-city] Bike plan selected: 10 min vs walking 10 min (saves ~0 min)."
        );
    }
}
