#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use veloplan::cache::{FetchedPage, Fetcher};
use veloplan::error::Result;
use veloplan::models::{Contract, Coordinates, Route, Station, TravelProfile};
use veloplan::services::{Geocoder, RoutingCore, StationSource};

pub fn station(name: &str, contract: &str, lng: f64, bikes: u32, stands: u32) -> Station {
    Station {
        name: name.to_string(),
        contract_name: contract.to_string(),
        position: Coordinates { lat: 0.0, lng },
        bikes,
        stands,
    }
}

/// Geocoder backed by a fixed text-to-point table.
pub struct FakeGeocoder {
    places: HashMap<String, Coordinates>,
}

impl FakeGeocoder {
    pub fn new(places: &[(&str, f64, f64)]) -> Arc<Self> {
        Arc::new(FakeGeocoder {
            places: places
                .iter()
                .map(|(name, lat, lng)| {
                    (name.to_string(), Coordinates { lat: *lat, lng: *lng })
                })
                .collect(),
        })
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn resolve(&self, text: &str) -> Result<Option<Coordinates>> {
        Ok(self.places.get(text).copied())
    }
}

/// Straight-line router with a fixed speed per profile. Durations follow
/// directly from the haversine distance, which keeps test geometry easy to
/// reason about.
pub struct FakeRouting {
    pub walk_speed: f64,
    pub bike_speed: f64,
}

impl FakeRouting {
    pub fn new(walk_speed: f64, bike_speed: f64) -> Arc<Self> {
        Arc::new(FakeRouting {
            walk_speed,
            bike_speed,
        })
    }
}

#[async_trait]
impl RoutingCore for FakeRouting {
    async fn route(
        &self,
        profile: TravelProfile,
        from: Coordinates,
        to: Coordinates,
    ) -> Result<Route> {
        let distance = from.distance_meters_to(&to);
        let speed = match profile {
            TravelProfile::FootWalking => self.walk_speed,
            TravelProfile::CyclingRegular => self.bike_speed,
        };
        Ok(Route {
            duration_secs: distance / speed,
            distance_meters: distance,
            polyline: vec![from, to],
        })
    }
}

pub struct FakeStations {
    pub stations: Vec<Station>,
}

impl FakeStations {
    pub fn new(stations: Vec<Station>) -> Arc<Self> {
        Arc::new(FakeStations { stations })
    }
}

#[async_trait]
impl StationSource for FakeStations {
    async fn all_stations(&self) -> Result<Vec<Station>> {
        Ok(self.stations.clone())
    }

    async fn contracts(&self) -> Result<Vec<Contract>> {
        let mut names: Vec<String> = self
            .stations
            .iter()
            .map(|s| s.contract_name.clone())
            .collect();
        names.sort();
        names.dedup();
        Ok(names
            .into_iter()
            .map(|name| Contract {
                name,
                commercial_name: String::new(),
                cities: Vec::new(),
                country_code: String::new(),
            })
            .collect())
    }

    async fn stations(&self, contract: &str) -> Result<Vec<Station>> {
        Ok(self
            .stations
            .iter()
            .filter(|s| s.in_contract(contract))
            .cloned()
            .collect())
    }
}

/// Upstream fake for the proxy endpoints: serves a canned body per URL.
pub struct FakeUpstream {
    pub pages: HashMap<String, (i32, String)>,
}

impl FakeUpstream {
    pub fn new(pages: &[(&str, i32, &str)]) -> Arc<Self> {
        Arc::new(FakeUpstream {
            pages: pages
                .iter()
                .map(|(url, status, body)| (url.to_string(), (*status, body.to_string())))
                .collect(),
        })
    }
}

#[async_trait]
impl Fetcher for FakeUpstream {
    async fn fetch(&self, url: &str) -> FetchedPage {
        match self.pages.get(url) {
            Some((status, body)) => FetchedPage::new(url, body.clone(), *status),
            None => FetchedPage::new(url, "(HTTP 404 Not Found)", 404),
        }
    }
}
