use crate::models::Coordinates;
use serde::{Deserialize, Serialize};

/// A bike-share station with its live availability snapshot.
///
/// Rebuilt wholesale from the provider payload on every cache miss; there is
/// no incremental merge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Station {
    pub name: String,
    pub contract_name: String,
    pub position: Coordinates,
    pub bikes: u32,
    pub stands: u32,
}

impl Station {
    pub fn has_bikes(&self) -> bool {
        self.bikes > 0
    }

    pub fn has_stands(&self) -> bool {
        self.stands > 0
    }

    pub fn in_contract(&self, contract: &str) -> bool {
        self.contract_name.eq_ignore_ascii_case(contract)
    }
}

/// An operator-defined city-scale bike-share network ("contract").
/// Long-TTL metadata, rarely changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contract {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub commercial_name: String,
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default)]
    pub country_code: String,
}
