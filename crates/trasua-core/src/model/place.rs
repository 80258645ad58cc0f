// ── Place search results and coordinates ──

use std::fmt;

use serde::{Deserialize, Serialize};

/// A candidate place returned by the free-text search endpoint.
///
/// Ephemeral: discarded once a selection is made or the query changes.
/// `label` is the comma-separated chain of location fragments that the
/// decomposition step parses back into tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSuggestion {
    pub id: String,
    pub name: String,
    pub label: String,
    pub region: Option<String>,
    pub address: Option<String>,
}

/// Geographic position resolved by the geocoder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}
