// trasua-api: Async Rust client for the address lookup endpoints
// (administrative divisions, place autocomplete, forward geocoding).

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::AddressClient;
pub use error::Error;
pub use models::{
    AutocompleteResponse, DistrictDetail, GeocodeResponse, ProvinceDetail, RawSuggestion, RawUnit,
};
pub use transport::TransportConfig;
