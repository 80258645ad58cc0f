// ── Domain model ──

pub mod place;
pub mod unit;

pub use place::{Coordinates, PlaceSuggestion};
pub use unit::{AdministrativeUnit, Tier, UnitCode, sort_by_name};
