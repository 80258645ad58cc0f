//! Address resolution pipeline between `trasua-api` and its consumers.
//!
//! The crate turns free-text typing into a normalized province → district →
//! ward → street selection:
//!
//! - **[`AutocompleteController`]**: debounced, cancellable, cached place
//!   search for one input field. Publishes [`SuggestionState`] snapshots
//!   through a `tokio::sync::watch` channel; a newer keystroke always wins
//!   over a slower, older response.
//!
//! - **[`decompose_label`]** / **[`match_unit`]**: recover tier fragments
//!   from a suggestion's denormalized label using a per-locale
//!   [`LocaleRules`] table, then find the loaded unit each fragment names.
//!
//! - **[`AddressSelector`]**: the four-tier cascade. Each tier fetch carries
//!   a generation so a stale list never overwrites a newer one; geocoding of
//!   the assembled address is debounced separately.
//!
//! - **[`AddressPipeline`]**: one controller plus one selector over a shared
//!   [`AddressBackend`], which `trasua_api::AddressClient` implements.

pub mod backend;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod resolve;
pub mod search;
pub mod selector;

#[cfg(test)]
mod test_support;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::AddressBackend;
pub use config::{Locale, PipelineConfig};
pub use error::CoreError;
pub use pipeline::AddressPipeline;
pub use resolve::{
    ClassifiedFragment, LocaleRules, MatchStrategy, ParsedLabel, Slot, TierRule, decompose_label,
    match_unit,
};
pub use search::{
    AutocompleteController, OutsideClickTracker, PointerRegion, SuggestionCache, SuggestionState,
    SuggestionStatus, normalize_query,
};
pub use selector::{AddressSelector, DecompositionReport, SelectionStage, SelectionState};

pub use model::{AdministrativeUnit, Coordinates, PlaceSuggestion, Tier, UnitCode};
