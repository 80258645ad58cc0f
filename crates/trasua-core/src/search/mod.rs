//! Free-text place search: debounce, cancellation, caching and the dropdown.

mod autocomplete;
mod cache;
mod dropdown;

pub use autocomplete::{AutocompleteController, SuggestionState, SuggestionStatus};
pub use cache::{SuggestionCache, normalize_query};
pub use dropdown::{OutsideClickTracker, PointerRegion};
