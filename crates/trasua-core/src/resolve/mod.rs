//! Turning a free-text suggestion label into tiered administrative units.
//!
//! [`decompose_label`] tags label fragments with a [`Slot`] using a
//! [`LocaleRules`] table; [`match_unit`] then finds the loaded unit each
//! fragment names.

mod label;
mod matcher;
mod rules;

pub use label::{ClassifiedFragment, ParsedLabel, decompose_label};
pub use matcher::{MAX_LENGTH_DELTA, MatchStrategy, match_unit};
pub use rules::{LocaleRules, Slot, TierRule};
