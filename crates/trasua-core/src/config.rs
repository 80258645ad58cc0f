// ── Runtime pipeline configuration ──
//
// These types describe *how* the address pipeline behaves: debounce
// windows, cache bound, and the locale whose keyword table drives label
// decomposition. They never touch disk; trasua-config builds them.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Quiet period after the last keystroke before a search is sent.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(400);
/// Quiet period after the last address edit before geocoding.
pub const DEFAULT_GEOCODE_DEBOUNCE: Duration = Duration::from_millis(700);
/// Queries shorter than this (after trimming) never reach the network.
pub const DEFAULT_MIN_QUERY_CHARS: usize = 2;
/// Suggestion cache bound; the oldest query is evicted first.
pub const DEFAULT_CACHE_CAPACITY: usize = 50;
/// Appended to every geocode query.
pub const DEFAULT_COUNTRY_SUFFIX: &str = "Việt Nam";

/// Which keyword table classifies label fragments.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Locale {
    #[default]
    #[strum(to_string = "vietnamese", serialize = "vi")]
    #[serde(alias = "vi")]
    Vietnamese,
    #[strum(to_string = "english", serialize = "en")]
    #[serde(alias = "en")]
    English,
}

/// Configuration for one address pipeline instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub search_debounce: Duration,
    pub min_query_chars: usize,
    pub cache_capacity: usize,
    pub geocode_debounce: Duration,
    pub country_suffix: String,
    pub locale: Locale,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            min_query_chars: DEFAULT_MIN_QUERY_CHARS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            geocode_debounce: DEFAULT_GEOCODE_DEBOUNCE,
            country_suffix: DEFAULT_COUNTRY_SUFFIX.into(),
            locale: Locale::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_widget_timings() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.search_debounce, Duration::from_millis(400));
        assert_eq!(cfg.geocode_debounce, Duration::from_millis(700));
        assert_eq!(cfg.min_query_chars, 2);
        assert_eq!(cfg.cache_capacity, 50);
        assert_eq!(cfg.locale, Locale::Vietnamese);
        assert_eq!(cfg.locale.to_string(), "vietnamese");
    }

    #[test]
    fn locale_accepts_short_names() {
        assert_eq!("vi".parse::<Locale>().unwrap(), Locale::Vietnamese);
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::English);
        assert_eq!("english".parse::<Locale>().unwrap(), Locale::English);
        assert!("fr".parse::<Locale>().is_err());
    }
}
