//! Shared configuration for the trasua address tools.
//!
//! TOML profiles naming the division and places endpoints, plus per-profile
//! timing overrides, translated into `trasua_core::PipelineConfig`. The CLI
//! layers its flag overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use trasua_core::config::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_COUNTRY_SUFFIX, DEFAULT_GEOCODE_DEBOUNCE,
    DEFAULT_MIN_QUERY_CHARS, DEFAULT_SEARCH_DEBOUNCE,
};
use trasua_core::{Locale, PipelineConfig};

/// Profile used when neither the command line nor the file names one.
pub const DEFAULT_PROFILE: &str = "default";

/// Public province/district/ward directory.
pub const DEFAULT_DIVISIONS_URL: &str = "https://provinces.open-api.vn/api/";

/// Storefront proxy serving `autocomplete-place` and `geocode`.
pub const DEFAULT_PLACES_URL: &str = "http://localhost:3000/api/places/";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in {path}")]
    ProfileNotFound { name: String, path: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named endpoint profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some(DEFAULT_PROFILE.into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// A config holding just the built-in `default` profile, as written by `config init`.
    pub fn starter() -> Self {
        let mut cfg = Self::default();
        cfg.profiles.insert(DEFAULT_PROFILE.into(), Profile::default());
        cfg
    }

    /// Pick a profile: `name`, else `default_profile`, else `default`.
    ///
    /// A missing `default` profile falls back to the built-in endpoints so
    /// the tools work without a config file.
    pub fn resolve_profile(&self, name: Option<&str>) -> Result<(String, Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or(DEFAULT_PROFILE);

        match self.profiles.get(name) {
            Some(profile) => Ok((name.to_owned(), profile.clone())),
            None if name == DEFAULT_PROFILE => Ok((name.to_owned(), Profile::default())),
            None => Err(ConfigError::ProfileNotFound {
                name: name.to_owned(),
                path: config_path().display().to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Label keyword table: "vietnamese" or "english".
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Appended to every geocode query.
    #[serde(default = "default_country")]
    pub country: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
            locale: default_locale(),
            country: default_country(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    15
}
fn default_locale() -> String {
    Locale::default().to_string()
}
fn default_country() -> String {
    DEFAULT_COUNTRY_SUFFIX.into()
}

/// A named pair of upstream endpoints with optional timing overrides.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Base URL of the division directory (`provinces`, `districts`).
    pub divisions_url: String,

    /// Base URL of the places proxy (`autocomplete-place`, `geocode`).
    pub places_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_debounce_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geocode_debounce_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_query_chars: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_capacity: Option<usize>,

    /// Override the default locale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    /// Override the default country suffix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Override the default timeout (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            divisions_url: DEFAULT_DIVISIONS_URL.into(),
            places_url: DEFAULT_PLACES_URL.into(),
            search_debounce_ms: None,
            geocode_debounce_ms: None,
            min_query_chars: None,
            cache_capacity: None,
            locale: None,
            country: None,
            timeout: None,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("vn", "trasua", "trasua").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("trasua");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, then `TRASUA_*` variables.
///
/// Nested keys use a double underscore: `TRASUA_DEFAULTS__OUTPUT=json`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("TRASUA_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation to core settings ────────────────────────────────────

/// Validated upstream endpoints of a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub divisions_url: Url,
    pub places_url: Url,
    pub timeout: Duration,
}

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    let url: Url = raw.parse().map_err(|e| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL '{raw}': {e}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: field.into(),
            reason: format!("expected an http(s) URL, got '{raw}'"),
        });
    }
    Ok(url)
}

/// Parse a locale name ("vietnamese", "vi", "english", "en").
pub fn parse_locale(raw: &str) -> Result<Locale, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Validation {
        field: "locale".into(),
        reason: format!("expected 'vietnamese' or 'english', got '{raw}'"),
    })
}

/// Build endpoints and a `PipelineConfig` from a profile, no CLI overrides.
pub fn profile_to_pipeline_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<(Endpoints, PipelineConfig), ConfigError> {
    let endpoints = Endpoints {
        divisions_url: parse_url("divisions_url", &profile.divisions_url)?,
        places_url: parse_url("places_url", &profile.places_url)?,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
    };

    let locale = parse_locale(profile.locale.as_deref().unwrap_or(&defaults.locale))?;

    let pipeline = PipelineConfig {
        search_debounce: profile
            .search_debounce_ms
            .map_or(DEFAULT_SEARCH_DEBOUNCE, Duration::from_millis),
        min_query_chars: profile.min_query_chars.unwrap_or(DEFAULT_MIN_QUERY_CHARS),
        cache_capacity: profile.cache_capacity.unwrap_or(DEFAULT_CACHE_CAPACITY),
        geocode_debounce: profile
            .geocode_debounce_ms
            .map_or(DEFAULT_GEOCODE_DEBOUNCE, Duration::from_millis),
        country_suffix: profile
            .country
            .clone()
            .unwrap_or_else(|| defaults.country.clone()),
        locale,
    };

    Ok((endpoints, pipeline))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn builtin_default_profile_without_file() {
        let cfg = Config::default();
        let (name, profile) = cfg.resolve_profile(None).unwrap();
        assert_eq!(name, "default");
        assert_eq!(profile.divisions_url, DEFAULT_DIVISIONS_URL);

        let err = cfg.resolve_profile(Some("staging")).unwrap_err();
        assert!(matches!(err, ConfigError::ProfileNotFound { .. }));
    }

    #[test]
    fn profile_overrides_defaults() {
        let defaults = Defaults::default();
        let profile = Profile {
            search_debounce_ms: Some(250),
            locale: Some("en".into()),
            timeout: Some(3),
            ..Profile::default()
        };

        let (endpoints, pipeline) = profile_to_pipeline_config(&profile, &defaults).unwrap();

        assert_eq!(endpoints.timeout, Duration::from_secs(3));
        assert_eq!(endpoints.divisions_url.as_str(), DEFAULT_DIVISIONS_URL);
        assert_eq!(pipeline.search_debounce, Duration::from_millis(250));
        assert_eq!(pipeline.geocode_debounce, DEFAULT_GEOCODE_DEBOUNCE);
        assert_eq!(pipeline.locale, Locale::English);
        assert_eq!(pipeline.country_suffix, "Việt Nam");
    }

    #[test]
    fn invalid_values_are_rejected() {
        let defaults = Defaults::default();

        let profile = Profile {
            places_url: "ftp://example.com/".into(),
            ..Profile::default()
        };
        let err = profile_to_pipeline_config(&profile, &defaults).unwrap_err();
        assert!(err.to_string().contains("places_url"));

        let profile = Profile {
            locale: Some("klingon".into()),
            ..Profile::default()
        };
        let err = profile_to_pipeline_config(&profile, &defaults).unwrap_err();
        assert!(err.to_string().contains("locale"));
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::starter();
        cfg.profiles.insert(
            "staging".into(),
            Profile {
                places_url: "https://staging.example.vn/api/places/".into(),
                cache_capacity: Some(10),
                ..Profile::default()
            },
        );
        cfg.default_profile = Some("staging".into());
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let (name, profile) = loaded.resolve_profile(None).unwrap();
        assert_eq!(name, "staging");
        assert_eq!(profile.cache_capacity, Some(10));
        assert_eq!(loaded.profiles.len(), 2);
    }

    #[test]
    fn partial_file_gets_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[defaults]
output = "json"

[profiles.local]
divisions_url = "http://127.0.0.1:8000/api/"
places_url = "http://127.0.0.1:3000/api/places/"
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.timeout, 15);
        assert_eq!(cfg.defaults.locale, "vietnamese");
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles["local"].search_debounce_ms.is_none());
    }
}
