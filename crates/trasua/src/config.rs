//! CLI configuration: thin wrapper around `trasua_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--divisions-url, --locale, etc.).

use trasua_core::{Locale, PipelineConfig};

use crate::cli::{GlobalOpts, LocaleArg};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use trasua_config::{
    Config, DEFAULT_PROFILE, Endpoints, Profile, config_path, load_config, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

impl From<LocaleArg> for Locale {
    fn from(arg: LocaleArg) -> Self {
        match arg {
            LocaleArg::Vietnamese => Self::Vietnamese,
            LocaleArg::English => Self::English,
        }
    }
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| DEFAULT_PROFILE.into())
}

/// Translate the active profile + global flags into endpoints and pipeline settings.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve(global: &GlobalOpts, config: &Config) -> Result<(Endpoints, PipelineConfig), CliError> {
    let (_, mut profile) = config.resolve_profile(global.profile.as_deref())?;
    apply_overrides(&mut profile, global);

    let (endpoints, mut pipeline) =
        trasua_config::profile_to_pipeline_config(&profile, &config.defaults)?;

    if let Some(locale) = global.locale {
        pipeline.locale = locale.into();
    }
    Ok((endpoints, pipeline))
}

fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(url) = &global.divisions_url {
        profile.divisions_url.clone_from(url);
    }
    if let Some(url) = &global.places_url {
        profile.places_url.clone_from(url);
    }
    if let Some(secs) = global.timeout {
        profile.timeout = Some(secs);
    }
}
