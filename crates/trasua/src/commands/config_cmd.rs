//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, DEFAULT_PROFILE, Profile};
use crate::error::CliError;
use crate::output;

const SETTABLE_KEYS: &str = "divisions_url, places_url, search_debounce_ms, \
     geocode_debounce_ms, min_query_chars, cache_capacity, locale, country, timeout";

// ── Helpers ─────────────────────────────────────────────────────────

/// Render config as TOML-like text for the table view.
fn format_config(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "locale = \"{}\"", cfg.defaults.locale);
    let _ = writeln!(out, "country = \"{}\"", cfg.defaults.country);

    for (name, p) in &cfg.profiles {
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "divisions_url = \"{}\"", p.divisions_url);
        let _ = writeln!(out, "places_url = \"{}\"", p.places_url);
        if let Some(ms) = p.search_debounce_ms {
            let _ = writeln!(out, "search_debounce_ms = {ms}");
        }
        if let Some(ms) = p.geocode_debounce_ms {
            let _ = writeln!(out, "geocode_debounce_ms = {ms}");
        }
        if let Some(n) = p.min_query_chars {
            let _ = writeln!(out, "min_query_chars = {n}");
        }
        if let Some(n) = p.cache_capacity {
            let _ = writeln!(out, "cache_capacity = {n}");
        }
        if let Some(ref locale) = p.locale {
            let _ = writeln!(out, "locale = \"{locale}\"");
        }
        if let Some(ref country) = p.country {
            let _ = writeln!(out, "country = \"{country}\"");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out.trim_end().to_owned()
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Interactive {
        reason: e.to_string(),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, CliError> {
    value.trim().parse().map_err(|_| CliError::Validation {
        field: key.into(),
        reason: format!("must be a non-negative number, got '{value}'"),
    })
}

/// Apply `key = value` to a profile. Values are validated before the file is touched.
fn set_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "divisions_url" | "divisions-url" => profile.divisions_url = value,
        "places_url" | "places-url" => profile.places_url = value,
        "search_debounce_ms" | "search-debounce-ms" => {
            profile.search_debounce_ms = Some(parse_number(key, &value)?);
        }
        "geocode_debounce_ms" | "geocode-debounce-ms" => {
            profile.geocode_debounce_ms = Some(parse_number(key, &value)?);
        }
        "min_query_chars" | "min-query-chars" => {
            profile.min_query_chars = Some(parse_number(key, &value)?);
        }
        "cache_capacity" | "cache-capacity" => {
            profile.cache_capacity = Some(parse_number(key, &value)?);
        }
        "locale" => {
            trasua_config::parse_locale(&value)?;
            profile.locale = Some(value);
        }
        "country" => profile.country = Some(value),
        "timeout" => profile.timeout = Some(parse_number(key, &value)?),
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!("unknown config key '{other}'. Valid keys: {SETTABLE_KEYS}"),
            });
        }
    }
    Ok(())
}

fn init_interactive() -> Result<(String, Profile), CliError> {
    let defaults = Profile::default();

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default(DEFAULT_PROFILE.into())
        .interact_text()
        .map_err(prompt_err)?;

    let divisions_url: String = Input::new()
        .with_prompt("Division directory URL")
        .default(defaults.divisions_url.clone())
        .interact_text()
        .map_err(prompt_err)?;

    let places_url: String = Input::new()
        .with_prompt("Places proxy URL")
        .default(defaults.places_url.clone())
        .interact_text()
        .map_err(prompt_err)?;

    let locales = ["vietnamese", "english"];
    let locale = Select::new()
        .with_prompt("Suggestion label language")
        .items(&locales)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let profile = Profile {
        divisions_url,
        places_url,
        locale: (locale != 0).then(|| "english".to_owned()),
        ..defaults
    };
    Ok((profile_name, profile))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init ────────────────────────────────────────────────────
        ConfigCommand::Init { defaults, force } => {
            let path = config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            let cfg = if defaults {
                Config::starter()
            } else {
                eprintln!("trasua configuration");
                eprintln!("   Config path: {}\n", path.display());
                let (name, profile) = init_interactive()?;
                trasua_config::profile_to_pipeline_config(&profile, &Config::default().defaults)?;

                let mut cfg = Config {
                    default_profile: Some(name.clone()),
                    ..Config::default()
                };
                cfg.profiles.insert(name, profile);
                cfg
            };

            let written = config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Configuration written to {}", written.display());
            }
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(&global.output, &cfg, format_config, |c| {
                config::active_profile_name(global, c)
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config()?;
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_key(profile, &key, value)?;
            trasua_config::profile_to_pipeline_config(profile, &cfg.defaults)?;

            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Set {key} on profile '{profile_name}'");
            }
            Ok(())
        }
    }
}
