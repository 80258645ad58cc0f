//! Interactive address picker.
//!
//! Mirrors the checkout form: type a query, pick a suggestion, let the
//! cascade fill what it can, then choose the remaining tiers by hand.

use std::io::IsTerminal;
use std::time::Duration;

use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use trasua_api::AddressClient;
use trasua_core::{
    AddressPipeline, AdministrativeUnit, Coordinates, SelectionState, Tier, UnitCode,
};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

const MANUAL_ENTRY: &str = "None of these, choose by hand";

#[derive(Debug, Serialize)]
struct Picked {
    province: Option<AdministrativeUnit>,
    district: Option<AdministrativeUnit>,
    ward: Option<AdministrativeUnit>,
    street: String,
    full_address: Option<String>,
    coordinates: Option<Coordinates>,
}

impl Picked {
    fn from_state(state: SelectionState, full_address: Option<String>) -> Self {
        Self {
            province: state.selected_province,
            district: state.selected_district,
            ward: state.selected_ward,
            street: state.street,
            full_address,
            coordinates: state.coordinates,
        }
    }
}

// ── Prompt helpers ──────────────────────────────────────────────────

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Interactive {
        reason: e.to_string(),
    }
}

fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn choose_unit(prompt: &str, units: &[AdministrativeUnit]) -> Result<Option<UnitCode>, CliError> {
    if units.is_empty() {
        return Ok(None);
    }
    let names: Vec<&str> = units.iter().map(|u| u.name.as_str()).collect();
    let idx = Select::new()
        .with_prompt(prompt)
        .items(&names)
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    Ok(units.get(idx).map(|u| u.code.clone()))
}

// ── Steps ───────────────────────────────────────────────────────────

/// Ask for a query and a suggestion. `None` means "choose by hand".
async fn pick_suggestion(
    pipeline: &AddressPipeline<AddressClient>,
    quiet: bool,
) -> Result<Option<String>, CliError> {
    loop {
        let query: String = Input::new()
            .with_prompt("Address")
            .interact_text()
            .map_err(prompt_err)?;

        let pb = spinner("Searching…", quiet);
        let found = pipeline.search().search(&query).await;
        pb.finish_and_clear();

        let suggestions = match found {
            Ok(s) => s,
            Err(e @ trasua_core::CoreError::ValidationEmpty { .. }) => {
                eprintln!("  {e}");
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if suggestions.is_empty() {
            eprintln!("  No suggestions found, try again.");
            continue;
        }

        let mut items: Vec<&str> = suggestions.iter().map(|s| s.label.as_str()).collect();
        items.push(MANUAL_ENTRY);
        let idx = Select::new()
            .with_prompt("Suggestion")
            .items(&items)
            .default(0)
            .interact()
            .map_err(prompt_err)?;

        return Ok(suggestions.get(idx).map(|s| s.id.clone()));
    }
}

/// Prompt for every tier the cascade left empty.
async fn fill_missing_tiers(
    pipeline: &AddressPipeline<AddressClient>,
    quiet: bool,
) -> Result<(), CliError> {
    let selector = pipeline.selector();

    if selector.state().selected_province.is_none() {
        if selector.state().provinces.is_empty() {
            let pb = spinner("Loading provinces…", quiet);
            let loaded = selector.load_provinces().await;
            pb.finish_and_clear();
            loaded?;
        }
        let state = selector.state();
        if let Some(code) = choose_unit("Province", state.units(Tier::Province))? {
            let pb = spinner("Loading districts…", quiet);
            let selected = selector.select_province(code).await;
            pb.finish_and_clear();
            selected?;
        }
    }

    if selector.state().selected_district.is_none() {
        let state = selector.state();
        if let Some(code) = choose_unit("District", state.units(Tier::District))? {
            let pb = spinner("Loading wards…", quiet);
            let selected = selector.select_district(code).await;
            pb.finish_and_clear();
            selected?;
        }
    }

    if selector.state().selected_ward.is_none() {
        let state = selector.state();
        if let Some(code) = choose_unit("Ward", state.units(Tier::Ward))? {
            selector.select_ward(code)?;
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    pipeline: &AddressPipeline<AddressClient>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !std::io::stdin().is_terminal() {
        return Err(CliError::Interactive {
            reason: "stdin is not a terminal".into(),
        });
    }

    if let Some(id) = pick_suggestion(pipeline, global.quiet).await? {
        let pb = spinner("Resolving…", global.quiet);
        let report = pipeline.choose(&id).await;
        pb.finish_and_clear();
        let report = report?;
        if let Some(reason) = &report.stopped {
            eprintln!("  {reason}");
        }
    }

    fill_missing_tiers(pipeline, global.quiet).await?;

    let selector = pipeline.selector();
    let street: String = Input::new()
        .with_prompt("Street and number")
        .with_initial_text(selector.state().street)
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;
    selector.set_street(street.trim());

    let pb = spinner("Locating…", global.quiet);
    let located = selector.geocode_now().await;
    pb.finish_and_clear();
    if let Err(e) = located {
        eprintln!("  Could not locate the address: {e}");
    }

    let picked = Picked::from_state(selector.state(), selector.full_address());
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &picked,
        |p| {
            let mut lines = vec![p.full_address.clone().unwrap_or_default()];
            if let Some(c) = p.coordinates {
                lines.push(output::dim(&c.to_string(), color));
            }
            lines.join("\n")
        },
        |p| p.full_address.clone().unwrap_or_default(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
