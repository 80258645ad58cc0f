//! Search, take one suggestion, resolve it into the cascade.

use std::fmt::Write as _;

use serde::Serialize;
use trasua_api::AddressClient;
use trasua_core::{AddressPipeline, AdministrativeUnit, Coordinates, DecompositionReport};

use crate::cli::{GlobalOpts, ResolveArgs};
use crate::error::CliError;
use crate::output;

/// Resolution report plus what the selector ended up with.
#[derive(Debug, Serialize)]
pub(crate) struct Resolution {
    #[serde(flatten)]
    pub report: DecompositionReport,
    pub full_address: Option<String>,
    pub coordinates: Option<Coordinates>,
}

pub async fn handle(
    args: ResolveArgs,
    pipeline: &AddressPipeline<AddressClient>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let suggestions = pipeline.search().search(&args.query).await?;
    if suggestions.is_empty() {
        return Err(CliError::NoSuggestions { query: args.query });
    }
    let Some(suggestion) = suggestions.get(args.pick) else {
        return Err(CliError::Validation {
            field: "pick".into(),
            reason: format!(
                "only {} suggestion(s) for '{}', index {} is out of range",
                suggestions.len(),
                args.query,
                args.pick
            ),
        });
    };

    let report = pipeline.resolve(suggestion).await;
    let coordinates = if args.geocode {
        Some(pipeline.selector().geocode_now().await?)
    } else {
        None
    };

    let resolution = Resolution {
        report,
        full_address: pipeline.selector().full_address(),
        coordinates,
    };
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &resolution,
        |r| detail(r, color),
        |r| r.full_address.clone().unwrap_or_default(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn tier_line(out: &mut String, name: &str, unit: Option<&AdministrativeUnit>, color: bool) {
    let _ = match unit {
        Some(u) => writeln!(
            out,
            "{name:<9} {} {} {}",
            output::mark(true, color),
            u.name,
            output::dim(&format!("({})", u.code), color)
        ),
        None => writeln!(out, "{name:<9} {}", output::mark(false, color)),
    };
}

/// Key/value view of a resolution.
pub(crate) fn detail(r: &Resolution, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<9} {}", "Label", r.report.display_label);
    tier_line(&mut out, "Province", r.report.province.as_ref(), color);
    tier_line(&mut out, "District", r.report.district.as_ref(), color);
    tier_line(&mut out, "Ward", r.report.ward.as_ref(), color);
    let _ = writeln!(out, "{:<9} {}", "Street", r.report.street);
    if let Some(reason) = &r.report.stopped {
        let _ = writeln!(out, "{:<9} {}", "Stopped", output::dim(reason, color));
    }
    if let Some(address) = &r.full_address {
        let _ = writeln!(out, "{:<9} {address}", "Address");
    }
    if let Some(coords) = r.coordinates {
        let _ = writeln!(out, "{:<9} {coords}", "Location");
    }
    out.trim_end().to_owned()
}
