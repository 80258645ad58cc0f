//! Province, district and ward listings.

use tabled::Tabled;
use trasua_api::AddressClient;
use trasua_core::{AddressBackend, AdministrativeUnit, UnitCode};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct UnitRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
}

impl From<&AdministrativeUnit> for UnitRow {
    fn from(u: &AdministrativeUnit) -> Self {
        Self {
            code: u.code.to_string(),
            name: u.name.clone(),
        }
    }
}

fn print_units(units: &[AdministrativeUnit], global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_list(
        &global.output,
        units,
        |u| UnitRow::from(u),
        |u| u.code.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn provinces(client: &AddressClient, global: &GlobalOpts) -> Result<(), CliError> {
    let units = client.provinces().await?;
    print_units(&units, global)
}

pub async fn districts(
    client: &AddressClient,
    province: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let units = client
        .districts(&UnitCode::new(province))
        .await
        .map_err(|e| not_found_or(e, "province", province, "provinces"))?;
    print_units(&units, global)
}

pub async fn wards(
    client: &AddressClient,
    district: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let units = client
        .wards(&UnitCode::new(district))
        .await
        .map_err(|e| not_found_or(e, "district", district, "districts <PROVINCE>"))?;
    print_units(&units, global)
}

/// A 404 from the directory means the parent code does not exist.
fn not_found_or(
    err: trasua_core::CoreError,
    resource_type: &str,
    identifier: &str,
    list_command: &str,
) -> CliError {
    match err {
        trasua_core::CoreError::Api {
            status: Some(404), ..
        } => CliError::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
            list_command: list_command.into(),
        },
        other => other.into(),
    }
}
