//! Geocode an address assembled from unit codes and a street.

use serde::Serialize;
use trasua_api::AddressClient;
use trasua_core::{AddressPipeline, Coordinates};

use crate::cli::{GeocodeArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct Located {
    address: String,
    lat: f64,
    lng: f64,
}

pub async fn handle(
    args: GeocodeArgs,
    pipeline: &AddressPipeline<AddressClient>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let selector = pipeline.selector();

    if let Some(province) = args.province {
        selector.select_province(province).await?;
    }
    if let Some(district) = args.district {
        selector.select_district(district).await?;
    }
    if let Some(ward) = args.ward {
        selector.select_ward(ward)?;
    }
    if let Some(street) = args.street {
        selector.set_street(street.trim());
    }

    let Coordinates { lat, lng } = selector.geocode_now().await?;
    let located = Located {
        address: selector.full_address().unwrap_or_default(),
        lat,
        lng,
    };

    let out = output::render_single(
        &global.output,
        &located,
        |l| format!("{}\n{:.6}, {:.6}", l.address, l.lat, l.lng),
        |l| format!("{:.6},{:.6}", l.lat, l.lng),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
