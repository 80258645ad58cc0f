//! Free-text place search.

use tabled::Tabled;
use trasua_api::AddressClient;
use trasua_core::{AddressPipeline, PlaceSuggestion};

use crate::cli::{GlobalOpts, SearchArgs};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
pub(crate) struct SuggestionRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Region")]
    region: String,
}

impl SuggestionRow {
    pub(crate) fn new(index: usize, s: &PlaceSuggestion) -> Self {
        Self {
            index,
            name: s.name.clone(),
            label: s.label.clone(),
            region: s.region.clone().unwrap_or_default(),
        }
    }
}

pub async fn handle(
    args: SearchArgs,
    pipeline: &AddressPipeline<AddressClient>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut suggestions = pipeline.search().search(&args.query).await?;
    if let Some(limit) = args.limit {
        suggestions.truncate(limit);
    }

    // `#` is the dropdown position accepted by `resolve --pick`.
    let out = output::render_numbered_list(
        &global.output,
        &suggestions,
        SuggestionRow::new,
        |s| s.label.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
