//! Offline label decomposition.

use tabled::Tabled;
use trasua_core::{ClassifiedFragment, Locale, LocaleRules, ParsedLabel, decompose_label};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct FragmentRow {
    #[tabled(rename = "Fragment")]
    text: String,
    #[tabled(rename = "Slot")]
    slot: String,
}

impl From<&ClassifiedFragment> for FragmentRow {
    fn from(f: &ClassifiedFragment) -> Self {
        Self {
            text: f.text.clone(),
            slot: f
                .slot
                .map_or_else(|| "-".into(), |s| format!("{s:?}").to_lowercase()),
        }
    }
}

fn summary(parsed: &ParsedLabel) -> String {
    [
        ("province", &parsed.province),
        ("district", &parsed.district),
        ("ward", &parsed.ward),
        ("street", &parsed.street),
    ]
    .iter()
    .map(|(name, value)| format!("{name}={}", value.as_deref().unwrap_or("")))
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn handle(label: &str, locale: Locale, global: &GlobalOpts) -> Result<(), CliError> {
    let parsed = decompose_label(label, &LocaleRules::for_locale(locale));

    let out = match global.output {
        OutputFormat::Table => output::render_table(
            &parsed
                .fragments
                .iter()
                .map(FragmentRow::from)
                .collect::<Vec<_>>(),
        ),
        _ => output::render_single(&global.output, &parsed, |_| String::new(), summary)?,
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
