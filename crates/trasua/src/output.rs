//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Green check or red cross for a resolved/unresolved tier.
pub fn mark(ok: bool, color: bool) -> String {
    match (ok, color) {
        (true, true) => "✓".green().to_string(),
        (false, true) => "✗".red().to_string(),
        (true, false) => "✓".into(),
        (false, false) => "✗".into(),
    }
}

/// Dim secondary text when color is on.
pub fn dim(text: &str, color: bool) -> String {
    if color {
        text.dimmed().to_string()
    } else {
        text.to_owned()
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    render_numbered_list(format, data, |_, item| to_row(item), id_fn)
}

/// Like [`render_list`], but table rows also get their position in `data`.
pub fn render_numbered_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(usize, &T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data
                .iter()
                .enumerate()
                .map(|(index, item)| to_row(index, item))
                .collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted
/// string, since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub(crate) fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let out = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(out)
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Item {
        code: u32,
        name: &'static str,
    }

    #[derive(Tabled)]
    struct ItemRow {
        #[tabled(rename = "Code")]
        code: u32,
    }

    fn items() -> Vec<Item> {
        vec![
            Item {
                code: 79,
                name: "Hồ Chí Minh",
            },
            Item {
                code: 1,
                name: "Hà Nội",
            },
        ]
    }

    #[test]
    fn numbered_rows_follow_list_order() {
        #[derive(Tabled)]
        struct Numbered {
            #[tabled(rename = "#")]
            index: usize,
            #[tabled(rename = "Name")]
            name: &'static str,
        }

        let mut data = items();
        data.push(Item {
            code: 1,
            name: "Hà Nội",
        });
        let out = render_numbered_list(
            &OutputFormat::Table,
            &data,
            |index, i| Numbered {
                index,
                name: i.name,
            },
            |i| i.code.to_string(),
        )
        .unwrap();

        let rows: Vec<_> = out.lines().filter(|l| l.contains("Hà Nội")).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains(" 1 "));
        assert!(rows[1].contains(" 2 "));
    }

    #[test]
    fn plain_lists_identifiers() {
        let out = render_list(
            &OutputFormat::Plain,
            &items(),
            |i| ItemRow { code: i.code },
            |i| i.code.to_string(),
        )
        .unwrap();
        assert_eq!(out, "79\n1");
    }

    #[test]
    fn compact_json_is_one_line() {
        let out = render_list(
            &OutputFormat::JsonCompact,
            &items(),
            |i| ItemRow { code: i.code },
            |i| i.name.to_owned(),
        )
        .unwrap();
        assert_eq!(
            out,
            r#"[{"code":79,"name":"Hồ Chí Minh"},{"code":1,"name":"Hà Nội"}]"#
        );
    }

    #[test]
    fn table_has_headers() {
        let out = render_list(
            &OutputFormat::Table,
            &items(),
            |i| ItemRow { code: i.code },
            |i| i.name.to_owned(),
        )
        .unwrap();
        assert!(out.contains("Code"));
        assert!(out.contains("79"));
    }

    #[test]
    fn marks_without_color_are_plain() {
        assert_eq!(mark(true, false), "✓");
        assert_eq!(mark(false, false), "✗");
        assert_eq!(dim("x", false), "x");
    }
}
