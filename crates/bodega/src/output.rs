//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use bodega_api::PageMeta;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled on stdout.
pub fn should_color(mode: &ColorMode) -> bool {
    color_enabled(mode, io::stdout().is_terminal())
}

/// `Auto` colors only a terminal, and never when `NO_COLOR` is set.
pub fn color_enabled(mode: &ColorMode, terminal: bool) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => terminal && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Green for healthy states, red for failures, yellow for everything else.
pub fn paint(label: &str, tone: Tone, color: bool) -> String {
    if !color {
        return label.to_owned();
    }
    match tone {
        Tone::Good => label.green().to_string(),
        Tone::Warn => label.yellow().to_string(),
        Tone::Bad => label.red().to_string(),
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Tone {
    Good,
    Warn,
    Bad,
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// An empty table renders `placeholder` instead of bare headers.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    placeholder: &str,
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    Ok(match format {
        OutputFormat::Table if data.is_empty() => placeholder.to_owned(),
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    })
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted string,
/// since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize + ?Sized,
{
    Ok(match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        OutputFormat::Plain => id_fn(data),
    })
}

/// `página p de n (total t)`, only when there is more than one page.
pub fn page_footer(format: &OutputFormat, meta: Option<&PageMeta>) -> Option<String> {
    if !matches!(format, OutputFormat::Table) {
        return None;
    }
    let meta = meta.filter(|m| m.total_pages > 1)?;
    Some(format!(
        "página {} de {} (total {})",
        meta.page, meta.total_pages, meta.total
    ))
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Success or progress note on stderr, respecting quiet mode.
pub fn notify(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("✓ {message}");
    }
}

/// Stderr spinner for slow fetches; hidden when quiet or not a terminal.
pub fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet || !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(std::time::Duration::from_millis(100));
    bar
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(serde::Serialize)]
    struct Item {
        id: &'static str,
    }

    #[derive(Tabled)]
    struct ItemRow {
        #[tabled(rename = "ID")]
        id: String,
    }

    fn row(i: &Item) -> ItemRow {
        ItemRow { id: i.id.into() }
    }

    #[test]
    fn empty_table_shows_placeholder() {
        let out = render_list::<Item, _>(&OutputFormat::Table, &[], "No hay ventas", row, |i| {
            i.id.into()
        })
        .unwrap();
        assert_eq!(out, "No hay ventas");
    }

    #[test]
    fn empty_json_is_an_empty_array() {
        let out =
            render_list::<Item, _>(&OutputFormat::JsonCompact, &[], "x", row, |i| i.id.into())
                .unwrap();
        assert_eq!(out, "[]");
    }

    #[test]
    fn footer_only_with_several_pages() {
        let one = PageMeta {
            page: 1,
            limit: 10,
            total: 3,
            total_pages: 1,
        };
        assert_eq!(page_footer(&OutputFormat::Table, Some(&one)), None);
        assert_eq!(page_footer(&OutputFormat::Table, None), None);

        let many = PageMeta {
            total_pages: 3,
            total: 25,
            page: 2,
            ..one
        };
        assert_eq!(
            page_footer(&OutputFormat::Table, Some(&many)).as_deref(),
            Some("página 2 de 3 (total 25)")
        );
        assert_eq!(page_footer(&OutputFormat::Json, Some(&many)), None);
    }
}
