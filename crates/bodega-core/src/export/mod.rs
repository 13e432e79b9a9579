//! Spreadsheet reshaping for the sales and inventory exports.
//!
//! Builders turn fetched records into a [`Workbook`] of plain cells; a
//! [`SpreadsheetWriter`] persists it. Nothing here talks to the API.

mod inventory;
mod sales;
mod writer;

use chrono::NaiveDate;
use serde::Serialize;

pub use inventory::inventory_workbook;
pub use sales::sales_workbook;
pub use writer::{CsvWorkbookWriter, ExportError, SpreadsheetWriter};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Numeric value; text cells count as zero.
    pub fn as_number(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(_) => 0.0,
        }
    }

    /// Rendered cell content.
    pub fn render(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) if n.fract().abs() < f64::EPSILON => format!("{n:.0}"),
            Self::Number(n) => n.to_string(),
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Cell {
    // Stock and quantity values stay well inside f64's exact integer range.
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<u32> for Cell {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    /// Column widths in characters; empty when the sheet uses defaults.
    pub widths: Vec<u16>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            name: name.into(),
            headers: headers.iter().map(|h| (*h).to_owned()).collect(),
            widths: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn with_widths(mut self, widths: &[u16]) -> Self {
        self.widths = widths.to_vec();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workbook {
    /// File name without extension.
    pub stem: String,
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Data rows across all sheets.
    pub fn row_count(&self) -> usize {
        self.sheets.iter().map(|s| s.rows.len()).sum()
    }
}

fn date_part(date: Option<NaiveDate>, fallback: &str) -> String {
    date.map_or_else(|| fallback.to_owned(), |d| d.format("%Y-%m-%d").to_string())
}

/// `ventas_{start|todas}_{end|hasta_hoy}`
pub fn sales_file_stem(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    format!(
        "ventas_{}_{}",
        date_part(start, "todas"),
        date_part(end, "hasta_hoy")
    )
}

/// `inventario_completo_{start|todos}_{end|hasta_hoy}`
pub fn inventory_file_stem(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    format!(
        "inventario_completo_{}_{}",
        date_part(start, "todos"),
        date_part(end, "hasta_hoy")
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn file_stems_fall_back_per_side() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1);
        assert_eq!(sales_file_stem(None, None), "ventas_todas_hasta_hoy");
        assert_eq!(sales_file_stem(start, None), "ventas_2026-01-01_hasta_hoy");
        assert_eq!(
            inventory_file_stem(None, NaiveDate::from_ymd_opt(2026, 2, 28)),
            "inventario_completo_todos_2026-02-28"
        );
    }

    #[test]
    fn whole_numbers_render_without_decimals() {
        assert_eq!(Cell::from(12.0).render(), "12");
        assert_eq!(Cell::from(12.5).render(), "12.5");
        assert_eq!(Cell::from(-3_i64).render(), "-3");
    }
}
