use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use super::Workbook;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No se pudo escribir {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error al generar el archivo {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Persists a workbook somewhere a user can open it.
pub trait SpreadsheetWriter {
    /// Returns the files written.
    fn write(&self, workbook: &Workbook) -> Result<Vec<PathBuf>, ExportError>;
}

/// Writes one `<stem>-<sheet>.csv` per sheet into a directory.
#[derive(Debug, Clone)]
pub struct CsvWorkbookWriter {
    dir: PathBuf,
}

impl CsvWorkbookWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name(stem: &str, sheet: &str) -> String {
        let sheet: String = sheet
            .chars()
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .collect();
        format!("{stem}-{sheet}.csv")
    }
}

impl SpreadsheetWriter for CsvWorkbookWriter {
    fn write(&self, workbook: &Workbook) -> Result<Vec<PathBuf>, ExportError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| ExportError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut written = Vec::with_capacity(workbook.sheets.len());
        for sheet in &workbook.sheets {
            let path = self.dir.join(Self::file_name(&workbook.stem, &sheet.name));
            let csv_err = |source| ExportError::Csv {
                path: path.clone(),
                source,
            };

            let mut out = csv::Writer::from_path(&path).map_err(csv_err)?;
            out.write_record(&sheet.headers).map_err(csv_err)?;
            for row in &sheet.rows {
                out.write_record(row.iter().map(super::Cell::render))
                    .map_err(csv_err)?;
            }
            out.flush().map_err(|source| ExportError::Io {
                path: path.clone(),
                source,
            })?;

            info!(path = %path.display(), rows = sheet.rows.len(), "sheet exported");
            written.push(path);
        }
        Ok(written)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::export::{Cell, Sheet};

    #[test]
    fn writes_one_file_per_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = Sheet::new("Movimientos Kardex", &["Producto", "Cantidad"]);
        ledger.rows.push(vec![Cell::text("Mouse, inalámbrico"), Cell::from(-2_i64)]);
        let book = Workbook {
            stem: "inventario_completo_todos_hasta_hoy".into(),
            sheets: vec![Sheet::new("Inventario", &["Producto"]), ledger],
        };

        let paths = CsvWorkbookWriter::new(dir.path()).write(&book).unwrap();

        assert_eq!(paths.len(), 2);
        assert!(paths[1].ends_with("inventario_completo_todos_hasta_hoy-Movimientos_Kardex.csv"));
        let body = std::fs::read_to_string(&paths[1]).unwrap();
        assert_eq!(body, "Producto,Cantidad\n\"Mouse, inalámbrico\",-2\n");
    }
}
