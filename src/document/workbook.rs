// src/document/workbook.rs

use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{CellValue, TabularDocument};
use crate::error::ReportError;

/// First worksheet of a workbook on disk, loaded once via calamine.
///
/// The sheet is picked by workbook order. Whichever sheet was active when
/// the file was last saved is not consulted.
pub struct WorkbookSheet {
    path: PathBuf,
    range: Range<Data>,
}

impl WorkbookSheet {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref().to_path_buf();
        let doc_err = |detail: String| ReportError::Document {
            path: path.clone(),
            detail,
        };

        let mut workbook = open_workbook_auto(&path).map_err(|e| doc_err(e.to_string()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| doc_err("workbook has no sheets".into()))?
            .map_err(|e| doc_err(e.to_string()))?;

        debug!(path = %path.display(), size = ?range.get_size(), "opened workbook");
        Ok(Self { path, range })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TabularDocument for WorkbookSheet {
    fn cell(&self, row: u32, col: u32) -> CellValue {
        if row == 0 || col == 0 {
            return CellValue::Missing;
        }
        self.range
            .get_value((row - 1, col - 1))
            .map(data_to_cell)
            .unwrap_or(CellValue::Missing)
    }
}

fn data_to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Missing,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.into()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}
