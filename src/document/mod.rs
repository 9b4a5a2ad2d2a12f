// src/document/mod.rs

pub mod workbook;

use chrono::NaiveDateTime;
use std::collections::HashMap;

pub use workbook::WorkbookSheet;

/// The value held by a single worksheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Missing,
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
}

impl CellValue {
    /// Missing cells and whitespace-only text. Used for metadata cells.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Missing => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) | CellValue::Date(_) => false,
        }
    }

    /// Missing cells and zero-length text. Whitespace counts as content, so
    /// only these end the data region.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Missing => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(_) | CellValue::Date(_) => false,
        }
    }

    /// Plain string form, with no quote stripping.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Missing => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Date(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Value as it is stored in a record: missing → "", embedded `"` removed.
    pub fn to_field_string(&self) -> String {
        match self {
            CellValue::Missing => String::new(),
            other => other.as_text().replace('"', ""),
        }
    }
}

/// Whole numbers print without a trailing `.0`; spreadsheets store every
/// count as a float.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::Date(dt)
    }
}

/// Read-only, random access to the cells of one worksheet.
///
/// Coordinates are 1-based. Anything outside the populated area is
/// `CellValue::Missing`.
pub trait TabularDocument {
    fn cell(&self, row: u32, col: u32) -> CellValue;
}

impl<D: TabularDocument + ?Sized> TabularDocument for &D {
    fn cell(&self, row: u32, col: u32) -> CellValue {
        (**self).cell(row, col)
    }
}

/// Sparse in-memory worksheet.
#[derive(Debug, Clone, Default)]
pub struct MemorySheet {
    cells: HashMap<(u32, u32), CellValue>,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, row: u32, col: u32, value: impl Into<CellValue>) -> &mut Self {
        self.cells.insert((row, col), value.into());
        self
    }

    /// Write `values` left to right starting at column 1 of `row`.
    pub fn set_row<V: Into<CellValue>>(
        &mut self,
        row: u32,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        for (i, v) in values.into_iter().enumerate() {
            self.cells.insert((row, i as u32 + 1), v.into());
        }
        self
    }

    pub fn clear(&mut self, row: u32, col: u32) -> &mut Self {
        self.cells.remove(&(row, col));
        self
    }
}

impl TabularDocument for MemorySheet {
    fn cell(&self, row: u32, col: u32) -> CellValue {
        self.cells
            .get(&(row, col))
            .cloned()
            .unwrap_or(CellValue::Missing)
    }
}
