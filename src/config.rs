// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// A 1-based (row, column) coordinate in a worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: u32,
    pub col: u32,
}

impl CellCoord {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// Where the meaningful cells of a Title Master Report live.
///
/// The defaults describe the standard report layout: `Report_ID` in B2,
/// `Reporting_Period` in B10, column names on row 14 and data from row 15.
/// Any subset can be overridden from a YAML file for report revisions that
/// move the header block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLayoutConfig {
    pub layout_cell: CellCoord,
    pub period_cell: CellCoord,
    pub header_row: u32,
    pub data_start_row: u32,
    pub data_start_col: u32,
    pub max_rows: u32,
    pub max_cols: u32,
}

impl Default for ReportLayoutConfig {
    fn default() -> Self {
        Self {
            layout_cell: CellCoord::new(2, 2),
            period_cell: CellCoord::new(10, 2),
            header_row: 14,
            data_start_row: 15,
            data_start_col: 1,
            max_rows: 1_048_576,
            max_cols: 16_384,
        }
    }
}

impl ReportLayoutConfig {
    /// Load overrides from a YAML file; missing keys keep their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading layout config {}", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("parsing layout config {}", path.display()))
    }
}
