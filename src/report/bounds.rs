// src/report/bounds.rs

use std::ops::Range;

use crate::config::ReportLayoutConfig;
use crate::document::TabularDocument;

/// Extent of the data region. Neither bound is declared in the file, both
/// are found by scanning for the first empty cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataBounds {
    pub rows: Range<u32>,
    pub cols: Range<u32>,
}

/// Data rows run from the data-start row down to the last row whose first
/// column is populated.
pub fn probe_data_rows<D: TabularDocument>(doc: &D, cfg: &ReportLayoutConfig) -> Range<u32> {
    let start = cfg.data_start_row;
    let end = first_blank(start, cfg.max_rows, |row| {
        doc.cell(row, cfg.data_start_col).is_empty()
    });
    start..end
}

/// Data columns run rightwards from the data-start column up to the last
/// populated header cell.
pub fn probe_data_cols<D: TabularDocument>(doc: &D, cfg: &ReportLayoutConfig) -> Range<u32> {
    let start = cfg.data_start_col;
    let end = first_blank(start, cfg.max_cols, |col| {
        doc.cell(cfg.header_row, col).is_empty()
    });
    start..end
}

pub fn probe_bounds<D: TabularDocument>(doc: &D, cfg: &ReportLayoutConfig) -> DataBounds {
    DataBounds {
        rows: probe_data_rows(doc, cfg),
        cols: probe_data_cols(doc, cfg),
    }
}

/// First index in `start..=max` that is blank, or `max + 1` when none is.
fn first_blank(start: u32, max: u32, is_blank: impl Fn(u32) -> bool) -> u32 {
    (start..=max)
        .find(|&i| is_blank(i))
        .unwrap_or_else(|| max.saturating_add(1).max(start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemorySheet;

    fn sheet_with_rows(first: u32, last: u32) -> MemorySheet {
        let mut sheet = MemorySheet::new();
        sheet.set_row(14, ["Title", "Publisher", "Platform"]);
        for row in first..=last {
            sheet.set_row(row, [format!("title {row}"), "pub".into(), "plat".into()]);
        }
        sheet
    }

    #[test]
    fn rows_stop_before_first_blank() {
        let sheet = sheet_with_rows(15, 20);
        let rows = probe_data_rows(&sheet, &ReportLayoutConfig::default());
        assert_eq!(rows.collect::<Vec<_>>(), vec![15, 16, 17, 18, 19, 20]);
    }

    #[test]
    fn no_data_rows_is_empty() {
        let mut sheet = MemorySheet::new();
        sheet.set_row(14, ["Title"]);
        let rows = probe_data_rows(&sheet, &ReportLayoutConfig::default());
        assert!(rows.is_empty());
    }

    #[test]
    fn gap_ends_the_data_region() {
        let mut sheet = sheet_with_rows(15, 25);
        sheet.set(18, 1, "");
        let rows = probe_data_rows(&sheet, &ReportLayoutConfig::default());
        assert_eq!(rows, 15..18);

        sheet.clear(18, 1);
        let rows = probe_data_rows(&sheet, &ReportLayoutConfig::default());
        assert_eq!(rows, 15..18);
    }

    #[test]
    fn whitespace_title_keeps_the_row() {
        let mut sheet = sheet_with_rows(15, 20);
        sheet.set(16, 1, " ");
        let rows = probe_data_rows(&sheet, &ReportLayoutConfig::default());
        assert_eq!(rows, 15..21);
    }

    #[test]
    fn whitespace_header_keeps_the_column() {
        let mut sheet = sheet_with_rows(15, 16);
        sheet.set(14, 2, "  ");
        let cols = probe_data_cols(&sheet, &ReportLayoutConfig::default());
        assert_eq!(cols, 1..4);
    }

    #[test]
    fn cols_follow_the_header_row() {
        let sheet = sheet_with_rows(15, 16);
        let cols = probe_data_cols(&sheet, &ReportLayoutConfig::default());
        assert_eq!(cols.collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn scans_stop_at_configured_maximum() {
        let sheet = sheet_with_rows(15, 40);
        let cfg = ReportLayoutConfig {
            max_rows: 19,
            max_cols: 2,
            ..ReportLayoutConfig::default()
        };
        let bounds = probe_bounds(&sheet, &cfg);
        assert_eq!(bounds.rows, 15..20);
        assert_eq!(bounds.cols, 1..3);
    }

    #[test]
    fn probing_is_repeatable() {
        let sheet = sheet_with_rows(15, 17);
        let cfg = ReportLayoutConfig::default();
        assert_eq!(probe_bounds(&sheet, &cfg), probe_bounds(&sheet, &cfg));
    }
}
