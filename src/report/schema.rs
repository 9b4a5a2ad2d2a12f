// src/report/schema.rs

use std::{collections::HashSet, sync::Arc};
use tracing::debug;

use super::{Layout, ReportIdentity};
use crate::config::ReportLayoutConfig;
use crate::document::TabularDocument;
use crate::error::ReportError;

/// Month column names; index 0 is a placeholder so `PERIODS[m]` is month `m`.
pub static PERIODS: [&str; 13] = [
    "", "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Ordered column names of the data region. Position `i` is data column `i + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSchema {
    columns: Arc<[String]>,
}

impl HeaderSchema {
    /// Rejects duplicate names, since records are addressed by name.
    pub fn new(columns: Vec<String>) -> Result<Self, ReportError> {
        let mut seen = HashSet::with_capacity(columns.len());
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(ReportError::DuplicateColumn(name.clone()));
            }
        }
        Ok(Self {
            columns: columns.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.columns
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub(crate) fn shared(&self) -> Arc<[String]> {
        Arc::clone(&self.columns)
    }
}

/// Build the header row for a report: the layout's identifying columns as
/// they appear on the header row, lower-cased, then one column per month of
/// the reporting period.
pub fn resolve_header<D: TabularDocument>(
    doc: &D,
    identity: &ReportIdentity,
    cfg: &ReportLayoutConfig,
) -> Result<HeaderSchema, ReportError> {
    let layout = Layout::from_code(&identity.layout_code)?;
    let months = month_columns(&identity.begin_date, &identity.end_date)?;

    let n = layout.identifying_columns();
    let mut columns = Vec::with_capacity(n + months.len());
    for offset in 0..n {
        let col = cfg.data_start_col + offset as u32;
        let cell = doc.cell(cfg.header_row, col);
        if cell.is_blank() {
            return Err(ReportError::SchemaMismatch {
                context: format!("{layout} header cell ({}, {col}) is blank", cfg.header_row),
                expected: n,
                found: offset,
            });
        }
        columns.push(cell.as_text().trim().to_lowercase());
    }
    columns.extend(months.iter().map(|m| m.to_string()));

    debug!(layout = %layout, columns = columns.len(), "resolved header");
    HeaderSchema::new(columns)
}

/// Month names from the begin month through the end month, inclusive.
pub fn month_columns(
    begin_date: &str,
    end_date: &str,
) -> Result<&'static [&'static str], ReportError> {
    let start = month_of(begin_date)?;
    let end = month_of(end_date)?;
    if end < start {
        return Err(ReportError::CrossYearPeriod {
            begin: begin_date.to_string(),
            end: end_date.to_string(),
        });
    }
    Ok(&PERIODS[start..=end])
}

/// Month number from the `MM` of a `YYYY-MM-DD` date.
fn month_of(date: &str) -> Result<usize, ReportError> {
    date.get(5..7)
        .and_then(|mm| mm.parse::<usize>().ok())
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| ReportError::InvalidDate {
            date: date.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemorySheet;

    const J1_HEADER: [&str; 11] = [
        "Title",
        "Publisher",
        "Publisher_ID",
        "Platform",
        "DOI",
        "Proprietary_ID",
        "Print_ISSN",
        "Online_ISSN",
        "URI",
        "Metric_Type",
        "Reporting_Period_Total",
    ];

    fn identity(code: &str, begin: &str, end: &str) -> ReportIdentity {
        ReportIdentity {
            filename: "r.xlsx".into(),
            layout_code: code.into(),
            reporting_period_raw: format!("Begin_Date={begin};End_Date={end}"),
            begin_date: begin.into(),
            end_date: end.into(),
            title_type: code.chars().nth(3).unwrap(),
        }
    }

    fn header_sheet(n: usize) -> MemorySheet {
        let mut sheet = MemorySheet::new();
        sheet.set_row(14, (1..=n).map(|i| format!("Col_{i}")));
        sheet
    }

    #[test]
    fn full_year_gives_twelve_months() {
        let months = month_columns("2020-01-01", "2020-12-31").unwrap();
        assert_eq!(months.len(), 12);
        assert_eq!(months.first(), Some(&"jan"));
        assert_eq!(months.last(), Some(&"dec"));
    }

    #[test]
    fn header_length_matches_layout_and_period() {
        let sheet = header_sheet(14);
        for layout in Layout::ALL {
            for (begin, end) in [(1, 12), (4, 7), (6, 6)] {
                let id = identity(
                    layout.code(),
                    &format!("2021-{begin:02}-01"),
                    &format!("2021-{end:02}-28"),
                );
                let header = resolve_header(&sheet, &id, &ReportLayoutConfig::default()).unwrap();
                assert_eq!(header.len(), layout.identifying_columns() + end - begin + 1);
            }
        }
    }

    #[test]
    fn identifying_columns_are_lower_cased() {
        let mut sheet = MemorySheet::new();
        sheet.set_row(14, J1_HEADER);
        let id = identity("TR_J1", "2020-04-01", "2020-06-30");

        let header = resolve_header(&sheet, &id, &ReportLayoutConfig::default()).unwrap();
        assert_eq!(header.names()[0], "title");
        assert_eq!(header.names()[10], "reporting_period_total");
        assert_eq!(&header.names()[11..], ["apr", "may", "jun"]);
        assert_eq!(header.position("may"), Some(12));
    }

    #[test]
    fn bad_month_is_invalid_date() {
        let sheet = header_sheet(11);
        for begin in ["2020-13-01", "2020-1-01", "2020", "2020-00-01"] {
            let id = identity("TR_J1", begin, "2020-12-31");
            let err = resolve_header(&sheet, &id, &ReportLayoutConfig::default()).unwrap_err();
            assert_eq!(err.kind(), "InvalidDateError", "{begin}");
        }
    }

    #[test]
    fn cross_year_period_is_rejected() {
        let sheet = header_sheet(11);
        let err = resolve_header(
            &sheet,
            &identity("TR_J1", "2020-11-01", "2021-02-28"),
            &ReportLayoutConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ReportError::CrossYearPeriod { .. }));
        assert_eq!(err.kind(), "UnsupportedPeriodError");
    }

    #[test]
    fn unsupported_layout_fails() {
        let sheet = header_sheet(11);
        let err = resolve_header(
            &sheet,
            &identity("TR_J4", "2020-01-01", "2020-12-31"),
            &ReportLayoutConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "UnsupportedLayoutError");
    }

    #[test]
    fn month_named_identifying_column_is_a_duplicate() {
        let mut sheet = header_sheet(11);
        sheet.set(14, 11, "JAN");
        let err = resolve_header(
            &sheet,
            &identity("TR_J1", "2020-01-01", "2020-03-31"),
            &ReportLayoutConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ReportError::DuplicateColumn(ref c) if c == "jan"));
    }

    #[test]
    fn blank_identifying_header_fails() {
        let mut sheet = header_sheet(11);
        sheet.clear(14, 5);
        let err = resolve_header(
            &sheet,
            &identity("TR_J1", "2020-01-01", "2020-12-31"),
            &ReportLayoutConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ReportError::SchemaMismatch { found: 4, .. }));
    }
}
