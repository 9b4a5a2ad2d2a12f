// src/report/identity.rs

use serde::Serialize;

use crate::config::ReportLayoutConfig;
use crate::document::TabularDocument;
use crate::error::ReportError;

/// What a report says about itself in its metadata block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportIdentity {
    pub filename: String,
    pub layout_code: String,
    pub reporting_period_raw: String,
    pub begin_date: String,
    pub end_date: String,
    pub title_type: char,
}

impl ReportIdentity {
    /// Read the layout code and `Begin_Date=...;End_Date=...` period cell.
    pub fn identify<D: TabularDocument>(
        doc: &D,
        filename: impl Into<String>,
        cfg: &ReportLayoutConfig,
    ) -> Result<Self, ReportError> {
        let layout = doc.cell(cfg.layout_cell.row, cfg.layout_cell.col);
        if layout.is_blank() {
            return Err(ReportError::MalformedLayout {
                code: String::new(),
                reason: "layout cell is empty".into(),
            });
        }
        let layout_code = layout.as_text().trim().to_string();
        let title_type = title_type_of(&layout_code)?;

        let period = doc.cell(cfg.period_cell.row, cfg.period_cell.col);
        if period.is_blank() {
            return Err(ReportError::MalformedPeriod {
                raw: String::new(),
                reason: "reporting period cell is empty".into(),
            });
        }
        let reporting_period_raw = period.as_text().trim().to_string();
        let (begin_date, end_date) = split_period(&reporting_period_raw)?;

        Ok(Self {
            filename: filename.into(),
            layout_code,
            reporting_period_raw,
            begin_date,
            end_date,
            title_type,
        })
    }
}

/// `J` for journal views, `B` for book views.
fn title_type_of(code: &str) -> Result<char, ReportError> {
    code.chars()
        .nth(3)
        .ok_or_else(|| ReportError::MalformedLayout {
            code: code.to_string(),
            reason: "shorter than 4 characters".into(),
        })
}

fn split_period(raw: &str) -> Result<(String, String), ReportError> {
    let malformed = |reason: &str| ReportError::MalformedPeriod {
        raw: raw.to_string(),
        reason: reason.to_string(),
    };

    let mut entries = raw.split(';');
    let (Some(begin), Some(end)) = (entries.next(), entries.next()) else {
        return Err(malformed("expected `begin;end` entries"));
    };

    let value_of = |entry: &str| {
        entry
            .split_once('=')
            .map(|(_, v)| v.trim().to_string())
            .ok_or_else(|| malformed("entry has no `=`"))
    };
    Ok((value_of(begin)?, value_of(end)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemorySheet;

    fn sheet(code: &str, period: &str) -> MemorySheet {
        let mut s = MemorySheet::new();
        s.set(2, 2, code).set(10, 2, period);
        s
    }

    #[test]
    fn identifies_full_year_report() {
        let doc = sheet("TR_J1", "Begin_Date=2020-01-01;End_Date=2020-12-31");
        let id = ReportIdentity::identify(&doc, "a.xlsx", &ReportLayoutConfig::default()).unwrap();

        assert_eq!(id.filename, "a.xlsx");
        assert_eq!(id.layout_code, "TR_J1");
        assert_eq!(id.begin_date, "2020-01-01");
        assert_eq!(id.end_date, "2020-12-31");
        assert_eq!(id.title_type, 'J');
    }

    #[test]
    fn title_type_is_fourth_character() {
        let doc = sheet("TR_J1_abc", "Begin_Date=2020-01-01;End_Date=2020-12-31");
        let id = ReportIdentity::identify(&doc, "a.xlsx", &ReportLayoutConfig::default()).unwrap();
        assert_eq!(id.title_type, 'J');

        let doc = sheet("TR_B3", "Begin_Date=2020-01-01;End_Date=2020-12-31");
        let id = ReportIdentity::identify(&doc, "b.xlsx", &ReportLayoutConfig::default()).unwrap();
        assert_eq!(id.title_type, 'B');
    }

    #[test]
    fn short_layout_code_is_malformed() {
        let doc = sheet("TR_", "Begin_Date=2020-01-01;End_Date=2020-12-31");
        let err = ReportIdentity::identify(&doc, "a.xlsx", &ReportLayoutConfig::default())
            .unwrap_err();
        assert_eq!(err.kind(), "MalformedLayoutError");

        let mut doc = MemorySheet::new();
        doc.set(10, 2, "Begin_Date=2020-01-01;End_Date=2020-12-31");
        let err = ReportIdentity::identify(&doc, "a.xlsx", &ReportLayoutConfig::default())
            .unwrap_err();
        assert_eq!(err.kind(), "MalformedLayoutError");
    }

    #[test]
    fn period_without_separator_is_malformed() {
        for raw in [
            "Begin_Date 2020-01-01;End_Date=2020-12-31",
            "Begin_Date=2020-01-01;End_Date",
            "Begin_Date=2020-01-01",
        ] {
            let doc = sheet("TR_J1", raw);
            let err = ReportIdentity::identify(&doc, "a.xlsx", &ReportLayoutConfig::default())
                .unwrap_err();
            assert_eq!(err.kind(), "MalformedPeriodError", "{raw}");
        }
    }

    #[test]
    fn extra_period_entries_are_ignored() {
        let doc = sheet(
            "TR_B1",
            "Begin_Date=2021-04-01; End_Date=2021-07-31; Platform=xyz",
        );
        let id = ReportIdentity::identify(&doc, "a.xlsx", &ReportLayoutConfig::default()).unwrap();
        assert_eq!(id.begin_date, "2021-04-01");
        assert_eq!(id.end_date, "2021-07-31");
    }

    #[test]
    fn honours_configured_coordinates() {
        let cfg = ReportLayoutConfig {
            layout_cell: crate::config::CellCoord::new(3, 1),
            period_cell: crate::config::CellCoord::new(4, 1),
            ..ReportLayoutConfig::default()
        };
        let mut doc = MemorySheet::new();
        doc.set(3, 1, "TR_B1")
            .set(4, 1, "Begin_Date=2022-02-01;End_Date=2022-03-31");

        let id = ReportIdentity::identify(&doc, "c.xlsx", &cfg).unwrap();
        assert_eq!(id.layout_code, "TR_B1");
        assert_eq!(id.end_date, "2022-03-31");
    }
}
