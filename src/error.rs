// src/error.rs

use std::path::PathBuf;

/// Everything that can go wrong while parsing a single report.
///
/// These are raised where they are detected and never retried; the loader
/// decides whether to skip the file.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("layout code `{code}` is malformed: {reason}")]
    MalformedLayout { code: String, reason: String },

    #[error("reporting period `{raw}` is malformed: {reason}")]
    MalformedPeriod { raw: String, reason: String },

    #[error("layout `{0}` is not one of TR_J1, TR_J3, TR_B1, TR_B3")]
    UnsupportedLayout(String),

    #[error("date `{date}` has no month in 1..=12")]
    InvalidDate { date: String },

    #[error("period {begin} .. {end} crosses a year boundary")]
    CrossYearPeriod { begin: String, end: String },

    #[error("column `{0}` appears more than once in the header")]
    DuplicateColumn(String),

    #[error("{context}: expected {expected} columns, found {found}")]
    SchemaMismatch {
        context: String,
        expected: usize,
        found: usize,
    },

    #[error("failed to read workbook `{path}`: {detail}")]
    Document { path: PathBuf, detail: String },
}

impl ReportError {
    /// Stable name used in the error log.
    pub fn kind(&self) -> &'static str {
        match self {
            ReportError::MalformedLayout { .. } => "MalformedLayoutError",
            ReportError::MalformedPeriod { .. } => "MalformedPeriodError",
            ReportError::UnsupportedLayout(_) => "UnsupportedLayoutError",
            ReportError::InvalidDate { .. } => "InvalidDateError",
            ReportError::CrossYearPeriod { .. } => "UnsupportedPeriodError",
            ReportError::DuplicateColumn(_) => "DuplicateColumnError",
            ReportError::SchemaMismatch { .. } => "SchemaMismatchError",
            ReportError::Document { .. } => "DocumentError",
        }
    }
}
