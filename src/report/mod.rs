// src/report/mod.rs

pub mod bounds;
pub mod identity;
pub mod layout;
pub mod row;
pub mod schema;

use std::{ops::Range, path::Path};
use tracing::{debug, instrument};

pub use bounds::{probe_bounds, probe_data_cols, probe_data_rows, DataBounds};
pub use identity::ReportIdentity;
pub use layout::Layout;
pub use row::{extract_row, Record};
pub use schema::{resolve_header, HeaderSchema};

use crate::config::ReportLayoutConfig;
use crate::document::{TabularDocument, WorkbookSheet};
use crate::error::ReportError;

/// A parsing session over one Title Master Report.
///
/// The identity is read once when the session is created. Header, bounds and
/// rows are derived from the document on every call.
pub struct TitleMasterReport<D> {
    doc: D,
    identity: ReportIdentity,
    cfg: ReportLayoutConfig,
}

impl TitleMasterReport<WorkbookSheet> {
    /// Open the first sheet of the workbook at `path`.
    #[instrument(level = "debug", skip(path, cfg), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>, cfg: ReportLayoutConfig) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let doc = WorkbookSheet::open(path)?;
        Self::new(doc, filename, cfg)
    }
}

impl<D: TabularDocument> TitleMasterReport<D> {
    pub fn new(
        doc: D,
        filename: impl Into<String>,
        cfg: ReportLayoutConfig,
    ) -> Result<Self, ReportError> {
        let identity = ReportIdentity::identify(&doc, filename, &cfg)?;
        debug!(
            file = %identity.filename,
            layout = %identity.layout_code,
            begin = %identity.begin_date,
            end = %identity.end_date,
            "identified report"
        );
        Ok(Self { doc, identity, cfg })
    }

    pub fn identity(&self) -> &ReportIdentity {
        &self.identity
    }

    pub fn filename(&self) -> &str {
        &self.identity.filename
    }

    pub fn layout(&self) -> Result<Layout, ReportError> {
        Layout::from_code(&self.identity.layout_code)
    }

    pub fn config(&self) -> &ReportLayoutConfig {
        &self.cfg
    }

    pub fn header(&self) -> Result<HeaderSchema, ReportError> {
        resolve_header(&self.doc, &self.identity, &self.cfg)
    }

    pub fn data_rows(&self) -> Range<u32> {
        probe_data_rows(&self.doc, &self.cfg)
    }

    pub fn data_cols(&self) -> Range<u32> {
        probe_data_cols(&self.doc, &self.cfg)
    }

    pub fn bounds(&self) -> DataBounds {
        probe_bounds(&self.doc, &self.cfg)
    }

    /// Extract data row `n`. `n` is not checked against `data_rows()`.
    pub fn get_row(&self, n: u32) -> Result<Record, ReportError> {
        let header = self.header()?;
        extract_row(&self.doc, &header, self.data_cols(), n)
    }

    /// Check that the derived header and the probed columns agree, so rows
    /// cannot be paired with the wrong names.
    pub fn validate(&self) -> Result<(HeaderSchema, DataBounds), ReportError> {
        let header = self.header()?;
        let bounds = self.bounds();
        let found = bounds.cols.len();
        if header.len() != found {
            return Err(ReportError::SchemaMismatch {
                context: format!(
                    "{} header vs populated header row {}",
                    self.identity.layout_code, self.cfg.header_row
                ),
                expected: header.len(),
                found,
            });
        }
        Ok((header, bounds))
    }

    /// Every data row, in order, after `validate()` succeeds.
    pub fn records(&self) -> Result<Records<'_, D>, ReportError> {
        let (header, bounds) = self.validate()?;
        Ok(Records {
            doc: &self.doc,
            header,
            cols: bounds.cols,
            rows: bounds.rows,
        })
    }
}

/// Lazily extracted rows of a validated report.
pub struct Records<'a, D> {
    doc: &'a D,
    header: HeaderSchema,
    cols: Range<u32>,
    rows: Range<u32>,
}

impl<D> Records<'_, D> {
    pub fn header(&self) -> &HeaderSchema {
        &self.header
    }
}

impl<D: TabularDocument> Iterator for Records<'_, D> {
    type Item = Result<Record, ReportError>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        Some(extract_row(self.doc, &self.header, self.cols.clone(), row))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}
