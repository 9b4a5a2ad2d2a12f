// src/report/row.rs

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::{ops::Range, sync::Arc};

use super::HeaderSchema;
use crate::document::TabularDocument;
use crate::error::ReportError;

/// One data row, addressable by header name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    columns: Arc<[String]>,
    values: Vec<String>,
}

impl Record {
    /// Pairs `values` with `header` position for position; the counts must agree.
    pub fn new(header: &HeaderSchema, values: Vec<String>) -> Result<Self, ReportError> {
        if values.len() != header.len() {
            return Err(ReportError::SchemaMismatch {
                context: "record values vs header".into(),
                expected: header.len(),
                found: values.len(),
            });
        }
        Ok(Self {
            columns: header.shared(),
            values,
        })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| self.values[i].as_str())
    }

    pub fn names(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Read row `row` across `cols` and pair the normalized values with `header`.
pub fn extract_row<D: TabularDocument>(
    doc: &D,
    header: &HeaderSchema,
    cols: Range<u32>,
    row: u32,
) -> Result<Record, ReportError> {
    let values: Vec<String> = cols.map(|col| doc.cell(row, col).to_field_string()).collect();
    Record::new(header, values).map_err(|e| match e {
        ReportError::SchemaMismatch {
            expected, found, ..
        } => ReportError::SchemaMismatch {
            context: format!("row {row}"),
            expected,
            found,
        },
        other => other,
    })
}
