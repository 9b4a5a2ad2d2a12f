// src/load/error_log.rs

use anyhow::{Context, Result};
use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use crate::error::ReportError;

/// Append-only log of files that could not be loaded, one
/// `<file> | <kind> | <detail>` line each.
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, file: &str, err: &anyhow::Error) -> Result<()> {
        let mut out = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening error log {}", self.path.display()))?;
        writeln!(out, "{}", format_line(file, err))
            .with_context(|| format!("writing error log {}", self.path.display()))
    }
}

fn format_line(file: &str, err: &anyhow::Error) -> String {
    let detail = format!("{:#}", err).replace(['\n', '\r'], " ");
    format!("{} | {} | {}", file, error_kind(err), detail)
}

/// Kind of the first `ReportError` in the chain, `LoadError` if there is none.
pub fn error_kind(err: &anyhow::Error) -> &'static str {
    err.chain()
        .find_map(|e| e.downcast_ref::<ReportError>())
        .map(ReportError::kind)
        .unwrap_or("LoadError")
}
