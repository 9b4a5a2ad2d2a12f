// src/load/mod.rs

pub mod error_log;
pub mod sink;

use anyhow::{Context, Result};
use glob::glob;
use rayon::prelude::*;
use serde::Serialize;
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::{error, info, instrument, warn};

pub use error_log::{error_kind, ErrorLog};
pub use sink::{ParquetSink, RecordSink};

use crate::config::ReportLayoutConfig;
use crate::history::LoadHistory;
use crate::report::{HeaderSchema, Record, ReportIdentity, TitleMasterReport};

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Glob, relative to the report directory.
    pub pattern: String,
    pub config: ReportLayoutConfig,
    /// Files parsed concurrently; 1 parses them one after another.
    pub jobs: usize,
    /// Reload files already present in the history.
    pub force: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            pattern: "*.xlsx".into(),
            config: ReportLayoutConfig::default(),
            jobs: 1,
            force: false,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub loaded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub rows: u64,
}

/// Everything extracted from one report file.
#[derive(Debug)]
pub struct ParsedReport {
    pub identity: ReportIdentity,
    pub header: HeaderSchema,
    pub records: Vec<Record>,
}

/// Open `path` and extract every data row. All-or-nothing: any bad row fails
/// the whole file.
#[instrument(level = "info", skip(path, cfg), fields(path = %path.display()))]
pub fn parse_report(path: &Path, cfg: &ReportLayoutConfig) -> Result<ParsedReport> {
    let report = TitleMasterReport::open(path, cfg.clone())?;
    let records = report
        .records()
        .with_context(|| format!("validating {}", report.filename()))?;
    let header = records.header().clone();
    let records = records
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("extracting rows of {}", report.filename()))?;

    Ok(ParsedReport {
        identity: report.identity().clone(),
        header,
        records,
    })
}

/// Load every report in `dir` matching `opts.pattern` into `sink`.
///
/// A file that fails for any reason is appended to `log` and the run moves
/// on. Only problems with the run itself (bad pattern, unwritable log or
/// history) are returned as errors.
pub fn load_directory(
    dir: &Path,
    opts: &LoadOptions,
    sink: &mut dyn RecordSink,
    history: Option<&LoadHistory>,
    log: &ErrorLog,
) -> Result<LoadSummary> {
    let start = Instant::now();
    let mut summary = LoadSummary::default();

    let files = discover(dir, &opts.pattern)?;
    let done: HashSet<String> = match history {
        Some(h) if !opts.force => h.loaded_names()?,
        _ => HashSet::new(),
    };

    let mut pending = Vec::with_capacity(files.len());
    for path in files {
        if done.contains(&file_name(&path)) {
            info!(file = %path.display(), "already loaded, skipping");
            summary.skipped += 1;
        } else {
            pending.push(path);
        }
    }
    info!("{} reports to load, {} skipped", pending.len(), summary.skipped);

    if opts.jobs <= 1 {
        for path in &pending {
            let parsed = parse_report(path, &opts.config);
            finish(path, parsed, sink, history, log, &mut summary)?;
        }
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(opts.jobs)
            .build()
            .context("building parser thread pool")?;
        // at most `jobs` parsed reports are held before they are sunk
        for chunk in pending.chunks(opts.jobs) {
            let parsed: Vec<Result<ParsedReport>> = pool.install(|| {
                chunk
                    .par_iter()
                    .map(|path| parse_report(path, &opts.config))
                    .collect()
            });
            for (path, parsed) in chunk.iter().zip(parsed) {
                finish(path, parsed, sink, history, log, &mut summary)?;
            }
        }
    }

    info!(
        loaded = summary.loaded,
        failed = summary.failed,
        skipped = summary.skipped,
        rows = summary.rows,
        elapsed = ?start.elapsed(),
        "load complete"
    );
    Ok(summary)
}

/// Hand one parsed file to the sink and history, or log why it failed.
fn finish(
    path: &Path,
    parsed: Result<ParsedReport>,
    sink: &mut dyn RecordSink,
    history: Option<&LoadHistory>,
    log: &ErrorLog,
    summary: &mut LoadSummary,
) -> Result<()> {
    let name = file_name(path);
    let outcome = parsed.and_then(|report| {
        sink.write_report(&report.identity, &report.header, &report.records)
            .with_context(|| format!("storing {}", name))?;
        Ok(report.records.len() as u64)
    });

    match outcome {
        Ok(rows) => {
            if let Some(h) = history {
                h.record_loaded(&name, rows)?;
            }
            info!(file = %name, rows, "loaded");
            summary.loaded += 1;
            summary.rows += rows;
        }
        Err(e) => {
            error!(file = %name, kind = error_kind(&e), "failed: {:#}", e);
            log.append(&path.display().to_string(), &e)?;
            summary.failed += 1;
        }
    }
    Ok(())
}

fn discover(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("report directory not found: {}", dir.display());
    }
    let full = format!(
        "{}/{}",
        glob::Pattern::escape(&dir.display().to_string()),
        pattern
    );
    let mut files = Vec::new();
    for entry in glob(&full).with_context(|| format!("bad glob pattern {}", full))? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => warn!("unreadable path while globbing: {}", e),
        }
    }
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
