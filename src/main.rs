use anyhow::{Context, Result};
use clap::Parser;
use std::{fs, path::PathBuf};
use tmreport::{
    history::LoadHistory,
    load::{load_directory, ErrorLog, LoadOptions, ParquetSink},
    ReportLayoutConfig,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Load Title Master Report (TR_J1/TR_J3/TR_B1/TR_B3) spreadsheets into Parquet"
)]
struct Args {
    /// Directory holding the report workbooks
    dir: PathBuf,
    /// Glob for report files inside DIR
    #[arg(long, default_value = "*.xlsx")]
    pattern: String,
    /// Append-only log of files that failed to load
    #[arg(long, default_value = "errors.log")]
    error_log: PathBuf,
    /// Root directory for Parquet output
    #[arg(long, default_value = "parquet")]
    output: PathBuf,
    /// Directory for the loaded-files history
    #[arg(long, default_value = "history")]
    history: PathBuf,
    /// YAML file overriding the report cell coordinates
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of files parsed in parallel
    #[arg(short, long, default_value_t = 1)]
    jobs: usize,
    /// Reload files that the history says are already loaded
    #[arg(long)]
    force: bool,
    /// Write the run summary as JSON to this path
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    let args = Args::parse();
    info!(dir = %args.dir.display(), "startup");

    // ─── 2) layout config ────────────────────────────────────────────
    let config = match &args.config {
        Some(path) => ReportLayoutConfig::from_yaml_file(path)?,
        None => ReportLayoutConfig::default(),
    };

    // ─── 3) outputs ──────────────────────────────────────────────────
    let mut sink = ParquetSink::new(&args.output)?;
    let history = LoadHistory::new(&args.history)?;
    let log = ErrorLog::new(&args.error_log);

    // ─── 4) load every report ────────────────────────────────────────
    let opts = LoadOptions {
        pattern: args.pattern,
        config,
        jobs: args.jobs,
        force: args.force,
    };
    let summary = load_directory(&args.dir, &opts, &mut sink, Some(&history), &log)?;

    if summary.failed > 0 {
        info!(
            "{} reports failed, see {}",
            summary.failed,
            log.path().display()
        );
    }
    if let Some(path) = &args.summary {
        let json = serde_json::to_string_pretty(&summary)?;
        fs::write(path, json).with_context(|| format!("writing summary {}", path.display()))?;
    }

    info!("all done");
    Ok(())
}
