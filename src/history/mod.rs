// src/history/mod.rs

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, StringArray, TimestampMicrosecondArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::Utc;
use glob::glob;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::{
    collections::HashSet,
    fs::{self, File},
    path::PathBuf,
    sync::Arc,
};

const LOADED: &str = "loaded";

/// Which report files have already been loaded, backed by one single-row
/// Parquet file per event.
pub struct LoadHistory {
    history_dir: PathBuf,
}

impl LoadHistory {
    /// Open the history at `history_dir`, creating the directory if needed.
    pub fn new(history_dir: impl Into<PathBuf>) -> Result<Self> {
        let history_dir = history_dir.into();
        fs::create_dir_all(&history_dir)
            .with_context(|| format!("creating history directory {:?}", &history_dir))?;
        Ok(Self { history_dir })
    }

    /// Record that `filename` was loaded with `rows` records.
    /// Writes `<filename>_loaded_<ts>.parquet`.
    pub fn record_loaded(&self, filename: &str, rows: u64) -> Result<()> {
        let ts = Utc::now().timestamp_micros();
        let path = self
            .history_dir
            .join(format!("{}_{}_{}.parquet", filename, LOADED, ts));

        let schema = Arc::new(Schema::new(vec![
            Field::new("filename", DataType::Utf8, false),
            Field::new("rows", DataType::UInt64, false),
            Field::new(
                "loaded_at",
                DataType::Timestamp(TimeUnit::Microsecond, None),
                false,
            ),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(vec![filename.to_string()])),
            Arc::new(UInt64Array::from(vec![rows])),
            Arc::new(TimestampMicrosecondArray::from_iter_values(vec![ts])),
        ];

        let batch = RecordBatch::try_new(schema.clone(), columns)
            .context("building history record batch")?;
        let file =
            File::create(&path).with_context(|| format!("creating history file {:?}", &path))?;
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();
        let mut writer = ArrowWriter::try_new(file, schema, Some(props))
            .context("creating Arrow writer for history")?;
        writer.write(&batch).context("writing history batch")?;
        writer.close().context("closing history writer")?;
        Ok(())
    }

    /// Every filename with a `loaded` event, found by scanning file names.
    pub fn loaded_names(&self) -> Result<HashSet<String>> {
        let mut set = HashSet::new();
        let dir = glob::Pattern::escape(&self.history_dir.display().to_string());
        let pattern = format!("{}/*_{}_*.parquet", dir, LOADED);
        let marker = format!("_{}_", LOADED);
        for path in glob(&pattern)?.flatten() {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                // stem = "<filename>_loaded_<ts>"
                if let Some(idx) = stem.rfind(&marker) {
                    set.insert(stem[..idx].to_string());
                }
            }
        }
        Ok(set)
    }
}
