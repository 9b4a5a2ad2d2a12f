// src/load/sink.rs

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::debug;

use crate::report::{HeaderSchema, Record, ReportIdentity};

/// Where extracted reports go. Implementations persist every record of one
/// report or fail as a whole.
pub trait RecordSink {
    fn write_report(
        &mut self,
        identity: &ReportIdentity,
        header: &HeaderSchema,
        records: &[Record],
    ) -> Result<()>;
}

/// Writes each report to `<out>/<layout>/<file stem>.parquet`, every column
/// as Utf8, plus `begin_date`/`end_date` columns for the reporting period.
pub struct ParquetSink {
    out_dir: PathBuf,
}

impl ParquetSink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Result<Self> {
        let out_dir = out_dir.into();
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("creating output directory {}", out_dir.display()))?;
        Ok(Self { out_dir })
    }

    pub fn report_path(&self, identity: &ReportIdentity) -> PathBuf {
        let stem = Path::new(&identity.filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| identity.filename.clone());
        self.out_dir
            .join(&identity.layout_code)
            .join(format!("{stem}.parquet"))
    }
}

impl RecordSink for ParquetSink {
    fn write_report(
        &mut self,
        identity: &ReportIdentity,
        header: &HeaderSchema,
        records: &[Record],
    ) -> Result<()> {
        let mut fields: Vec<Field> = header
            .names()
            .iter()
            .map(|name| Field::new(name, DataType::Utf8, false))
            .collect();
        fields.push(Field::new("begin_date", DataType::Utf8, false));
        fields.push(Field::new("end_date", DataType::Utf8, false));
        let schema = Arc::new(Schema::new(fields));

        let mut columns: Vec<ArrayRef> = Vec::with_capacity(header.len() + 2);
        for idx in 0..header.len() {
            let values: StringArray = records
                .iter()
                .map(|r| r.values().get(idx).map(String::as_str))
                .collect();
            columns.push(Arc::new(values));
        }
        let n = records.len();
        columns.push(Arc::new(StringArray::from(vec![identity.begin_date.as_str(); n])));
        columns.push(Arc::new(StringArray::from(vec![identity.end_date.as_str(); n])));

        let batch = RecordBatch::try_new(schema.clone(), columns)
            .with_context(|| format!("building record batch for {}", identity.filename))?;

        let out_path = self.report_path(identity);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let temp_path = out_path.with_extension("tmp");

        let file = File::create(&temp_path)
            .with_context(|| format!("creating {}", temp_path.display()))?;
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .set_dictionary_enabled(true)
            .build();
        let mut writer = ArrowWriter::try_new(file, schema, Some(props))
            .context("creating Arrow writer")?;
        writer.write(&batch).context("writing report batch")?;
        writer.close().context("closing report writer")?;

        fs::rename(&temp_path, &out_path)
            .with_context(|| format!("renaming {} to {}", temp_path.display(), out_path.display()))?;
        debug!(path = %out_path.display(), rows = n, "wrote report");
        Ok(())
    }
}
