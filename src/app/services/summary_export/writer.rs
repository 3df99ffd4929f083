//! Writes report tables to CSV or Parquet files

use super::frame::report_to_dataframe;
use super::manifest::{ExportManifest, ManifestEntry};
use crate::app::services::reports::Report;
use crate::config::{ExportFormat, OutputConfig};
use crate::{Error, Result};
use polars::prelude::{CsvWriter, DataFrame, ParquetCompression, ParquetWriter, SerWriter};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Outcome of an export run
#[derive(Debug, Clone)]
pub struct ExportResult {
    /// Data files written, one per report
    pub files: Vec<PathBuf>,
    pub manifest_path: PathBuf,
    pub manifest: ExportManifest,
    /// Total table rows across all files
    pub rows_written: usize,
}

impl ExportResult {
    pub fn summary(&self) -> String {
        format!(
            "Exported {} reports ({} rows) to {}",
            self.files.len(),
            self.rows_written,
            self.manifest_path
                .parent()
                .map(|dir| dir.display().to_string())
                .unwrap_or_default()
        )
    }
}

/// Writes one file per report plus a manifest into an output directory
#[derive(Debug, Clone)]
pub struct SummaryExporter {
    output_dir: PathBuf,
    format: ExportFormat,
    source: Option<PathBuf>,
}

impl SummaryExporter {
    pub fn new(output_dir: impl Into<PathBuf>, format: ExportFormat) -> Self {
        Self {
            output_dir: output_dir.into(),
            format,
            source: None,
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.path.clone(), config.format)
    }

    /// Record the input file in the manifest
    pub fn with_source(mut self, source: Option<PathBuf>) -> Self {
        self.source = source;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// File name a report is written to
    pub fn file_name(&self, report: &Report) -> String {
        format!("{}.{}", report.name(), self.format.extension())
    }

    /// Export every report and write the manifest
    pub fn export(&self, reports: &[Report], year: Option<i32>) -> Result<ExportResult> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| {
            Error::io(
                format!("Failed to create output directory {}", self.output_dir.display()),
                e,
            )
        })?;

        let mut manifest = ExportManifest::new(self.source.clone(), self.format, year);
        let mut files = Vec::with_capacity(reports.len());
        let mut rows_written = 0;

        for report in reports {
            let file_name = self.file_name(report);
            let path = self.write_report(report, &file_name)?;
            rows_written += report.table.len();
            manifest
                .reports
                .push(ManifestEntry::from_report(report, &file_name));
            files.push(path);
        }

        let manifest_path = manifest.write_to(&self.output_dir)?;
        info!(
            "Wrote {} {} files and {}",
            files.len(),
            self.format.extension(),
            manifest_path.display()
        );

        Ok(ExportResult {
            files,
            manifest_path,
            manifest,
            rows_written,
        })
    }

    /// Write a single report into the output directory
    pub fn write_report(&self, report: &Report, file_name: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(file_name);
        let mut df = report_to_dataframe(report)?;
        write_dataframe(&mut df, &path, self.format)?;
        debug!(
            "Wrote report {} ({} rows) to {}",
            report.name(),
            df.height(),
            path.display()
        );
        Ok(path)
    }
}

/// Write a frame in the requested format, replacing any existing file
pub fn write_dataframe(df: &mut DataFrame, path: &Path, format: ExportFormat) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| Error::io(format!("Failed to create {}", path.display()), e))?;

    match format {
        ExportFormat::Csv => {
            CsvWriter::new(file)
                .include_header(true)
                .finish(df)
                .map_err(|e| Error::export(format!("Failed to write {}", path.display()), e))?;
        }
        ExportFormat::Parquet => {
            ParquetWriter::new(file)
                .with_compression(ParquetCompression::Snappy)
                .finish(df)
                .map_err(|e| Error::export(format!("Failed to write {}", path.display()), e))?;
        }
    }

    Ok(())
}
