//! Export manifest read by the chart renderer

use crate::app::models::DateBasis;
use crate::app::services::aggregator::{AggregationKind, GroupOrdering};
use crate::app::services::reports::{ChartKind, Report};
use crate::config::ExportFormat;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the manifest inside the output directory
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Description of one exported report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub title: String,
    /// File name relative to the manifest
    pub file: String,
    pub chart: ChartKind,
    pub key_columns: Vec<String>,
    pub aggregation: AggregationKind,
    pub ordering: GroupOrdering,
    pub date_basis: Option<DateBasis>,
    pub rows: usize,
    pub total_records: usize,
    pub excluded: usize,
    pub filtered_out: usize,
}

impl ManifestEntry {
    pub fn from_report(report: &Report, file: &str) -> Self {
        Self {
            name: report.name().to_string(),
            title: report.title().to_string(),
            file: file.to_string(),
            chart: report.definition.chart,
            key_columns: report.table.key_names.clone(),
            aggregation: report.table.kind,
            ordering: report.ordering,
            date_basis: report.date_basis,
            rows: report.table.len(),
            total_records: report.table.total_records,
            excluded: report.table.excluded,
            filtered_out: report.filtered_out,
        }
    }
}

/// Everything a renderer needs to find and label the exported tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportManifest {
    pub generated_at: DateTime<Utc>,
    /// Input file the reports were computed from
    pub source: Option<PathBuf>,
    pub format: ExportFormat,
    pub year: Option<i32>,
    pub reports: Vec<ManifestEntry>,
}

impl ExportManifest {
    pub fn new(source: Option<PathBuf>, format: ExportFormat, year: Option<i32>) -> Self {
        Self {
            generated_at: Utc::now(),
            source,
            format,
            year,
            reports: Vec::new(),
        }
    }

    pub fn entry(&self, name: &str) -> Option<&ManifestEntry> {
        self.reports.iter().find(|entry| entry.name == name)
    }

    /// Write the manifest as pretty JSON into `output_dir`
    pub fn write_to(&self, output_dir: &Path) -> Result<PathBuf> {
        let path = output_dir.join(MANIFEST_FILE_NAME);
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::serialization("Failed to serialize export manifest", e))?;
        std::fs::write(&path, content)
            .map_err(|e| Error::io(format!("Failed to write {}", path.display()), e))?;
        Ok(path)
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::serialization(format!("Invalid manifest {}", path.display()), e))
    }
}
