//! Configuration management and validation.
//!
//! Provides configuration structures for input parsing, analysis parameters
//! (date basis, year filter, bucket definitions, per-report ordering) and
//! summary export. Configuration is layered: defaults, then an optional JSON
//! file, then command-line overrides.

use crate::app::models::DateBasis;
use crate::app::services::aggregator::GroupOrdering;
use crate::app::services::binning::BinSpec;
use crate::constants::{
    APP_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_DELIMITER, DEFAULT_ERROR_SAMPLE_SIZE,
    DEFAULT_MIN_COUNTRY_BOOKINGS, DEFAULT_TOP_COUNTRIES, lead_time_buckets,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Input file settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Booking export to read
    pub path: Option<PathBuf>,
    /// Field delimiter character
    pub delimiter: char,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: None,
            delimiter: DEFAULT_DELIMITER as char,
        }
    }
}

/// Parameters shared by every report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Which date drives temporal groupings
    pub date_basis: DateBasis,
    /// Restrict temporal reports to a single year of the chosen date
    pub year: Option<i32>,
    /// Number of countries kept in the country table
    pub top_countries: usize,
    /// Minimum bookings for a country to be listed
    pub min_country_bookings: usize,
    /// Lead-time bucket definition
    pub lead_time_bins: BinSpec,
    /// Number of failing records kept as examples
    pub error_sample_size: usize,
    /// Reports to run; empty means all
    pub reports: Vec<String>,
    /// Per-report ordering overriding the report's default
    pub ordering: BTreeMap<String, GroupOrdering>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            date_basis: DateBasis::Arrival,
            year: None,
            top_countries: DEFAULT_TOP_COUNTRIES,
            min_country_bookings: DEFAULT_MIN_COUNTRY_BOOKINGS,
            lead_time_bins: BinSpec::new(lead_time_buckets::BOUNDARIES, lead_time_buckets::LABELS),
            error_sample_size: DEFAULT_ERROR_SAMPLE_SIZE,
            reports: Vec::new(),
            ordering: BTreeMap::new(),
        }
    }
}

/// File format for exported summary tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Parquet,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Parquet => "parquet",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "parquet" => Ok(ExportFormat::Parquet),
            other => Err(Error::configuration(format!(
                "Unknown export format '{}' (expected 'csv' or 'parquet')",
                other
            ))),
        }
    }
}

/// Export destination settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub format: ExportFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./output"),
            format: ExportFormat::Csv,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub quiet: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            quiet: false,
        }
    }
}

impl LoggingConfig {
    /// Level handed to the log filter; quiet mode keeps only errors
    pub fn effective_level(&self) -> &str {
        if self.quiet { "error" } else { &self.level }
    }
}

impl Config {
    /// Default config file location under the user config directory
    pub fn default_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| Error::configuration("Could not determine user config directory"))
    }

    /// Load configuration from a JSON file; absent keys take default values
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config file {}", path.display()), e)
        })?;

        let config: Config = serde_json::from_str(&content).map_err(|e| {
            Error::serialization(format!("Invalid config file {}", path.display()), e)
        })?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load defaults, then the config file if given or present at the default location
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let config = match config_file {
            Some(path) => Self::load_from_file(path)?,
            None => match Self::default_config_path() {
                Ok(path) if path.exists() => Self::load_from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::serialization("Failed to serialize configuration", e))?;
        std::fs::write(path, content)
            .map_err(|e| Error::io(format!("Failed to write {}", path.display()), e))
    }

    pub fn with_input_path(mut self, path: PathBuf) -> Self {
        self.input.path = Some(path);
        self
    }

    pub fn with_date_basis(mut self, basis: DateBasis) -> Self {
        self.analysis.date_basis = basis;
        self
    }

    pub fn with_year(mut self, year: Option<i32>) -> Self {
        self.analysis.year = year;
        self
    }

    pub fn with_reports(mut self, reports: Vec<String>) -> Self {
        self.analysis.reports = reports;
        self
    }

    pub fn with_output(mut self, path: PathBuf, format: ExportFormat) -> Self {
        self.output.path = path;
        self.output.format = format;
        self
    }

    /// Input delimiter as a byte
    pub fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.input.delimiter).map_err(|_| {
            Error::configuration(format!(
                "Delimiter '{}' must be a single-byte character",
                self.input.delimiter
            ))
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.delimiter_byte()?;

        if self.analysis.top_countries == 0 {
            return Err(Error::configuration("top_countries must be at least 1"));
        }

        if let Some(year) = self.analysis.year {
            if !(1900..=2100).contains(&year) {
                return Err(Error::configuration(format!(
                    "Year filter {} is outside 1900..=2100",
                    year
                )));
            }
        }

        self.analysis.lead_time_bins.build()?;

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::configuration(format!(
                "Invalid log level '{}'",
                self.logging.level
            )));
        }

        Ok(())
    }
}
