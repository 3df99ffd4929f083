//! Booking Insights Library
//!
//! A Rust library for descriptive cancellation analytics over hotel booking
//! records.
//!
//! This library provides tools for:
//! - Loading delimited booking exports into raw field mappings
//! - Normalizing raw records into typed bookings, flagging unrecognized categories
//! - Deriving arrival dates, cancellation lead times, seasons and weekdays
//! - Binning continuous fields into ordered buckets with an explicit out-of-range label
//! - Grouped count, rate, row-percentage and mean summary tables
//! - Exporting summary tables to CSV or Parquet for external chart rendering
//!
//! Record-level problems never abort a run: they are counted and sampled in
//! the statistics returned next to the results.

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod aggregator;
        pub mod binning;
        pub mod csv_loader;
        pub mod derived_fields;
        pub mod reports;
        pub mod schema_normalizer;
        pub mod summary_export;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{AnalyzedBooking, Booking, Category, RawRecord, RawValue};
pub use app::services::aggregator::{Aggregation, GroupOrdering, Metric, SummaryTable};
pub use config::Config;

/// Result type alias for booking analysis
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for booking analysis operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error
    #[error("CSV parsing error in file '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// A required field is missing or cannot be coerced to its declared type
    #[error("Schema error at row {row}, field '{field}': {message}")]
    Schema {
        row: usize,
        field: String,
        message: String,
    },

    /// Day, month and year do not compose into a valid calendar date
    #[error("Invalid arrival date at row {row}: {year}-{month:02}-{day:02} is not a calendar date")]
    DateComposition {
        row: usize,
        year: i32,
        month: u32,
        day: u32,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Summary table export error
    #[error("Export error: {message}")]
    Export {
        message: String,
        #[source]
        source: polars::error::PolarsError,
    },

    /// JSON (de)serialization error
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Unknown report name
    #[error("Unknown report: {name}")]
    UnknownReport { name: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a schema error for a single record
    pub fn schema(row: usize, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            row,
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a date composition error for a single record
    pub fn date_composition(row: usize, year: i32, month: u32, day: u32) -> Self {
        Self::DateComposition {
            row,
            year,
            month,
            day,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an export error
    pub fn export(message: impl Into<String>, source: polars::error::PolarsError) -> Self {
        Self::Export {
            message: message.into(),
            source,
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }

    /// Create an unknown report error
    pub fn unknown_report(name: impl Into<String>) -> Self {
        Self::UnknownReport { name: name.into() }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            file: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<polars::error::PolarsError> for Error {
    fn from(error: polars::error::PolarsError) -> Self {
        Self::Export {
            message: "Polars operation failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON operation failed".to_string(),
            source: error,
        }
    }
}
