//! Named booking reports
//!
//! Each report in the [`CATALOG`] is a grouped aggregation described by data:
//! the dimensions it groups by, the measure, which bookings it looks at and
//! how its rows are listed. The [`ReportRunner`] applies the configured date
//! basis and year filter to every report, so one definition serves both the
//! arrival-date and the reservation-status-date view.
//!
//! Reports over closed domains (months, weekdays, seasons, buckets, known
//! categories) list every domain value; a value without bookings shows an
//! undefined rate rather than a misleading zero.
//!
//! # Example Usage
//!
//! ```rust
//! use booking_insights::app::services::reports::{ReportRunner, find_report};
//! use booking_insights::config::AnalysisConfig;
//!
//! let runner = ReportRunner::from_config(&AnalysisConfig::default()).unwrap();
//! let report = runner.run(&[], find_report("cancellation_by_season").unwrap()).unwrap();
//!
//! assert_eq!(report.table.len(), 4);
//! assert!(report.rows().iter().all(|(_, row)| row.value.is_undefined()));
//! ```

pub mod catalog;
pub mod dimension;
pub mod pipeline;
pub mod runner;

#[cfg(test)]
pub mod tests;

pub use catalog::{
    CATALOG, ChartKind, Measure, ReportDefinition, Scope, Selection, find_report, report_names,
    select_reports,
};
pub use dimension::{Dimension, ReportContext};
pub use pipeline::{PreparedBookings, prepare_bookings};
pub use runner::{Report, ReportRunner};
