//! Command-line argument definitions for booking insights
//!
//! Every subcommand shares the input options (file, delimiter, config file,
//! verbosity); the report-producing commands add the analysis options.

use crate::app::models::DateBasis;
use crate::app::services::reports::{find_report, report_names};
use crate::config::ExportFormat;
use crate::{Error, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the booking insights tool
///
/// Computes cancellation summaries over a hotel booking export and prints or
/// exports them for chart rendering.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "booking-insights",
    version,
    about = "Descriptive cancellation analytics over hotel booking exports",
    long_about = "Loads a hotel booking export, normalizes every record into a typed booking, \
                  derives arrival dates, cancellation lead times, seasons and weekdays, and \
                  summarizes cancellation against demographic, temporal and commercial attributes. \
                  Summary tables can be printed or exported as CSV/Parquet with a manifest for \
                  external chart rendering."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run reports and print their summary tables
    Analyze(AnalyzeArgs),
    /// Check a booking export and report rejected or flagged records
    Validate(ValidateArgs),
    /// Run reports and write their summary tables to files
    Export(ExportArgs),
    /// List the available reports
    Reports,
}

/// Options shared by every command that reads bookings
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct InputArgs {
    /// Booking export to read (CSV with a header row)
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Field delimiter of the input file
    #[arg(short = 'd', long = "delimiter", value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Path to a JSON configuration file
    ///
    /// If not specified, looks for config.json under the user config
    /// directory (booking-insights/config.json) and falls back to defaults.
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Options controlling which reports run and how
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct AnalysisArgs {
    /// Date driving temporal groupings: arrival or reservation_status
    #[arg(short = 'b', long = "date-basis", value_name = "BASIS")]
    pub date_basis: Option<DateBasis>,

    /// Only include bookings whose selected date falls in this year
    #[arg(short = 'y', long = "year", value_name = "YEAR")]
    pub year: Option<i32>,

    /// Comma-separated list of reports to run (default: all)
    #[arg(short = 'r', long = "reports", value_name = "LIST")]
    pub reports: Option<ReportList>,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Output format for the summary tables
    #[arg(long = "format", value_enum, default_value = "human")]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Number of rejected records to show as examples
    #[arg(long = "samples", value_name = "COUNT")]
    pub samples: Option<usize>,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct ExportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Directory for exported tables and the manifest
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// File format of exported tables: csv or parquet
    #[arg(short = 'f', long = "format", value_name = "FORMAT")]
    pub format: Option<ExportFormat>,
}

/// Output format for printed results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables
    Human,
    /// JSON for scripting
    Json,
}

/// Wrapper for parsing comma-separated report lists
#[derive(Debug, Clone, PartialEq)]
pub struct ReportList {
    pub reports: Vec<String>,
}

impl FromStr for ReportList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let reports: Vec<String> = s
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if reports.is_empty() {
            return Err(Error::configuration("Report list cannot be empty"));
        }

        for report in &reports {
            if find_report(report).is_err() {
                return Err(Error::configuration(format!(
                    "Unknown report '{}'. Available reports: {}",
                    report,
                    report_names().collect::<Vec<_>>().join(", ")
                )));
            }
        }

        Ok(ReportList { reports })
    }
}

impl InputArgs {
    /// Determine the log level from verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Validate paths given on the command line
    pub fn validate(&self) -> Result<()> {
        if let Some(input) = &self.input {
            if !input.is_file() {
                return Err(Error::configuration(format!(
                    "Input file does not exist: {}",
                    input.display()
                )));
            }
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        Ok(())
    }
}

impl AnalysisArgs {
    pub fn report_names(&self) -> Option<Vec<String>> {
        self.reports.as_ref().map(|list| list.reports.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_report_list_parsing() {
        let result = ReportList::from_str("cancellation_by_month").unwrap();
        assert_eq!(result.reports, vec!["cancellation_by_month"]);

        let result = ReportList::from_str(" cancellation_by_month , cancellation_by_hotel ").unwrap();
        assert_eq!(
            result.reports,
            vec!["cancellation_by_month", "cancellation_by_hotel"]
        );

        assert!(ReportList::from_str("occupancy_by_month").is_err());
        assert!(ReportList::from_str("").is_err());
        assert!(ReportList::from_str(",,,").is_err());
    }

    #[test]
    fn test_parse_export_command() {
        let args = Args::try_parse_from([
            "booking-insights",
            "export",
            "--date-basis",
            "reservation_status",
            "--year",
            "2016",
            "--format",
            "parquet",
            "--reports",
            "cancellation_by_month,bookings_by_month",
        ])
        .unwrap();

        let Some(Commands::Export(export)) = args.command else {
            panic!("expected export command");
        };
        assert_eq!(export.analysis.date_basis, Some(DateBasis::ReservationStatus));
        assert_eq!(export.analysis.year, Some(2016));
        assert_eq!(export.format, Some(ExportFormat::Parquet));
        assert_eq!(export.analysis.report_names().unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_values_are_rejected_by_the_parser() {
        assert!(
            Args::try_parse_from(["booking-insights", "analyze", "--date-basis", "checkout"])
                .is_err()
        );
        assert!(
            Args::try_parse_from(["booking-insights", "analyze", "--reports", "nope"]).is_err()
        );
        assert!(Args::try_parse_from(["booking-insights", "analyze", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_log_level() {
        let mut input = InputArgs::default();
        assert_eq!(input.get_log_level(), "warn");

        input.verbose = 2;
        assert_eq!(input.get_log_level(), "debug");

        input.verbose = 5;
        assert_eq!(input.get_log_level(), "trace");

        input.quiet = true;
        assert_eq!(input.get_log_level(), "error");
    }

    #[test]
    fn test_input_validation() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("hotel_bookings.csv");
        std::fs::write(&file, "hotel\n").unwrap();

        let input = InputArgs {
            input: Some(file),
            ..InputArgs::default()
        };
        assert!(input.validate().is_ok());

        let input = InputArgs {
            input: Some(dir.path().to_path_buf()),
            ..InputArgs::default()
        };
        assert!(input.validate().is_err());

        let input = InputArgs {
            config_file: Some(dir.path().join("missing.json")),
            ..InputArgs::default()
        };
        assert!(input.validate().is_err());
    }
}
