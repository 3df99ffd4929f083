//! Command implementations for the booking insights CLI
//!
//! This module contains the command execution logic, terminal rendering of
//! summary tables and statistics, and logging setup.

use crate::app::services::aggregator::{AggregationKind, Metric};
use crate::app::services::csv_loader::load_records;
use crate::app::services::reports::{
    CATALOG, PreparedBookings, Report, ReportRunner, prepare_bookings,
};
use crate::app::services::summary_export::{ExportResult, SummaryExporter};
use crate::cli::args::{
    AnalysisArgs, AnalyzeArgs, Args, Commands, ExportArgs, InputArgs, OutputFormat, ValidateArgs,
};
use crate::config::{Config, LoggingConfig};
use crate::{Error, Result};
use colored::*;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Run statistics reported by every command
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Raw records read from the input
    pub records_read: usize,
    /// Bookings that made it through normalization
    pub bookings: usize,
    /// Records rejected with a schema error
    pub rejected: usize,
    /// Reports computed
    pub reports_run: usize,
    /// Files written by an export
    pub files_written: usize,
    pub elapsed: Duration,
}

/// Main command runner
///
/// Loads the layered configuration, sets up logging from it and dispatches
/// to the selected command.
pub fn run(args: Args) -> Result<RunSummary> {
    let start_time = Instant::now();

    let Some(command) = args.command else {
        return Err(Error::configuration("No command given"));
    };

    let mut summary = match &command {
        Commands::Analyze(args) => {
            let config = prepare_command(&args.input, Some(&args.analysis))?;
            run_analyze(args, config)?
        }
        Commands::Validate(args) => {
            let config = prepare_command(&args.input, None)?;
            run_validate(args, config)?
        }
        Commands::Export(args) => {
            let config = prepare_command(&args.input, Some(&args.analysis))?;
            run_export(args, config)?
        }
        Commands::Reports => {
            print_report_catalog();
            RunSummary::default()
        }
    };

    summary.elapsed = start_time.elapsed();
    info!("Finished in {}", HumanDuration(summary.elapsed));
    Ok(summary)
}

/// Validate the command line, load the merged configuration and start logging
fn prepare_command(input: &InputArgs, analysis: Option<&AnalysisArgs>) -> Result<Config> {
    input.validate()?;
    let config = load_configuration(input, analysis)?;
    setup_logging(&config.logging)?;
    debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// Set up tracing from the merged logging settings
fn setup_logging(logging: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = logging.effective_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("booking_insights={}", log_level)));

    let result = if logging.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    result.map_err(|e| Error::configuration(format!("Failed to initialize logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using the layered approach (defaults -> file -> args)
pub fn load_configuration(input: &InputArgs, analysis: Option<&AnalysisArgs>) -> Result<Config> {
    let mut config = Config::load_layered(input.config_file.as_deref())?;
    apply_cli_overrides(&mut config, input, analysis);
    config.validate()?;

    if config.input.path.is_none() {
        return Err(Error::configuration(
            "No input file given; pass --input or set input.path in the config file",
        ));
    }

    Ok(config)
}

/// Apply command-line values over the loaded configuration
fn apply_cli_overrides(config: &mut Config, input: &InputArgs, analysis: Option<&AnalysisArgs>) {
    if let Some(path) = &input.input {
        config.input.path = Some(path.clone());
    }
    if let Some(delimiter) = input.delimiter {
        config.input.delimiter = delimiter;
    }
    if input.quiet {
        config.logging.quiet = true;
    }
    if input.quiet || input.verbose > 0 {
        config.logging.level = input.get_log_level().to_string();
    }

    if let Some(analysis) = analysis {
        if let Some(basis) = analysis.date_basis {
            config.analysis.date_basis = basis;
        }
        if analysis.year.is_some() {
            config.analysis.year = analysis.year;
        }
        if let Some(reports) = analysis.report_names() {
            config.analysis.reports = reports;
        }
    }
}

/// Load and prepare bookings with a spinner
fn load_bookings(config: &Config, show_progress: bool) -> Result<(usize, PreparedBookings)> {
    let path = config
        .input
        .path
        .as_deref()
        .ok_or_else(|| Error::configuration("No input file configured"))?;

    let spinner = show_progress.then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Reading {}", path.display()));
        pb
    });

    let loaded = load_records(path, config.delimiter_byte()?)?;

    if let Some(pb) = &spinner {
        pb.set_message(format!("Normalizing {} records", loaded.records.len()));
    }
    let prepared = prepare_bookings(&loaded.records, &config.analysis);

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    Ok((loaded.records.len(), prepared))
}

fn run_reports(config: &Config, prepared: &PreparedBookings) -> Result<Vec<Report>> {
    ReportRunner::from_config(&config.analysis)?
        .run_named(&prepared.bookings, &config.analysis.reports)
}

fn run_analyze(args: &AnalyzeArgs, config: Config) -> Result<RunSummary> {
    let (records_read, prepared) = load_bookings(&config, !config.logging.quiet)?;
    let reports = run_reports(&config, &prepared)?;

    match args.output_format {
        OutputFormat::Human => {
            if !config.logging.quiet {
                print_preparation_summary(&prepared, false);
            }
            for report in &reports {
                print_report(report);
            }
        }
        OutputFormat::Json => print_reports_json(&reports)?,
    }

    Ok(RunSummary {
        records_read,
        bookings: prepared.len(),
        rejected: prepared.normalization.rejected,
        reports_run: reports.len(),
        ..RunSummary::default()
    })
}

fn run_validate(args: &ValidateArgs, mut config: Config) -> Result<RunSummary> {
    if let Some(samples) = args.samples {
        config.analysis.error_sample_size = samples;
    }

    let (records_read, prepared) = load_bookings(&config, !config.logging.quiet)?;
    print_preparation_summary(&prepared, true);

    Ok(RunSummary {
        records_read,
        bookings: prepared.len(),
        rejected: prepared.normalization.rejected,
        ..RunSummary::default()
    })
}

fn run_export(args: &ExportArgs, mut config: Config) -> Result<RunSummary> {
    if let Some(output) = &args.output {
        config.output.path = output.clone();
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }

    let (records_read, prepared) = load_bookings(&config, !config.logging.quiet)?;
    let reports = run_reports(&config, &prepared)?;

    let result = SummaryExporter::from_config(&config.output)
        .with_source(config.input.path.clone())
        .export(&reports, config.analysis.year)?;

    if !config.logging.quiet {
        print_preparation_summary(&prepared, false);
        print_export_summary(&result);
    }

    Ok(RunSummary {
        records_read,
        bookings: prepared.len(),
        rejected: prepared.normalization.rejected,
        reports_run: reports.len(),
        files_written: result.files.len(),
        ..RunSummary::default()
    })
}

// =============================================================================
// Terminal Rendering
// =============================================================================

/// Format an aggregated value for display
pub fn format_metric(kind: AggregationKind, metric: Metric) -> String {
    match metric {
        Metric::Undefined => "no data".to_string(),
        Metric::Value(v) => match kind {
            AggregationKind::Count => format!("{}", v as u64),
            AggregationKind::Rate => format!("{:.1}%", v * 100.0),
            AggregationKind::RowPercentage => format!("{:.1}%", v),
            AggregationKind::Mean => format!("{:.2}", v),
        },
    }
}

fn print_report(report: &Report) {
    let mut heading = report.title().to_string();
    if let Some(basis) = report.date_basis {
        heading.push_str(&format!(" ({} date)", basis));
    }
    if let Some(year) = report.year {
        heading.push_str(&format!(" [{}]", year));
    }
    println!("\n{}", heading.bright_green().bold());

    let rows = report.rows();
    if rows.is_empty() {
        println!("  {}", "no bookings".dimmed());
        return;
    }

    let labels: Vec<String> = rows.iter().map(|(key, _)| key.to_string()).collect();
    let width = labels
        .iter()
        .map(|label| label.chars().count())
        .chain(std::iter::once(report.table.key_names.join(" / ").len()))
        .max()
        .unwrap_or(0);

    println!(
        "  {:<width$}  {:>8}  {:>10}",
        report.table.key_names.join(" / ").bright_cyan(),
        "count".bright_cyan(),
        report.table.kind.as_str().bright_cyan(),
        width = width
    );

    for (label, (_, row)) in labels.iter().zip(&rows) {
        let value = format_metric(report.table.kind, row.value);
        let value = if row.value.is_undefined() {
            value.dimmed()
        } else {
            value.bright_white()
        };
        println!(
            "  {:<width$}  {:>8}  {:>10}",
            label,
            row.count,
            value,
            width = width
        );
    }

    if report.table.excluded > 0 {
        println!(
            "  {} {} bookings without a value for this grouping",
            "Excluded:".bright_yellow(),
            report.table.excluded
        );
    }
}

fn print_reports_json(reports: &[Report]) -> Result<()> {
    let json: Vec<serde_json::Value> = reports
        .iter()
        .map(|report| {
            let rows: Vec<serde_json::Value> = report
                .rows()
                .into_iter()
                .map(|(key, row)| {
                    serde_json::json!({
                        "key": key.labels(),
                        "count": row.count,
                        "value": row.value.value(),
                    })
                })
                .collect();
            serde_json::json!({
                "name": report.name(),
                "title": report.title(),
                "chart": report.definition.chart,
                "key_columns": report.table.key_names,
                "aggregation": report.table.kind,
                "date_basis": report.date_basis,
                "year": report.year,
                "excluded": report.table.excluded,
                "rows": rows,
            })
        })
        .collect();

    let output = serde_json::to_string_pretty(&json)
        .map_err(|e| Error::serialization("Failed to serialize reports", e))?;
    println!("{}", output);
    Ok(())
}

fn print_preparation_summary(prepared: &PreparedBookings, detailed: bool) {
    let normalization = &prepared.normalization;
    let derivation = &prepared.derivation;

    println!("\n{}", "Input Summary".bright_green().bold());
    println!(
        "  {} {}",
        "Records read:".bright_cyan(),
        normalization.total_records.to_string().bright_white()
    );
    println!(
        "  {} {} ({:.2}%)",
        "Bookings:".bright_cyan(),
        normalization.normalized.to_string().bright_white(),
        normalization.success_rate()
    );

    if normalization.rejected > 0 {
        println!(
            "  {} {}",
            "Rejected:".bright_red(),
            normalization.rejected.to_string().bright_red().bold()
        );
        for (field, count) in &normalization.rejected_by_field {
            println!("    {} {}", format!("{}:", field).dimmed(), count);
        }
    }

    if normalization.flagged_records > 0 {
        println!(
            "  {} {}",
            "Unrecognized values:".bright_yellow(),
            normalization.flagged_records
        );
        if detailed {
            for (value, count) in &normalization.unrecognized_values {
                println!("    {} {}", format!("{}:", value).dimmed(), count);
            }
        }
    }

    if derivation.date_composition_failures > 0 {
        println!(
            "  {} {}",
            "Invalid arrival dates:".bright_yellow(),
            derivation.date_composition_failures
        );
    }
    if derivation.negative_cancellation_lead_times > 0 {
        println!(
            "  {} {}",
            "Canceled after arrival:".bright_yellow(),
            derivation.negative_cancellation_lead_times
        );
    }

    if detailed {
        let samples: Vec<&String> = normalization
            .error_samples
            .iter()
            .chain(&derivation.error_samples)
            .collect();
        if !samples.is_empty() {
            println!("\n{}", "Sample errors".bright_yellow().bold());
            for sample in samples {
                println!("  {}", sample);
            }
        }
    }
}

fn print_export_summary(result: &ExportResult) {
    println!("\n{}", "Export Summary".bright_green().bold());
    println!("  {}", result.summary());
    for file in &result.files {
        println!("  {} {}", "•".bright_cyan(), file.display());
    }
    println!(
        "  {} {}",
        "Manifest:".bright_cyan(),
        result.manifest_path.display()
    );
}

fn print_report_catalog() {
    println!("{}", "Available reports".bright_green().bold());
    let width = CATALOG
        .iter()
        .map(|report| report.name.len())
        .max()
        .unwrap_or(0);
    for report in CATALOG {
        println!(
            "  {:<width$}  {} [{}]",
            report.name.bright_cyan(),
            report.title,
            report.chart,
            width = width
        );
    }
}
