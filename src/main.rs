use anyhow::Context;
use booking_insights::cli::{args::Args, commands};
use clap::Parser;
use std::process;

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args).context("booking analysis failed") {
        Ok(_summary) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Booking Insights - Hotel Booking Cancellation Analytics");
    println!("=======================================================");
    println!();
    println!("Summarize booking cancellations against demographic, temporal and");
    println!("commercial attributes of a hotel booking export.");
    println!();
    println!("USAGE:");
    println!("    booking-insights <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    analyze     Run reports and print their summary tables");
    println!("    validate    Check an export and report rejected or flagged records");
    println!("    export      Write summary tables as CSV or Parquet with a manifest");
    println!("    reports     List the available reports");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Print every report for an export:");
    println!("    booking-insights analyze --input hotel_bookings.csv");
    println!();
    println!("    # Monthly cancellation by reservation status date, 2016 only:");
    println!("    booking-insights analyze -i hotel_bookings.csv --date-basis reservation_status \\");
    println!("                             --year 2016 --reports cancellation_by_month");
    println!();
    println!("    # Export all tables as Parquet for chart rendering:");
    println!("    booking-insights export -i hotel_bookings.csv --output charts --format parquet");
    println!();
    println!("For detailed help on any command, use:");
    println!("    booking-insights <COMMAND> --help");
}
