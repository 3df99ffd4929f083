//! Integration tests for the complete booking pipeline
//!
//! These tests write a small booking export with realistic dirty rows, then
//! run it through loading, normalization, derivation, reporting and export.

use booking_insights::app::services::aggregator::Metric;
use booking_insights::app::services::csv_loader::load_records;
use booking_insights::app::services::reports::{
    CATALOG, PreparedBookings, ReportRunner, find_report, prepare_bookings,
};
use booking_insights::app::services::summary_export::{ExportManifest, SummaryExporter};
use booking_insights::config::{AnalysisConfig, ExportFormat};
use std::path::PathBuf;
use tempfile::TempDir;

const HEADER: &str = "hotel,is_canceled,lead_time,arrival_date_year,arrival_date_month,\
arrival_date_week_number,arrival_date_day_of_month,stays_in_weekend_nights,stays_in_week_nights,\
adults,children,meal,country,market_segment,distribution_channel,deposit_type,customer_type,adr,\
required_car_parking_spaces,total_of_special_requests,reservation_status,reservation_status_date";

const ROWS: &[&str] = &[
    "Resort Hotel,0,342,2015,July,27,1,0,0,2,0,BB,PRT,Direct,Direct,No Deposit,Transient,0,0,0,Check-Out,2015-07-01",
    "Resort Hotel,1,85,2015,July,27,1,0,3,2,0,BB,PRT,Online TA,TA/TO,No Deposit,Transient,82,0,1,Canceled,2015-05-06",
    "City Hotel,1,60,2016,August,32,10,1,2,2,0,BB,GBR,Groups,TA/TO,Non Refund,Transient,95.5,0,0,Canceled,2016-06-11",
    // Children not recorded
    "City Hotel,1,30,2016,August,32,10,0,2,1,NA,BB,NULL,Groups,TA/TO,Non Refund,Transient-Party,95.5,0,0,Canceled,2016-07-11",
    // 31 February
    "City Hotel,0,5,2016,February,9,31,0,1,1,0,BB,FRA,Corporate,Corporate,No Deposit,Contract,70,1,2,Check-Out,2016-03-01",
    "City Hotel,0,14,2016,March,10,5,2,0,2,2,BB,NULL,Aviation,Corporate,No Deposit,Group,110,1,0,Check-Out,2016-03-07",
    "City Hotel,1,200,2017,January,2,5,0,2,2,0,HB,ESP,Offline TA/TO,TA/TO,No Deposit,Wholesale,60,0,0,Canceled,12/20/2016",
    "Motel,0,1,2016,May,20,10,0,1,1,0,BB,PRT,Direct,Direct,No Deposit,Transient,50,0,0,Check-Out,2016-05-11",
    "Resort Hotel,0,10,2016,May,20,10,0,1,1,0,BB,PRT,Direct,Direct,No Deposit,Transient,-5,0,0,Check-Out,2016-05-11",
    "City Hotel,1",
];

/// Write the sample export and return its path
fn write_sample_export(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("hotel_bookings.csv");
    let mut content = String::from(HEADER);
    for row in ROWS {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');
    std::fs::write(&path, content).unwrap();
    path
}

fn prepare(dir: &TempDir, config: &AnalysisConfig) -> PreparedBookings {
    let loaded = load_records(&write_sample_export(dir), b',').unwrap();
    assert_eq!(loaded.records.len(), ROWS.len());
    prepare_bookings(&loaded.records, config)
}

fn rate(value: Metric) -> f64 {
    value.value().expect("defined rate")
}

#[test]
fn test_dirty_rows_are_counted_not_fatal() {
    let dir = TempDir::new().unwrap();
    let prepared = prepare(&dir, &AnalysisConfig::default());

    assert_eq!(prepared.normalization.total_records, 10);
    assert_eq!(prepared.normalization.rejected, 4);
    assert_eq!(prepared.len(), 6);
    assert_eq!(prepared.normalization.flagged_records, 1);
    assert_eq!(
        prepared
            .normalization
            .unrecognized_values
            .get("customer_type=Wholesale"),
        Some(&1)
    );
    assert_eq!(prepared.derivation.date_composition_failures, 1);

    let rows: Vec<usize> = prepared.bookings.iter().map(|b| b.booking.row).collect();
    assert_eq!(rows, vec![0, 1, 2, 4, 5, 6]);
}

#[test]
fn test_cancellation_rates_over_the_export() {
    let dir = TempDir::new().unwrap();
    let config = AnalysisConfig::default();
    let prepared = prepare(&dir, &config);
    let runner = ReportRunner::from_config(&config).unwrap();

    let by_hotel = runner
        .run(&prepared.bookings, find_report("cancellation_by_hotel").unwrap())
        .unwrap();
    assert_eq!(rate(by_hotel.table.get_by_label(&["Resort Hotel"]).unwrap().value), 0.5);
    assert_eq!(rate(by_hotel.table.get_by_label(&["City Hotel"]).unwrap().value), 0.5);

    let by_deposit = runner
        .run(&prepared.bookings, find_report("cancellation_by_deposit_type").unwrap())
        .unwrap();
    assert_eq!(rate(by_deposit.table.get_by_label(&["Non Refund"]).unwrap().value), 1.0);
    assert_eq!(rate(by_deposit.table.get_by_label(&["No Deposit"]).unwrap().value), 0.4);
    assert_eq!(
        by_deposit.table.get_by_label(&["Refundable"]).unwrap().value,
        Metric::Undefined
    );

    let by_customer = runner
        .run(&prepared.bookings, find_report("cancellation_by_customer_type").unwrap())
        .unwrap();
    assert_eq!(by_customer.table.get_by_label(&["Wholesale"]).unwrap().count, 1);
    assert_eq!(
        by_customer.table.get_by_label(&["Transient-Party"]).unwrap().value,
        Metric::Undefined
    );

    // The 31 February booking still counts by customer type
    assert_eq!(by_customer.table.get_by_label(&["Contract"]).unwrap().count, 1);
    let by_weekday = runner
        .run(&prepared.bookings, find_report("cancellation_by_weekday").unwrap())
        .unwrap();
    assert_eq!(by_weekday.table.excluded, 1);
}

#[test]
fn test_cancellation_lead_time_distribution() {
    let dir = TempDir::new().unwrap();
    let config = AnalysisConfig::default();
    let prepared = prepare(&dir, &config);

    let report = ReportRunner::from_config(&config)
        .unwrap()
        .run(&prepared.bookings, find_report("cancellation_lead_time").unwrap())
        .unwrap();

    assert_eq!(report.filtered_out, 3);
    assert_eq!(report.table.get_by_label(&["30-89 days"]).unwrap().count, 2);
    assert_eq!(report.table.get_by_label(&["7-29 days"]).unwrap().count, 1);
}

#[test]
fn test_year_filter_and_country_ranking() {
    let dir = TempDir::new().unwrap();
    let config = AnalysisConfig {
        top_countries: 3,
        min_country_bookings: 1,
        ..AnalysisConfig::default()
    };
    let prepared = prepare(&dir, &config);
    let runner = ReportRunner::from_config(&config).unwrap();

    let countries = runner
        .run(&prepared.bookings, find_report("cancellation_by_country").unwrap())
        .unwrap();
    let labels: Vec<String> = countries
        .rows()
        .iter()
        .map(|(key, _)| key.to_string())
        .collect();
    assert_eq!(labels, vec!["ESP", "GBR", "PRT"]);

    let filtered = ReportRunner::from_config(&AnalysisConfig {
        year: Some(2016),
        ..config
    })
    .unwrap()
    .run(&prepared.bookings, find_report("cancellation_by_hotel").unwrap())
    .unwrap();
    assert_eq!(filtered.filtered_out, 3);
    assert_eq!(filtered.table.get_by_label(&["City Hotel"]).unwrap().count, 3);
}

#[test]
fn test_export_every_report() {
    let dir = TempDir::new().unwrap();
    let config = AnalysisConfig::default();
    let prepared = prepare(&dir, &config);
    let reports = ReportRunner::from_config(&config)
        .unwrap()
        .run_named(&prepared.bookings, &[])
        .unwrap();

    let output_dir = dir.path().join("charts");
    let result = SummaryExporter::new(&output_dir, ExportFormat::Csv)
        .with_source(Some(dir.path().join("hotel_bookings.csv")))
        .export(&reports, None)
        .unwrap();

    assert_eq!(result.files.len(), CATALOG.len());
    assert!(result.files.iter().all(|file| file.exists()));

    let manifest = ExportManifest::read_from(&result.manifest_path).unwrap();
    assert_eq!(manifest.reports.len(), CATALOG.len());
    for entry in &manifest.reports {
        assert!(output_dir.join(&entry.file).exists(), "{}", entry.file);
    }

    let hotel_csv = std::fs::read_to_string(output_dir.join("cancellation_by_hotel.csv")).unwrap();
    assert_eq!(hotel_csv.lines().next(), Some("hotel,count,value"));
    assert_eq!(hotel_csv.lines().count(), 3);
}

#[test]
fn test_semicolon_delimited_export() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bookings.csv");
    let content = format!(
        "{}\n{}\n",
        HEADER.replace(',', ";"),
        ROWS[2].replace(',', ";")
    );
    std::fs::write(&path, content).unwrap();

    let loaded = load_records(&path, b';').unwrap();
    let prepared = prepare_bookings(&loaded.records, &AnalysisConfig::default());
    assert_eq!(prepared.len(), 1);
    assert_eq!(prepared.bookings[0].booking.adr, 95.5);
}
