//! Tests for schema normalization
//!
//! This module provides unit tests for field coercion, record normalization
//! and normalization statistics.

pub mod field_parser_tests;

// Test helper functions and fixtures
use crate::app::models::{RawRecord, RawValue};

/// Create a raw record that normalizes cleanly, as a CSV loader would produce it
pub fn create_raw_record() -> RawRecord {
    [
        ("hotel", "Resort Hotel"),
        ("is_canceled", "1"),
        ("lead_time", "85"),
        ("arrival_date_year", "2015"),
        ("arrival_date_month", "July"),
        ("arrival_date_week_number", "27"),
        ("arrival_date_day_of_month", "1"),
        ("stays_in_weekend_nights", "0"),
        ("stays_in_week_nights", "3"),
        ("adults", "2"),
        ("children", "0"),
        ("babies", "0"),
        ("meal", "BB"),
        ("country", "PRT"),
        ("market_segment", "Online TA"),
        ("distribution_channel", "TA/TO"),
        ("deposit_type", "No Deposit"),
        ("customer_type", "Transient"),
        ("adr", "82.0"),
        ("required_car_parking_spaces", "0"),
        ("total_of_special_requests", "1"),
        ("reservation_status", "Canceled"),
        ("reservation_status_date", "2015-05-06"),
    ]
    .into_iter()
    .map(|(field, value)| (field.to_string(), RawValue::from_text(value)))
    .collect()
}

/// Create a raw record with one field overridden
pub fn create_raw_record_with(field: &str, value: RawValue) -> RawRecord {
    let mut record = create_raw_record();
    record.insert(field.to_string(), value);
    record
}

/// Create a raw record with one field removed
pub fn create_raw_record_without(field: &str) -> RawRecord {
    let mut record = create_raw_record();
    record.remove(field);
    record
}
