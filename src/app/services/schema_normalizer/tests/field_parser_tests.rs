//! Tests for raw field coercion

use super::*;
use crate::app::services::schema_normalizer::field_parsers::{
    coerce_bool, coerce_float, coerce_integer, get_required_field, parse_optional_count,
    parse_required_count, parse_required_date, parse_required_month,
    parse_required_non_negative_f64,
};
use crate::Error;
use chrono::{Month, NaiveDate};

#[test]
fn test_coerce_integer_variants() {
    assert_eq!(coerce_integer(&RawValue::Integer(7)), Some(7));
    assert_eq!(coerce_integer(&RawValue::Float(2.0)), Some(2));
    assert_eq!(coerce_integer(&RawValue::Float(2.5)), None);
    assert_eq!(coerce_integer(&RawValue::Text("12".to_string())), Some(12));
    assert_eq!(coerce_integer(&RawValue::Text("3.0".to_string())), Some(3));
    assert_eq!(coerce_integer(&RawValue::Text("three".to_string())), None);
    assert_eq!(coerce_integer(&RawValue::Bool(true)), None);
}

#[test]
fn test_coerce_float_rejects_non_finite() {
    assert_eq!(coerce_float(&RawValue::Text("82.5".to_string())), Some(82.5));
    assert_eq!(coerce_float(&RawValue::Integer(3)), Some(3.0));
    assert_eq!(coerce_float(&RawValue::Float(f64::INFINITY)), None);
    assert_eq!(coerce_float(&RawValue::Text("inf".to_string())), None);
}

#[test]
fn test_coerce_bool_accepts_flags() {
    assert_eq!(coerce_bool(&RawValue::Integer(1)), Some(true));
    assert_eq!(coerce_bool(&RawValue::Integer(0)), Some(false));
    assert_eq!(coerce_bool(&RawValue::Text("TRUE".to_string())), Some(true));
    assert_eq!(coerce_bool(&RawValue::Float(0.0)), Some(false));
    assert_eq!(coerce_bool(&RawValue::Integer(2)), None);
    assert_eq!(coerce_bool(&RawValue::Text("maybe".to_string())), None);
}

#[test]
fn test_required_field_missing_and_absent() {
    let record = create_raw_record_with("children", RawValue::from_text("NA"));
    let err = get_required_field(&record, 4, "children").unwrap_err();
    assert!(matches!(err, Error::Schema { row: 4, ref field, .. } if field == "children"));

    let record = create_raw_record_without("adr");
    assert!(get_required_field(&record, 0, "adr").is_err());
}

#[test]
fn test_parse_required_count_rejects_negative() {
    let record = create_raw_record_with("lead_time", RawValue::Integer(-3));
    let err = parse_required_count(&record, 1, "lead_time").unwrap_err();
    assert!(err.to_string().contains("non-negative"));

    let record = create_raw_record_with("lead_time", RawValue::Text("soon".to_string()));
    assert!(parse_required_count(&record, 1, "lead_time").is_err());
}

#[test]
fn test_parse_optional_count() {
    let record = create_raw_record_without("stays_in_week_nights");
    assert_eq!(
        parse_optional_count(&record, 0, "stays_in_week_nights").unwrap(),
        None
    );

    let record = create_raw_record_with("stays_in_week_nights", RawValue::Text("x".to_string()));
    assert!(parse_optional_count(&record, 0, "stays_in_week_nights").is_err());
}

#[test]
fn test_parse_month_by_name_and_number() {
    let record = create_raw_record();
    assert_eq!(
        parse_required_month(&record, 0, "arrival_date_month").unwrap(),
        Month::July
    );

    let record = create_raw_record_with("arrival_date_month", RawValue::Integer(2));
    assert_eq!(
        parse_required_month(&record, 0, "arrival_date_month").unwrap(),
        Month::February
    );

    let record = create_raw_record_with("arrival_date_month", RawValue::Integer(13));
    assert!(parse_required_month(&record, 0, "arrival_date_month").is_err());

    let record =
        create_raw_record_with("arrival_date_month", RawValue::Text("Julember".to_string()));
    assert!(parse_required_month(&record, 0, "arrival_date_month").is_err());
}

#[test]
fn test_parse_date_formats() {
    let expected = NaiveDate::from_ymd_opt(2015, 7, 1).unwrap();

    for text in ["2015-07-01", "7/1/2015", "2015-07-01 00:00:00"] {
        let record =
            create_raw_record_with("reservation_status_date", RawValue::Text(text.to_string()));
        assert_eq!(
            parse_required_date(&record, 0, "reservation_status_date").unwrap(),
            expected,
            "format {}",
            text
        );
    }

    for text in ["2015-02-30", "01-07-2015"] {
        let record =
            create_raw_record_with("reservation_status_date", RawValue::Text(text.to_string()));
        assert!(
            parse_required_date(&record, 0, "reservation_status_date").is_err(),
            "format {}",
            text
        );
    }
}

#[test]
fn test_parse_adr_rejects_negative() {
    let record = create_raw_record_with("adr", RawValue::Float(-6.38));
    assert!(parse_required_non_negative_f64(&record, 0, "adr").is_err());

    let record = create_raw_record_with("adr", RawValue::Float(0.0));
    assert_eq!(parse_required_non_negative_f64(&record, 0, "adr").unwrap(), 0.0);
}
