//! Field coercion utilities for raw booking records
//!
//! This module provides helper functions for extracting typed values from raw
//! field mappings with per-field error reporting. Every failure names the row
//! and field so rejected records can be traced back to the input.

use crate::app::models::{RawRecord, RawValue};
use crate::constants::STATUS_DATE_FORMATS;
use crate::{Error, Result};
use chrono::{Month, NaiveDate};

/// Get a required field value, rejecting absent and missing values
pub fn get_required_field<'a>(
    record: &'a RawRecord,
    row: usize,
    field_name: &str,
) -> Result<&'a RawValue> {
    let value = record
        .get(field_name)
        .ok_or_else(|| Error::schema(row, field_name, "required field is absent"))?;

    if value.is_missing() {
        return Err(Error::schema(row, field_name, "required field has no value"));
    }

    Ok(value)
}

/// Get an optional field value; absent and missing values map to `None`
pub fn get_optional_field<'a>(record: &'a RawRecord, field_name: &str) -> Option<&'a RawValue> {
    record.get(field_name).filter(|value| !value.is_missing())
}

/// Coerce a raw value to an integer, accepting whole-valued floats
pub fn coerce_integer(value: &RawValue) -> Option<i64> {
    match value {
        RawValue::Integer(v) => Some(*v),
        RawValue::Float(v) => whole_float(*v),
        RawValue::Text(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(whole_float))
        }
        RawValue::Bool(_) | RawValue::Missing => None,
    }
}

fn whole_float(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

/// Coerce a raw value to a finite float
pub fn coerce_float(value: &RawValue) -> Option<f64> {
    let parsed = match value {
        RawValue::Integer(v) => Some(*v as f64),
        RawValue::Float(v) => Some(*v),
        RawValue::Text(s) => s.trim().parse::<f64>().ok(),
        RawValue::Bool(_) | RawValue::Missing => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Coerce a raw value to a boolean flag (0/1, true/false, yes/no)
pub fn coerce_bool(value: &RawValue) -> Option<bool> {
    match value {
        RawValue::Bool(v) => Some(*v),
        RawValue::Integer(0) => Some(false),
        RawValue::Integer(1) => Some(true),
        RawValue::Float(v) if *v == 0.0 => Some(false),
        RawValue::Float(v) if *v == 1.0 => Some(true),
        RawValue::Text(s) => match s.trim().to_lowercase().as_str() {
            "0" | "false" | "no" | "f" | "n" => Some(false),
            "1" | "true" | "yes" | "t" | "y" => Some(true),
            _ => None,
        },
        _ => None,
    }
}

/// Parse a required boolean flag
pub fn parse_required_bool(record: &RawRecord, row: usize, field_name: &str) -> Result<bool> {
    let value = get_required_field(record, row, field_name)?;
    coerce_bool(value).ok_or_else(|| {
        Error::schema(
            row,
            field_name,
            format!("invalid boolean '{}' (expected 0/1 or true/false)", value),
        )
    })
}

/// Parse a required non-negative integer that fits in u32
pub fn parse_required_count(record: &RawRecord, row: usize, field_name: &str) -> Result<u32> {
    let value = get_required_field(record, row, field_name)?;
    to_count(value, row, field_name)
}

/// Parse an optional non-negative integer; a present but invalid value is an error
pub fn parse_optional_count(
    record: &RawRecord,
    row: usize,
    field_name: &str,
) -> Result<Option<u32>> {
    get_optional_field(record, field_name)
        .map(|value| to_count(value, row, field_name))
        .transpose()
}

fn to_count(value: &RawValue, row: usize, field_name: &str) -> Result<u32> {
    let number = coerce_integer(value).ok_or_else(|| {
        Error::schema(row, field_name, format!("invalid integer '{}'", value))
    })?;

    u32::try_from(number).map_err(|_| {
        Error::schema(
            row,
            field_name,
            format!("expected a non-negative integer, got {}", number),
        )
    })
}

/// Parse a required signed integer that fits in i32
pub fn parse_required_i32(record: &RawRecord, row: usize, field_name: &str) -> Result<i32> {
    let value = get_required_field(record, row, field_name)?;
    let number = coerce_integer(value).ok_or_else(|| {
        Error::schema(row, field_name, format!("invalid integer '{}'", value))
    })?;

    i32::try_from(number)
        .map_err(|_| Error::schema(row, field_name, format!("integer {} out of range", number)))
}

/// Parse a required non-negative decimal
pub fn parse_required_non_negative_f64(
    record: &RawRecord,
    row: usize,
    field_name: &str,
) -> Result<f64> {
    let value = get_required_field(record, row, field_name)?;
    let number = coerce_float(value)
        .ok_or_else(|| Error::schema(row, field_name, format!("invalid decimal '{}'", value)))?;

    if number < 0.0 {
        return Err(Error::schema(
            row,
            field_name,
            format!("expected a non-negative decimal, got {}", number),
        ));
    }

    Ok(number)
}

/// Parse a required text field
pub fn parse_required_text(record: &RawRecord, row: usize, field_name: &str) -> Result<String> {
    let value = get_required_field(record, row, field_name)?;
    match value {
        RawValue::Text(s) => Ok(s.trim().to_string()),
        other => Ok(other.to_string()),
    }
}

/// Parse an optional text field
pub fn parse_optional_text(record: &RawRecord, field_name: &str) -> Option<String> {
    get_optional_field(record, field_name).map(|value| match value {
        RawValue::Text(s) => s.trim().to_string(),
        other => other.to_string(),
    })
}

/// Parse a required month given by English name, abbreviation or number
pub fn parse_required_month(record: &RawRecord, row: usize, field_name: &str) -> Result<Month> {
    let value = get_required_field(record, row, field_name)?;

    let by_number = coerce_integer(value)
        .and_then(|n| u8::try_from(n).ok())
        .and_then(|n| Month::try_from(n).ok());

    let month = match (by_number, value) {
        (Some(month), _) => Some(month),
        (None, RawValue::Text(s)) => s.trim().parse::<Month>().ok(),
        _ => None,
    };

    month.ok_or_else(|| Error::schema(row, field_name, format!("invalid month '{}'", value)))
}

/// Parse a required calendar date in any of the accepted formats
pub fn parse_required_date(record: &RawRecord, row: usize, field_name: &str) -> Result<NaiveDate> {
    let value = get_required_field(record, row, field_name)?;
    let text = match value {
        RawValue::Text(s) => s.trim(),
        other => {
            return Err(Error::schema(
                row,
                field_name,
                format!("expected a date string, got '{}'", other),
            ));
        }
    };

    // Tolerate a trailing time component, e.g. "2015-07-01 00:00:00"
    let date_part = text.split_whitespace().next().unwrap_or(text);

    STATUS_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
        .ok_or_else(|| {
            Error::schema(
                row,
                field_name,
                format!("invalid date '{}' (expected YYYY-MM-DD or M/D/YYYY)", text),
            )
        })
}
