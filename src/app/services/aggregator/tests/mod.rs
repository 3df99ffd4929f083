//! Tests for grouped aggregation

pub mod aggregate_tests;
pub mod summary_tests;

use crate::app::models::{AnalyzedBooking, DateBasis};
use crate::app::services::aggregator::{GroupingKey, KeyValue};

/// Group by customer type
pub fn customer_type_key<'a>() -> GroupingKey<'a, AnalyzedBooking> {
    GroupingKey::total("customer_type", |b: &AnalyzedBooking| {
        KeyValue::category(&b.booking.customer_type)
    })
}

/// Group by cancellation flag
pub fn canceled_key<'a>() -> GroupingKey<'a, AnalyzedBooking> {
    GroupingKey::total("is_canceled", |b: &AnalyzedBooking| {
        KeyValue::Flag(b.booking.is_canceled)
    })
}

/// Group by arrival weekday; undefined for invalid arrival dates
pub fn arrival_weekday_key<'a>() -> GroupingKey<'a, AnalyzedBooking> {
    GroupingKey::new("weekday", |b: &AnalyzedBooking| {
        b.weekday(DateBasis::Arrival).map(KeyValue::weekday)
    })
}
