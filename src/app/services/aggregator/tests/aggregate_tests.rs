//! Tests for grouped aggregation modes

use super::*;
use crate::app::models::{CategoricalField, Category, CustomerType, DepositType};
use crate::app::services::aggregator::{
    Aggregation, AggregationKind, GroupKey, GroupedAggregator, Metric, aggregate, cartesian,
};
use crate::app::services::derived_fields::tests::{
    analyze, create_customer_bookings, create_test_booking,
};
use crate::constants::PERCENTAGE_TOLERANCE;
use chrono::Month;

fn customer_key_value(customer_type: CustomerType) -> KeyValue {
    KeyValue::category(&Category::Known(customer_type))
}

fn transient_and_group() -> Vec<AnalyzedBooking> {
    let mut bookings = create_customer_bookings(CustomerType::Transient, 100, 41, 0);
    bookings.extend(create_customer_bookings(CustomerType::Group, 20, 4, 100));
    analyze(bookings)
}

#[test]
fn test_cancellation_rate_by_customer_type() {
    let records = transient_and_group();
    let table = aggregate(
        &records,
        vec![customer_type_key()],
        &Aggregation::rate(|b: &AnalyzedBooking| b.booking.is_canceled),
    )
    .unwrap();

    assert_eq!(table.kind, AggregationKind::Rate);
    assert_eq!(table.len(), 2);

    let transient = table
        .get(&GroupKey::single(customer_key_value(CustomerType::Transient)))
        .unwrap();
    assert_eq!(transient.count, 100);
    assert!((transient.value.value().unwrap() - 0.41).abs() < 1e-12);

    let group = table.get_by_label(&["Group"]).unwrap();
    assert_eq!(group.count, 20);
    assert!((group.value.value().unwrap() - 0.20).abs() < 1e-12);
}

#[test]
fn test_empty_input_yields_empty_table() {
    let records: Vec<AnalyzedBooking> = Vec::new();

    for aggregation in [
        Aggregation::Count,
        Aggregation::rate(|b: &AnalyzedBooking| b.booking.is_canceled),
        Aggregation::mean(|b: &AnalyzedBooking| Some(b.booking.adr)),
    ] {
        let table = aggregate(&records, vec![customer_type_key()], &aggregation).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.total_records, 0);
    }

    let table = aggregate(
        &records,
        vec![customer_type_key(), canceled_key()],
        &Aggregation::RowPercentage,
    )
    .unwrap();
    assert!(table.is_empty());
}

#[test]
fn test_empty_requested_group_rate_is_undefined() {
    let records = transient_and_group();
    let domain = customer_type_domain();

    let table = GroupedAggregator::new()
        .by(customer_type_key())
        .expect_groups(domain.into_iter().map(GroupKey::single))
        .aggregate(
            &records,
            &Aggregation::rate(|b: &AnalyzedBooking| b.booking.is_canceled),
        )
        .unwrap();

    assert_eq!(table.len(), 4);
    let contract = table.get_by_label(&["Contract"]).unwrap();
    assert_eq!(contract.count, 0);
    assert_eq!(contract.value, Metric::Undefined);
    assert!(contract.value.value().is_none());
}

#[test]
fn test_row_percentages_sum_to_one_hundred() {
    let records = transient_and_group();
    let table = aggregate(
        &records,
        vec![customer_type_key(), canceled_key()],
        &Aggregation::RowPercentage,
    )
    .unwrap();

    assert_eq!(table.len(), 4);
    let canceled_transient = table.get_by_label(&["Transient", "true"]).unwrap();
    assert_eq!(canceled_transient.count, 41);
    assert!((canceled_transient.value.value().unwrap() - 41.0).abs() < 1e-9);

    let kept_group = table.get_by_label(&["Group", "false"]).unwrap();
    assert!((kept_group.value.value().unwrap() - 80.0).abs() < 1e-9);

    for (first, total) in table.value_totals_by_first_key() {
        assert!(
            (total - 100.0).abs() <= PERCENTAGE_TOLERANCE,
            "{} sums to {}",
            first,
            total
        );
    }
}

#[test]
fn test_row_percentage_with_uneven_groups() {
    let mut bookings = Vec::new();
    for (i, deposit) in [
        DepositType::NoDeposit,
        DepositType::NoDeposit,
        DepositType::NoDeposit,
        DepositType::NonRefund,
        DepositType::Refundable,
        DepositType::Refundable,
        DepositType::Refundable,
    ]
    .into_iter()
    .enumerate()
    {
        let mut booking = create_test_booking(i);
        booking.deposit_type = Category::Known(deposit);
        booking.is_canceled = i % 3 == 0;
        bookings.push(booking);
    }
    let records = analyze(bookings);

    let table = aggregate(
        &records,
        vec![
            GroupingKey::total("deposit_type", |b: &AnalyzedBooking| {
                KeyValue::category(&b.booking.deposit_type)
            }),
            canceled_key(),
        ],
        &Aggregation::RowPercentage,
    )
    .unwrap();

    for (_, total) in table.value_totals_by_first_key() {
        assert!((total - 100.0).abs() <= PERCENTAGE_TOLERANCE);
    }
}

#[test]
fn test_row_percentage_requires_two_keys() {
    let records = transient_and_group();
    let result = aggregate(&records, vec![customer_type_key()], &Aggregation::RowPercentage);
    assert!(result.is_err());
}

#[test]
fn test_aggregation_requires_a_key() {
    let records = transient_and_group();
    assert!(aggregate(&records, Vec::new(), &Aggregation::Count).is_err());
}

#[test]
fn test_expected_group_arity_is_checked() {
    let records = transient_and_group();
    let result = GroupedAggregator::new()
        .by(customer_type_key())
        .expect_groups(cartesian(&[
            vec![KeyValue::text("a")],
            vec![KeyValue::Flag(true)],
        ]))
        .aggregate(&records, &Aggregation::Count);
    assert!(result.is_err());
}

#[test]
fn test_invalid_arrival_date_only_excluded_from_date_groupings() {
    let mut invalid = create_test_booking(0);
    invalid.arrival_date_month = Month::February;
    invalid.arrival_date_day_of_month = 31;
    let records = analyze(vec![invalid, create_test_booking(1)]);

    let by_customer = aggregate(&records, vec![customer_type_key()], &Aggregation::Count).unwrap();
    let transient = by_customer.get_by_label(&["Transient"]).unwrap();
    assert_eq!(transient.count, 2);
    assert_eq!(by_customer.excluded, 0);

    let by_weekday = aggregate(&records, vec![arrival_weekday_key()], &Aggregation::Count).unwrap();
    assert_eq!(by_weekday.excluded, 1);
    assert_eq!(by_weekday.grouped_records(), 1);
}

#[test]
fn test_count_values() {
    let records = transient_and_group();
    let table = aggregate(&records, vec![customer_type_key()], &Aggregation::Count).unwrap();

    let transient = table.get_by_label(&["Transient"]).unwrap();
    assert_eq!(transient.value, Metric::Value(100.0));
}

#[test]
fn test_mean_aggregation() {
    let mut bookings = create_customer_bookings(CustomerType::Transient, 3, 0, 0);
    bookings[0].adr = 50.0;
    bookings[1].adr = 100.0;
    bookings[2].adr = 150.0;
    let records = analyze(bookings);

    let table = aggregate(
        &records,
        vec![customer_type_key()],
        &Aggregation::mean(|b: &AnalyzedBooking| Some(b.booking.adr)),
    )
    .unwrap();
    let row = table.get_by_label(&["Transient"]).unwrap();
    assert_eq!(row.value, Metric::Value(100.0));

    let table = aggregate(
        &records,
        vec![customer_type_key()],
        &Aggregation::mean(|_: &AnalyzedBooking| None),
    )
    .unwrap();
    assert_eq!(table.get_by_label(&["Transient"]).unwrap().value, Metric::Undefined);
}

#[test]
fn test_unrecognized_categories_form_their_own_group() {
    let mut bookings = create_customer_bookings(CustomerType::Transient, 2, 0, 0);
    bookings[1].customer_type = Category::Unrecognized("Wholesale".to_string());
    let records = analyze(bookings);

    let table = aggregate(&records, vec![customer_type_key()], &Aggregation::Count).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.get_by_label(&["Wholesale"]).unwrap().count, 1);
}

/// Known customer-type keys in natural order
fn customer_type_domain() -> Vec<KeyValue> {
    CustomerType::ALL
        .iter()
        .map(|c| customer_key_value(*c))
        .collect()
}
