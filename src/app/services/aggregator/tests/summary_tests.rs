//! Tests for summary table ordering and filtering

use crate::app::services::aggregator::{
    AggregationKind, GroupKey, GroupOrdering, KeyValue, Metric, SummaryRow, SummaryTable,
};

fn month_table() -> SummaryTable {
    let mut table = SummaryTable::new(vec!["month".to_string()], AggregationKind::Rate);
    for (month, count, rate) in [
        (3u32, 50usize, Some(0.30)),
        (1, 10, Some(0.50)),
        (8, 90, Some(0.40)),
        (12, 50, None),
    ] {
        table.rows.insert(
            GroupKey::single(KeyValue::month(month)),
            SummaryRow {
                count,
                value: rate.map(Metric::Value).unwrap_or(Metric::Undefined),
            },
        );
    }
    table.total_records = 200;
    table
}

fn labels(rows: &[(&GroupKey, &SummaryRow)]) -> Vec<String> {
    rows.iter().map(|(key, _)| key.to_string()).collect()
}

#[test]
fn test_natural_order_follows_domain() {
    let table = month_table();
    let ordered = table.ordered(GroupOrdering::Natural);
    assert_eq!(
        labels(&ordered),
        vec!["January", "March", "August", "December"]
    );
}

#[test]
fn test_descending_count_breaks_ties_naturally() {
    let table = month_table();
    let ordered = table.ordered(GroupOrdering::DescendingCount);
    assert_eq!(
        labels(&ordered),
        vec!["August", "March", "December", "January"]
    );
}

#[test]
fn test_descending_value_puts_undefined_last() {
    let table = month_table();
    let ordered = table.ordered(GroupOrdering::DescendingValue);
    assert_eq!(
        labels(&ordered),
        vec!["January", "August", "March", "December"]
    );
}

#[test]
fn test_top_and_min_count_return_new_tables() {
    let table = month_table();

    let top = table.top(2, GroupOrdering::DescendingCount);
    assert_eq!(top.len(), 2);
    assert!(top.get(&GroupKey::single(KeyValue::month(8))).is_some());
    assert_eq!(table.len(), 4);

    let frequent = table.with_min_count(50);
    assert_eq!(frequent.len(), 3);
    assert!(frequent.get(&GroupKey::single(KeyValue::month(1))).is_none());
}

#[test]
fn test_metric_ratio() {
    assert_eq!(Metric::ratio(1, 4), Metric::Value(0.25));
    assert_eq!(Metric::ratio(0, 0), Metric::Undefined);
    assert_eq!(Metric::Undefined.to_string(), "no data");
}

#[test]
fn test_key_value_ordering() {
    let mut keys = vec![
        KeyValue::ordinal(u32::MAX, "unclassified"),
        KeyValue::ordinal(1, "7-29 days"),
        KeyValue::ordinal(0, "0-6 days"),
    ];
    keys.sort();
    let labels: Vec<String> = keys.iter().map(KeyValue::label).collect();
    assert_eq!(labels, vec!["0-6 days", "7-29 days", "unclassified"]);
}
