//! Summary tables produced by grouped aggregation

use super::key::{GroupKey, KeyValue};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Aggregated value of a group
///
/// `Undefined` marks a group with no data (e.g. the rate of an empty group)
/// so that consumers never mistake it for a real 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Metric {
    Value(f64),
    Undefined,
}

impl Metric {
    pub fn value(&self) -> Option<f64> {
        match self {
            Metric::Value(v) => Some(*v),
            Metric::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Metric::Undefined)
    }

    /// Ratio of two counts; undefined when the denominator is zero
    pub fn ratio(numerator: usize, denominator: usize) -> Self {
        if denominator == 0 {
            Metric::Undefined
        } else {
            Metric::Value(numerator as f64 / denominator as f64)
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Value(v) => write!(f, "{:.4}", v),
            Metric::Undefined => f.write_str("no data"),
        }
    }
}

/// Kind of aggregation a table was built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationKind {
    Count,
    Rate,
    RowPercentage,
    Mean,
}

impl AggregationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AggregationKind::Count => "count",
            AggregationKind::Rate => "rate",
            AggregationKind::RowPercentage => "row_percentage",
            AggregationKind::Mean => "mean",
        }
    }
}

/// Ordering applied when a table is rendered as a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupOrdering {
    /// Domain order of the keys (months, weekdays, seasons, buckets)
    Natural,
    /// Largest groups first; ties in natural order
    DescendingCount,
    /// Largest aggregated value first; undefined values last
    DescendingValue,
}

/// Aggregate record of one group
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryRow {
    pub count: usize,
    pub value: Metric,
}

/// Mapping from grouping-key tuples to aggregate records
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    /// Names of the grouping keys, in tuple order
    pub key_names: Vec<String>,
    /// How the values were aggregated
    pub kind: AggregationKind,
    /// One row per group
    pub rows: BTreeMap<GroupKey, SummaryRow>,
    /// Records considered for grouping
    pub total_records: usize,
    /// Records left out because a key could not be extracted
    pub excluded: usize,
}

impl SummaryTable {
    pub fn new(key_names: Vec<String>, kind: AggregationKind) -> Self {
        Self {
            key_names,
            kind,
            rows: BTreeMap::new(),
            total_records: 0,
            excluded: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, key: &GroupKey) -> Option<&SummaryRow> {
        self.rows.get(key)
    }

    /// Look up a group of a single-key table by its display label
    pub fn get_by_label(&self, labels: &[&str]) -> Option<&SummaryRow> {
        self.rows
            .iter()
            .find(|(key, _)| {
                key.len() == labels.len()
                    && key
                        .values()
                        .iter()
                        .zip(labels)
                        .all(|(value, label)| value.label() == *label)
            })
            .map(|(_, row)| row)
    }

    /// Number of records that made it into a group
    pub fn grouped_records(&self) -> usize {
        self.total_records - self.excluded
    }

    /// Rows in the requested order
    pub fn ordered(&self, ordering: GroupOrdering) -> Vec<(&GroupKey, &SummaryRow)> {
        // BTreeMap iteration is natural order; stable sorts keep it for ties
        let mut rows: Vec<(&GroupKey, &SummaryRow)> = self.rows.iter().collect();

        match ordering {
            GroupOrdering::Natural => {}
            GroupOrdering::DescendingCount => {
                rows.sort_by(|a, b| b.1.count.cmp(&a.1.count));
            }
            GroupOrdering::DescendingValue => {
                rows.sort_by(|a, b| {
                    compare_metric_desc(&a.1.value, &b.1.value)
                        .then_with(|| b.1.count.cmp(&a.1.count))
                });
            }
        }

        rows
    }

    /// A new table keeping only groups with at least `min_count` records
    pub fn with_min_count(&self, min_count: usize) -> SummaryTable {
        SummaryTable {
            rows: self
                .rows
                .iter()
                .filter(|(_, row)| row.count >= min_count)
                .map(|(key, row)| (key.clone(), *row))
                .collect(),
            ..self.clone()
        }
    }

    /// A new table keeping the first `n` groups in the given order
    pub fn top(&self, n: usize, ordering: GroupOrdering) -> SummaryTable {
        let kept: BTreeMap<GroupKey, SummaryRow> = self
            .ordered(ordering)
            .into_iter()
            .take(n)
            .map(|(key, row)| (key.clone(), *row))
            .collect();

        SummaryTable {
            rows: kept,
            ..self.clone()
        }
    }

    /// Sum of values per first-key group, used to check row percentages
    pub fn value_totals_by_first_key(&self) -> BTreeMap<KeyValue, f64> {
        let mut totals = BTreeMap::new();
        for (key, row) in &self.rows {
            if let (Some(first), Some(value)) = (key.first(), row.value.value()) {
                *totals.entry(first.clone()).or_insert(0.0) += value;
            }
        }
        totals
    }
}

fn compare_metric_desc(a: &Metric, b: &Metric) -> Ordering {
    match (a.value(), b.value()) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
