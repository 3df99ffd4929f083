//! Grouped aggregation over record collections

use super::key::{GroupKey, GroupingKey, KeyValue};
use super::summary::{AggregationKind, Metric, SummaryRow, SummaryTable};
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// What to compute for each group
pub enum Aggregation<'a, T> {
    /// Number of records per group
    Count,
    /// Fraction of records in the group for which the predicate holds
    Rate(Box<dyn Fn(&T) -> bool + 'a>),
    /// Share of each second-key value within its first-key group, in percent
    RowPercentage,
    /// Mean of a numeric value over the group's records that have one
    Mean(Box<dyn Fn(&T) -> Option<f64> + 'a>),
}

impl<'a, T> Aggregation<'a, T> {
    pub fn rate(predicate: impl Fn(&T) -> bool + 'a) -> Self {
        Aggregation::Rate(Box::new(predicate))
    }

    pub fn mean(value: impl Fn(&T) -> Option<f64> + 'a) -> Self {
        Aggregation::Mean(Box::new(value))
    }

    pub fn kind(&self) -> AggregationKind {
        match self {
            Aggregation::Count => AggregationKind::Count,
            Aggregation::Rate(_) => AggregationKind::Rate,
            Aggregation::RowPercentage => AggregationKind::RowPercentage,
            Aggregation::Mean(_) => AggregationKind::Mean,
        }
    }
}

impl<T> fmt::Debug for Aggregation<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind().as_str())
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    count: usize,
    hits: usize,
    sum: f64,
    samples: usize,
}

/// Groups records by one or more keys and aggregates each group
#[derive(Debug)]
pub struct GroupedAggregator<'a, T> {
    keys: Vec<GroupingKey<'a, T>>,
    expected: Vec<GroupKey>,
}

impl<'a, T> GroupedAggregator<'a, T> {
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            expected: Vec::new(),
        }
    }

    /// Add a grouping key; keys form the tuple in the order they are added
    pub fn by(mut self, key: GroupingKey<'a, T>) -> Self {
        self.keys.push(key);
        self
    }

    /// Request groups that must appear in the output even with no records
    pub fn expect_groups(mut self, groups: impl IntoIterator<Item = GroupKey>) -> Self {
        self.expected.extend(groups);
        self
    }

    pub fn key_names(&self) -> Vec<String> {
        self.keys.iter().map(|key| key.name().to_string()).collect()
    }

    /// Aggregate the records into a summary table
    ///
    /// Fails only on invalid configuration: no keys, expected groups of the
    /// wrong arity, or a row percentage not grouped by exactly two keys. An
    /// empty input yields an empty table (plus any expected groups).
    pub fn aggregate(&self, records: &[T], aggregation: &Aggregation<'_, T>) -> Result<SummaryTable> {
        self.validate(aggregation)?;

        let mut groups: BTreeMap<GroupKey, Accumulator> = BTreeMap::new();
        let mut excluded = 0usize;

        for record in records {
            let Some(key) = self.extract_key(record) else {
                excluded += 1;
                continue;
            };

            let acc = groups.entry(key).or_default();
            acc.count += 1;
            match aggregation {
                Aggregation::Rate(predicate) => {
                    if predicate(record) {
                        acc.hits += 1;
                    }
                }
                Aggregation::Mean(value) => {
                    if let Some(v) = value(record).filter(|v| v.is_finite()) {
                        acc.sum += v;
                        acc.samples += 1;
                    }
                }
                Aggregation::Count | Aggregation::RowPercentage => {}
            }
        }

        for key in &self.expected {
            groups.entry(key.clone()).or_default();
        }

        let first_key_totals = match aggregation {
            Aggregation::RowPercentage => first_key_totals(&groups),
            _ => BTreeMap::new(),
        };

        let mut table = SummaryTable::new(self.key_names(), aggregation.kind());
        table.total_records = records.len();
        table.excluded = excluded;

        for (key, acc) in groups {
            let value = match aggregation {
                Aggregation::Count => Metric::Value(acc.count as f64),
                Aggregation::Rate(_) => Metric::ratio(acc.hits, acc.count),
                Aggregation::Mean(_) => {
                    if acc.samples == 0 {
                        Metric::Undefined
                    } else {
                        Metric::Value(acc.sum / acc.samples as f64)
                    }
                }
                Aggregation::RowPercentage => {
                    let total = key
                        .first()
                        .and_then(|first| first_key_totals.get(first))
                        .copied()
                        .unwrap_or(0);
                    match Metric::ratio(acc.count, total) {
                        Metric::Value(share) => Metric::Value(share * 100.0),
                        Metric::Undefined => Metric::Undefined,
                    }
                }
            };

            table.rows.insert(
                key,
                SummaryRow {
                    count: acc.count,
                    value,
                },
            );
        }

        debug!(
            "Aggregated {} records into {} groups by [{}] ({}, {} excluded)",
            records.len(),
            table.len(),
            table.key_names.join(", "),
            aggregation.kind().as_str(),
            excluded
        );

        Ok(table)
    }

    fn validate(&self, aggregation: &Aggregation<'_, T>) -> Result<()> {
        if self.keys.is_empty() {
            return Err(Error::configuration(
                "Grouped aggregation needs at least one grouping key",
            ));
        }

        if matches!(aggregation, Aggregation::RowPercentage) && self.keys.len() != 2 {
            return Err(Error::configuration(format!(
                "Row percentage needs exactly two grouping keys, got {}",
                self.keys.len()
            )));
        }

        if let Some(bad) = self.expected.iter().find(|key| key.len() != self.keys.len()) {
            return Err(Error::configuration(format!(
                "Expected group '{}' has {} components but there are {} grouping keys",
                bad,
                bad.len(),
                self.keys.len()
            )));
        }

        Ok(())
    }

    fn extract_key(&self, record: &T) -> Option<GroupKey> {
        self.keys
            .iter()
            .map(|key| key.extract(record))
            .collect::<Option<Vec<KeyValue>>>()
            .map(GroupKey::new)
    }
}

impl<T> Default for GroupedAggregator<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

fn first_key_totals(groups: &BTreeMap<GroupKey, Accumulator>) -> BTreeMap<KeyValue, usize> {
    let mut totals = BTreeMap::new();
    for (key, acc) in groups {
        if let Some(first) = key.first() {
            *totals.entry(first.clone()).or_insert(0) += acc.count;
        }
    }
    totals
}

/// Aggregate records with a single call
pub fn aggregate<'a, T>(
    records: &[T],
    keys: Vec<GroupingKey<'a, T>>,
    aggregation: &Aggregation<'_, T>,
) -> Result<SummaryTable> {
    keys.into_iter()
        .fold(GroupedAggregator::new(), GroupedAggregator::by)
        .aggregate(records, aggregation)
}
