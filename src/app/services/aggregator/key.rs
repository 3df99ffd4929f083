//! Grouping keys and key extractors
//!
//! A [`KeyValue`] carries enough information to sort groups in their natural
//! domain order: ordinal keys (months, weekdays, seasons, buckets, enum values)
//! sort by rank, free text alphabetically, integers numerically.

use crate::app::models::{CategoricalField, Category, Season, weekday_name};
use crate::app::services::binning::Bin;
use chrono::{Month, Weekday};
use serde::Serialize;
use std::fmt;

/// One component of a grouping key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum KeyValue {
    Flag(bool),
    Integer(i64),
    Ordinal { rank: u32, label: String },
    Text(String),
}

impl KeyValue {
    pub fn ordinal(rank: u32, label: impl Into<String>) -> Self {
        KeyValue::Ordinal {
            rank,
            label: label.into(),
        }
    }

    pub fn text(label: impl Into<String>) -> Self {
        KeyValue::Text(label.into())
    }

    /// Key for a categorical value, ranked in declaration order
    pub fn category<T: CategoricalField>(category: &Category<T>) -> Self {
        KeyValue::ordinal(category.rank(), category.label())
    }

    /// Key for a month number (1..=12), labeled with the English month name
    pub fn month(month: u32) -> Self {
        let label = u8::try_from(month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name().to_string())
            .unwrap_or_else(|| month.to_string());
        KeyValue::ordinal(month, label)
    }

    /// Key for an ISO weekday, Monday first
    pub fn weekday(weekday: Weekday) -> Self {
        KeyValue::ordinal(weekday.num_days_from_monday(), weekday_name(weekday))
    }

    pub fn season(season: Season) -> Self {
        KeyValue::ordinal(season.rank(), season.label())
    }

    /// Key for a bucket assignment; the out-of-range bucket sorts last
    pub fn bin(bin: Bin<'_>) -> Self {
        KeyValue::ordinal(bin.rank(), bin.label())
    }

    /// Display label of the key value
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Flag(v) => write!(f, "{}", v),
            KeyValue::Integer(v) => write!(f, "{}", v),
            KeyValue::Ordinal { label, .. } => f.write_str(label),
            KeyValue::Text(label) => f.write_str(label),
        }
    }
}

impl From<bool> for KeyValue {
    fn from(value: bool) -> Self {
        KeyValue::Flag(value)
    }
}

impl From<i64> for KeyValue {
    fn from(value: i64) -> Self {
        KeyValue::Integer(value)
    }
}

impl From<&str> for KeyValue {
    fn from(value: &str) -> Self {
        KeyValue::Text(value.to_string())
    }
}

/// A tuple of key values identifying one group
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GroupKey(pub Vec<KeyValue>);

impl GroupKey {
    pub fn new(values: Vec<KeyValue>) -> Self {
        Self(values)
    }

    pub fn single(value: KeyValue) -> Self {
        Self(vec![value])
    }

    pub fn values(&self) -> &[KeyValue] {
        &self.0
    }

    pub fn first(&self) -> Option<&KeyValue> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Display labels of each component
    pub fn labels(&self) -> Vec<String> {
        self.0.iter().map(KeyValue::label).collect()
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.labels().join(" / "))
    }
}

impl From<KeyValue> for GroupKey {
    fn from(value: KeyValue) -> Self {
        GroupKey::single(value)
    }
}

/// Named function extracting one key component from a record
///
/// Returning `None` means the record has no value for this key (e.g. an
/// invalid arrival date); such records are excluded from the grouping and
/// counted.
pub struct GroupingKey<'a, T> {
    name: String,
    extract: Box<dyn Fn(&T) -> Option<KeyValue> + 'a>,
}

impl<'a, T> GroupingKey<'a, T> {
    pub fn new(name: impl Into<String>, extract: impl Fn(&T) -> Option<KeyValue> + 'a) -> Self {
        Self {
            name: name.into(),
            extract: Box::new(extract),
        }
    }

    /// Key extractor that always yields a value
    pub fn total(name: impl Into<String>, extract: impl Fn(&T) -> KeyValue + 'a) -> Self {
        Self::new(name, move |record| Some(extract(record)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extract(&self, record: &T) -> Option<KeyValue> {
        (self.extract)(record)
    }
}

impl<T> fmt::Debug for GroupingKey<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupingKey")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Cartesian product of per-key domains, in natural order
pub fn cartesian(domains: &[Vec<KeyValue>]) -> Vec<GroupKey> {
    domains.iter().fold(vec![GroupKey::new(Vec::new())], |acc, domain| {
        acc.iter()
            .flat_map(|prefix| {
                domain.iter().map(move |value| {
                    let mut values = prefix.0.clone();
                    values.push(value.clone());
                    GroupKey::new(values)
                })
            })
            .collect()
    })
}
