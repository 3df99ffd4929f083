//! Grouped aggregation into summary tables
//!
//! The aggregator is generic over the record type: callers supply named key
//! extractors (`record -> Option<KeyValue>`) and an aggregation mode, and get
//! back a [`SummaryTable`] mapping each key tuple to `{count, value}`.
//!
//! # Aggregation modes
//!
//! - [`Aggregation::Count`]: records per group
//! - [`Aggregation::Rate`]: fraction of records matching a predicate, with
//!   [`Metric::Undefined`] for empty groups
//! - [`Aggregation::RowPercentage`]: two-way cross-tabulation, each first-key
//!   group summing to 100
//! - [`Aggregation::Mean`]: mean of an optional numeric value
//!
//! # Ordering
//!
//! Tables are stored in natural key order. How they are listed is an explicit
//! [`GroupOrdering`] choice made per report.
//!
//! # Example Usage
//!
//! ```rust
//! use booking_insights::app::services::aggregator::{
//!     Aggregation, GroupedAggregator, GroupingKey, KeyValue,
//! };
//!
//! let values = vec![1, 2, 3, 4];
//! let table = GroupedAggregator::new()
//!     .by(GroupingKey::total("parity", |v: &i32| KeyValue::Flag(v % 2 == 0)))
//!     .aggregate(&values, &Aggregation::rate(|v: &i32| *v > 2))
//!     .unwrap();
//!
//! assert_eq!(table.len(), 2);
//! ```

pub mod aggregate;
pub mod key;
pub mod summary;

#[cfg(test)]
pub mod tests;

pub use aggregate::{Aggregation, GroupedAggregator, aggregate};
pub use key::{GroupKey, GroupingKey, KeyValue, cartesian};
pub use summary::{AggregationKind, GroupOrdering, Metric, SummaryRow, SummaryTable};
