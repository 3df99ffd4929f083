//! Normalization statistics and result structures
//!
//! Rejected records are counted and a bounded sample of their errors is kept,
//! so dirty rows leave a reportable trace without aborting the batch.

use crate::app::models::Booking;
use serde::Serialize;
use std::collections::BTreeMap;

/// Statistics for a normalization pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizationStats {
    /// Total number of raw records seen
    pub total_records: usize,
    /// Number of records turned into bookings
    pub normalized: usize,
    /// Number of records rejected with a schema error
    pub rejected: usize,
    /// Rejections per offending field
    pub rejected_by_field: BTreeMap<String, usize>,
    /// Number of bookings carrying at least one unrecognized categorical value
    pub flagged_records: usize,
    /// Unrecognized value counts per `field=value`
    pub unrecognized_values: BTreeMap<String, usize>,
    /// Sample of rejection messages for debugging
    pub error_samples: Vec<String>,
    /// Maximum number of samples kept
    pub sample_limit: usize,
}

impl NormalizationStats {
    /// Create new empty statistics keeping at most `sample_limit` error samples
    pub fn new(sample_limit: usize) -> Self {
        Self {
            total_records: 0,
            normalized: 0,
            rejected: 0,
            rejected_by_field: BTreeMap::new(),
            flagged_records: 0,
            unrecognized_values: BTreeMap::new(),
            error_samples: Vec::new(),
            sample_limit,
        }
    }

    /// Record a rejected record
    pub fn add_rejection(&mut self, field: &str, message: String) {
        self.rejected += 1;
        *self.rejected_by_field.entry(field.to_string()).or_insert(0) += 1;
        if self.error_samples.len() < self.sample_limit {
            self.error_samples.push(message);
        }
    }

    /// Record a normalized booking and any flags it carries
    pub fn add_booking(&mut self, booking: &Booking) {
        self.normalized += 1;
        if booking.has_unrecognized_values() {
            self.flagged_records += 1;
            for flag in &booking.unrecognized {
                *self
                    .unrecognized_values
                    .entry(format!("{}={}", flag.field, flag.value))
                    .or_insert(0) += 1;
            }
        }
    }

    /// Percentage of records that normalized successfully
    pub fn success_rate(&self) -> f64 {
        if self.total_records == 0 {
            100.0
        } else {
            (self.normalized as f64 / self.total_records as f64) * 100.0
        }
    }

    /// Check if any record was rejected
    pub fn has_rejections(&self) -> bool {
        self.rejected > 0
    }

    /// Summary line for logging
    pub fn summary(&self) -> String {
        format!(
            "Normalization: {} -> {} bookings ({:.2}% success) | Rejected: {} | Flagged: {}",
            self.total_records,
            self.normalized,
            self.success_rate(),
            self.rejected,
            self.flagged_records
        )
    }
}

impl Default for NormalizationStats {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_ERROR_SAMPLE_SIZE)
    }
}

/// Result of normalizing a batch of raw records
#[derive(Debug, Clone)]
pub struct NormalizationResult {
    /// Successfully normalized bookings in input order
    pub bookings: Vec<Booking>,
    /// Normalization statistics and error samples
    pub stats: NormalizationStats,
}

impl NormalizationResult {
    pub fn new(bookings: Vec<Booking>, stats: NormalizationStats) -> Self {
        Self { bookings, stats }
    }

    pub fn booking_count(&self) -> usize {
        self.bookings.len()
    }

    pub fn summary(&self) -> String {
        self.stats.summary()
    }
}
