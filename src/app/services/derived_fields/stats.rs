//! Statistics for derived field computation

use crate::app::models::AnalyzedBooking;
use serde::Serialize;

/// Derivation statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivationStats {
    /// Number of bookings processed
    pub total_bookings: usize,
    /// Bookings whose arrival date components are not a calendar date
    pub date_composition_failures: usize,
    /// Canceled bookings whose status date falls after arrival
    pub negative_cancellation_lead_times: usize,
    /// Sample of date composition errors
    pub error_samples: Vec<String>,
    /// Maximum number of samples kept
    pub sample_limit: usize,
}

impl DerivationStats {
    pub fn new(sample_limit: usize) -> Self {
        Self {
            total_bookings: 0,
            date_composition_failures: 0,
            negative_cancellation_lead_times: 0,
            error_samples: Vec::new(),
            sample_limit,
        }
    }

    pub fn add_date_failure(&mut self, message: String) {
        self.date_composition_failures += 1;
        if self.error_samples.len() < self.sample_limit {
            self.error_samples.push(message);
        }
    }

    /// Bookings with a defined arrival date
    pub fn dated_bookings(&self) -> usize {
        self.total_bookings - self.date_composition_failures
    }

    pub fn summary(&self) -> String {
        format!(
            "Derivation: {} bookings | Invalid arrival dates: {} | Status after arrival: {}",
            self.total_bookings, self.date_composition_failures, self.negative_cancellation_lead_times
        )
    }
}

impl Default for DerivationStats {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_ERROR_SAMPLE_SIZE)
    }
}

/// Bookings with derived fields and the statistics of the pass
#[derive(Debug, Clone)]
pub struct DerivationResult {
    pub bookings: Vec<AnalyzedBooking>,
    pub stats: DerivationStats,
}

impl DerivationResult {
    pub fn new(bookings: Vec<AnalyzedBooking>, stats: DerivationStats) -> Self {
        Self { bookings, stats }
    }
}
