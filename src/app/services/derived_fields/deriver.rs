//! Derived field computation over a booking collection

use super::calendar::{cancellation_lead_time, compose_arrival_date, season_of_month, total_nights};
use super::stats::{DerivationResult, DerivationStats};
use crate::app::models::{AnalyzedBooking, Booking, DerivedFields, Season};
use crate::constants::DEFAULT_ERROR_SAMPLE_SIZE;
use tracing::{debug, info, warn};

/// Computes fields not present verbatim in the input
#[derive(Debug, Clone)]
pub struct DerivedFieldComputer {
    error_sample_size: usize,
}

impl DerivedFieldComputer {
    pub fn new() -> Self {
        Self {
            error_sample_size: DEFAULT_ERROR_SAMPLE_SIZE,
        }
    }

    pub fn with_error_sample_size(mut self, error_sample_size: usize) -> Self {
        self.error_sample_size = error_sample_size;
        self
    }

    /// Derive fields for every booking
    ///
    /// A booking whose arrival date cannot be composed is kept; only its
    /// date-dependent fields are left undefined and the failure is counted.
    pub fn derive(&self, bookings: Vec<Booking>) -> DerivationResult {
        let mut stats = DerivationStats::new(self.error_sample_size);
        stats.total_bookings = bookings.len();

        let analyzed: Vec<AnalyzedBooking> = bookings
            .into_iter()
            .map(|booking| {
                let derived = self.derive_fields(&booking, &mut stats);
                AnalyzedBooking { booking, derived }
            })
            .collect();

        if stats.date_composition_failures > 0 {
            warn!(
                "{} bookings have an invalid arrival date and are excluded from date-dependent groupings",
                stats.date_composition_failures
            );
        }
        info!("{}", stats.summary());

        DerivationResult::new(analyzed, stats)
    }

    /// Derive fields for a single booking, recording failures in `stats`
    pub fn derive_fields(&self, booking: &Booking, stats: &mut DerivationStats) -> DerivedFields {
        let arrival_date = match compose_arrival_date(booking) {
            Ok(date) => Some(date),
            Err(e) => {
                debug!("{}", e);
                stats.add_date_failure(e.to_string());
                None
            }
        };

        let cancellation_lead_time = cancellation_lead_time(booking, arrival_date);
        if booking.is_canceled && cancellation_lead_time.is_some_and(|days| days < 0) {
            stats.negative_cancellation_lead_times += 1;
        }

        DerivedFields {
            arrival_date,
            cancellation_lead_time,
            // The month is a chrono::Month, so its number is always in 1..=12
            season: season_of_month(booking.arrival_month_number()).unwrap_or(Season::Winter),
            total_nights: total_nights(booking),
        }
    }
}

impl Default for DerivedFieldComputer {
    fn default() -> Self {
        Self::new()
    }
}
