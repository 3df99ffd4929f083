//! Normalization and derivation in one pass

use crate::app::models::{AnalyzedBooking, RawRecord};
use crate::app::services::derived_fields::{DerivationStats, DerivedFieldComputer};
use crate::app::services::schema_normalizer::{NormalizationStats, SchemaNormalizer};
use crate::config::AnalysisConfig;
use tracing::info;

/// Analyzed bookings with the statistics of every stage that produced them
#[derive(Debug, Clone)]
pub struct PreparedBookings {
    pub bookings: Vec<AnalyzedBooking>,
    pub normalization: NormalizationStats,
    pub derivation: DerivationStats,
}

impl PreparedBookings {
    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}

/// Turn raw records into analyzed bookings
///
/// Never fails: rejected records and invalid dates are counted in the
/// returned statistics.
pub fn prepare_bookings(records: &[RawRecord], config: &AnalysisConfig) -> PreparedBookings {
    let normalized = SchemaNormalizer::new()
        .with_error_sample_size(config.error_sample_size)
        .normalize(records);

    let derived = DerivedFieldComputer::new()
        .with_error_sample_size(config.error_sample_size)
        .derive(normalized.bookings);

    info!(
        "Prepared {} of {} records for analysis",
        derived.bookings.len(),
        records.len()
    );

    PreparedBookings {
        bookings: derived.bookings,
        normalization: normalized.stats,
        derivation: derived.stats,
    }
}
