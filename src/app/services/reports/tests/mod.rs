//! Tests for the report catalog and runner


use crate::app::models::{AnalyzedBooking, CustomerType};
use crate::app::services::derived_fields::tests::{analyze, create_customer_bookings};
use crate::app::services::reports::ReportRunner;
use crate::config::AnalysisConfig;

/// Runner with the default analysis configuration
pub fn default_runner() -> ReportRunner {
    ReportRunner::from_config(&AnalysisConfig::default()).unwrap()
}

/// 100 Transient bookings with 41 cancellations and 20 Group bookings with 4
pub fn transient_and_group() -> Vec<AnalyzedBooking> {
    let mut bookings = create_customer_bookings(CustomerType::Transient, 100, 41, 0);
    bookings.extend(create_customer_bookings(CustomerType::Group, 20, 4, 100));
    analyze(bookings)
}
