//! Derived field computation for bookings
//!
//! Computes the engineered fields used by temporal and cancellation analyses:
//!
//! - `arrival_date` composed from day, month name and year
//! - `cancellation_lead_time` as exact whole-day difference between arrival and
//!   reservation status date for canceled bookings, zero otherwise
//! - `season` from a fixed month-to-season table
//! - `weekday` of either the arrival or the reservation status date
//! - `total_nights` across weekend and week nights
//!
//! An invalid arrival date (e.g. 31 February) does not drop the booking: it
//! stays available for groupings that do not depend on the date.

pub mod calendar;
pub mod deriver;
pub mod stats;

#[cfg(test)]
pub mod tests;

pub use calendar::{
    cancellation_lead_time, compose_arrival_date, season_of_month, status_date_from_lead_time,
    weekday_label,
};
pub use deriver::DerivedFieldComputer;
pub use stats::{DerivationResult, DerivationStats};
