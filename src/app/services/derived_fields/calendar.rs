//! Calendar derivations for bookings
//!
//! Pure functions composing the arrival date and computing date-based fields.
//! All day arithmetic is exact calendar-day subtraction on `NaiveDate`.

use crate::app::models::{Booking, Season, weekday_name};
use crate::{Error, Result};
use chrono::{Datelike, NaiveDate};

/// Compose the arrival date from its recorded day, month and year
pub fn compose_arrival_date(booking: &Booking) -> Result<NaiveDate> {
    let month = booking.arrival_month_number();
    NaiveDate::from_ymd_opt(
        booking.arrival_date_year,
        month,
        booking.arrival_date_day_of_month,
    )
    .ok_or_else(|| {
        Error::date_composition(
            booking.row,
            booking.arrival_date_year,
            month,
            booking.arrival_date_day_of_month,
        )
    })
}

/// Days between cancellation and arrival
///
/// Zero for bookings that were not canceled. For canceled bookings this is
/// `arrival_date - reservation_status_date` in whole days, negative when the
/// status date falls after arrival. `None` when canceled and the arrival date
/// could not be composed.
pub fn cancellation_lead_time(booking: &Booking, arrival_date: Option<NaiveDate>) -> Option<i64> {
    if !booking.is_canceled {
        return Some(0);
    }
    arrival_date.map(|arrival| (arrival - booking.reservation_status_date).num_days())
}

/// Reconstruct the reservation status date of a canceled booking
pub fn status_date_from_lead_time(arrival_date: NaiveDate, lead_time: i64) -> Option<NaiveDate> {
    arrival_date.checked_sub_signed(chrono::Duration::days(lead_time))
}

/// Season of a month number; `None` outside 1..=12
pub fn season_of_month(month: u32) -> Option<Season> {
    Season::from_month(month)
}

/// ISO weekday name of a date
pub fn weekday_label(date: NaiveDate) -> &'static str {
    weekday_name(date.weekday())
}

/// Total nights booked across weekend and week nights
pub fn total_nights(booking: &Booking) -> u32 {
    booking
        .stays_in_weekend_nights
        .saturating_add(booking.stays_in_week_nights)
}
