//! Tests for derived field computation
//!
//! The fixtures here are shared with the aggregator and report tests.


use crate::app::models::{
    AnalyzedBooking, Booking, Category, CustomerType, DepositType, DistributionChannel, Hotel,
    MarketSegment, ReservationStatus,
};
use crate::app::services::derived_fields::DerivedFieldComputer;
use chrono::{Month, NaiveDate};

/// Create a non-canceled booking arriving on 2016-07-15
pub fn create_test_booking(row: usize) -> Booking {
    Booking {
        row,
        hotel: Hotel::City,
        is_canceled: false,
        lead_time: 30,
        arrival_date_year: 2016,
        arrival_date_month: Month::July,
        arrival_date_day_of_month: 15,
        arrival_date_week_number: Some(29),
        stays_in_weekend_nights: 1,
        stays_in_week_nights: 2,
        reservation_status: Category::Known(ReservationStatus::CheckOut),
        reservation_status_date: NaiveDate::from_ymd_opt(2016, 7, 18).unwrap(),
        customer_type: Category::Known(CustomerType::Transient),
        distribution_channel: Category::Known(DistributionChannel::TravelAgent),
        market_segment: Category::Known(MarketSegment::OnlineTravelAgent),
        deposit_type: Category::Known(DepositType::NoDeposit),
        country: Some("PRT".to_string()),
        children: 0,
        total_of_special_requests: 0,
        required_car_parking_spaces: 0,
        adr: 100.0,
        unrecognized: Vec::new(),
    }
}

/// Create a canceled booking with the given arrival and status dates
pub fn create_canceled_booking(row: usize, arrival: NaiveDate, status: NaiveDate) -> Booking {
    use chrono::Datelike;

    let mut booking = create_test_booking(row);
    booking.is_canceled = true;
    booking.reservation_status = Category::Known(ReservationStatus::Canceled);
    booking.arrival_date_year = arrival.year();
    booking.arrival_date_month = Month::try_from(arrival.month() as u8).unwrap();
    booking.arrival_date_day_of_month = arrival.day();
    booking.reservation_status_date = status;
    booking
}

/// Create bookings for a customer type with a given number of cancellations
pub fn create_customer_bookings(
    customer_type: CustomerType,
    total: usize,
    canceled: usize,
    first_row: usize,
) -> Vec<Booking> {
    (0..total)
        .map(|i| {
            let mut booking = create_test_booking(first_row + i);
            booking.customer_type = Category::Known(customer_type);
            booking.is_canceled = i < canceled;
            booking
        })
        .collect()
}

/// Run derivation over bookings and return the analyzed collection
pub fn analyze(bookings: Vec<Booking>) -> Vec<AnalyzedBooking> {
    DerivedFieldComputer::new().derive(bookings).bookings
}
