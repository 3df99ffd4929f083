//! Data models for booking analysis
//!
//! This module contains the raw record representation handed over by a loader,
//! the typed booking record produced by normalization, the categorical domains
//! of the booking export, and the derived field set computed from each booking.

use crate::constants::MISSING_VALUE_TOKENS;
use crate::{Error, Result};
use chrono::{Datelike, Month, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Raw Records
// =============================================================================

/// An untyped field value as produced by a loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Missing,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    /// Build a value from loader text, mapping missing-value tokens to `Missing`
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if MISSING_VALUE_TOKENS
            .iter()
            .any(|token| token.eq_ignore_ascii_case(trimmed))
        {
            RawValue::Missing
        } else {
            RawValue::Text(trimmed.to_string())
        }
    }

    /// Check whether the value carries no data
    pub fn is_missing(&self) -> bool {
        match self {
            RawValue::Missing => true,
            RawValue::Float(v) => v.is_nan(),
            RawValue::Text(s) => MISSING_VALUE_TOKENS
                .iter()
                .any(|token| token.eq_ignore_ascii_case(s.trim())),
            _ => false,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Missing => write!(f, "<missing>"),
            RawValue::Bool(v) => write!(f, "{}", v),
            RawValue::Integer(v) => write!(f, "{}", v),
            RawValue::Float(v) => write!(f, "{}", v),
            RawValue::Text(v) => write!(f, "{}", v),
        }
    }
}

/// One input row: field name to untyped value
pub type RawRecord = HashMap<String, RawValue>;

// =============================================================================
// Categorical Domains
// =============================================================================

/// A categorical field with a fixed set of known values
///
/// Variants are declared in their natural display order; `rank` follows that
/// order so grouped output can be sorted by domain order.
pub trait CategoricalField: Copy + Eq + fmt::Debug + 'static {
    /// Column name of the field in the booking export
    const FIELD: &'static str;

    /// All known values in natural order
    const ALL: &'static [Self];

    /// Label exactly as it appears in the export
    fn label(self) -> &'static str;

    /// Position of the value in natural order
    fn rank(self) -> u32 {
        Self::ALL
            .iter()
            .position(|candidate| *candidate == self)
            .unwrap_or(Self::ALL.len()) as u32
    }

    /// Look up a known value by label (case-insensitive, whitespace-trimmed)
    fn from_label(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|candidate| candidate.label().eq_ignore_ascii_case(trimmed))
    }
}

macro_rules! categorical_field {
    (
        $(#[$meta:meta])*
        $name:ident, $field:expr, { $($variant:ident => $label:expr),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl CategoricalField for $name {
            const FIELD: &'static str = $field;
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

categorical_field!(
    /// Which of the two hotels the booking belongs to
    Hotel, "hotel", {
        Resort => "Resort Hotel",
        City => "City Hotel",
    }
);

categorical_field!(
    /// Final state of the reservation
    ReservationStatus, "reservation_status", {
        CheckOut => "Check-Out",
        Canceled => "Canceled",
        NoShow => "No-Show",
    }
);

categorical_field!(
    /// Commercial type of the customer
    CustomerType, "customer_type", {
        Contract => "Contract",
        Group => "Group",
        Transient => "Transient",
        TransientParty => "Transient-Party",
    }
);

categorical_field!(
    /// Booking distribution channel
    DistributionChannel, "distribution_channel", {
        Direct => "Direct",
        Corporate => "Corporate",
        TravelAgent => "TA/TO",
        Gds => "GDS",
        Undefined => "Undefined",
    }
);

categorical_field!(
    /// Market segment designation
    MarketSegment, "market_segment", {
        Direct => "Direct",
        Corporate => "Corporate",
        OnlineTravelAgent => "Online TA",
        OfflineTravelAgent => "Offline TA/TO",
        Groups => "Groups",
        Complementary => "Complementary",
        Aviation => "Aviation",
        Undefined => "Undefined",
    }
);

categorical_field!(
    /// Deposit taken to guarantee the booking
    DepositType, "deposit_type", {
        NoDeposit => "No Deposit",
        NonRefund => "Non Refund",
        Refundable => "Refundable",
    }
);

/// A categorical value that is either known or retained verbatim
///
/// Unrecognized values stay visible as their own category in tabulations
/// instead of being dropped or coerced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category<T: CategoricalField> {
    Known(T),
    Unrecognized(String),
}

impl<T: CategoricalField> Category<T> {
    /// Classify a raw label against the field's known domain
    pub fn classify(label: &str) -> Self {
        match T::from_label(label) {
            Some(value) => Category::Known(value),
            None => Category::Unrecognized(label.trim().to_string()),
        }
    }

    /// Display label of the category
    pub fn label(&self) -> &str {
        match self {
            Category::Known(value) => value.label(),
            Category::Unrecognized(raw) => raw,
        }
    }

    /// Natural-order rank; unrecognized values sort after all known values
    pub fn rank(&self) -> u32 {
        match self {
            Category::Known(value) => value.rank(),
            Category::Unrecognized(_) => T::ALL.len() as u32,
        }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, Category::Known(_))
    }
}

impl<T: CategoricalField> fmt::Display for Category<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Record of a categorical value outside its field's known domain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UnrecognizedValue {
    pub field: &'static str,
    pub value: String,
}

// =============================================================================
// Booking Record
// =============================================================================

/// A single typed booking, identified by its row position in the input
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    /// Zero-based row position in the input
    pub row: usize,

    pub hotel: Hotel,
    pub is_canceled: bool,

    /// Days between booking creation and scheduled arrival
    pub lead_time: u32,

    // Arrival date components as recorded; composition is validated later
    pub arrival_date_year: i32,
    pub arrival_date_month: Month,
    pub arrival_date_day_of_month: u32,
    pub arrival_date_week_number: Option<u32>,

    pub stays_in_weekend_nights: u32,
    pub stays_in_week_nights: u32,

    pub reservation_status: Category<ReservationStatus>,
    pub reservation_status_date: NaiveDate,

    pub customer_type: Category<CustomerType>,
    pub distribution_channel: Category<DistributionChannel>,
    pub market_segment: Category<MarketSegment>,
    pub deposit_type: Category<DepositType>,

    /// Country of origin; absent in a minority of source rows
    pub country: Option<String>,

    pub children: u32,
    pub total_of_special_requests: u32,
    pub required_car_parking_spaces: u32,

    /// Average daily rate
    pub adr: f64,

    /// Categorical values that fell outside their known domain
    pub unrecognized: Vec<UnrecognizedValue>,
}

impl Booking {
    /// Arrival month as a number in 1..=12
    pub fn arrival_month_number(&self) -> u32 {
        self.arrival_date_month.number_from_month()
    }

    /// Check whether any categorical field carried an unknown value
    pub fn has_unrecognized_values(&self) -> bool {
        !self.unrecognized.is_empty()
    }
}

// =============================================================================
// Derived Fields
// =============================================================================

/// Meteorological season of a month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    /// Map a month number to its season; `None` outside 1..=12
    pub fn from_month(month: u32) -> Option<Season> {
        match month {
            12 | 1 | 2 => Some(Season::Winter),
            3..=5 => Some(Season::Spring),
            6..=8 => Some(Season::Summer),
            9..=11 => Some(Season::Fall),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
        }
    }

    pub fn rank(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which calendar date drives a temporal grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateBasis {
    /// Scheduled arrival date
    #[default]
    Arrival,
    /// Date the reservation reached its final status
    ReservationStatus,
}

impl DateBasis {
    pub fn as_str(self) -> &'static str {
        match self {
            DateBasis::Arrival => "arrival",
            DateBasis::ReservationStatus => "reservation_status",
        }
    }
}

impl FromStr for DateBasis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "arrival" | "arrival_date" => Ok(DateBasis::Arrival),
            "reservation_status" | "reservation_status_date" | "status" => {
                Ok(DateBasis::ReservationStatus)
            }
            other => Err(Error::configuration(format!(
                "Unknown date basis '{}' (expected 'arrival' or 'reservation_status')",
                other
            ))),
        }
    }
}

impl fmt::Display for DateBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full English name of an ISO weekday
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Fields computed from a booking rather than read from the input
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedFields {
    /// Composed arrival date; `None` when the components are not a calendar date
    pub arrival_date: Option<NaiveDate>,

    /// Days from cancellation to arrival; zero when not canceled, `None` when
    /// canceled but the arrival date is invalid
    pub cancellation_lead_time: Option<i64>,

    /// Season of the arrival month
    pub season: Season,

    /// Total nights booked
    pub total_nights: u32,
}

/// A booking paired with its derived fields, the unit every aggregation runs over
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedBooking {
    pub booking: Booking,
    pub derived: DerivedFields,
}

impl AnalyzedBooking {
    /// The calendar date selected by the basis, if defined
    pub fn date(&self, basis: DateBasis) -> Option<NaiveDate> {
        match basis {
            DateBasis::Arrival => self.derived.arrival_date,
            DateBasis::ReservationStatus => Some(self.booking.reservation_status_date),
        }
    }

    /// ISO weekday of the selected date
    pub fn weekday(&self, basis: DateBasis) -> Option<Weekday> {
        self.date(basis).map(|date| date.weekday())
    }

    /// Month (1..=12) of the selected date
    ///
    /// For the arrival basis the recorded month is used even when the day is
    /// invalid, since month-level grouping does not depend on the day.
    pub fn month(&self, basis: DateBasis) -> u32 {
        match basis {
            DateBasis::Arrival => self.booking.arrival_month_number(),
            DateBasis::ReservationStatus => self.booking.reservation_status_date.month(),
        }
    }

    /// Year of the selected date
    pub fn year(&self, basis: DateBasis) -> i32 {
        match basis {
            DateBasis::Arrival => self.booking.arrival_date_year,
            DateBasis::ReservationStatus => self.booking.reservation_status_date.year(),
        }
    }

    /// Season of the selected date's month
    pub fn season(&self, basis: DateBasis) -> Season {
        match basis {
            DateBasis::Arrival => self.derived.season,
            // month() is always in 1..=12 for a NaiveDate
            DateBasis::ReservationStatus => {
                Season::from_month(self.month(basis)).unwrap_or(Season::Winter)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_value_missing_tokens() {
        assert!(RawValue::from_text("NA").is_missing());
        assert!(RawValue::from_text(" null ").is_missing());
        assert!(RawValue::from_text("").is_missing());
        assert!(RawValue::Float(f64::NAN).is_missing());
        assert!(!RawValue::from_text("PRT").is_missing());
        assert_eq!(RawValue::from_text(" PRT "), RawValue::Text("PRT".to_string()));
    }

    #[test]
    fn test_category_classification() {
        let known: Category<CustomerType> = Category::classify("transient-party");
        assert_eq!(known, Category::Known(CustomerType::TransientParty));
        assert_eq!(known.label(), "Transient-Party");

        let unknown: Category<CustomerType> = Category::classify("Wholesale");
        assert!(!unknown.is_recognized());
        assert_eq!(unknown.label(), "Wholesale");
        assert_eq!(unknown.rank(), CustomerType::ALL.len() as u32);
    }

    #[test]
    fn test_categorical_rank_follows_declaration_order() {
        assert_eq!(DepositType::NoDeposit.rank(), 0);
        assert_eq!(DepositType::NonRefund.rank(), 1);
        assert_eq!(DepositType::Refundable.rank(), 2);
        assert_eq!(Hotel::from_label("City Hotel"), Some(Hotel::City));
        assert_eq!(Hotel::from_label("Airport Hotel"), None);
    }

    #[test]
    fn test_date_basis_parsing() {
        assert_eq!("arrival".parse::<DateBasis>().unwrap(), DateBasis::Arrival);
        assert_eq!(
            "reservation-status".parse::<DateBasis>().unwrap(),
            DateBasis::ReservationStatus
        );
        assert!("checkout".parse::<DateBasis>().is_err());
    }

    #[test]
    fn test_weekday_names() {
        assert_eq!(weekday_name(Weekday::Mon), "Monday");
        assert_eq!(weekday_name(Weekday::Sun), "Sunday");
    }
}
