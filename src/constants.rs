//! Application constants for booking analysis
//!
//! This module contains field names, default bucket boundaries, parsing
//! conventions and default values used throughout the booking pipeline.

// =============================================================================
// Input Field Names
// =============================================================================

/// Column names as they appear in the booking export header
pub mod fields {
    pub const HOTEL: &str = "hotel";
    pub const IS_CANCELED: &str = "is_canceled";
    pub const LEAD_TIME: &str = "lead_time";
    pub const ARRIVAL_DATE_YEAR: &str = "arrival_date_year";
    pub const ARRIVAL_DATE_MONTH: &str = "arrival_date_month";
    pub const ARRIVAL_DATE_WEEK_NUMBER: &str = "arrival_date_week_number";
    pub const ARRIVAL_DATE_DAY_OF_MONTH: &str = "arrival_date_day_of_month";
    pub const STAYS_IN_WEEKEND_NIGHTS: &str = "stays_in_weekend_nights";
    pub const STAYS_IN_WEEK_NIGHTS: &str = "stays_in_week_nights";
    pub const CHILDREN: &str = "children";
    pub const COUNTRY: &str = "country";
    pub const MARKET_SEGMENT: &str = "market_segment";
    pub const DISTRIBUTION_CHANNEL: &str = "distribution_channel";
    pub const DEPOSIT_TYPE: &str = "deposit_type";
    pub const CUSTOMER_TYPE: &str = "customer_type";
    pub const ADR: &str = "adr";
    pub const REQUIRED_CAR_PARKING_SPACES: &str = "required_car_parking_spaces";
    pub const TOTAL_OF_SPECIAL_REQUESTS: &str = "total_of_special_requests";
    pub const RESERVATION_STATUS: &str = "reservation_status";
    pub const RESERVATION_STATUS_DATE: &str = "reservation_status_date";

    /// Fields every record must carry
    pub const REQUIRED: &[&str] = &[
        HOTEL,
        IS_CANCELED,
        LEAD_TIME,
        ARRIVAL_DATE_YEAR,
        ARRIVAL_DATE_MONTH,
        ARRIVAL_DATE_DAY_OF_MONTH,
        CHILDREN,
        MARKET_SEGMENT,
        DISTRIBUTION_CHANNEL,
        DEPOSIT_TYPE,
        CUSTOMER_TYPE,
        ADR,
        REQUIRED_CAR_PARKING_SPACES,
        TOTAL_OF_SPECIAL_REQUESTS,
        RESERVATION_STATUS,
        RESERVATION_STATUS_DATE,
    ];
}

// =============================================================================
// Parsing Conventions
// =============================================================================

/// Text tokens treated as a missing value (compared case-insensitively)
pub const MISSING_VALUE_TOKENS: &[&str] = &["", "NA", "NULL", "N/A", "NaN"];

/// Accepted formats for `reservation_status_date`
pub const STATUS_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Default number of failing records kept as examples in statistics
pub const DEFAULT_ERROR_SAMPLE_SIZE: usize = 10;

/// Default field delimiter for the booking export
pub const DEFAULT_DELIMITER: u8 = b',';

// =============================================================================
// Binning Defaults
// =============================================================================

/// Label used for values outside every configured bucket
pub const OUT_OF_RANGE_LABEL: &str = "unclassified";

/// Default lead-time buckets in days (half-open, last bucket open-ended)
pub mod lead_time_buckets {
    pub const BOUNDARIES: &[f64] = &[0.0, 7.0, 30.0, 90.0, 180.0, 365.0, f64::INFINITY];
    pub const LABELS: &[&str] = &[
        "0-6 days",
        "7-29 days",
        "30-89 days",
        "90-179 days",
        "180-364 days",
        "365+ days",
    ];
}

/// Buckets for the number of children on a booking
pub mod children_buckets {
    pub const BOUNDARIES: &[f64] = &[0.0, 1.0, 2.0, 3.0, f64::INFINITY];
    pub const LABELS: &[&str] = &["none", "1", "2", "3+"];
}

/// Buckets for cancellation lead time in days; negative values are a known
/// data quirk (status date after arrival) and get their own bucket
pub mod cancellation_lead_buckets {
    pub const BOUNDARIES: &[f64] = &[
        f64::NEG_INFINITY,
        0.0,
        1.0,
        7.0,
        30.0,
        90.0,
        f64::INFINITY,
    ];
    pub const LABELS: &[&str] = &[
        "after arrival",
        "same day",
        "1-6 days",
        "7-29 days",
        "30-89 days",
        "90+ days",
    ];
}

// =============================================================================
// Report Defaults
// =============================================================================

/// Number of countries kept in the rate-ordered country table
pub const DEFAULT_TOP_COUNTRIES: usize = 10;

/// Countries with fewer bookings are left out of the country table
pub const DEFAULT_MIN_COUNTRY_BOOKINGS: usize = 100;

/// Key label used when a booking has no country
pub const UNKNOWN_COUNTRY: &str = "unknown";

/// Tolerance used when checking that row percentages add up to 100
pub const PERCENTAGE_TOLERANCE: f64 = 0.01;

/// Default config file name inside the user config directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Application directory name under the user config directory
pub const APP_DIR_NAME: &str = "booking-insights";
