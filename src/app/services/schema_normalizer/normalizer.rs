//! Schema normalizer turning raw field mappings into typed bookings

use super::field_parsers::{
    parse_optional_count, parse_optional_text, parse_required_bool, parse_required_count,
    parse_required_date, parse_required_i32, parse_required_month,
    parse_required_non_negative_f64, parse_required_text,
};
use super::stats::{NormalizationResult, NormalizationStats};
use crate::app::models::{
    Booking, CategoricalField, Category, CustomerType, DepositType, DistributionChannel, Hotel,
    MarketSegment, RawRecord, ReservationStatus, UnrecognizedValue,
};
use crate::constants::{DEFAULT_ERROR_SAMPLE_SIZE, fields};
use crate::{Error, Result};
use tracing::{debug, info, warn};

/// Validates and casts raw records into the typed booking model
#[derive(Debug, Clone)]
pub struct SchemaNormalizer {
    error_sample_size: usize,
}

impl SchemaNormalizer {
    pub fn new() -> Self {
        Self {
            error_sample_size: DEFAULT_ERROR_SAMPLE_SIZE,
        }
    }

    /// Set how many rejection messages are kept in the statistics
    pub fn with_error_sample_size(mut self, error_sample_size: usize) -> Self {
        self.error_sample_size = error_sample_size;
        self
    }

    /// Normalize a batch of raw records
    ///
    /// Records failing with a schema error are excluded and counted; the batch
    /// itself never fails. Row numbers are the zero-based input positions.
    pub fn normalize(&self, records: &[RawRecord]) -> NormalizationResult {
        let mut stats = NormalizationStats::new(self.error_sample_size);
        stats.total_records = records.len();
        let mut bookings = Vec::with_capacity(records.len());

        for (row, record) in records.iter().enumerate() {
            match self.normalize_record(row, record) {
                Ok(booking) => {
                    stats.add_booking(&booking);
                    bookings.push(booking);
                }
                Err(e) => {
                    debug!("Rejected record: {}", e);
                    let field = match &e {
                        Error::Schema { field, .. } => field.clone(),
                        _ => "unknown".to_string(),
                    };
                    stats.add_rejection(&field, e.to_string());
                }
            }
        }

        if stats.has_rejections() {
            warn!(
                "{} of {} records rejected during normalization",
                stats.rejected, stats.total_records
            );
        }
        if stats.flagged_records > 0 {
            info!(
                "{} bookings carry unrecognized categorical values",
                stats.flagged_records
            );
        }
        info!("{}", stats.summary());

        NormalizationResult::new(bookings, stats)
    }

    /// Normalize a single raw record
    pub fn normalize_record(&self, row: usize, record: &RawRecord) -> Result<Booking> {
        let hotel_label = parse_required_text(record, row, fields::HOTEL)?;
        let hotel = Hotel::from_label(&hotel_label).ok_or_else(|| {
            Error::schema(
                row,
                fields::HOTEL,
                format!("unknown hotel '{}'", hotel_label),
            )
        })?;

        let mut unrecognized = Vec::new();

        let reservation_status: Category<ReservationStatus> =
            classify_flagged(record, row, &mut unrecognized)?;
        let customer_type: Category<CustomerType> =
            classify_flagged(record, row, &mut unrecognized)?;
        let distribution_channel: Category<DistributionChannel> =
            classify_flagged(record, row, &mut unrecognized)?;
        let market_segment: Category<MarketSegment> =
            classify_flagged(record, row, &mut unrecognized)?;
        let deposit_type: Category<DepositType> =
            classify_flagged(record, row, &mut unrecognized)?;

        let arrival_date_week_number =
            parse_optional_count(record, row, fields::ARRIVAL_DATE_WEEK_NUMBER)?;
        let arrival_date_day_of_month =
            parse_required_count(record, row, fields::ARRIVAL_DATE_DAY_OF_MONTH)?;

        Ok(Booking {
            row,
            hotel,
            is_canceled: parse_required_bool(record, row, fields::IS_CANCELED)?,
            lead_time: parse_required_count(record, row, fields::LEAD_TIME)?,
            arrival_date_year: parse_required_i32(record, row, fields::ARRIVAL_DATE_YEAR)?,
            arrival_date_month: parse_required_month(record, row, fields::ARRIVAL_DATE_MONTH)?,
            arrival_date_day_of_month,
            arrival_date_week_number,
            stays_in_weekend_nights: parse_optional_count(
                record,
                row,
                fields::STAYS_IN_WEEKEND_NIGHTS,
            )?
            .unwrap_or(0),
            stays_in_week_nights: parse_optional_count(record, row, fields::STAYS_IN_WEEK_NIGHTS)?
                .unwrap_or(0),
            reservation_status,
            reservation_status_date: parse_required_date(
                record,
                row,
                fields::RESERVATION_STATUS_DATE,
            )?,
            customer_type,
            distribution_channel,
            market_segment,
            deposit_type,
            country: parse_optional_text(record, fields::COUNTRY),
            children: parse_required_count(record, row, fields::CHILDREN)?,
            total_of_special_requests: parse_required_count(
                record,
                row,
                fields::TOTAL_OF_SPECIAL_REQUESTS,
            )?,
            required_car_parking_spaces: parse_required_count(
                record,
                row,
                fields::REQUIRED_CAR_PARKING_SPACES,
            )?,
            adr: parse_required_non_negative_f64(record, row, fields::ADR)?,
            unrecognized,
        })
    }
}

impl Default for SchemaNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify a required categorical field, flagging values outside its domain
fn classify_flagged<T: CategoricalField>(
    record: &RawRecord,
    row: usize,
    unrecognized: &mut Vec<UnrecognizedValue>,
) -> Result<Category<T>> {
    let label = parse_required_text(record, row, T::FIELD)?;
    let category = Category::<T>::classify(&label);

    if let Category::Unrecognized(value) = &category {
        debug!(
            "Row {}: unrecognized {} value '{}' kept as its own category",
            row,
            T::FIELD,
            value
        );
        unrecognized.push(UnrecognizedValue {
            field: T::FIELD,
            value: value.clone(),
        });
    }

    Ok(category)
}
