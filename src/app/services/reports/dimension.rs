//! Booking attributes that reports group by

use crate::app::models::{
    AnalyzedBooking, CategoricalField, Category, CustomerType, DateBasis, DepositType,
    DistributionChannel, Hotel, MarketSegment, Season,
};
use crate::app::services::aggregator::{GroupingKey, KeyValue};
use crate::app::services::binning::Binner;
use crate::config::AnalysisConfig;
use crate::constants::{UNKNOWN_COUNTRY, cancellation_lead_buckets, children_buckets};
use crate::Result;
use chrono::Weekday;
use serde::Serialize;

/// Parameters every grouping key is built with
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub date_basis: DateBasis,
    pub year: Option<i32>,
    pub top_countries: usize,
    pub min_country_bookings: usize,
    pub lead_time_bins: Binner,
    pub children_bins: Binner,
    pub cancellation_lead_bins: Binner,
}

impl ReportContext {
    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        Ok(Self {
            date_basis: config.date_basis,
            year: config.year,
            top_countries: config.top_countries,
            min_country_bookings: config.min_country_bookings,
            lead_time_bins: config.lead_time_bins.build()?,
            children_bins: Binner::from_static(children_buckets::BOUNDARIES, children_buckets::LABELS)?,
            cancellation_lead_bins: Binner::from_static(
                cancellation_lead_buckets::BOUNDARIES,
                cancellation_lead_buckets::LABELS,
            )?,
        })
    }

    /// Whether a booking falls inside the year filter, if any
    pub fn in_year(&self, booking: &AnalyzedBooking) -> bool {
        self.year
            .is_none_or(|year| booking.year(self.date_basis) == year)
    }
}

/// One attribute a report can group by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Hotel,
    Canceled,
    CustomerType,
    DepositType,
    MarketSegment,
    DistributionChannel,
    Country,
    Year,
    Month,
    Season,
    Weekday,
    LeadTimeBucket,
    SpecialRequests,
    ParkingSpaces,
    ChildrenBucket,
    CancellationLeadBucket,
}

impl Dimension {
    /// Column name of the key in summary tables
    pub fn name(self) -> &'static str {
        match self {
            Dimension::Hotel => "hotel",
            Dimension::Canceled => "is_canceled",
            Dimension::CustomerType => "customer_type",
            Dimension::DepositType => "deposit_type",
            Dimension::MarketSegment => "market_segment",
            Dimension::DistributionChannel => "distribution_channel",
            Dimension::Country => "country",
            Dimension::Year => "year",
            Dimension::Month => "month",
            Dimension::Season => "season",
            Dimension::Weekday => "weekday",
            Dimension::LeadTimeBucket => "lead_time_bucket",
            Dimension::SpecialRequests => "total_of_special_requests",
            Dimension::ParkingSpaces => "required_car_parking_spaces",
            Dimension::ChildrenBucket => "children_bucket",
            Dimension::CancellationLeadBucket => "cancellation_lead_bucket",
        }
    }

    /// Whether the key depends on the configured date basis
    pub fn is_temporal(self) -> bool {
        matches!(
            self,
            Dimension::Year | Dimension::Month | Dimension::Season | Dimension::Weekday
        )
    }

    /// Key extractor for this dimension
    ///
    /// Weekday is undefined for an invalid arrival date, and the cancellation
    /// lead bucket for a canceled booking without one; those records are
    /// excluded from the grouping.
    pub fn key<'a, 'r>(self, context: &'a ReportContext) -> GroupingKey<'a, &'r AnalyzedBooking> {
        let basis = context.date_basis;
        let name = self.name();

        match self {
            Dimension::Hotel => GroupingKey::total(name, |b: &&AnalyzedBooking| {
                KeyValue::ordinal(b.booking.hotel.rank(), b.booking.hotel.label())
            }),
            Dimension::Canceled => GroupingKey::total(name, |b: &&AnalyzedBooking| {
                KeyValue::Flag(b.booking.is_canceled)
            }),
            Dimension::CustomerType => GroupingKey::total(name, |b: &&AnalyzedBooking| {
                KeyValue::category(&b.booking.customer_type)
            }),
            Dimension::DepositType => GroupingKey::total(name, |b: &&AnalyzedBooking| {
                KeyValue::category(&b.booking.deposit_type)
            }),
            Dimension::MarketSegment => GroupingKey::total(name, |b: &&AnalyzedBooking| {
                KeyValue::category(&b.booking.market_segment)
            }),
            Dimension::DistributionChannel => GroupingKey::total(name, |b: &&AnalyzedBooking| {
                KeyValue::category(&b.booking.distribution_channel)
            }),
            Dimension::Country => GroupingKey::total(name, |b: &&AnalyzedBooking| {
                KeyValue::text(b.booking.country.as_deref().unwrap_or(UNKNOWN_COUNTRY))
            }),
            Dimension::Year => GroupingKey::total(name, move |b: &&AnalyzedBooking| {
                KeyValue::Integer(i64::from(b.year(basis)))
            }),
            Dimension::Month => GroupingKey::total(name, move |b: &&AnalyzedBooking| {
                KeyValue::month(b.month(basis))
            }),
            Dimension::Season => GroupingKey::total(name, move |b: &&AnalyzedBooking| {
                KeyValue::season(b.season(basis))
            }),
            Dimension::Weekday => GroupingKey::new(name, move |b: &&AnalyzedBooking| {
                b.weekday(basis).map(KeyValue::weekday)
            }),
            Dimension::LeadTimeBucket => GroupingKey::total(name, move |b: &&AnalyzedBooking| {
                KeyValue::bin(context.lead_time_bins.assign(f64::from(b.booking.lead_time)))
            }),
            Dimension::SpecialRequests => GroupingKey::total(name, |b: &&AnalyzedBooking| {
                KeyValue::Integer(i64::from(b.booking.total_of_special_requests))
            }),
            Dimension::ParkingSpaces => GroupingKey::total(name, |b: &&AnalyzedBooking| {
                KeyValue::Integer(i64::from(b.booking.required_car_parking_spaces))
            }),
            Dimension::ChildrenBucket => GroupingKey::total(name, move |b: &&AnalyzedBooking| {
                KeyValue::bin(context.children_bins.assign(f64::from(b.booking.children)))
            }),
            Dimension::CancellationLeadBucket => {
                GroupingKey::new(name, move |b: &&AnalyzedBooking| {
                    b.derived
                        .cancellation_lead_time
                        .map(|days| KeyValue::bin(context.cancellation_lead_bins.assign(days as f64)))
                })
            }
        }
    }

    /// Known values of the dimension in natural order
    ///
    /// `None` for open domains (countries, counts, years), which only list
    /// the groups that occur.
    pub fn domain(self, context: &ReportContext) -> Option<Vec<KeyValue>> {
        let values = match self {
            Dimension::Hotel => Hotel::ALL
                .iter()
                .map(|h| KeyValue::ordinal(h.rank(), h.label()))
                .collect(),
            Dimension::Canceled => vec![KeyValue::Flag(false), KeyValue::Flag(true)],
            Dimension::CustomerType => category_domain::<CustomerType>(),
            Dimension::DepositType => category_domain::<DepositType>(),
            Dimension::MarketSegment => category_domain::<MarketSegment>(),
            Dimension::DistributionChannel => category_domain::<DistributionChannel>(),
            Dimension::Month => (1..=12).map(KeyValue::month).collect(),
            Dimension::Season => Season::ALL.into_iter().map(KeyValue::season).collect(),
            Dimension::Weekday => [
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
                Weekday::Sat,
                Weekday::Sun,
            ]
            .into_iter()
            .map(KeyValue::weekday)
            .collect(),
            Dimension::LeadTimeBucket => bucket_domain(&context.lead_time_bins),
            Dimension::ChildrenBucket => bucket_domain(&context.children_bins),
            Dimension::CancellationLeadBucket => bucket_domain(&context.cancellation_lead_bins),
            Dimension::Country
            | Dimension::Year
            | Dimension::SpecialRequests
            | Dimension::ParkingSpaces => return None,
        };
        Some(values)
    }
}

fn category_domain<T: CategoricalField>() -> Vec<KeyValue> {
    T::ALL
        .iter()
        .map(|value| KeyValue::category(&Category::Known(*value)))
        .collect()
}

fn bucket_domain(binner: &Binner) -> Vec<KeyValue> {
    binner
        .bucket_labels()
        .iter()
        .enumerate()
        .map(|(index, label)| KeyValue::ordinal(index as u32, label.as_str()))
        .collect()
}
