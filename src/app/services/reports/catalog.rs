//! Named report definitions

use super::dimension::Dimension;
use super::dimension::Dimension as D;
use crate::app::models::AnalyzedBooking;
use crate::app::services::aggregator::GroupOrdering::{
    self, DescendingCount, DescendingValue, Natural,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Chart hint passed to the external renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Area,
    Histogram,
    Scatter,
}

impl ChartKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Area => "area",
            ChartKind::Histogram => "histogram",
            ChartKind::Scatter => "scatter",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value computed for each group of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    /// Number of bookings
    Count,
    /// Share of canceled bookings
    CancellationRate,
    /// Share of each second-key value within its first-key group
    RowPercentage,
    /// Mean average daily rate
    MeanAdr,
}

/// Bookings a report looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    CanceledOnly,
}

impl Scope {
    pub fn includes(self, booking: &AnalyzedBooking) -> bool {
        match self {
            Scope::All => true,
            Scope::CanceledOnly => booking.booking.is_canceled,
        }
    }
}

/// Post-processing applied to the aggregated table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Every group, including requested empty ones
    All,
    /// Groups above the minimum size, cut to the configured top N by value
    TopByValue,
}

/// A named analysis expressed as a grouped aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportDefinition {
    pub name: &'static str,
    pub title: &'static str,
    pub dimensions: &'static [Dimension],
    pub measure: Measure,
    pub scope: Scope,
    pub selection: Selection,
    pub chart: ChartKind,
    pub ordering: GroupOrdering,
}

impl ReportDefinition {
    const fn rate(
        name: &'static str,
        title: &'static str,
        dimensions: &'static [Dimension],
        ordering: GroupOrdering,
    ) -> Self {
        Self {
            name,
            title,
            dimensions,
            measure: Measure::CancellationRate,
            scope: Scope::All,
            selection: Selection::All,
            chart: ChartKind::Bar,
            ordering,
        }
    }

    const fn cross_tab(name: &'static str, title: &'static str, dimensions: &'static [Dimension]) -> Self {
        Self {
            name,
            title,
            dimensions,
            measure: Measure::RowPercentage,
            scope: Scope::All,
            selection: Selection::All,
            chart: ChartKind::Bar,
            ordering: Natural,
        }
    }

    const fn with_chart(mut self, chart: ChartKind) -> Self {
        self.chart = chart;
        self
    }

    /// Whether any grouping key depends on the date basis
    pub fn is_temporal(&self) -> bool {
        self.dimensions.iter().any(|d| d.is_temporal())
    }

    pub fn key_names(&self) -> Vec<&'static str> {
        self.dimensions.iter().map(|d| d.name()).collect()
    }
}

/// Every report, in presentation order
pub const CATALOG: &[ReportDefinition] = &[
    ReportDefinition::rate("cancellation_by_hotel", "Cancellation rate by hotel", &[D::Hotel], Natural),
    ReportDefinition::rate(
        "cancellation_by_customer_type",
        "Cancellation rate by customer type",
        &[D::CustomerType],
        DescendingCount,
    ),
    ReportDefinition::rate(
        "cancellation_by_deposit_type",
        "Cancellation rate by deposit type",
        &[D::DepositType],
        DescendingValue,
    ),
    ReportDefinition::rate(
        "cancellation_by_market_segment",
        "Cancellation rate by market segment",
        &[D::MarketSegment],
        DescendingValue,
    ),
    ReportDefinition::rate(
        "cancellation_by_distribution_channel",
        "Cancellation rate by distribution channel",
        &[D::DistributionChannel],
        DescendingValue,
    ),
    ReportDefinition {
        name: "cancellation_by_country",
        title: "Countries with the highest cancellation rate",
        dimensions: &[D::Country],
        measure: Measure::CancellationRate,
        scope: Scope::All,
        selection: Selection::TopByValue,
        chart: ChartKind::Bar,
        ordering: DescendingValue,
    },
    ReportDefinition::rate(
        "cancellation_by_month",
        "Cancellation rate by month",
        &[D::Month],
        Natural,
    )
    .with_chart(ChartKind::Line),
    ReportDefinition::rate(
        "cancellation_by_season",
        "Cancellation rate by season",
        &[D::Season],
        Natural,
    ),
    ReportDefinition::rate(
        "cancellation_by_weekday",
        "Cancellation rate by weekday",
        &[D::Weekday],
        Natural,
    ),
    ReportDefinition::rate(
        "cancellation_by_lead_time",
        "Cancellation rate by lead time",
        &[D::LeadTimeBucket],
        Natural,
    ),
    ReportDefinition::rate(
        "cancellation_by_special_requests",
        "Cancellation rate by number of special requests",
        &[D::SpecialRequests],
        Natural,
    ),
    ReportDefinition::rate(
        "cancellation_by_parking",
        "Cancellation rate by required parking spaces",
        &[D::ParkingSpaces],
        Natural,
    ),
    ReportDefinition::rate(
        "cancellation_by_children",
        "Cancellation rate by number of children",
        &[D::ChildrenBucket],
        Natural,
    ),
    ReportDefinition::cross_tab(
        "customer_type_vs_cancellation",
        "Canceled share per customer type",
        &[D::CustomerType, D::Canceled],
    ),
    ReportDefinition::cross_tab(
        "deposit_type_vs_cancellation",
        "Canceled share per deposit type",
        &[D::DepositType, D::Canceled],
    ),
    ReportDefinition::cross_tab(
        "hotel_vs_cancellation",
        "Canceled share per hotel",
        &[D::Hotel, D::Canceled],
    ),
    ReportDefinition {
        name: "bookings_by_month",
        title: "Bookings per month",
        dimensions: &[D::Year, D::Month],
        measure: Measure::Count,
        scope: Scope::All,
        selection: Selection::All,
        chart: ChartKind::Area,
        ordering: Natural,
    },
    ReportDefinition {
        name: "adr_by_month",
        title: "Average daily rate per hotel and month",
        dimensions: &[D::Hotel, D::Month],
        measure: Measure::MeanAdr,
        scope: Scope::All,
        selection: Selection::All,
        chart: ChartKind::Line,
        ordering: Natural,
    },
    ReportDefinition {
        name: "adr_by_lead_time",
        title: "Average daily rate by lead time",
        dimensions: &[D::LeadTimeBucket],
        measure: Measure::MeanAdr,
        scope: Scope::All,
        selection: Selection::All,
        chart: ChartKind::Scatter,
        ordering: Natural,
    },
    ReportDefinition {
        name: "cancellation_lead_time",
        title: "Days between cancellation and arrival",
        dimensions: &[D::CancellationLeadBucket],
        measure: Measure::Count,
        scope: Scope::CanceledOnly,
        selection: Selection::All,
        chart: ChartKind::Histogram,
        ordering: Natural,
    },
];

/// Look up a report by name
pub fn find_report(name: &str) -> Result<&'static ReportDefinition> {
    let wanted = name.trim();
    CATALOG
        .iter()
        .find(|report| report.name == wanted)
        .ok_or_else(|| Error::unknown_report(wanted))
}

/// Resolve report names in the given order; an empty list selects every report
pub fn select_reports(names: &[String]) -> Result<Vec<&'static ReportDefinition>> {
    if names.is_empty() {
        return Ok(CATALOG.iter().collect());
    }
    names.iter().map(|name| find_report(name)).collect()
}

/// Names of all reports
pub fn report_names() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|report| report.name)
}
