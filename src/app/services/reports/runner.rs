//! Runs report definitions over analyzed bookings

use super::catalog::{Measure, ReportDefinition, Selection, select_reports};
use super::dimension::ReportContext;
use crate::app::models::{AnalyzedBooking, DateBasis};
use crate::app::services::aggregator::{
    Aggregation, GroupKey, GroupOrdering, GroupedAggregator, SummaryRow, SummaryTable, cartesian,
};
use crate::config::AnalysisConfig;
use crate::Result;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// A finished report: its definition, the parameters it ran with and its table
#[derive(Debug, Clone)]
pub struct Report {
    pub definition: &'static ReportDefinition,
    /// Ordering used for listing, after configuration overrides
    pub ordering: GroupOrdering,
    /// Date basis of temporal keys; `None` for reports without one
    pub date_basis: Option<DateBasis>,
    pub year: Option<i32>,
    /// Bookings left out by the year filter or the report scope
    pub filtered_out: usize,
    pub table: SummaryTable,
}

impl Report {
    pub fn name(&self) -> &'static str {
        self.definition.name
    }

    pub fn title(&self) -> &'static str {
        self.definition.title
    }

    /// Rows in the report's ordering
    pub fn rows(&self) -> Vec<(&GroupKey, &SummaryRow)> {
        self.table.ordered(self.ordering)
    }
}

/// Runs reports with a fixed analysis configuration
#[derive(Debug, Clone)]
pub struct ReportRunner {
    context: ReportContext,
    ordering_overrides: BTreeMap<String, GroupOrdering>,
}

impl ReportRunner {
    pub fn new(context: ReportContext) -> Self {
        Self {
            context,
            ordering_overrides: BTreeMap::new(),
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        Ok(Self::new(ReportContext::from_config(config)?)
            .with_ordering_overrides(config.ordering.clone()))
    }

    pub fn with_ordering_overrides(mut self, overrides: BTreeMap<String, GroupOrdering>) -> Self {
        self.ordering_overrides = overrides;
        self
    }

    pub fn context(&self) -> &ReportContext {
        &self.context
    }

    /// Run the named reports (all when empty) in the given order
    ///
    /// Fails before running anything if a name is unknown.
    pub fn run_named(&self, bookings: &[AnalyzedBooking], names: &[String]) -> Result<Vec<Report>> {
        let definitions = select_reports(names)?;
        info!(
            "Running {} reports over {} bookings",
            definitions.len(),
            bookings.len()
        );
        definitions
            .into_iter()
            .map(|definition| self.run(bookings, definition))
            .collect()
    }

    /// Run a single report
    pub fn run(
        &self,
        bookings: &[AnalyzedBooking],
        definition: &'static ReportDefinition,
    ) -> Result<Report> {
        let selected: Vec<&AnalyzedBooking> = bookings
            .iter()
            .filter(|b| self.context.in_year(b) && definition.scope.includes(b))
            .collect();

        let mut aggregator = definition
            .dimensions
            .iter()
            .fold(GroupedAggregator::new(), |aggregator, dimension| {
                aggregator.by(dimension.key(&self.context))
            });

        if definition.selection == Selection::All {
            let domains: Option<Vec<_>> = definition
                .dimensions
                .iter()
                .map(|dimension| dimension.domain(&self.context))
                .collect();
            if let Some(domains) = domains {
                aggregator = aggregator.expect_groups(cartesian(&domains));
            }
        }

        let aggregation = match definition.measure {
            Measure::Count => Aggregation::Count,
            Measure::CancellationRate => {
                Aggregation::rate(|b: &&AnalyzedBooking| b.booking.is_canceled)
            }
            Measure::RowPercentage => Aggregation::RowPercentage,
            Measure::MeanAdr => Aggregation::mean(|b: &&AnalyzedBooking| Some(b.booking.adr)),
        };

        let mut table = aggregator.aggregate(&selected, &aggregation)?;

        if definition.selection == Selection::TopByValue {
            table = table
                .with_min_count(self.context.min_country_bookings)
                .top(self.context.top_countries, GroupOrdering::DescendingValue);
        }

        let ordering = self
            .ordering_overrides
            .get(definition.name)
            .copied()
            .unwrap_or(definition.ordering);

        debug!(
            "Report {}: {} groups, {} bookings filtered out, {} excluded",
            definition.name,
            table.len(),
            bookings.len() - selected.len(),
            table.excluded
        );

        Ok(Report {
            definition,
            ordering,
            date_basis: definition
                .is_temporal()
                .then_some(self.context.date_basis),
            year: self.context.year,
            filtered_out: bookings.len() - selected.len(),
            table,
        })
    }
}
