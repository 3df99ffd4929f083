//! Conversion of report tables into data frames

use crate::app::services::reports::Report;
use crate::Result;
use polars::prelude::{Column, DataFrame};

/// Name of the group size column
pub const COUNT_COLUMN: &str = "count";

/// Name of the aggregated value column; null where the value is undefined
pub const VALUE_COLUMN: &str = "value";

/// Build a frame with one text column per grouping key, then `count` and
/// `value`, in the report's row order
pub fn report_to_dataframe(report: &Report) -> Result<DataFrame> {
    let rows = report.rows();
    let key_names = &report.table.key_names;

    let mut columns: Vec<Column> = key_names
        .iter()
        .enumerate()
        .map(|(position, name)| {
            let labels: Vec<String> = rows
                .iter()
                .map(|(key, _)| {
                    key.values()
                        .get(position)
                        .map(|value| value.label())
                        .unwrap_or_default()
                })
                .collect();
            Column::new(name.as_str().into(), labels)
        })
        .collect();

    let counts: Vec<u64> = rows.iter().map(|(_, row)| row.count as u64).collect();
    let values: Vec<Option<f64>> = rows.iter().map(|(_, row)| row.value.value()).collect();
    columns.push(Column::new(COUNT_COLUMN.into(), counts));
    columns.push(Column::new(VALUE_COLUMN.into(), values));

    Ok(DataFrame::new(columns)?)
}
