//! Summary table export for external chart rendering
//!
//! Each report becomes one file with a text column per grouping key followed
//! by `count` and `value`. Undefined values (e.g. the rate of an empty group)
//! are written as nulls. A `manifest.json` next to the files lists every
//! report with its chart hint, key columns and exclusion counts, which is all
//! a renderer needs to draw the figures without knowing the report catalog.

pub mod frame;
pub mod manifest;
pub mod writer;

#[cfg(test)]
pub mod tests;

pub use frame::{COUNT_COLUMN, VALUE_COLUMN, report_to_dataframe};
pub use manifest::{ExportManifest, MANIFEST_FILE_NAME, ManifestEntry};
pub use writer::{ExportResult, SummaryExporter, write_dataframe};
