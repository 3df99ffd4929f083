//! Schema normalization for raw booking records
//!
//! This module validates raw field mappings (field name to untyped value) and
//! casts them into typed [`Booking`](crate::app::models::Booking) records.
//!
//! # Record-level failure policy
//!
//! - A required field that is absent or cannot be coerced rejects the record
//!   with a schema error. The record is excluded and counted; the batch continues.
//! - Extra fields not part of the booking model are ignored.
//! - Categorical fields (reservation status, customer type, distribution
//!   channel, market segment, deposit type) keep unknown values verbatim as
//!   their own category and flag them on the booking.
//!
//! # Example Usage
//!
//! ```rust
//! use booking_insights::app::services::schema_normalizer::SchemaNormalizer;
//!
//! let result = SchemaNormalizer::new().normalize(&[]);
//! assert_eq!(result.booking_count(), 0);
//! assert_eq!(result.stats.rejected, 0);
//! ```

pub mod field_parsers;
pub mod normalizer;
pub mod stats;

#[cfg(test)]
pub mod tests;

pub use normalizer::SchemaNormalizer;
pub use stats::{NormalizationResult, NormalizationStats};
