//! Tests for summary export


use crate::app::services::reports::{Report, find_report};
use crate::app::services::reports::tests::{default_runner, transient_and_group};

/// Customer-type cancellation report over the Transient/Group bookings
pub fn customer_type_report() -> Report {
    default_runner()
        .run(
            &transient_and_group(),
            find_report("cancellation_by_customer_type").unwrap(),
        )
        .unwrap()
}

/// Customer type by cancellation flag cross-tabulation
pub fn cross_tab_report() -> Report {
    default_runner()
        .run(
            &transient_and_group(),
            find_report("customer_type_vs_cancellation").unwrap(),
        )
        .unwrap()
}
