#![doc(test(attr(deny(warnings))))]

//! Inventory usage reporting: gap-filled day, month and year aggregations of
//! dated monetary records, plus the record fetching, mapping and route
//! handling around them.

pub mod aggregation;
pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod source;
pub mod utils;

pub use aggregation::{
    aggregate, aggregate_by_day_of_month, aggregate_by_month, aggregate_by_year,
    AggregationResult, Bucket, MonetaryRecord, PeriodSeries, PeriodSpec, YearMonth,
};
pub use errors::{ReportError, ReportResult};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Inventory usage tracing initialized.");
    });
}
