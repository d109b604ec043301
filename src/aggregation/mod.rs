//! Period aggregation: gap-filled day, month and year series over dated
//! monetary records.

pub mod aggregator;
pub mod calendar;
pub mod categories;
pub mod record;
pub mod result;

pub use aggregator::{
    aggregate, aggregate_by_day_of_month, aggregate_by_month, aggregate_by_year, Granularity,
    PeriodSpec,
};
pub use calendar::{days_in_month, is_leap_year, YearMonth};
pub use categories::{count_by_category, CategoryStat, UNCATEGORIZED};
pub use record::MonetaryRecord;
pub use result::{round_currency, AggregationResult, Bucket, PeriodSeries};
