use chrono::{FixedOffset, NaiveDate};

use crate::aggregation::{
    aggregate_by_day_of_month, aggregate_by_month, aggregate_by_year, count_by_category,
    CategoryStat, MonetaryRecord, YearMonth,
};
use crate::core::clock::Clock;
use crate::core::reports::{DailyUsageReport, MonthlyUsageEntry, YearlyUsageEntry};
use crate::errors::ReportResult;
use crate::source::{map_items, map_movements, RecordSource, UsageBasis};

/// Fetches records, maps them at the reporting offset and aggregates them.
pub struct ReportService<S, C> {
    source: S,
    clock: C,
    offset: FixedOffset,
}

impl<S: RecordSource, C: Clock> ReportService<S, C> {
    pub fn new(source: S, clock: C, offset: FixedOffset) -> Self {
        Self {
            source,
            clock,
            offset,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today_at(&self.offset)
    }

    pub fn records(&self, basis: UsageBasis) -> ReportResult<Vec<MonetaryRecord>> {
        let records = match basis {
            UsageBasis::Items => {
                let items = self.source.fetch_items()?;
                map_items(&items, &self.offset)
            }
            UsageBasis::StockMovements(policy) => {
                let movements = self.source.fetch_stock_movements()?;
                map_movements(&movements, policy, &self.offset)
            }
        };
        tracing::debug!(?basis, count = records.len(), "mapped records");
        Ok(records)
    }

    pub fn daily_usage(
        &self,
        month: YearMonth,
        basis: UsageBasis,
    ) -> ReportResult<DailyUsageReport> {
        tracing::debug!(year = month.year(), month = month.month(), "daily usage requested");
        let records = self.records(basis)?;
        let result = aggregate_by_day_of_month(&records, month);
        let active_days = result.buckets.iter().filter(|b| !b.amount.is_zero()).count();
        tracing::info!(
            days = result.len(),
            active_days,
            total = %result.total,
            "daily usage aggregated"
        );
        Ok(DailyUsageReport::from_result(month, result))
    }

    /// Trailing twelve months ending with the current month.
    pub fn monthly_usage(&self, basis: UsageBasis) -> ReportResult<Vec<MonthlyUsageEntry>> {
        let reference = self.today();
        tracing::debug!(%reference, "monthly usage requested");
        let records = self.records(basis)?;
        let result = aggregate_by_month(&records, reference);
        tracing::info!(months = result.len(), total = %result.total, "monthly usage aggregated");
        Ok(MonthlyUsageEntry::series(result))
    }

    pub fn yearly_usage(
        &self,
        base_year: i32,
        basis: UsageBasis,
    ) -> ReportResult<Vec<YearlyUsageEntry>> {
        tracing::debug!(base_year, "yearly usage requested");
        let records = self.records(basis)?;
        let result = aggregate_by_year(&records, base_year);
        let active_years = result.buckets.iter().filter(|b| !b.amount.is_zero()).count();
        tracing::info!(years = result.len(), active_years, "yearly usage aggregated");
        Ok(YearlyUsageEntry::series(result))
    }

    pub fn category_stats(&self) -> ReportResult<Vec<CategoryStat>> {
        let items = self.source.fetch_items()?;
        let stats = count_by_category(items.iter().map(|item| item.category_name()));
        tracing::info!(categories = stats.len(), items = items.len(), "category stats computed");
        Ok(stats)
    }
}
