use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calendar::YearMonth;
use super::record::MonetaryRecord;
use super::result::{AggregationResult, Bucket, PeriodSeries};

/// Number of calendar months in the trailing monthly window.
pub const TRAILING_MONTHS: u32 = 12;
/// Years on each side of the base year in the yearly window.
pub const YEAR_SPAN: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    DayOfMonth,
    Month,
    Year,
}

/// Target period of an aggregation together with its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PeriodSpec {
    /// Every day of the given month.
    DayOfMonth(YearMonth),
    /// The month containing the reference date and the 11 before it.
    Month(NaiveDate),
    /// Ten years either side of the base year.
    Year(i32),
}

impl PeriodSpec {
    pub fn granularity(&self) -> Granularity {
        match self {
            PeriodSpec::DayOfMonth(_) => Granularity::DayOfMonth,
            PeriodSpec::Month(_) => Granularity::Month,
            PeriodSpec::Year(_) => Granularity::Year,
        }
    }
}

/// Aggregates `records` according to `period`.
pub fn aggregate(records: &[MonetaryRecord], period: &PeriodSpec) -> PeriodSeries {
    match *period {
        PeriodSpec::DayOfMonth(month) => {
            PeriodSeries::Daily(aggregate_by_day_of_month(records, month))
        }
        PeriodSpec::Month(reference) => {
            PeriodSeries::Monthly(aggregate_by_month(records, reference))
        }
        PeriodSpec::Year(base_year) => PeriodSeries::Yearly(aggregate_by_year(records, base_year)),
    }
}

/// Sums records per day of `month`, one bucket for every day of the month.
///
/// Records are included from the first day at 00:00:00 through the last day
/// at 23:59:59; anything later, even by a fraction of a second, is excluded.
pub fn aggregate_by_day_of_month(
    records: &[MonetaryRecord],
    month: YearMonth,
) -> AggregationResult<u32> {
    let days = month.days();
    let (start, end) = month.bounds();
    let mut amounts = vec![Decimal::ZERO; days as usize];

    for record in records {
        if record.occurred_at < start || record.occurred_at > end {
            continue;
        }
        let index = record.occurred_at.day() as usize - 1;
        amounts[index] = amounts[index].saturating_add(record.amount);
    }

    let buckets = amounts
        .into_iter()
        .zip(1..=days)
        .map(|(amount, day)| Bucket { key: day, amount })
        .collect();
    AggregationResult::from_buckets(buckets)
}

/// Sums records per calendar month over the trailing window ending with the
/// month of `reference`, oldest month first.
pub fn aggregate_by_month(
    records: &[MonetaryRecord],
    reference: NaiveDate,
) -> AggregationResult<YearMonth> {
    let newest = YearMonth::of(reference);
    let oldest = newest.shift(-(TRAILING_MONTHS as i32 - 1));
    let mut buckets: Vec<Bucket<YearMonth>> = (0..TRAILING_MONTHS as i32)
        .map(|offset| Bucket {
            key: oldest.shift(offset),
            amount: Decimal::ZERO,
        })
        .collect();

    for record in records {
        let key = YearMonth::of(record.occurred_at.date());
        if key < oldest || key > newest {
            continue;
        }
        if let Some(bucket) = buckets.iter_mut().find(|bucket| bucket.key == key) {
            bucket.amount = bucket.amount.saturating_add(record.amount);
        }
    }

    AggregationResult::from_buckets(buckets)
}

/// Sums records per year for `base_year - 10 ..= base_year + 10`, most
/// recent year first.
///
/// `base_year` is clamped so the whole window stays inside the calendar
/// range chrono can represent; the series always has 21 buckets.
pub fn aggregate_by_year(records: &[MonetaryRecord], base_year: i32) -> AggregationResult<i32> {
    let base_year = base_year.clamp(
        NaiveDate::MIN.year() + YEAR_SPAN,
        NaiveDate::MAX.year() - YEAR_SPAN,
    );
    let first = base_year - YEAR_SPAN;
    let last = base_year + YEAR_SPAN;
    let mut buckets: Vec<Bucket<i32>> = (first..=last)
        .rev()
        .map(|year| Bucket {
            key: year,
            amount: Decimal::ZERO,
        })
        .collect();

    for record in records {
        let year = record.occurred_at.year();
        if year < first || year > last {
            continue;
        }
        let index = (last - year) as usize;
        buckets[index].amount = buckets[index].amount.saturating_add(record.amount);
    }

    AggregationResult::from_buckets(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use rust_decimal_macros::dec;

    fn at(raw: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").unwrap()
    }

    fn record(raw: &str, amount: Decimal) -> MonetaryRecord {
        MonetaryRecord::new(at(raw), amount)
    }

    #[test]
    fn empty_february_in_leap_year_has_29_zero_buckets() {
        let result = aggregate_by_day_of_month(&[], YearMonth::new(2024, 2).unwrap());
        assert_eq!(result.len(), 29);
        assert!(result.buckets.iter().all(|b| b.amount == Decimal::ZERO));
        assert_eq!(result.total, Decimal::ZERO);
    }

    #[test]
    fn same_day_records_sum_into_one_bucket() {
        let records = vec![
            record("2025-03-05 09:00:00", dec!(1500)),
            record("2025-03-05 17:30:00", dec!(500)),
        ];
        let result = aggregate_by_day_of_month(&records, YearMonth::new(2025, 3).unwrap());
        assert_eq!(result.len(), 31);
        assert_eq!(result.amount_for(&5), Some(dec!(2000)));
        assert_eq!(result.total, dec!(2000));
        let others: Decimal = result
            .buckets
            .iter()
            .filter(|b| b.key != 5)
            .map(|b| b.amount)
            .sum();
        assert_eq!(others, Decimal::ZERO);
    }

    #[test]
    fn month_boundary_is_inclusive_to_last_second() {
        let records = vec![
            record("2025-03-31 23:59:59", dec!(10)),
            record("2025-03-31 23:59:59.250", dec!(20)),
            record("2025-04-01 00:00:00", dec!(40)),
            record("2025-02-28 23:59:59", dec!(80)),
        ];
        let result = aggregate_by_day_of_month(&records, YearMonth::new(2025, 3).unwrap());
        assert_eq!(result.amount_for(&31), Some(dec!(10)));
        assert_eq!(result.total, dec!(10));
    }

    #[test]
    fn monthly_window_spans_year_boundary() {
        let reference = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let records = vec![
            record("2024-07-01 00:00:00", dec!(3)),
            record("2024-06-30 23:59:59", dec!(100)),
            record("2025-06-30 12:00:00", dec!(4)),
            record("2025-07-01 00:00:00", dec!(100)),
        ];
        let result = aggregate_by_month(&records, reference);
        let keys: Vec<String> = result.buckets.iter().map(|b| b.key.to_string()).collect();
        assert_eq!(keys.len(), 12);
        assert_eq!(keys.first().map(String::as_str), Some("2024/07"));
        assert_eq!(keys.last().map(String::as_str), Some("2025/06"));
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(result.buckets[0].amount, dec!(3));
        assert_eq!(result.buckets[11].amount, dec!(4));
        assert_eq!(result.total, dec!(7));
    }

    #[test]
    fn yearly_window_is_descending() {
        let records = vec![
            record("2015-01-01 00:00:00", dec!(1)),
            record("2035-12-31 23:59:59", dec!(2)),
            record("2014-12-31 23:59:59", dec!(100)),
            record("2036-01-01 00:00:00", dec!(100)),
        ];
        let result = aggregate_by_year(&records, 2025);
        assert_eq!(result.len(), 21);
        assert_eq!(result.buckets.first().map(|b| b.key), Some(2035));
        assert_eq!(result.buckets.last().map(|b| b.key), Some(2015));
        assert!(result.buckets.windows(2).all(|w| w[0].key > w[1].key));
        assert_eq!(result.amount_for(&2035), Some(dec!(2)));
        assert_eq!(result.amount_for(&2015), Some(dec!(1)));
        assert_eq!(result.total, dec!(3));
    }

    #[test]
    fn yearly_window_is_clamped_at_calendar_limits() {
        let high = aggregate_by_year(&[], i32::MAX);
        assert_eq!(high.len(), 21);
        assert_eq!(high.buckets.first().map(|b| b.key), Some(NaiveDate::MAX.year()));

        let low = aggregate_by_year(&[], i32::MIN);
        assert_eq!(low.len(), 21);
        assert_eq!(low.buckets.last().map(|b| b.key), Some(NaiveDate::MIN.year()));
    }

    #[test]
    fn bucket_sums_saturate_instead_of_panicking() {
        let records = vec![
            record("2025-03-05 09:00:00", Decimal::MAX),
            record("2025-03-05 10:00:00", Decimal::MAX),
            record("2025-03-06 10:00:00", Decimal::MAX),
        ];
        let daily = aggregate_by_day_of_month(&records, YearMonth::new(2025, 3).unwrap());
        assert_eq!(daily.amount_for(&5), Some(Decimal::MAX));
        assert_eq!(daily.total, Decimal::MAX);

        let yearly = aggregate_by_year(&records, 2025);
        assert_eq!(yearly.amount_for(&2025), Some(Decimal::MAX));
    }

    #[test]
    fn dispatch_matches_granularity() {
        let spec = PeriodSpec::Year(2000);
        assert_eq!(spec.granularity(), Granularity::Year);
        match aggregate(&[], &spec) {
            PeriodSeries::Yearly(result) => assert_eq!(result.len(), 21),
            other => panic!("unexpected series: {other:?}"),
        }
    }
}
