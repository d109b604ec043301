use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::calendar::YearMonth;

/// A single period unit and the amount summed into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket<K> {
    pub key: K,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Gap-filled series of buckets plus the rounded grand total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationResult<K> {
    pub buckets: Vec<Bucket<K>>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl<K> AggregationResult<K> {
    /// Builds the result from finished buckets. The total is rounded once,
    /// after summing the unrounded bucket amounts.
    pub(crate) fn from_buckets(buckets: Vec<Bucket<K>>) -> Self {
        let sum = buckets
            .iter()
            .fold(Decimal::ZERO, |acc, bucket| acc.saturating_add(bucket.amount));
        Self {
            buckets,
            total: round_currency(sum),
        }
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn amount_for(&self, key: &K) -> Option<Decimal>
    where
        K: PartialEq,
    {
        self.buckets
            .iter()
            .find(|bucket| &bucket.key == key)
            .map(|bucket| bucket.amount)
    }
}

/// Output of [`aggregate`](super::aggregate), one variant per granularity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodSeries {
    /// Keyed by day of month, ascending.
    Daily(AggregationResult<u32>),
    /// Keyed by calendar month, ascending.
    Monthly(AggregationResult<YearMonth>),
    /// Keyed by year, descending.
    Yearly(AggregationResult<i32>),
}

impl PeriodSeries {
    pub fn total(&self) -> Decimal {
        match self {
            PeriodSeries::Daily(result) => result.total,
            PeriodSeries::Monthly(result) => result.total,
            PeriodSeries::Yearly(result) => result.total,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PeriodSeries::Daily(result) => result.len(),
            PeriodSeries::Monthly(result) => result.len(),
            PeriodSeries::Yearly(result) => result.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Rounds to a whole currency unit, halves away from zero.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
