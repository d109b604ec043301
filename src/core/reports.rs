//! JSON shapes served by the report routes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregation::{AggregationResult, YearMonth};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAmount {
    pub date: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Per-day usage of one month plus its rounded total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyUsageReport {
    pub year: i32,
    pub month: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub daily_amounts: Vec<DailyAmount>,
}

impl DailyUsageReport {
    pub fn from_result(month: YearMonth, result: AggregationResult<u32>) -> Self {
        Self {
            year: month.year(),
            month: month.month(),
            total_amount: result.total,
            daily_amounts: result
                .buckets
                .into_iter()
                .map(|bucket| DailyAmount {
                    date: bucket.key,
                    amount: bucket.amount,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyUsageEntry {
    /// `YYYY/MM`
    pub month: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl MonthlyUsageEntry {
    pub fn series(result: AggregationResult<YearMonth>) -> Vec<Self> {
        result
            .buckets
            .into_iter()
            .map(|bucket| MonthlyUsageEntry {
                month: bucket.key.to_string(),
                amount: bucket.amount,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyUsageEntry {
    pub year: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl YearlyUsageEntry {
    pub fn series(result: AggregationResult<i32>) -> Vec<Self> {
        result
            .buckets
            .into_iter()
            .map(|bucket| YearlyUsageEntry {
                year: bucket.key,
                amount: bucket.amount,
            })
            .collect()
    }
}
