use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One dated, monetary-valued input to an aggregation.
///
/// `occurred_at` is wall-clock time in the reporting time zone and `amount`
/// is already resolved by the caller (the aggregator never interprets it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonetaryRecord {
    pub occurred_at: NaiveDateTime,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl MonetaryRecord {
    pub fn new(occurred_at: NaiveDateTime, amount: Decimal) -> Self {
        Self {
            occurred_at,
            amount,
        }
    }
}
