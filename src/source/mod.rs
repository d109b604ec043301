//! Record families fetched from the inventory backend and their mapping
//! into [`MonetaryRecord`]s.

pub mod http;
mod lenient;

use std::{fs, path::Path};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregation::MonetaryRecord;
use crate::errors::ReportResult;

pub use http::HttpRecordSource;

/// Anything that can hand over the full item and stock-movement lists.
pub trait RecordSource {
    fn fetch_items(&self) -> ReportResult<Vec<ItemRecord>>;
    fn fetch_stock_movements(&self) -> ReportResult<Vec<StockMovementRecord>>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
    #[serde(default, deserialize_with = "lenient::value")]
    pub name: Option<String>,
}

/// An inventory item as returned by `GET /api/items`.
///
/// Every field is optional on the wire. Values of the wrong shape decode as
/// `None`, so one malformed item never rejects the page it arrived in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient::value")]
    pub name: Option<String>,
    #[serde(default, alias = "createdAt", deserialize_with = "lenient::value")]
    pub created_at: Option<String>,
    #[serde(
        default,
        alias = "unitPrice",
        deserialize_with = "lenient::decimal",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub unit_price: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "lenient::decimal",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub quantity: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::value")]
    pub category: Option<CategoryRef>,
}

impl ItemRecord {
    /// `unit_price × quantity`, with quantity defaulting to 1. Items without
    /// a unit price are worth nothing. `None` when the product overflows.
    pub fn usage_amount(&self) -> Option<Decimal> {
        match self.unit_price {
            Some(price) => price.checked_mul(self.quantity.unwrap_or(Decimal::ONE)),
            None => Some(Decimal::ZERO),
        }
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().and_then(|c| c.name.as_deref())
    }

    pub fn to_monetary(&self, offset: &FixedOffset) -> Result<MonetaryRecord, Rejection> {
        let occurred_at = occurred_at(self.created_at.as_deref(), offset)?;
        let amount = self.usage_amount().ok_or(Rejection::AmountOverflow)?;
        Ok(MonetaryRecord::new(occurred_at, amount))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementKind {
    In,
    Out,
    Adjust,
    Transfer,
}

/// One entry of the stock-movement history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovementRecord {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default, alias = "itemCode", deserialize_with = "lenient::value")]
    pub item_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::value")]
    pub kind: Option<MovementKind>,
    #[serde(
        default,
        alias = "qtyDelta",
        deserialize_with = "lenient::decimal",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub qty_delta: Option<Decimal>,
    #[serde(
        default,
        alias = "unitPrice",
        deserialize_with = "lenient::decimal",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub unit_price: Option<Decimal>,
    #[serde(default, alias = "createdAt", deserialize_with = "lenient::value")]
    pub created_at: Option<String>,
}

/// How a signed stock delta becomes an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementAmount {
    Signed,
    Absolute,
}

impl StockMovementRecord {
    /// `qty_delta × unit_price` (unit price defaulting to 1), signed or
    /// absolute according to `policy`. A missing delta counts as zero;
    /// `None` when the product overflows.
    pub fn amount(&self, policy: MovementAmount) -> Option<Decimal> {
        let delta = self.qty_delta.unwrap_or(Decimal::ZERO);
        let value = delta.checked_mul(self.unit_price.unwrap_or(Decimal::ONE))?;
        Some(match policy {
            MovementAmount::Signed => value,
            MovementAmount::Absolute => value.abs(),
        })
    }

    pub fn to_monetary(
        &self,
        policy: MovementAmount,
        offset: &FixedOffset,
    ) -> Result<MonetaryRecord, Rejection> {
        let occurred_at = occurred_at(self.created_at.as_deref(), offset)?;
        let amount = self.amount(policy).ok_or(Rejection::AmountOverflow)?;
        Ok(MonetaryRecord::new(occurred_at, amount))
    }
}

/// Why a backend record was left out of every bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingTimestamp,
    UnparseableTimestamp,
    AmountOverflow,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Rejection::MissingTimestamp => "missing timestamp",
            Rejection::UnparseableTimestamp => "unparseable timestamp",
            Rejection::AmountOverflow => "amount overflows",
        })
    }
}

fn occurred_at(raw: Option<&str>, offset: &FixedOffset) -> Result<NaiveDateTime, Rejection> {
    let raw = raw.ok_or(Rejection::MissingTimestamp)?;
    parse_timestamp(raw, offset).ok_or(Rejection::UnparseableTimestamp)
}

/// Which record family feeds a usage report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UsageBasis {
    #[default]
    Items,
    StockMovements(MovementAmount),
}

/// Parses a backend timestamp into wall-clock time at `offset`.
///
/// Timestamps carrying an offset (RFC 3339) are converted; naive date-times
/// and bare dates are taken as already local.
pub fn parse_timestamp(raw: &str, offset: &FixedOffset) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(offset).naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

pub fn map_items(items: &[ItemRecord], offset: &FixedOffset) -> Vec<MonetaryRecord> {
    items
        .iter()
        .filter_map(|item| match item.to_monetary(offset) {
            Ok(record) => Some(record),
            Err(reason) => {
                tracing::warn!(
                    id = ?item.id,
                    created_at = ?item.created_at,
                    %reason,
                    "dropping item"
                );
                None
            }
        })
        .collect()
}

pub fn map_movements(
    movements: &[StockMovementRecord],
    policy: MovementAmount,
    offset: &FixedOffset,
) -> Vec<MonetaryRecord> {
    movements
        .iter()
        .filter_map(|movement| match movement.to_monetary(policy, offset) {
            Ok(record) => Some(record),
            Err(reason) => {
                tracing::warn!(
                    id = ?movement.id,
                    created_at = ?movement.created_at,
                    %reason,
                    "dropping stock movement"
                );
                None
            }
        })
        .collect()
}

/// Records held in memory, e.g. loaded from a JSON snapshot of the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemoryRecordSource {
    #[serde(default)]
    pub items: Vec<ItemRecord>,
    #[serde(default)]
    pub movements: Vec<StockMovementRecord>,
}

impl InMemoryRecordSource {
    pub fn new(items: Vec<ItemRecord>, movements: Vec<StockMovementRecord>) -> Self {
        Self { items, movements }
    }

    /// Reads `{ "items": [...], "movements": [...] }` from disk.
    pub fn from_json_file(path: &Path) -> ReportResult<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

impl RecordSource for InMemoryRecordSource {
    fn fetch_items(&self) -> ReportResult<Vec<ItemRecord>> {
        Ok(self.items.clone())
    }

    fn fetch_stock_movements(&self) -> ReportResult<Vec<StockMovementRecord>> {
        Ok(self.movements.clone())
    }
}
