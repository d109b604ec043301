#![allow(dead_code)]

use std::io;

use chrono::{FixedOffset, NaiveDateTime, TimeZone, Utc};
use inventory_usage::core::clock::FixedClock;
use inventory_usage::core::services::ReportService;
use inventory_usage::source::{
    InMemoryRecordSource, ItemRecord, RecordSource, StockMovementRecord,
};
use inventory_usage::{MonetaryRecord, ReportError, ReportResult};
use rust_decimal::Decimal;
use serde_json::json;

pub fn at(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").expect("valid timestamp")
}

pub fn record(raw: &str, amount: Decimal) -> MonetaryRecord {
    MonetaryRecord::new(at(raw), amount)
}

pub fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).expect("zero offset")
}

/// Clock pinned to noon UTC on 2025-06-15.
pub fn june_clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap())
}

pub fn sample_source() -> InMemoryRecordSource {
    let items: Vec<ItemRecord> = serde_json::from_value(json!([
        { "id": 1, "name": "Screw M5", "created_at": "2025-03-05T09:00:00",
          "unit_price": 1500, "category": { "name": "Fasteners" } },
        { "id": 2, "name": "Nut M5", "created_at": "2025-03-05T18:00:00",
          "unit_price": 250, "quantity": 2, "category": { "name": "Fasteners" } },
        { "id": 3, "name": "Drill", "created_at": "2024-11-20T10:00:00",
          "unit_price": 12000, "category": { "name": "Tools" } },
        { "id": 4, "name": "Gloves", "created_at": "2019-01-01T00:00:00",
          "unit_price": 800 },
        { "id": 5, "name": "Broken", "created_at": "yesterday", "unit_price": 999 },
    ]))
    .expect("valid items");
    let movements: Vec<StockMovementRecord> = serde_json::from_value(json!([
        { "kind": "IN", "qtyDelta": 100, "createdAt": "2025-03-01 10:30:00" },
        { "kind": "OUT", "qtyDelta": -50, "createdAt": "2025-03-01 11:15:00" },
        { "kind": "ADJUST", "qtyDelta": -5, "createdAt": "2025-03-02 14:20:00" },
    ]))
    .expect("valid movements");
    InMemoryRecordSource::new(items, movements)
}

pub fn sample_service() -> ReportService<InMemoryRecordSource, FixedClock> {
    ReportService::new(sample_source(), june_clock(), utc())
}

/// Source whose backend is always unreachable.
pub struct UnreachableSource;

impl RecordSource for UnreachableSource {
    fn fetch_items(&self) -> ReportResult<Vec<ItemRecord>> {
        Err(ReportError::Io(io::Error::new(
            io::ErrorKind::TimedOut,
            "backend timed out",
        )))
    }

    fn fetch_stock_movements(&self) -> ReportResult<Vec<StockMovementRecord>> {
        Err(ReportError::Io(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "backend refused connection",
        )))
    }
}
