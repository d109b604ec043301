//! Framework-agnostic route handlers: query parsing, report dispatch and the
//! `{ "error": ... }` failure contract.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use serde_json::{json, Value};

use crate::aggregation::YearMonth;
use crate::core::clock::Clock;
use crate::core::services::ReportService;
use crate::errors::{ReportError, ReportResult};
use crate::source::{MovementAmount, RecordSource, UsageBasis};

pub const STATUS_OK: u16 = 200;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    DailyUsage,
    MonthlyUsage,
    YearlyUsage,
    CategoryStats,
    MonthlySummary,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::DailyUsage => "daily-usage",
            Route::MonthlyUsage => "monthly-usage",
            Route::YearlyUsage => "yearly-usage",
            Route::CategoryStats => "category-stats",
            Route::MonthlySummary => "monthly-summary",
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            Route::DailyUsage => "Failed to fetch daily usage",
            Route::MonthlyUsage => "Failed to fetch monthly usage",
            Route::YearlyUsage => "Failed to fetch yearly usage",
            Route::CategoryStats => "Failed to fetch category statistics",
            Route::MonthlySummary => "Failed to fetch monthly summary",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = ReportError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim().trim_start_matches("/api/").trim_start_matches("reports/");
        match trimmed.trim_matches('/') {
            "daily-usage" => Ok(Route::DailyUsage),
            "monthly-usage" => Ok(Route::MonthlyUsage),
            "yearly-usage" => Ok(Route::YearlyUsage),
            "category-stats" => Ok(Route::CategoryStats),
            "monthly-summary" => Ok(Route::MonthlySummary),
            other => Err(ReportError::InvalidArgument(format!("unknown route `{other}`"))),
        }
    }
}

/// Status code and JSON body of a handled request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok<T: Serialize>(payload: &T) -> ReportResult<Self> {
        Ok(Self {
            status: STATUS_OK,
            body: serde_json::to_value(payload)?,
        })
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Period parameters of a report request, defaulted from today's date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportQuery {
    pub year: i32,
    pub month: YearMonth,
    pub basis: UsageBasis,
}

impl ReportQuery {
    /// Missing or malformed `year`/`month` fall back to `today`; so does a
    /// month outside 1..=12. Unknown `basis` values fall back to items.
    pub fn from_params(params: &HashMap<String, String>, today: NaiveDate) -> Self {
        let year = params
            .get("year")
            .and_then(|raw| parse_leading_int(raw))
            .and_then(|value| i32::try_from(value).ok())
            .filter(|year| YearMonth::new(*year, 1).is_some())
            .unwrap_or_else(|| today.year());
        let month = params
            .get("month")
            .and_then(|raw| parse_leading_int(raw))
            .and_then(|value| u32::try_from(value).ok())
            .and_then(|month| YearMonth::new(year, month))
            .unwrap_or_else(|| {
                YearMonth::new(year, today.month()).unwrap_or_else(|| YearMonth::of(today))
            });
        let basis = params
            .get("basis")
            .and_then(|raw| parse_basis(raw))
            .unwrap_or_default();
        Self { year, month, basis }
    }
}

pub fn parse_basis(raw: &str) -> Option<UsageBasis> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "items" => Some(UsageBasis::Items),
        "stock" | "stock-absolute" => {
            Some(UsageBasis::StockMovements(MovementAmount::Absolute))
        }
        "stock-signed" => Some(UsageBasis::StockMovements(MovementAmount::Signed)),
        _ => None,
    }
}

/// Reads an optionally signed run of leading digits, ignoring anything after it.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|value| sign * value)
}

/// Runs `route` against `service` and renders the outcome.
///
/// Any failure to fetch or encode becomes a 500 with a readable message.
pub fn handle<S: RecordSource, C: Clock>(
    service: &ReportService<S, C>,
    route: Route,
    params: &HashMap<String, String>,
) -> ApiResponse {
    let query = ReportQuery::from_params(params, service.today());
    tracing::debug!(%route, year = query.year, month = query.month.month(), "handling report");
    let outcome = match route {
        Route::DailyUsage => service
            .daily_usage(query.month, query.basis)
            .and_then(|report| ApiResponse::ok(&report.daily_amounts)),
        Route::MonthlySummary => service
            .daily_usage(query.month, query.basis)
            .and_then(|report| ApiResponse::ok(&report)),
        Route::MonthlyUsage => service
            .monthly_usage(query.basis)
            .and_then(|entries| ApiResponse::ok(&entries)),
        Route::YearlyUsage => service
            .yearly_usage(query.year, query.basis)
            .and_then(|entries| ApiResponse::ok(&entries)),
        Route::CategoryStats => service
            .category_stats()
            .and_then(|stats| ApiResponse::ok(&stats)),
    };
    outcome.unwrap_or_else(|err| {
        tracing::error!(%route, error = %err, "report request failed");
        ApiResponse::error(STATUS_INTERNAL_ERROR, route.failure_message())
    })
}

/// Resolves `path` to a route and handles it; unknown paths yield 404.
pub fn dispatch<S: RecordSource, C: Clock>(
    service: &ReportService<S, C>,
    path: &str,
    params: &HashMap<String, String>,
) -> ApiResponse {
    match path.parse::<Route>() {
        Ok(route) => handle(service, route, params),
        Err(err) => ApiResponse::error(STATUS_NOT_FOUND, err.to_string()),
    }
}
