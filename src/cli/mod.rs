//! Command-line front end: runs one report route and prints its JSON body.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

use chrono::{FixedOffset, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand, ValueEnum};

use crate::api::{self, ApiResponse, Route};
use crate::config::{Config, ConfigManager};
use crate::core::clock::{Clock, FixedClock, SystemClock};
use crate::core::services::ReportService;
use crate::errors::ReportResult;
use crate::source::{HttpRecordSource, InMemoryRecordSource, RecordSource};
use crate::utils::build_info;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Basis {
    Items,
    StockSigned,
    StockAbsolute,
}

impl Basis {
    fn as_param(&self) -> &'static str {
        match self {
            Basis::Items => "items",
            Basis::StockSigned => "stock-signed",
            Basis::StockAbsolute => "stock-absolute",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "inventory_usage_cli", version, about = "Inventory usage reports")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding config.json (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Read records from a JSON snapshot instead of the backend
    #[arg(long, global = true)]
    pub fixture: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    pub today: Option<NaiveDate>,

    /// Record family and amount policy
    #[arg(long, value_enum, global = true, default_value = "items")]
    pub basis: Basis,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Usage per day of a month
    Daily {
        #[arg(long)]
        year: Option<String>,
        #[arg(long)]
        month: Option<String>,
    },
    /// Usage per month over the trailing twelve months
    Monthly,
    /// Usage per year, ten years either side of the base year
    Yearly {
        #[arg(long)]
        year: Option<String>,
    },
    /// Item counts per category
    Categories,
    /// Daily usage with the month total
    Summary {
        #[arg(long)]
        year: Option<String>,
        #[arg(long)]
        month: Option<String>,
    },
    /// Print build information
    Version,
}

impl Command {
    fn route_and_params(&self) -> Option<(Route, HashMap<String, String>)> {
        let mut params = HashMap::new();
        let mut put = |key: &str, value: &Option<String>| {
            if let Some(value) = value {
                params.insert(key.to_string(), value.clone());
            }
        };
        let route = match self {
            Command::Daily { year, month } => {
                put("year", year);
                put("month", month);
                Route::DailyUsage
            }
            Command::Summary { year, month } => {
                put("year", year);
                put("month", month);
                Route::MonthlySummary
            }
            Command::Yearly { year } => {
                put("year", year);
                Route::YearlyUsage
            }
            Command::Monthly => Route::MonthlyUsage,
            Command::Categories => Route::CategoryStats,
            Command::Version => return None,
        };
        Some((route, params))
    }
}

pub fn run_cli() -> ReportResult<bool> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&cli, &mut out)
}

/// Runs the parsed command, writing output to `out`. Returns whether the
/// report succeeded.
pub fn execute<W: Write>(cli: &Cli, out: &mut W) -> ReportResult<bool> {
    let Some((route, mut params)) = cli.command.route_and_params() else {
        writeln!(out, "{}", build_info::current().summary())?;
        return Ok(true);
    };
    params.insert("basis".to_string(), cli.basis.as_param().to_string());

    let config = load_config(cli)?;
    let offset = config.reporting_offset()?;
    let response = match &cli.fixture {
        Some(path) => {
            let source = InMemoryRecordSource::from_json_file(path)?;
            respond_with_clock(source, cli.today, offset, route, &params)
        }
        None => {
            let source = HttpRecordSource::from_config(&config)?;
            respond_with_clock(source, cli.today, offset, route, &params)
        }
    };

    writeln!(out, "{}", serde_json::to_string_pretty(&response.body)?)?;
    Ok(response.is_success())
}

fn load_config(cli: &Cli) -> ReportResult<Config> {
    let manager = match &cli.config_dir {
        Some(dir) => ConfigManager::with_base_dir(dir.clone())?,
        None => ConfigManager::new()?,
    };
    Ok(manager.load()?.with_env_overrides())
}

fn respond_with_clock<S: RecordSource>(
    source: S,
    today: Option<NaiveDate>,
    offset: FixedOffset,
    route: Route,
    params: &HashMap<String, String>,
) -> ApiResponse {
    match today {
        Some(date) => {
            let local = date.and_time(NaiveTime::MIN);
            let instant = (local - offset).and_utc();
            respond(source, FixedClock(instant), offset, route, params)
        }
        None => respond(source, SystemClock, offset, route, params),
    }
}

fn respond<S: RecordSource, C: Clock>(
    source: S,
    clock: C,
    offset: FixedOffset,
    route: Route,
    params: &HashMap<String, String>,
) -> ApiResponse {
    let service = ReportService::new(source, clock, offset);
    api::handle(&service, route, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_daily_with_period_flags() {
        let cli = Cli::try_parse_from([
            "inventory_usage_cli",
            "daily",
            "--year",
            "2024",
            "--month",
            "2",
            "--basis",
            "stock-signed",
        ])
        .unwrap();
        assert_eq!(cli.basis, Basis::StockSigned);
        let (route, params) = cli.command.route_and_params().unwrap();
        assert_eq!(route, Route::DailyUsage);
        assert_eq!(params.get("year").map(String::as_str), Some("2024"));
        assert_eq!(params.get("month").map(String::as_str), Some("2"));
    }

    #[test]
    fn version_has_no_route() {
        let cli = Cli::try_parse_from(["inventory_usage_cli", "version"]).unwrap();
        assert!(cli.command.route_and_params().is_none());
        let mut out = Vec::new();
        assert!(execute(&cli, &mut out).unwrap());
        assert!(String::from_utf8(out).unwrap().starts_with("inventory_usage "));
    }
}
