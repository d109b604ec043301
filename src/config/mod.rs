use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::errors::{ReportError, ReportResult};

const APP_DIR: &str = "inventory_usage";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

/// Environment variable that overrides [`Config::api_base_url`].
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the inventory backend.
    pub api_base_url: String,
    pub timeout_secs: u64,
    /// Page size used to pull "all" records in a single request.
    pub page_limit: u32,
    pub stock_history_path: String,
    /// Offset of the reporting time zone from UTC, in minutes.
    pub utc_offset_minutes: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".into(),
            timeout_secs: 5,
            page_limit: 10_000,
            stock_history_path: "/api/stock-history".into(),
            utc_offset_minutes: 0,
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn reporting_offset(&self) -> ReportResult<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                ReportError::Config(format!(
                    "utc_offset_minutes `{}` is out of range",
                    self.utc_offset_minutes
                ))
            })
    }

    /// Applies `API_BASE_URL` from the process environment when set.
    pub fn with_env_overrides(self) -> Self {
        self.with_base_url_override(std::env::var(API_BASE_URL_ENV).ok())
    }

    fn with_base_url_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.map(|raw| raw.trim().to_string()) {
            if !url.is_empty() {
                self.api_base_url = url;
            }
        }
        self
    }
}

/// Loads and persists [`Config`] as JSON under a base directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> ReportResult<Self> {
        let base = dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from(format!(".{APP_DIR}")));
        Self::with_base_dir(base)
    }

    pub fn with_base_dir(base: PathBuf) -> ReportResult<Self> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    pub fn load(&self) -> ReportResult<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            let config: Config = serde_json::from_str(&data)?;
            config.reporting_offset()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> ReportResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> ReportResult<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
