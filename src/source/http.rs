use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::Config;
use crate::errors::ReportResult;

use super::{ItemRecord, RecordSource, StockMovementRecord};

const ITEMS_PATH: &str = "/api/items";

#[derive(Debug, Deserialize)]
struct ItemsPage {
    #[serde(default)]
    items: Option<Vec<ItemRecord>>,
}

#[derive(Debug, Deserialize)]
struct StockHistoryPage {
    #[serde(default, alias = "items", alias = "history")]
    movements: Option<Vec<StockMovementRecord>>,
}

/// Pulls records from the inventory backend over HTTP.
///
/// Each fetch requests the first page with a large page size, which the
/// backend treats as "everything".
pub struct HttpRecordSource {
    client: Client,
    base_url: String,
    page_limit: u32,
    stock_history_path: String,
}

impl HttpRecordSource {
    pub fn from_config(config: &Config) -> ReportResult<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            page_limit: config.page_limit,
            stock_history_path: config.stock_history_path.clone(),
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn fetch_page<T: DeserializeOwned>(&self, path: &str) -> ReportResult<T> {
        let url = self.endpoint(path);
        tracing::debug!(%url, limit = self.page_limit, "fetching records");
        let response = self
            .client
            .get(&url)
            .query(&[("page", 1), ("limit", self.page_limit)])
            .send()
            .and_then(|resp| resp.error_for_status())
            .map_err(|err| {
                tracing::error!(%url, error = %err, "backend request failed");
                err
            })?;
        Ok(response.json()?)
    }
}

impl RecordSource for HttpRecordSource {
    fn fetch_items(&self) -> ReportResult<Vec<ItemRecord>> {
        let page: ItemsPage = self.fetch_page(ITEMS_PATH)?;
        let items = page.items.unwrap_or_default();
        tracing::info!(count = items.len(), "fetched items");
        Ok(items)
    }

    fn fetch_stock_movements(&self) -> ReportResult<Vec<StockMovementRecord>> {
        let page: StockHistoryPage = self.fetch_page(&self.stock_history_path)?;
        let movements = page.movements.unwrap_or_default();
        tracing::info!(count = movements.len(), "fetched stock movements");
        Ok(movements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = Config {
            api_base_url: "http://backend:8080/".into(),
            ..Config::default()
        };
        let source = HttpRecordSource::from_config(&config).unwrap();
        assert_eq!(source.endpoint("/api/items"), "http://backend:8080/api/items");
        assert_eq!(
            source.endpoint("api/stock-history"),
            "http://backend:8080/api/stock-history"
        );
    }

    #[test]
    fn missing_or_null_items_decode_as_empty() {
        let page: ItemsPage = serde_json::from_str(r#"{ "total": 0 }"#).unwrap();
        assert!(page.items.unwrap_or_default().is_empty());
        let page: ItemsPage = serde_json::from_str(r#"{ "items": null }"#).unwrap();
        assert!(page.items.unwrap_or_default().is_empty());
    }

    #[test]
    fn stock_history_accepts_alternate_field_names() {
        let page: StockHistoryPage = serde_json::from_str(
            r#"{ "history": [ { "kind": "IN", "qty_delta": 5, "created_at": "2025-01-02" } ] }"#,
        )
        .unwrap();
        assert_eq!(page.movements.unwrap_or_default().len(), 1);
    }

    #[test]
    fn unreachable_backend_is_an_http_error() {
        let config = Config {
            api_base_url: "http://127.0.0.1:9".into(),
            timeout_secs: 1,
            ..Config::default()
        };
        let source = HttpRecordSource::from_config(&config).unwrap();
        let err = source.fetch_items().expect_err("nothing listens on port 9");
        assert!(matches!(err, crate::errors::ReportError::Http(_)));
    }
}
