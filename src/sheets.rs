//! Client for the spreadsheet values API that backs all persistence.
//!
//! The store is row-oriented and append-only: two logical tables
//! (`Users`, `SugarReadings`), each read with a whole-range fetch and
//! written one row at a time. Everything above this module talks to the
//! [`SheetsClient`] trait so tests can swap in the in-memory double.

use anyhow::Context;
use axum::async_trait;
use serde::Deserialize;

use crate::config::AppConfig;

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::atomic::{AtomicBool, Ordering};
#[cfg(test)]
use tokio::sync::RwLock;

#[async_trait]
pub trait SheetsClient: Send + Sync {
    /// Fetch every row in `range`, e.g. `Users!A:F`.
    async fn get_rows(&self, range: &str) -> anyhow::Result<Vec<Vec<String>>>;

    /// Append one row after the last row of `range`.
    async fn append_row(&self, range: &str, row: Vec<String>) -> anyhow::Result<()>;
}

/// Google Sheets `spreadsheets.values` client.
pub struct GoogleSheets {
    client: reqwest::Client,
    base_url: String,
    sheet_id: String,
    api_token: String,
}

/// Response body of `values.get`. The API omits `values` entirely for
/// an empty range.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

impl GoogleSheets {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.sheets_base_url.trim_end_matches('/').to_string(),
            sheet_id: config.sheet_id.clone(),
            api_token: config.api_token.clone(),
        }
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}",
            self.base_url, self.sheet_id, range
        )
    }
}

#[async_trait]
impl SheetsClient for GoogleSheets {
    async fn get_rows(&self, range: &str) -> anyhow::Result<Vec<Vec<String>>> {
        let response = self
            .client
            .get(self.values_url(range))
            .bearer_auth(&self.api_token)
            .send()
            .await
            .context("sheets values.get request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("sheets values.get failed: {status} - {body}");
        }

        let body: ValueRange = response
            .json()
            .await
            .context("decode values.get response")?;
        Ok(body.values)
    }

    async fn append_row(&self, range: &str, row: Vec<String>) -> anyhow::Result<()> {
        let url = format!("{}:append?valueInputOption=RAW", self.values_url(range));
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_token)
            .json(&serde_json::json!({ "values": [row] }))
            .send()
            .await
            .context("sheets values.append request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("sheets values.append failed: {status} - {body}");
        }
        Ok(())
    }
}

/// In-memory stand-in for the remote sheet: a map of range name to
/// rows, plus a switch that makes every call fail the way an
/// unreachable store would.
#[cfg(test)]
#[derive(Default)]
pub struct InMemorySheets {
    tables: RwLock<HashMap<String, Vec<Vec<String>>>>,
    unavailable: AtomicBool,
}

#[cfg(test)]
impl InMemorySheets {
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> anyhow::Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            anyhow::bail!("sheet store unavailable");
        }
        Ok(())
    }
}

#[cfg(test)]
#[async_trait]
impl SheetsClient for InMemorySheets {
    async fn get_rows(&self, range: &str) -> anyhow::Result<Vec<Vec<String>>> {
        self.check_available()?;
        Ok(self
            .tables
            .read()
            .await
            .get(range)
            .cloned()
            .unwrap_or_default())
    }

    async fn append_row(&self, range: &str, row: Vec<String>) -> anyhow::Result<()> {
        self.check_available()?;
        self.tables
            .write()
            .await
            .entry(range.to_string())
            .or_default()
            .push(row);
        Ok(())
    }
}
