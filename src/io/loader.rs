//! Retrieve the CSV text from a URL or a local path.
//!
//! Every call re-fetches; nothing is cached between loads.

use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{CACHE_CONTROL, PRAGMA};

use crate::error::AppError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the CSV comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    File(String),
}

impl DataSource {
    pub fn parse(source: &str) -> Self {
        let trimmed = source.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::File(trimmed.to_string())
        }
    }

    pub fn path(&self) -> &str {
        match self {
            DataSource::Url(u) => u,
            DataSource::File(p) => p,
        }
    }
}

/// Blocking CSV loader (HTTP via `reqwest`, or the local filesystem).
pub struct CsvLoader {
    client: Client,
}

impl CsvLoader {
    pub fn new() -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::fetch(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Load the full text of `source`, trimmed.
    pub fn load(&self, source: &DataSource) -> Result<String, AppError> {
        let text = match source {
            DataSource::Url(url) => self.fetch_url(url)?,
            DataSource::File(path) => read_file(path)?,
        };
        tracing::info!(path = source.path(), bytes = text.len(), "loaded CSV");
        Ok(text.trim().to_string())
    }

    fn fetch_url(&self, url: &str) -> Result<String, AppError> {
        let resp = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .map_err(|e| AppError::fetch(format!("CSV request failed: {url} ({e})")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::fetch(format!("CSV not found: {url} (HTTP {status})")));
        }

        resp.text()
            .map_err(|e| AppError::fetch(format!("Failed to read CSV body: {url} ({e})")))
    }
}

fn read_file(path: &str) -> Result<String, AppError> {
    std::fs::read_to_string(Path::new(path))
        .map_err(|e| AppError::fetch(format!("CSV not found: {path} ({e})")))
}
