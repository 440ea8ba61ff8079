//! archive.org page fetcher
//!
//! One GET per run. Network and HTTP status failures are reported as
//! [`ImportError::Fetch`]; nothing is retried.

use crate::error::{ImportError, ImportResult};
use reciter_common::config::ImportConfig;
use std::time::Duration;

/// HTTP client for item pages
pub struct PageFetcher {
    http_client: reqwest::Client,
}

impl PageFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> ImportResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| ImportError::Fetch(e.to_string()))?;

        Ok(Self { http_client })
    }

    pub fn from_config(config: &ImportConfig) -> ImportResult<Self> {
        Self::new(&config.user_agent, config.timeout)
    }

    /// Fetch the page body as text
    pub async fn fetch(&self, url: &str) -> ImportResult<String> {
        tracing::debug!(url = %url, "Fetching archive.org page");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ImportError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::Fetch(format!("HTTP {} for {}", status, url)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ImportError::Fetch(e.to_string()))?;

        if body.trim().is_empty() {
            return Err(ImportError::Fetch(format!("empty response from {}", url)));
        }

        tracing::debug!(bytes = body.len(), "Page fetched");
        Ok(body)
    }
}
