//! Flights service HTTP client.
//!
//! The transport counterpart of the search capability: issues
//! `GET /api/flights` with the canonical query serialized as string
//! parameters (absent fields omitted entirely) and decodes the JSON
//! page. Usable directly or as a [`SearchBackend`] for the
//! `QueryController`.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::controller::{SearchBackend, SearchFailed};
use crate::domain::{FlightQuery, SearchResult};

use super::error::FlightsApiError;
use super::types::{ApiErrorBody, FlightsResponse};

/// Default base URL of a locally running flights service.
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the flights client.
#[derive(Debug, Clone)]
pub struct FlightsConfig {
    /// Base URL of the service (defaults to localhost)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl FlightsConfig {
    /// Create a config pointing at the given service.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for FlightsConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Flights service API client.
///
/// Uses a semaphore to bound concurrent requests against the service.
#[derive(Debug, Clone)]
pub struct FlightsClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl FlightsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: FlightsConfig) -> Result<Self, FlightsApiError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Search flight offers.
    ///
    /// Serializes every present query field under its wire name; absent
    /// fields are omitted, never sent as empty strings.
    pub async fn get_flights(
        &self,
        query: &FlightQuery,
    ) -> Result<FlightsResponse, FlightsApiError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| FlightsApiError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}/api/flights", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&query.to_params())
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FlightsApiError::SnapshotMissing);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // The service wraps errors as {"error": ...}; fall back to
            // the raw body for anything else.
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            return Err(FlightsApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| FlightsApiError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }

    /// URL of the CSV snapshot download.
    pub fn download_csv_url(&self) -> String {
        format!("{}/api/download", self.base_url)
    }
}

impl From<FlightsApiError> for SearchFailed {
    fn from(e: FlightsApiError) -> Self {
        SearchFailed::new(e.to_string())
    }
}

#[async_trait]
impl SearchBackend for FlightsClient {
    async fn search(&self, query: &FlightQuery) -> Result<SearchResult, SearchFailed> {
        let page = self.get_flights(query).await?;
        Ok(SearchResult {
            total: page.total,
            rows: page.rows,
        })
    }
}
