//! Open Exchange Rates source.
//!
//! Structured JSON `latest` endpoint returning every requested symbol
//! relative to one base in a single call:
//!
//! ```text
//! GET {endpoint}?app_id=KEY&base=USD&symbols=EUR,GBP
//! { "timestamp": 1700000000, "base": "USD", "rates": { "EUR": 0.92, "GBP": 0.79 } }
//! ```
//!
//! Failures come back as `{ "error": true, "status": 401, "message": ..., "description": ... }`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

use fx_types::{ConfigError, CurrencyCode, ExchangeError, RatesSource};

use super::http::{DEFAULT_TIMEOUT, HttpFetch};

/// Source ID constant
pub const SOURCE_ID: &str = "openexchangerates";

/// Default `latest` endpoint
pub const DEFAULT_ENDPOINT: &str = "https://openexchangerates.org/api/latest.json";

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    base: Option<String>,
    #[serde(default)]
    rates: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    status: Option<u16>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Rates source for the Open Exchange Rates API.
pub struct OpenRatesSource {
    fetcher: Arc<dyn HttpFetch>,
    endpoint: String,
    app_id: String,
    timeout: Duration,
}

impl OpenRatesSource {
    /// Creates a source with the given app id.
    ///
    /// Fails with [`ConfigError::MissingCredential`] when `app_id` is blank.
    pub fn new(app_id: impl Into<String>, fetcher: Arc<dyn HttpFetch>) -> Result<Self, ConfigError> {
        let app_id = app_id.into();
        if app_id.trim().is_empty() {
            return Err(ConfigError::MissingCredential {
                exchange: SOURCE_ID.to_string(),
            });
        }
        Ok(Self {
            fetcher,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            app_id,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn url(&self, base: &str, symbols: &[CurrencyCode]) -> Result<String, ExchangeError> {
        let symbols = symbols.join(",");
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("app_id", self.app_id.as_str()),
                ("base", base),
                ("symbols", symbols.as_str()),
            ],
        )
        .map(String::from)
        .map_err(|e| ExchangeError::fetch(format!("Invalid endpoint '{}': {}", self.endpoint, e)))
    }
}

/// Maps a structured `{ "error": true, ... }` body to an API error.
fn api_error(status: u16, body: &str) -> Option<ExchangeError> {
    let err: ErrorResponse = serde_json::from_str(body).ok()?;
    if !err.error {
        return None;
    }
    let info = err
        .description
        .or(err.message)
        .unwrap_or_else(|| "Upstream reported an error".to_string());
    Some(ExchangeError::api(Some(err.status.unwrap_or(status)), info))
}

#[async_trait]
impl RatesSource for OpenRatesSource {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    fn requires_key(&self) -> bool {
        true
    }

    fn set_key(&mut self, key: &str) {
        if key.trim().is_empty() {
            tracing::warn!(source = SOURCE_ID, "ignoring blank app id");
            return;
        }
        self.app_id = key.to_string();
    }

    async fn latest(
        &self,
        base: &str,
        symbols: &[CurrencyCode],
    ) -> Result<HashMap<CurrencyCode, f64>, ExchangeError> {
        let url = self.url(base, symbols)?;
        tracing::debug!(source = SOURCE_ID, base, symbols = symbols.len(), "fetching latest rates");

        let response = self.fetcher.get(&url, self.timeout).await?;

        if let Some(err) = api_error(response.status, &response.body) {
            return Err(err);
        }
        let response = response.error_for_status()?;

        let latest: LatestResponse = serde_json::from_str(&response.body)
            .map_err(|e| ExchangeError::fetch(format!("Malformed response: {}", e)))?;

        if let Some(upstream_base) = latest.base.as_deref() {
            if upstream_base != base {
                return Err(ExchangeError::api(
                    None,
                    format!(
                        "Upstream returned rates relative to {} instead of {}",
                        upstream_base, base
                    ),
                ));
            }
        }

        Ok(latest.rates)
    }
}
