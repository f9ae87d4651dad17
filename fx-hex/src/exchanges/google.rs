//! Google Finance exchange.
//!
//! Google exposes one quote page per ordered pair and no batch endpoint, so
//! every rate costs one fetch of `{endpoint}/{FROM}-{TO}` followed by a run
//! of the [`RateExtractor`] ladder over the returned HTML.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use fx_types::{CurrencyCode, Exchange, ExchangeCapabilities, ExchangeError};

use super::cross_rate::DEFAULT_BASE;
use super::extract::RateExtractor;
use crate::outbound::{DEFAULT_TIMEOUT, HttpFetch};

/// Exchange name constant
pub const EXCHANGE_NAME: &str = "google";

/// Default quote page prefix
pub const DEFAULT_ENDPOINT: &str = "https://www.google.com/finance/quote";

/// Markup-scraping exchange with one fetch per currency pair.
pub struct GoogleExchange {
    base: CurrencyCode,
    fetcher: Arc<dyn HttpFetch>,
    extractor: RateExtractor,
    endpoint: String,
    timeout: Duration,
}

impl GoogleExchange {
    pub fn new(fetcher: Arc<dyn HttpFetch>) -> Self {
        Self {
            base: DEFAULT_BASE.to_string(),
            fetcher,
            extractor: RateExtractor::default(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_extractor(mut self, extractor: RateExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_base(mut self, base: impl Into<CurrencyCode>) -> Self {
        self.base = base.into();
        self
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    fn quote_url(&self, from: &str, to: &str) -> String {
        format!("{}/{}-{}", self.endpoint, from, to)
    }

    /// Fetches and extracts the rate for one ordered pair.
    async fn fetch_pair(&self, from: &str, to: &str) -> Result<f64, ExchangeError> {
        let url = self.quote_url(from, to);
        tracing::debug!(exchange = EXCHANGE_NAME, %url, "fetching quote page");

        let response = self
            .fetcher
            .get(&url, self.timeout)
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                tracing::warn!(exchange = EXCHANGE_NAME, from, to, "quote fetch failed: {}", e);
                ExchangeError::from(e)
            })?;

        match self.extractor.extract_with_source(&response.body, from, to) {
            Some((pattern, rate)) => {
                tracing::debug!(exchange = EXCHANGE_NAME, from, to, pattern, rate, "rate extracted");
                Ok(rate)
            }
            None => {
                tracing::warn!(
                    exchange = EXCHANGE_NAME,
                    from,
                    to,
                    bytes = response.body.len(),
                    "no rate pattern matched quote page"
                );
                Err(ExchangeError::rate_not_found(from, to))
            }
        }
    }
}

#[async_trait]
impl Exchange for GoogleExchange {
    fn name(&self) -> &str {
        EXCHANGE_NAME
    }

    fn base(&self) -> &str {
        &self.base
    }

    fn set_base(&mut self, base: &str) {
        self.base = base.to_string();
    }

    fn capabilities(&self) -> ExchangeCapabilities {
        ExchangeCapabilities {
            batch_rates: false,
            requires_key: false,
            health_check: false,
        }
    }

    async fn resolve_rate(&self, from: &str, to: &str) -> Result<f64, ExchangeError> {
        self.fetch_pair(from, to).await
    }

    /// One fetch per symbol. A failed symbol is left out; the batch only
    /// fails when nothing at all could be fetched.
    async fn fetch_rates(
        &self,
        symbols: &[CurrencyCode],
    ) -> Result<HashMap<CurrencyCode, f64>, ExchangeError> {
        let mut rates = HashMap::new();
        let mut last_error = None;

        for symbol in symbols {
            match self.fetch_pair(&self.base, symbol).await {
                Ok(rate) => {
                    rates.insert(symbol.clone(), rate);
                }
                Err(e) => last_error = Some(e),
            }
        }

        match last_error {
            Some(e) if rates.is_empty() => Err(e),
            _ => Ok(rates),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbound::http::tests::StubFetcher;
    use crate::outbound::{FetchError, HttpResponse};
    use fx_types::{ConvertRequest, ErrorKind, RatesRequest};

    const EUR_PAGE: &str = r#"<div class="rPF6Lc"><div data-last-price="0.9213" data-currency-code="EUR"></div></div>"#;
    const GBP_PAGE: &str = r#"<main><div class="YMlKec fxKbKc">0.7921</div></main>"#;
    const JPY_PAGE: &str = r#"<div class="YMlKec fxKbKc">1,493.5</div>"#;

    fn exchange(stub: StubFetcher) -> (GoogleExchange, Arc<StubFetcher>) {
        let stub = Arc::new(stub);
        let exchange = GoogleExchange::new(stub.clone()).with_endpoint("http://quotes.test/");
        (exchange, stub)
    }

    #[tokio::test]
    async fn test_convert_extracts_rate_from_markup() {
        let (ex, stub) = exchange(StubFetcher::new().ok("/USD-EUR", EUR_PAGE));
        let res = ex.convert(&ConvertRequest::new(100.0, "USD", "EUR")).await;

        assert!(res.is_success());
        assert_eq!(res.rate(), Some(0.9213));
        assert!((res.result().unwrap() - 92.13).abs() < 1e-9);
        assert_eq!(stub.calls(), vec!["http://quotes.test/USD-EUR"]);
    }

    #[tokio::test]
    async fn test_fetches_ordered_pair_directly() {
        let (ex, stub) = exchange(StubFetcher::new().ok("/EUR-GBP", GBP_PAGE));
        let res = ex.convert(&ConvertRequest::new(1.0, "EUR", "GBP")).await;
        assert_eq!(res.rate(), Some(0.7921));
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn test_reverse_quote_on_page_is_ignored() {
        let page = "<p>1 EUR = 1.0870 USD</p><p>1 USD = 0.92 EUR</p>";
        let (ex, _) = exchange(StubFetcher::new().ok("/USD-EUR", page));
        let res = ex.convert(&ConvertRequest::new(1.0, "USD", "EUR")).await;
        assert_eq!(res.rate(), Some(0.92));

        let (ex, _) = exchange(StubFetcher::new().ok("/USD-EUR", "<p>1 EUR = 1.0870 USD</p>"));
        let res = ex.convert(&ConvertRequest::new(1.0, "USD", "EUR")).await;
        assert_eq!(res.error_kind(), Some(ErrorKind::RateNotFound));
    }

    #[tokio::test]
    async fn test_unrecognized_markup_is_rate_not_found() {
        let (ex, _) = exchange(
            StubFetcher::new().ok("/USD-EUR", "<html><body>Consent required</body></html>"),
        );
        let res = ex.convert(&ConvertRequest::new(1.0, "USD", "EUR")).await;

        assert!(!res.is_success());
        assert_eq!(res.error_kind(), Some(ErrorKind::RateNotFound));
        assert_eq!(res.result(), None);
    }

    #[tokio::test]
    async fn test_zero_rate_is_not_a_rate() {
        let (ex, _) = exchange(StubFetcher::new().ok("/USD-EUR", r#"data-last-price="0.00""#));
        let res = ex.convert(&ConvertRequest::new(1.0, "USD", "EUR")).await;
        assert_eq!(res.error_kind(), Some(ErrorKind::RateNotFound));
    }

    #[tokio::test]
    async fn test_timeout_resolves_to_fetch_error() {
        let (ex, _) = exchange(StubFetcher::new().route("/USD-EUR", Err(FetchError::Timeout)));
        let res = ex.convert(&ConvertRequest::new(1.0, "USD", "EUR")).await;
        assert!(!res.is_success());
        assert_eq!(res.error_kind(), Some(ErrorKind::FetchError));
    }

    #[tokio::test]
    async fn test_http_error_status_is_fetch_error() {
        let (ex, _) = exchange(StubFetcher::new().route(
            "/USD-EUR",
            Ok(HttpResponse {
                status: 429,
                body: EUR_PAGE.into(),
            }),
        ));
        let res = ex.convert(&ConvertRequest::new(1.0, "USD", "EUR")).await;
        assert_eq!(res.error_kind(), Some(ErrorKind::FetchError));
        assert_eq!(res.error().unwrap().code, Some(429));
    }

    #[tokio::test]
    async fn test_rates_fetch_each_symbol() {
        let (mut ex, stub) = exchange(
            StubFetcher::new()
                .ok("/USD-EUR", EUR_PAGE)
                .ok("/USD-GBP", GBP_PAGE)
                .ok("/USD-JPY", JPY_PAGE),
        );
        let res = ex
            .get_exchange_rates(RatesRequest::new().with_symbols(["EUR", "GBP", "JPY", "USD"]))
            .await;

        assert!(res.is_success());
        assert_eq!(res.rate("EUR"), Some(0.9213));
        assert_eq!(res.rate("GBP"), Some(0.7921));
        assert_eq!(res.rate("JPY"), Some(1493.5));
        assert_eq!(res.rate("USD"), Some(1.0));
        assert_eq!(stub.call_count(), 3);
    }

    #[tokio::test]
    async fn test_partial_batch_is_still_success() {
        let (mut ex, _) = exchange(
            StubFetcher::new()
                .ok("/USD-EUR", EUR_PAGE)
                .route("/USD-GBP", Err(FetchError::Timeout))
                .ok("/USD-JPY", "<html></html>"),
        );
        let res = ex
            .get_exchange_rates(RatesRequest::new().with_symbols(["EUR", "GBP", "JPY"]))
            .await;

        assert!(res.is_success());
        assert_eq!(res.rates().len(), 1);
        assert_eq!(res.rate("GBP"), None);
        assert_eq!(res.rate("JPY"), None);
    }

    #[tokio::test]
    async fn test_base_alone_keeps_batch_successful() {
        let (mut ex, stub) =
            exchange(StubFetcher::new().route("/USD-EUR", Err(FetchError::Timeout)));
        let res = ex
            .get_exchange_rates(RatesRequest::new().with_base("USD").with_symbols(["USD", "EUR"]))
            .await;

        assert!(res.is_success());
        assert_eq!(res.rates().len(), 1);
        assert_eq!(res.rate("USD"), Some(1.0));
        assert_eq!(res.rate("EUR"), None);
        assert!(res.error().is_none());
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn test_fully_failed_batch_reports_error() {
        let (mut ex, _) = exchange(StubFetcher::new().route("/", Err(FetchError::Timeout)));
        let res = ex
            .get_exchange_rates(RatesRequest::new().with_symbols(["EUR", "GBP"]))
            .await;
        assert!(!res.is_success());
        assert_eq!(res.error_kind(), Some(ErrorKind::FetchError));
    }

    #[tokio::test]
    async fn test_base_only_request_makes_no_call() {
        let (mut ex, stub) = exchange(StubFetcher::new());
        let res = ex
            .get_exchange_rates(RatesRequest::new().with_base("USD").with_symbols(["USD"]))
            .await;
        assert!(res.is_success());
        assert_eq!(res.rate("USD"), Some(1.0));
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_rates_use_requested_base() {
        let (mut ex, stub) = exchange(StubFetcher::new().ok("/GBP-EUR", EUR_PAGE));
        let res = ex
            .get_exchange_rates(RatesRequest::new().with_base("GBP").with_symbols(["EUR"]))
            .await;
        assert_eq!(res.base(), "GBP");
        assert_eq!(ex.base(), "GBP");
        assert_eq!(stub.calls(), vec!["http://quotes.test/GBP-EUR"]);
    }

    #[test]
    fn test_capabilities() {
        let (ex, _) = exchange(StubFetcher::new());
        let caps = ex.capabilities();
        assert!(!caps.batch_rates);
        assert!(!caps.requires_key);
        assert!(!caps.health_check);
        assert_eq!(ex.name(), "google");
    }
}
