//! HTTP fetch port and its reqwest adapter.
//!
//! Exchanges never hold a `reqwest::Client` directly; they go through
//! [`HttpFetch`] so tests can swap in a stub and count calls.

use std::time::Duration;

use async_trait::async_trait;
use fx_types::ExchangeError;
use reqwest::Client;

/// Default per-request timeout for upstream fetches.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const USER_AGENT: &str = concat!("fx-hex/", env!("CARGO_PKG_VERSION"));

/// Error type for transport-level failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Request timed out")]
    Timeout,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Upstream returned HTTP {status}")]
    Status { status: u16, body: String },
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

impl From<FetchError> for ExchangeError {
    fn from(err: FetchError) -> Self {
        match &err {
            FetchError::Status { status, .. } => {
                ExchangeError::fetch(err.to_string()).with_code(*status)
            }
            _ => ExchangeError::fetch(err.to_string()),
        }
    }
}

/// Raw upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turns a non-2xx response into [`FetchError::Status`].
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(FetchError::Status {
                status: self.status,
                body: self.body,
            })
        }
    }
}

/// Port for GET requests bounded by a timeout.
///
/// Any status code is a successful fetch; only transport failures and
/// timeouts are errors.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, FetchError>;
}

/// [`HttpFetch`] backed by a shared `reqwest::Client`.
pub struct ReqwestFetcher {
    http: Client,
}

impl ReqwestFetcher {
    pub fn new() -> Self {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { http }
    }
}

impl Default for ReqwestFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, FetchError> {
        let request = async {
            let resp = self.http.get(url).timeout(timeout).send().await?;
            let status = resp.status().as_u16();
            let body = resp.text().await?;
            Ok::<_, FetchError>(HttpResponse { status, body })
        };

        // The reqwest timeout covers the exchange; this one also bounds
        // reading a slow body.
        match tokio::time::timeout(timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Canned-response fetcher that records every URL it is asked for.
    ///
    /// Responses are matched by substring of the URL; the first registered
    /// match wins. Unmatched URLs fail with a transport error.
    pub struct StubFetcher {
        routes: Vec<(String, Result<HttpResponse, FetchError>)>,
        calls: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        pub fn new() -> Self {
            Self {
                routes: Vec::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn route(mut self, fragment: &str, response: Result<HttpResponse, FetchError>) -> Self {
            self.routes.push((fragment.to_string(), response));
            self
        }

        pub fn ok(self, fragment: &str, body: &str) -> Self {
            self.route(fragment, Ok(HttpResponse::ok(body)))
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl HttpFetch for StubFetcher {
        async fn get(&self, url: &str, _timeout: Duration) -> Result<HttpResponse, FetchError> {
            self.calls.lock().unwrap().push(url.to_string());
            self.routes
                .iter()
                .find(|(fragment, _)| url.contains(fragment.as_str()))
                .map(|(_, response)| response.clone())
                .unwrap_or_else(|| Err(FetchError::Transport(format!("no route for {}", url))))
        }
    }

    #[test]
    fn test_error_for_status() {
        assert!(HttpResponse::ok("x").error_for_status().is_ok());

        let err = HttpResponse {
            status: 503,
            body: "down".into(),
        }
        .error_for_status()
        .unwrap_err();
        assert_eq!(
            err,
            FetchError::Status {
                status: 503,
                body: "down".into()
            }
        );
    }

    #[test]
    fn test_fetch_error_maps_to_fetch_kind() {
        let err = ExchangeError::from(FetchError::Timeout);
        assert!(err.is(fx_types::ErrorKind::FetchError));
        assert_eq!(err.code, None);

        let err = ExchangeError::from(FetchError::Status {
            status: 502,
            body: String::new(),
        });
        assert_eq!(err.code, Some(502));
    }

    #[tokio::test]
    async fn test_stub_routes_by_fragment() {
        let stub = StubFetcher::new().ok("/a", "first").ok("/", "fallback");
        let a = stub.get("http://x/a", DEFAULT_TIMEOUT).await.unwrap();
        let b = stub.get("http://x/b", DEFAULT_TIMEOUT).await.unwrap();
        assert_eq!(a.body, "first");
        assert_eq!(b.body, "fallback");
        assert_eq!(stub.call_count(), 2);
    }
}
