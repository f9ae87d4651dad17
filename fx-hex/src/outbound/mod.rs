//! Outbound adapters: HTTP transport and upstream rate sources.

pub mod fixed;
pub mod http;
pub mod open_rates;

pub use fixed::FixedRatesSource;
pub use http::{DEFAULT_TIMEOUT, FetchError, HttpFetch, HttpResponse, ReqwestFetcher};
pub use open_rates::OpenRatesSource;
