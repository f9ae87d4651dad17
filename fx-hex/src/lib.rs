//! # FX Hex
//!
//! Exchange adapters and the exchange service.
//!
//! ## Architecture
//!
//! - `service/` - Exchange registry (routes requests to the active exchange)
//! - `exchanges/` - Concrete exchanges and rate-resolution strategies
//! - `outbound/` - HTTP transport and upstream rate sources
//!
//! Exchanges are stored behind the [`Exchange`](fx_types::Exchange) port,
//! so the service never knows which upstream it is talking to.

pub mod exchanges;
pub mod outbound;
pub mod service;


pub use exchanges::{CrossRateExchange, GoogleExchange, RateExtractor, RatePattern};
pub use outbound::{FixedRatesSource, HttpFetch, OpenRatesSource, ReqwestFetcher};
pub use service::{ExchangeService, ExchangeSource, ServiceConfig};
