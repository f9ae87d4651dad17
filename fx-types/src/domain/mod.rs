//! Domain types for the exchange engine.

pub mod capabilities;
pub mod currency;

pub use capabilities::ExchangeCapabilities;
pub use currency::{CurrencyCode, DEFAULT_PRECISION, round};
