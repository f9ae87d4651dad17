//! # FX Types
//!
//! Domain types and port traits for the currency exchange engine.
//! This crate has ZERO network dependencies - only data structures,
//! envelope invariants, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Currency codes, rounding, exchange capabilities
//! - `ports/` - Trait definitions that exchanges and rate sources implement
//! - `dto/` - Requests and the uniform result envelopes
//! - `error/` - Envelope error taxonomy and fatal configuration errors

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use currency_data::CurrencyInfo;
pub use domain::{CurrencyCode, DEFAULT_PRECISION, ExchangeCapabilities, round};
pub use dto::*;
pub use error::{ConfigError, ErrorKind, ExchangeError};
pub use ports::{Exchange, RatesSource};
