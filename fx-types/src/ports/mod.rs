//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The service layer depends on these traits, not concrete implementations.

mod exchange;
mod rates_source;

pub use exchange::{Exchange, usable};
pub use rates_source::RatesSource;
