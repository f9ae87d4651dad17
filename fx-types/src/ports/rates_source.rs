//! Base-relative rates source port.
//!
//! A source answers one question: "what are these symbols worth in `base`?"
//! in a single call. Structured APIs and fixed tables implement it; the
//! cross-rate exchange builds arbitrary pairs on top.

use std::collections::HashMap;

use crate::domain::CurrencyCode;
use crate::error::ExchangeError;

/// Port trait for batched, base-relative rate lookups.
#[async_trait::async_trait]
pub trait RatesSource: Send + Sync {
    /// Identifier used as the exchange name, e.g. "openexchangerates".
    fn id(&self) -> &'static str;

    fn requires_key(&self) -> bool {
        false
    }

    fn set_key(&mut self, key: &str) {
        let _ = key;
    }

    /// Latest rates of `symbols` relative to `base`.
    ///
    /// Unknown symbols are omitted rather than reported as errors.
    async fn latest(
        &self,
        base: &str,
        symbols: &[CurrencyCode],
    ) -> Result<HashMap<CurrencyCode, f64>, ExchangeError>;
}
