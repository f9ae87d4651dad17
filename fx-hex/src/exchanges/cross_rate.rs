//! Cross-rate exchange.
//!
//! Wraps any [`RatesSource`] that only answers relative to one base and
//! derives arbitrary `from -> to` pairs from it:
//!
//! - `from == base`: `rate(base -> to)`
//! - `to == base`: `1 / rate(base -> from)`
//! - otherwise: `rate(base -> to) / rate(base -> from)`, both legs fetched in
//!   one batched call
//!
//! A missing, zero or non-finite leg yields `RATE_NOT_FOUND`; nothing is
//! ever divided by zero.

use std::collections::HashMap;

use async_trait::async_trait;

use fx_types::ports::usable;
use fx_types::{CurrencyCode, Exchange, ExchangeCapabilities, ExchangeError, RatesSource};

/// Base used when none is configured.
pub const DEFAULT_BASE: &str = "USD";

/// Exchange deriving cross-rates from a base-relative source.
///
/// Generic over `S: RatesSource` - the upstream is injected at compile time.
pub struct CrossRateExchange<S: RatesSource> {
    base: CurrencyCode,
    source: S,
}

impl<S: RatesSource> CrossRateExchange<S> {
    pub fn new(source: S) -> Self {
        Self {
            base: DEFAULT_BASE.to_string(),
            source,
        }
    }

    pub fn with_base(mut self, base: impl Into<CurrencyCode>) -> Self {
        self.base = base.into();
        self
    }

    /// Returns a reference to the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access for reconfiguring the source in place (timeouts,
    /// endpoints).
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// One usable leg `base -> symbol` from an already fetched batch.
    fn leg(&self, rates: &HashMap<CurrencyCode, f64>, symbol: &str) -> Option<f64> {
        rates.get(symbol).copied().filter(|r| usable(*r))
    }
}

#[async_trait]
impl<S: RatesSource> Exchange for CrossRateExchange<S> {
    fn name(&self) -> &str {
        self.source.id()
    }

    fn base(&self) -> &str {
        &self.base
    }

    fn set_base(&mut self, base: &str) {
        self.base = base.to_string();
    }

    fn set_key(&mut self, key: &str) {
        self.source.set_key(key);
    }

    fn capabilities(&self) -> ExchangeCapabilities {
        ExchangeCapabilities {
            batch_rates: true,
            requires_key: self.source.requires_key(),
            health_check: true,
        }
    }

    async fn resolve_rate(&self, from: &str, to: &str) -> Result<f64, ExchangeError> {
        let base = self.base.as_str();

        if from == base {
            let rates = self.fetch_rates(&[to.to_string()]).await?;
            return self
                .leg(&rates, to)
                .ok_or_else(|| ExchangeError::rate_not_found(from, to));
        }

        if to == base {
            let rates = self.fetch_rates(&[from.to_string()]).await?;
            return self
                .leg(&rates, from)
                .map(|r| 1.0 / r)
                .ok_or_else(|| ExchangeError::rate_not_found(from, to));
        }

        let rates = self
            .fetch_rates(&[from.to_string(), to.to_string()])
            .await?;
        match (self.leg(&rates, from), self.leg(&rates, to)) {
            (Some(base_to_from), Some(base_to_to)) => Ok(base_to_to / base_to_from),
            _ => Err(ExchangeError::rate_not_found(from, to)),
        }
    }

    async fn fetch_rates(
        &self,
        symbols: &[CurrencyCode],
    ) -> Result<HashMap<CurrencyCode, f64>, ExchangeError> {
        tracing::debug!(
            exchange = self.source.id(),
            base = %self.base,
            symbols = ?symbols,
            "fetching base-relative rates"
        );
        self.source.latest(&self.base, symbols).await
    }

    async fn health_check(&self) -> Result<(), ExchangeError> {
        let probe = if self.base == DEFAULT_BASE { "EUR" } else { DEFAULT_BASE };
        let rates = self.fetch_rates(&[probe.to_string()]).await?;
        self.leg(&rates, probe)
            .map(|_| ())
            .ok_or_else(|| ExchangeError::rate_not_found(&self.base, probe))
    }
}
