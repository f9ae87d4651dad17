//! Exchange port.
//!
//! This trait is the contract every upstream rate source must satisfy.
//! Implementors supply rate resolution; the provided methods hold the
//! behavior shared by all exchanges (identity short-circuit, envelope
//! construction, base handling, rounding, metadata passthrough).

use std::collections::HashMap;

use currency_data::CurrencyInfo;

use crate::domain::{CurrencyCode, ExchangeCapabilities, round};
use crate::dto::{
    ConversionQuery, ConversionResult, ConvertRequest, ExchangeRatesResult, RatesRequest,
};
use crate::error::{ErrorKind, ExchangeError};

/// Port trait for exchanges.
///
/// `convert` and `get_exchange_rates` never fail: every expected failure is
/// reported through the `error` field of the returned envelope.
#[async_trait::async_trait]
pub trait Exchange: Send + Sync {
    /// Stable identity of the exchange.
    fn name(&self) -> &str;

    /// Currency every rate is currently expressed against.
    fn base(&self) -> &str;

    fn set_base(&mut self, base: &str);

    /// Supplies a credential. Exchanges that need none ignore it.
    fn set_key(&mut self, key: &str) {
        let _ = key;
    }

    fn capabilities(&self) -> ExchangeCapabilities {
        ExchangeCapabilities::default()
    }

    /// How many units of `to` one unit of `from` buys.
    ///
    /// Never called with `from == to`.
    async fn resolve_rate(&self, from: &str, to: &str) -> Result<f64, ExchangeError>;

    /// Rates for `symbols` relative to [`base`](Self::base).
    ///
    /// `symbols` never contains the base and has no duplicates. Symbols
    /// without a usable rate are left out of the map.
    async fn fetch_rates(
        &self,
        symbols: &[CurrencyCode],
    ) -> Result<HashMap<CurrencyCode, f64>, ExchangeError>;

    /// Probes upstream. Only meaningful when `capabilities().health_check`.
    async fn health_check(&self) -> Result<(), ExchangeError> {
        Err(ExchangeError::api(
            None,
            format!("{} does not support health checks", self.name()),
        ))
    }

    /// Every code this exchange recognizes.
    fn currencies(&self) -> Vec<CurrencyCode> {
        currency_data::all_codes()
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn round(&self, value: f64, precision: u32) -> f64 {
        round(value, precision)
    }

    fn get_by_code(&self, code: &str) -> Option<&'static CurrencyInfo> {
        currency_data::lookup(code)
    }

    fn filter_by_country(&self, iso2: &str) -> Vec<&'static CurrencyInfo> {
        currency_data::filter_by_country(iso2)
    }

    fn format(&self, amount: f64, code: &str, locale: &str) -> String {
        currency_data::format_amount(amount, code, locale)
    }

    /// Converts `request.amount` from `request.from` to `request.to`.
    ///
    /// `from == to` resolves to the amount itself at rate 1 without touching
    /// upstream.
    async fn convert(&self, request: &ConvertRequest) -> ConversionResult {
        let query = ConversionQuery::from(request);
        if request.from == request.to {
            return ConversionResult::success(query, request.amount, 1.0);
        }

        match self.resolve_rate(&request.from, &request.to).await {
            Ok(rate) => {
                let result = request.amount * rate;
                if result.is_finite() {
                    ConversionResult::success(query, result, rate)
                } else {
                    ConversionResult::new(
                        query,
                        None,
                        Some(rate),
                        Some(ExchangeError::conversion(format!(
                            "{} * {} is not a finite number",
                            request.amount, rate
                        ))),
                    )
                }
            }
            Err(error) => {
                tracing::warn!(
                    exchange = self.name(),
                    from = %request.from,
                    to = %request.to,
                    kind = ?error.kind,
                    "conversion failed: {}",
                    error.info
                );
                ConversionResult::failure(query, error)
            }
        }
    }

    /// Fetches one rate per requested symbol relative to the base.
    ///
    /// A supplied `base` is applied with [`set_base`](Self::set_base) first.
    /// The base itself is always reported as 1 without an upstream call.
    async fn get_exchange_rates(&mut self, request: RatesRequest) -> ExchangeRatesResult {
        if let Some(base) = request.base.as_deref() {
            self.set_base(base);
        }
        let base = self.base().to_string();
        let symbols = request.symbols.unwrap_or_else(|| self.currencies());

        let mut rates = HashMap::new();
        let mut pending: Vec<CurrencyCode> = Vec::new();
        for symbol in symbols {
            if symbol == base {
                rates.insert(symbol, 1.0);
            } else if !pending.contains(&symbol) {
                pending.push(symbol);
            }
        }

        let mut error = None;
        if !pending.is_empty() {
            match self.fetch_rates(&pending).await {
                Ok(fetched) => rates.extend(
                    fetched
                        .into_iter()
                        .filter(|(code, rate)| pending.contains(code) && usable(*rate)),
                ),
                // Without a batch endpoint each symbol is its own request, so
                // a failure only omits symbols once something was resolved.
                Err(e) if rates.is_empty() || self.capabilities().batch_rates => error = Some(e),
                Err(e) => tracing::warn!(
                    exchange = self.name(),
                    base = %base,
                    kind = ?e.kind,
                    "rates partially unavailable: {}",
                    e.info
                ),
            }
        }

        if error.is_none() && rates.is_empty() {
            error = Some(ExchangeError::new(
                ErrorKind::RateNotFound,
                format!("No rates found relative to {}", base),
            ));
        }
        ExchangeRatesResult::new(base, rates, error)
    }
}

/// A rate is usable when it is finite and strictly positive.
pub fn usable(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}
