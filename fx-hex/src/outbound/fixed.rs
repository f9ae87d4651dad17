//! Fixed-table rates source for development and testing.
//!
//! Rates are stored relative to one anchor currency and rebased on demand:
//! `rate(base -> x) = table[x] / table[base]`. No network access.

use std::collections::HashMap;

use async_trait::async_trait;

use fx_types::{CurrencyCode, ExchangeError, RatesSource, ports::usable};

/// Source ID constant
pub const SOURCE_ID: &str = "fixed";

/// Indicative units per one US dollar.
const INDICATIVE_USD_RATES: &[(&str, f64)] = &[
    ("USD", 1.0),
    ("EUR", 0.92),
    ("GBP", 0.79),
    ("INR", 83.12),
    ("JPY", 149.3),
    ("CHF", 0.88),
    ("CAD", 1.36),
    ("AUD", 1.52),
];

/// Rates source backed by an in-memory table.
#[derive(Debug, Clone)]
pub struct FixedRatesSource {
    anchor: CurrencyCode,
    table: HashMap<CurrencyCode, f64>,
}

impl FixedRatesSource {
    /// Table of `anchor`-relative rates. The anchor itself is always 1.
    pub fn new<I, S>(anchor: impl Into<CurrencyCode>, rates: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<CurrencyCode>,
    {
        let anchor = anchor.into();
        let mut table: HashMap<CurrencyCode, f64> = rates
            .into_iter()
            .map(|(code, rate)| (code.into(), rate))
            .filter(|(_, rate)| usable(*rate))
            .collect();
        table.insert(anchor.clone(), 1.0);
        Self { anchor, table }
    }

    /// Built-in indicative USD-relative table.
    pub fn indicative() -> Self {
        Self::new("USD", INDICATIVE_USD_RATES.iter().copied())
    }

    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    /// Codes present in the table, sorted.
    pub fn codes(&self) -> Vec<CurrencyCode> {
        let mut codes: Vec<_> = self.table.keys().cloned().collect();
        codes.sort();
        codes
    }
}

impl Default for FixedRatesSource {
    fn default() -> Self {
        Self::indicative()
    }
}

#[async_trait]
impl RatesSource for FixedRatesSource {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    async fn latest(
        &self,
        base: &str,
        symbols: &[CurrencyCode],
    ) -> Result<HashMap<CurrencyCode, f64>, ExchangeError> {
        let base_rate = self
            .table
            .get(base)
            .copied()
            .ok_or_else(|| ExchangeError::api(None, format!("Unsupported base currency: {}", base)))?;

        Ok(symbols
            .iter()
            .filter_map(|symbol| {
                self.table
                    .get(symbol)
                    .map(|rate| (symbol.clone(), rate / base_rate))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fx_types::ErrorKind;

    fn symbols(codes: &[&str]) -> Vec<CurrencyCode> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[tokio::test]
    async fn test_anchor_relative_lookup() {
        let source = FixedRatesSource::new("USD", [("EUR", 0.9), ("GBP", 0.8)]);
        let rates = source.latest("USD", &symbols(&["EUR", "GBP", "USD"])).await.unwrap();
        assert_eq!(rates["EUR"], 0.9);
        assert_eq!(rates["GBP"], 0.8);
        assert_eq!(rates["USD"], 1.0);
    }

    #[tokio::test]
    async fn test_rebases_on_other_currency() {
        let source = FixedRatesSource::new("USD", [("EUR", 0.9), ("GBP", 0.8)]);
        let rates = source.latest("EUR", &symbols(&["USD", "GBP"])).await.unwrap();
        assert!((rates["USD"] - 1.0 / 0.9).abs() < 1e-12);
        assert!((rates["GBP"] - 0.8 / 0.9).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_unknown_symbols_are_omitted() {
        let source = FixedRatesSource::indicative();
        let rates = source.latest("USD", &symbols(&["EUR", "XYZ"])).await.unwrap();
        assert_eq!(rates.len(), 1);
        assert!(rates.contains_key("EUR"));
    }

    #[tokio::test]
    async fn test_unknown_base_is_api_error() {
        let source = FixedRatesSource::indicative();
        let err = source.latest("XYZ", &symbols(&["EUR"])).await.unwrap_err();
        assert!(err.is(ErrorKind::ApiError));
    }

    #[test]
    fn test_unusable_rates_are_dropped() {
        let source = FixedRatesSource::new("USD", [("EUR", 0.0), ("GBP", f64::NAN)]);
        assert_eq!(source.codes(), vec!["USD".to_string()]);
        assert_eq!(source.anchor(), "USD");
    }
}
