//! Requests and result envelopes.
//!
//! Envelopes can only be built through [`ConversionResult::new`] and
//! [`ExchangeRatesResult::new`], which derive `success` from the other fields.

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::CurrencyCode;
use crate::error::{ErrorKind, ExchangeError};

// ─────────────────────────────────────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────────────────────────────────────

/// Request to convert `amount` of `from` into `to`.
///
/// Zero and negative amounts are valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertRequest {
    pub amount: f64,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
}

impl ConvertRequest {
    pub fn new(amount: f64, from: impl Into<CurrencyCode>, to: impl Into<CurrencyCode>) -> Self {
        Self {
            amount,
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Request for rates of `symbols` relative to `base`.
///
/// `base` defaults to the exchange's current base, `symbols` to every
/// currency the exchange knows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatesRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<CurrencyCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbols: Option<Vec<CurrencyCode>>,
}

impl RatesRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base(mut self, base: impl Into<CurrencyCode>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CurrencyCode>,
    {
        self.symbols = Some(symbols.into_iter().map(Into::into).collect());
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversion envelope
// ─────────────────────────────────────────────────────────────────────────────

/// Echo of the conversion input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionQuery {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub amount: f64,
}

impl From<&ConvertRequest> for ConversionQuery {
    fn from(req: &ConvertRequest) -> Self {
        Self {
            from: req.from.clone(),
            to: req.to.clone(),
            amount: req.amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionInfo {
    /// Unix seconds when the envelope was built.
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
}

/// Outcome of a conversion.
///
/// `success` is true iff there is no error and `result` is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    success: bool,
    query: ConversionQuery,
    info: ConversionInfo,
    date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ExchangeError>,
}

impl ConversionResult {
    pub fn new(
        query: ConversionQuery,
        result: Option<f64>,
        rate: Option<f64>,
        error: Option<ExchangeError>,
    ) -> Self {
        let now = Utc::now();
        Self {
            success: error.is_none() && result.is_some(),
            query,
            info: ConversionInfo {
                timestamp: now.timestamp(),
                rate,
            },
            date: iso_date(now),
            result,
            error,
        }
    }

    pub fn success(query: ConversionQuery, result: f64, rate: f64) -> Self {
        Self::new(query, Some(result), Some(rate), None)
    }

    pub fn failure(query: ConversionQuery, error: ExchangeError) -> Self {
        Self::new(query, None, None, Some(error))
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn query(&self) -> &ConversionQuery {
        &self.query
    }

    pub fn result(&self) -> Option<f64> {
        self.result
    }

    pub fn rate(&self) -> Option<f64> {
        self.info.rate
    }

    pub fn timestamp(&self) -> i64 {
        self.info.timestamp
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn error(&self) -> Option<&ExchangeError> {
        self.error.as_ref()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().and_then(|e| e.kind)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rates envelope
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of a rates request.
///
/// `success` is true iff there is no error and `rates` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeRatesResult {
    success: bool,
    timestamp: i64,
    date: String,
    base: CurrencyCode,
    rates: HashMap<CurrencyCode, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ExchangeError>,
}

impl ExchangeRatesResult {
    pub fn new(
        base: impl Into<CurrencyCode>,
        rates: HashMap<CurrencyCode, f64>,
        error: Option<ExchangeError>,
    ) -> Self {
        let now = Utc::now();
        Self {
            success: error.is_none() && !rates.is_empty(),
            timestamp: now.timestamp(),
            date: iso_date(now),
            base: base.into(),
            rates,
            error,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn rates(&self) -> &HashMap<CurrencyCode, f64> {
        &self.rates
    }

    pub fn rate(&self, symbol: &str) -> Option<f64> {
        self.rates.get(symbol).copied()
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn error(&self) -> Option<&ExchangeError> {
        self.error.as_ref()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().and_then(|e| e.kind)
    }
}

fn iso_date(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}
