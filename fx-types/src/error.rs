//! Error types for the exchange engine.

use serde::{Deserialize, Serialize};

/// Category of a non-fatal failure carried inside a result envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Network/transport failure or timeout reaching upstream.
    FetchError,
    /// Upstream reachable, but no usable rate for the requested pair.
    RateNotFound,
    /// The conversion arithmetic itself failed.
    ConversionError,
    /// Upstream reported a structured failure (bad credential, bad base, ...).
    ApiError,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::FetchError => "FETCH_ERROR",
            ErrorKind::RateNotFound => "RATE_NOT_FOUND",
            ErrorKind::ConversionError => "CONVERSION_ERROR",
            ErrorKind::ApiError => "API_ERROR",
        };
        f.write_str(name)
    }
}

/// Error payload of a conversion or rates envelope.
///
/// Never thrown: exchanges fold every network and parsing failure into one
/// of these and return it inside the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{info}")]
pub struct ExchangeError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    pub info: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

impl ExchangeError {
    pub fn new(kind: ErrorKind, info: impl Into<String>) -> Self {
        Self {
            code: None,
            info: info.into(),
            kind: Some(kind),
        }
    }

    pub fn fetch(info: impl Into<String>) -> Self {
        Self::new(ErrorKind::FetchError, info)
    }

    pub fn rate_not_found(from: &str, to: &str) -> Self {
        Self::new(
            ErrorKind::RateNotFound,
            format!("Rate not found for {} -> {}", from, to),
        )
    }

    pub fn conversion(info: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConversionError, info)
    }

    pub fn api(code: Option<u16>, info: impl Into<String>) -> Self {
        Self {
            code,
            ..Self::new(ErrorKind::ApiError, info)
        }
    }

    /// Attaches an upstream status code.
    pub fn with_code(mut self, code: u16) -> Self {
        self.code = Some(code);
        self
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == Some(kind)
    }
}

/// Fatal setup errors.
///
/// These mean the caller wired the service wrongly; they are returned
/// immediately and never folded into an envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown exchange: {0}")]
    UnknownExchange(String),

    #[error("Default exchange '{0}' is not configured")]
    DefaultNotConfigured(String),

    #[error("Exchange '{exchange}' requires a credential")]
    MissingCredential { exchange: String },

    #[error("No exchange is currently active")]
    NoActiveExchange,

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_serializes_screaming_snake() {
        let json = serde_json::to_string(&ErrorKind::RateNotFound).unwrap();
        assert_eq!(json, "\"RATE_NOT_FOUND\"");
        assert_eq!(ErrorKind::FetchError.to_string(), "FETCH_ERROR");
    }

    #[test]
    fn test_exchange_error_json_shape() {
        let err = ExchangeError::api(Some(401), "Invalid App ID");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], 401);
        assert_eq!(json["info"], "Invalid App ID");
        assert_eq!(json["type"], "API_ERROR");
    }

    #[test]
    fn test_rate_not_found_message() {
        let err = ExchangeError::rate_not_found("EUR", "GBP");
        assert!(err.is(ErrorKind::RateNotFound));
        assert_eq!(err.to_string(), "Rate not found for EUR -> GBP");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingCredential {
            exchange: "openexchangerates".into(),
        };
        assert_eq!(
            err.to_string(),
            "Exchange 'openexchangerates' requires a credential"
        );
    }
}
