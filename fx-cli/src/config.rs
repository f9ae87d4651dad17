//! Configuration loading from environment.

use std::env;
use std::time::Duration;

/// Exchange used when `FX_DEFAULT_EXCHANGE` is unset.
pub const DEFAULT_EXCHANGE: &str = "google";

/// Upstream timeout used when `FX_TIMEOUT_MS` is unset.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub default_exchange: String,
    pub timeout: Duration,
    pub open_rates_app_id: Option<String>,
    pub open_rates_url: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let default_exchange =
            var("FX_DEFAULT_EXCHANGE").unwrap_or_else(|| DEFAULT_EXCHANGE.to_string());

        let timeout = match var("FX_TIMEOUT_MS") {
            Some(raw) => parse_timeout_ms(&raw)?,
            None => Duration::from_millis(DEFAULT_TIMEOUT_MS),
        };

        Ok(Self {
            default_exchange,
            timeout,
            open_rates_app_id: var("OPEN_EXCHANGE_RATES_APP_ID"),
            open_rates_url: var("OPEN_EXCHANGE_RATES_URL"),
        })
    }

    /// Applies command-line overrides on top of the environment.
    pub fn with_overrides(mut self, exchange: Option<String>, timeout_ms: Option<u64>) -> Self {
        if let Some(name) = exchange {
            self.default_exchange = name;
        }
        if let Some(ms) = timeout_ms {
            self.timeout = Duration::from_millis(ms);
        }
        self
    }
}

/// Parses a strictly positive millisecond count.
pub fn parse_timeout_ms(raw: &str) -> anyhow::Result<Duration> {
    let ms: u64 = raw
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("FX_TIMEOUT_MS must be a positive integer, got '{}'", raw))?;
    if ms == 0 {
        anyhow::bail!("FX_TIMEOUT_MS must be greater than zero");
    }
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.default_exchange, "google");
        assert_eq!(config.timeout, Duration::from_millis(5000));
        assert!(config.open_rates_app_id.is_none());
        assert!(config.open_rates_url.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("FX_DEFAULT_EXCHANGE", "fixed"),
            ("FX_TIMEOUT_MS", "250"),
            ("OPEN_EXCHANGE_RATES_APP_ID", "abc"),
            ("OPEN_EXCHANGE_RATES_URL", "http://localhost:9000/latest.json"),
        ])
        .unwrap();
        assert_eq!(config.default_exchange, "fixed");
        assert_eq!(config.timeout, Duration::from_millis(250));
        assert_eq!(config.open_rates_app_id.as_deref(), Some("abc"));
        assert_eq!(
            config.open_rates_url.as_deref(),
            Some("http://localhost:9000/latest.json")
        );
    }

    #[test]
    fn test_blank_app_id_is_unset() {
        let config = load(&[("OPEN_EXCHANGE_RATES_APP_ID", "  ")]).unwrap();
        assert!(config.open_rates_app_id.is_none());
    }

    #[test]
    fn test_flags_override_env() {
        let config = load(&[
            ("FX_DEFAULT_EXCHANGE", "openexchangerates"),
            ("FX_TIMEOUT_MS", "250"),
        ])
        .unwrap()
        .with_overrides(Some("fixed".into()), Some(900));
        assert_eq!(config.default_exchange, "fixed");
        assert_eq!(config.timeout, Duration::from_millis(900));

        let untouched = load(&[("FX_DEFAULT_EXCHANGE", "fixed")])
            .unwrap()
            .with_overrides(None, None);
        assert_eq!(untouched, load(&[("FX_DEFAULT_EXCHANGE", "fixed")]).unwrap());
    }

    #[test]
    fn test_invalid_timeout() {
        assert!(load(&[("FX_TIMEOUT_MS", "0")]).is_err());
        assert!(load(&[("FX_TIMEOUT_MS", "-5")]).is_err());
        assert!(load(&[("FX_TIMEOUT_MS", "soon")]).is_err());
    }
}
