//! Exchange Service
//!
//! Holds every configured exchange, tracks which one is active and routes
//! conversion and rates requests to it. Contains NO rate logic - pure
//! delegation. Envelopes come back exactly as the exchange built them.
//!
//! The active pointer and each exchange's base are plain last-writer-wins
//! fields: one caller at a time per service instance.

use std::collections::BTreeMap;

use fx_types::{
    ConfigError, ConversionResult, ConvertRequest, Exchange, ExchangeCapabilities, ExchangeError,
    ExchangeRatesResult, RatesRequest,
};

/// Deferred exchange constructor, invoked once while the service is built.
pub type ExchangeFactory = Box<dyn FnOnce() -> Result<Box<dyn Exchange>, ConfigError> + Send>;

/// A configuration entry: a ready exchange or a constructor for one.
pub enum ExchangeSource {
    Instance(Box<dyn Exchange>),
    Factory(ExchangeFactory),
}

impl ExchangeSource {
    fn resolve(self) -> Result<Box<dyn Exchange>, ConfigError> {
        match self {
            ExchangeSource::Instance(exchange) => Ok(exchange),
            ExchangeSource::Factory(factory) => factory(),
        }
    }
}

/// Static service configuration: the default exchange name and every
/// named exchange.
pub struct ServiceConfig {
    default: String,
    exchanges: Vec<(String, ExchangeSource)>,
}

impl ServiceConfig {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            exchanges: Vec::new(),
        }
    }

    pub fn source(mut self, name: impl Into<String>, source: ExchangeSource) -> Self {
        self.exchanges.push((name.into(), source));
        self
    }

    /// Registers a ready-made exchange under `name`.
    pub fn instance(self, name: impl Into<String>, exchange: impl Exchange + 'static) -> Self {
        self.source(name, ExchangeSource::Instance(Box::new(exchange)))
    }

    /// Registers a constructor; it runs when the service is built.
    pub fn factory<F>(self, name: impl Into<String>, factory: F) -> Self
    where
        F: FnOnce() -> Result<Box<dyn Exchange>, ConfigError> + Send + 'static,
    {
        self.source(name, ExchangeSource::Factory(Box::new(factory)))
    }

    pub fn default_name(&self) -> &str {
        &self.default
    }
}

struct RegisteredExchange {
    exchange: Box<dyn Exchange>,
    capabilities: ExchangeCapabilities,
}

/// Registry of named exchanges with a single active selection.
#[derive(Default)]
pub struct ExchangeService {
    exchanges: BTreeMap<String, RegisteredExchange>,
    current: Option<String>,
}

impl ExchangeService {
    /// Builds every configured exchange and activates the default one.
    ///
    /// Fails fast on the first factory error, on a duplicated name, or when
    /// the default name has no entry.
    pub fn new(config: ServiceConfig) -> Result<Self, ConfigError> {
        let mut exchanges = BTreeMap::new();

        for (name, source) in config.exchanges {
            if exchanges.contains_key(&name) {
                return Err(ConfigError::InvalidSetting(format!(
                    "Exchange '{}' is configured more than once",
                    name
                )));
            }
            let exchange = source.resolve()?;
            let capabilities = exchange.capabilities();
            tracing::debug!(exchange = %name, ?capabilities, "registered exchange");
            exchanges.insert(
                name,
                RegisteredExchange {
                    exchange,
                    capabilities,
                },
            );
        }

        if !exchanges.contains_key(&config.default) {
            return Err(ConfigError::DefaultNotConfigured(config.default));
        }

        Ok(Self {
            exchanges,
            current: Some(config.default),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Registry
    // ─────────────────────────────────────────────────────────────────────────────

    /// Makes `name` the active exchange.
    pub fn use_exchange(&mut self, name: &str) -> Result<&mut Self, ConfigError> {
        if !self.exchanges.contains_key(name) {
            return Err(ConfigError::UnknownExchange(name.to_string()));
        }
        if self.current.as_deref() != Some(name) {
            tracing::info!(from = ?self.current, to = name, "switching active exchange");
            self.current = Some(name.to_string());
        }
        Ok(self)
    }

    /// Names of every configured exchange, sorted.
    pub fn available_exchanges(&self) -> Vec<&str> {
        self.exchanges.keys().map(String::as_str).collect()
    }

    pub fn current_exchange(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Capabilities captured when `name` was registered.
    pub fn capabilities(&self, name: &str) -> Option<ExchangeCapabilities> {
        self.exchanges.get(name).map(|e| e.capabilities)
    }

    pub fn exchange(&self, name: &str) -> Option<&dyn Exchange> {
        self.exchanges.get(name).map(|e| e.exchange.as_ref())
    }

    pub fn exchange_mut(&mut self, name: &str) -> Option<&mut (dyn Exchange + 'static)> {
        self.exchanges.get_mut(name).map(|e| e.exchange.as_mut())
    }

    /// The exchange requests are currently routed to.
    pub fn active_exchange(&self) -> Result<&dyn Exchange, ConfigError> {
        self.active().map(|e| e.exchange.as_ref())
    }

    fn active(&self) -> Result<&RegisteredExchange, ConfigError> {
        self.current
            .as_deref()
            .and_then(|name| self.exchanges.get(name))
            .ok_or(ConfigError::NoActiveExchange)
    }

    fn active_mut(&mut self) -> Result<&mut RegisteredExchange, ConfigError> {
        match self.current.as_deref() {
            Some(name) => self
                .exchanges
                .get_mut(name)
                .ok_or(ConfigError::NoActiveExchange),
            None => Err(ConfigError::NoActiveExchange),
        }
    }

    /// Changes the base of the active exchange.
    pub fn set_base(&mut self, base: &str) -> Result<&mut Self, ConfigError> {
        self.active_mut()?.exchange.set_base(base);
        Ok(self)
    }

    /// Supplies a credential to the exchange registered as `name`.
    pub fn set_key(&mut self, name: &str, key: &str) -> Result<&mut Self, ConfigError> {
        self.exchange_mut(name)
            .ok_or_else(|| ConfigError::UnknownExchange(name.to_string()))?
            .set_key(key);
        Ok(self)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Delegation
    // ─────────────────────────────────────────────────────────────────────────────

    /// Converts through the active exchange.
    pub async fn convert(&self, request: &ConvertRequest) -> Result<ConversionResult, ConfigError> {
        let active = self.active()?;
        Ok(active.exchange.convert(request).await)
    }

    /// Fetches rates through the active exchange.
    pub async fn get_exchange_rates(
        &mut self,
        request: RatesRequest,
    ) -> Result<ExchangeRatesResult, ConfigError> {
        let active = self.active_mut()?;
        Ok(active.exchange.get_exchange_rates(request).await)
    }

    /// Health of the active exchange.
    ///
    /// `Ok(None)` when the exchange registered without health-check support;
    /// the exchange is not called in that case.
    pub async fn health(&self) -> Result<Option<Result<(), ExchangeError>>, ConfigError> {
        let active = self.active()?;
        if !active.capabilities.health_check {
            return Ok(None);
        }
        Ok(Some(active.exchange.health_check().await))
    }
}
