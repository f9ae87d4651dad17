//! Optional exchange capabilities.

use serde::Serialize;

/// What an exchange can do beyond the mandatory contract.
///
/// Read once when the exchange is registered; the service never probes an
/// exchange for a capability at call time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExchangeCapabilities {
    /// One upstream call can return rates for several symbols.
    pub batch_rates: bool,
    /// A credential must be supplied before the exchange is usable.
    pub requires_key: bool,
    /// [`Exchange::health_check`](crate::ports::Exchange::health_check) is implemented.
    pub health_check: bool,
}
