//! Concrete exchanges and their rate-resolution strategies.
//!
//! - `cross_rate` - derives any pair from a base-relative [`RatesSource`](fx_types::RatesSource)
//! - `google` - one quote page per pair, rate scraped from markup
//! - `extract` - the pattern ladder used by markup-scraping exchanges

pub mod cross_rate;
pub mod extract;
pub mod google;

pub use cross_rate::{CrossRateExchange, DEFAULT_BASE};
pub use extract::{RateExtractor, RatePattern, parse_rate};
pub use google::GoogleExchange;
