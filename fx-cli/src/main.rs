//! FX CLI
//!
//! Command-line interface for currency conversion and exchange rates.
//!
//! Wiring:
//! - Load configuration from `.env` and the environment
//! - Register every available exchange with the exchange service
//! - Route the subcommand to the active exchange

mod config;

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fx_hex::exchanges::google;
use fx_hex::outbound::{fixed, open_rates};
use fx_hex::{
    CrossRateExchange, ExchangeService, FixedRatesSource, GoogleExchange, HttpFetch,
    OpenRatesSource, ReqwestFetcher, ServiceConfig,
};
use fx_types::{ConvertRequest, Exchange, RatesRequest};

use config::Config;

#[derive(Parser)]
#[command(name = "fx")]
#[command(author, version, about = "Currency conversion and exchange rates", long_about = None)]
struct Cli {
    /// Exchange to route requests to (overrides FX_DEFAULT_EXCHANGE)
    #[arg(long, global = true)]
    exchange: Option<String>,

    /// Upstream timeout in milliseconds (overrides FX_TIMEOUT_MS)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_ms: Option<u64>,

    /// Print result envelopes as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an amount between two currencies
    Convert {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        from: String,
        to: String,
    },
    /// Fetch rates relative to a base currency
    Rates {
        /// Base currency (defaults to the exchange's current base)
        #[arg(long)]
        base: Option<String>,
        /// Symbols to fetch (comma-separated, defaults to every known currency)
        #[arg(long, value_delimiter = ',')]
        symbols: Vec<String>,
    },
    /// List configured exchanges
    Exchanges,
    /// List known currencies
    Currencies {
        /// Only currencies used in this ISO 3166-1 alpha-2 country
        #[arg(long)]
        country: Option<String>,
    },
    /// Format an amount for display
    Format {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        code: String,
        #[arg(long, default_value = "en-US")]
        locale: String,
        /// Fail instead of falling back on an unknown code or locale
        #[arg(long)]
        strict: bool,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,fx_hex=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Registers `google` and `fixed`, plus `openexchangerates` when an app id is set.
fn build_service(config: &Config) -> Result<ExchangeService> {
    let fetcher: Arc<dyn HttpFetch> = Arc::new(ReqwestFetcher::new());
    let timeout = config.timeout;

    let google_fetcher = fetcher.clone();
    let mut services = ServiceConfig::new(config.default_exchange.as_str())
        .factory(google::EXCHANGE_NAME, move || {
            let exchange = GoogleExchange::new(google_fetcher).with_timeout(timeout);
            Ok(Box::new(exchange) as Box<dyn Exchange>)
        })
        .instance(
            fixed::SOURCE_ID,
            CrossRateExchange::new(FixedRatesSource::indicative()),
        );

    if let Some(app_id) = config.open_rates_app_id.clone() {
        let endpoint = config.open_rates_url.clone();
        services = services.factory(open_rates::SOURCE_ID, move || {
            let mut source = OpenRatesSource::new(app_id, fetcher)?.with_timeout(timeout);
            if let Some(endpoint) = endpoint {
                source = source.with_endpoint(endpoint);
            }
            Ok(Box::new(CrossRateExchange::new(source)) as Box<dyn Exchange>)
        });
    }

    Ok(ExchangeService::new(services)?)
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let config = Config::from_env()?.with_overrides(cli.exchange.clone(), cli.timeout_ms);
    let mut service = build_service(&config)?;
    tracing::debug!(
        exchange = ?service.current_exchange(),
        timeout_ms = config.timeout.as_millis() as u64,
        "exchange service ready"
    );

    match cli.command {
        Commands::Convert { amount, from, to } => {
            let request = ConvertRequest::new(amount, from.to_uppercase(), to.to_uppercase());
            let res = service.convert(&request).await?;

            if cli.json {
                print_json(&res)?;
            } else if let (Some(result), Some(rate)) = (res.result(), res.rate()) {
                let exchange = service.active_exchange()?;
                let digits = exchange
                    .get_by_code(&request.to)
                    .map(|c| u32::from(c.decimal_digits))
                    .unwrap_or(fx_types::DEFAULT_PRECISION);
                println!(
                    "{} {} = {} {} (rate {})",
                    request.amount,
                    request.from,
                    exchange.round(result, digits),
                    request.to,
                    rate
                );
            }

            if let Some(err) = res.error() {
                eprintln!("✗ {}", err);
                std::process::exit(1);
            }
        }

        Commands::Rates { base, symbols } => {
            let mut request = RatesRequest::new();
            if let Some(base) = base {
                request = request.with_base(base.to_uppercase());
            }
            let symbols: Vec<String> = symbols
                .into_iter()
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_uppercase())
                .collect();
            if !symbols.is_empty() {
                request = request.with_symbols(symbols);
            }

            let res = service.get_exchange_rates(request).await?;

            if cli.json {
                print_json(&res)?;
            } else {
                println!("Base: {} ({})", res.base(), res.date());
                let sorted: BTreeMap<_, _> = res.rates().iter().collect();
                for (symbol, rate) in sorted {
                    println!("  {:<4} {}", symbol, rate);
                }
            }

            if let Some(err) = res.error() {
                eprintln!("✗ {}", err);
                std::process::exit(1);
            }
        }

        Commands::Exchanges => {
            let current = service.current_exchange();
            let listing: Vec<_> = service
                .available_exchanges()
                .into_iter()
                .map(|name| {
                    let caps = service.capabilities(name).unwrap_or_default();
                    serde_json::json!({
                        "name": name,
                        "active": Some(name) == current,
                        "capabilities": caps,
                    })
                })
                .collect();

            if cli.json {
                print_json(&listing)?;
            } else {
                for name in service.available_exchanges() {
                    let caps = service.capabilities(name).unwrap_or_default();
                    let marker = if Some(name) == current { "*" } else { " " };
                    let mut flags = Vec::new();
                    if caps.batch_rates {
                        flags.push("batch");
                    }
                    if caps.requires_key {
                        flags.push("key");
                    }
                    if caps.health_check {
                        flags.push("health");
                    }
                    println!("{} {:<18} {}", marker, name, flags.join(","));
                }
            }
        }

        Commands::Currencies { country } => {
            let exchange = service.active_exchange()?;
            let currencies = match country {
                Some(iso2) => exchange.filter_by_country(&iso2),
                None => exchange
                    .currencies()
                    .iter()
                    .filter_map(|code| exchange.get_by_code(code))
                    .collect(),
            };

            if cli.json {
                print_json(&currencies)?;
            } else {
                for c in currencies {
                    println!("{:<4} {:<4} {}", c.code, c.symbol, c.name);
                }
            }
        }

        Commands::Format {
            amount,
            code,
            locale,
            strict,
        } => {
            let code = code.to_uppercase();
            let formatted = if strict {
                currency_data::try_format(amount, &code, &locale)?
            } else {
                service.active_exchange()?.format(amount, &code, &locale)
            };

            if cli.json {
                print_json(&serde_json::json!({
                    "amount": amount,
                    "code": code,
                    "locale": locale,
                    "formatted": formatted,
                }))?;
            } else {
                println!("{}", formatted);
            }
        }
    }

    Ok(())
}
