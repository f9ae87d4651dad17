//! Currency Metadata Table with Macro-Based Generation
//!
//! This library provides a read-only table of ISO 4217 currencies: display
//! symbol, English name, number of minor-unit digits and the ISO 3166 alpha-2
//! countries that use each currency. Rows are defined declaratively with a
//! macro that also generates a string constant per code.
//!
//! # Adding a New Currency
//! Simply add a line to the `define_currencies!` macro invocation:
//! ```ignore
//! define_currencies! {
//!     // ... existing currencies ...
//!     ISK => ("kr", "Icelandic Krona", 0, ["IS"]),
//! }
//! ```
//!
//! # Example
//! ```
//! use currency_data::{codes, lookup, format_amount};
//!
//! let usd = lookup(codes::USD).unwrap();
//! assert_eq!(usd.symbol, "$");
//!
//! assert_eq!(format_amount(1234.5, "USD", "en-US"), "$1,234.50");
//! assert_eq!(format_amount(1234.5, "XYZ", "en-US"), "XYZ 1234.50");
//! ```

mod format;

pub use format::{FormatError, SUPPORTED_LOCALES, fallback_format, format_amount, try_format};

use serde::Serialize;

// ─────────────────────────────────────────────────────────────────────────────
// Currency Metadata
// ─────────────────────────────────────────────────────────────────────────────

/// Display and formatting metadata for one currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
    /// Digits after the decimal separator (2 for USD, 0 for JPY).
    pub decimal_digits: u8,
    /// ISO 3166 alpha-2 codes of the countries using this currency.
    pub countries: &'static [&'static str],
}

impl CurrencyInfo {
    /// Returns true if `iso2` (case-insensitive) uses this currency.
    pub fn is_used_in(&self, iso2: &str) -> bool {
        self.countries.iter().any(|c| c.eq_ignore_ascii_case(iso2))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// THE MACRO: Defines the table and one constant per code
// ─────────────────────────────────────────────────────────────────────────────

/// Macro to define the currency table.
///
/// # Syntax
/// ```ignore
/// define_currencies! {
///     CODE => ("SYMBOL", "Name", decimal_digits, ["ISO2", ...]),
/// }
/// ```
#[macro_export]
macro_rules! define_currencies {
    (
        $(
            $code:ident => ($symbol:literal, $name:literal, $digits:expr, [$($country:literal),* $(,)?])
        ),* $(,)?
    ) => {
        /// Every known currency, in declaration order.
        pub static CURRENCIES: &[CurrencyInfo] = &[
            $(
                CurrencyInfo {
                    code: stringify!($code),
                    symbol: $symbol,
                    name: $name,
                    decimal_digits: $digits,
                    countries: &[$($country),*],
                },
            )*
        ];

        /// String constants for every code in the table.
        pub mod codes {
            $(
                pub const $code: &str = stringify!($code);
            )*
        }
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// CURRENCY DEFINITIONS - Add new currencies here!
// ─────────────────────────────────────────────────────────────────────────────

define_currencies! {
    USD => ("$", "US Dollar", 2, ["US", "EC", "SV", "PA", "PR", "TL"]),
    EUR => ("€", "Euro", 2, ["AT", "BE", "CY", "DE", "EE", "ES", "FI", "FR", "GR", "HR", "IE", "IT", "LT", "LU", "LV", "MT", "NL", "PT", "SI", "SK"]),
    GBP => ("£", "British Pound", 2, ["GB", "IM", "JE", "GG"]),
    JPY => ("¥", "Japanese Yen", 0, ["JP"]),
    CHF => ("CHF", "Swiss Franc", 2, ["CH", "LI"]),
    CAD => ("CA$", "Canadian Dollar", 2, ["CA"]),
    AUD => ("A$", "Australian Dollar", 2, ["AU", "KI", "NR", "TV"]),
    NZD => ("NZ$", "New Zealand Dollar", 2, ["NZ", "CK", "NU"]),
    CNY => ("CN¥", "Chinese Yuan", 2, ["CN"]),
    HKD => ("HK$", "Hong Kong Dollar", 2, ["HK"]),
    SGD => ("S$", "Singapore Dollar", 2, ["SG"]),
    INR => ("₹", "Indian Rupee", 2, ["IN", "BT"]),
    KRW => ("₩", "South Korean Won", 0, ["KR"]),
    SEK => ("kr", "Swedish Krona", 2, ["SE"]),
    NOK => ("kr", "Norwegian Krone", 2, ["NO", "SJ"]),
    DKK => ("kr", "Danish Krone", 2, ["DK", "GL", "FO"]),
    PLN => ("zł", "Polish Zloty", 2, ["PL"]),
    CZK => ("Kč", "Czech Koruna", 2, ["CZ"]),
    HUF => ("Ft", "Hungarian Forint", 2, ["HU"]),
    RON => ("lei", "Romanian Leu", 2, ["RO"]),
    TRY => ("₺", "Turkish Lira", 2, ["TR"]),
    RUB => ("₽", "Russian Ruble", 2, ["RU"]),
    BRL => ("R$", "Brazilian Real", 2, ["BR"]),
    MXN => ("MX$", "Mexican Peso", 2, ["MX"]),
    ARS => ("AR$", "Argentine Peso", 2, ["AR"]),
    CLP => ("CL$", "Chilean Peso", 0, ["CL"]),
    ZAR => ("R", "South African Rand", 2, ["ZA", "LS", "NA"]),
    ILS => ("₪", "Israeli New Shekel", 2, ["IL", "PS"]),
    AED => ("AED", "UAE Dirham", 2, ["AE"]),
    SAR => ("SAR", "Saudi Riyal", 2, ["SA"]),
    THB => ("฿", "Thai Baht", 2, ["TH"]),
    IDR => ("Rp", "Indonesian Rupiah", 2, ["ID"]),
    MYR => ("RM", "Malaysian Ringgit", 2, ["MY"]),
    PHP => ("₱", "Philippine Peso", 2, ["PH"]),
    KWD => ("KD", "Kuwaiti Dinar", 3, ["KW"]),
}

// ─────────────────────────────────────────────────────────────────────────────
// Lookups
// ─────────────────────────────────────────────────────────────────────────────

/// Finds a currency by its exact code.
pub fn lookup(code: &str) -> Option<&'static CurrencyInfo> {
    CURRENCIES.iter().find(|c| c.code == code)
}

/// All codes in table order.
pub fn all_codes() -> Vec<&'static str> {
    CURRENCIES.iter().map(|c| c.code).collect()
}

/// Currencies used in the given country.
pub fn filter_by_country(iso2: &str) -> Vec<&'static CurrencyInfo> {
    CURRENCIES.iter().filter(|c| c.is_used_in(iso2)).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
