//! Locale-aware amount formatting.
//!
//! Only a handful of locales are known. Anything outside the table (or an
//! unknown currency code) falls back to `"<CODE> <amount>"` with two decimals.

use crate::lookup;

/// Error returned by [`try_format`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),

    #[error("Amount is not a finite number")]
    NotFinite,
}

struct LocaleRules {
    tag: &'static str,
    group: &'static str,
    decimal: &'static str,
    symbol_first: bool,
}

const LOCALES: &[LocaleRules] = &[
    LocaleRules { tag: "en-US", group: ",", decimal: ".", symbol_first: true },
    LocaleRules { tag: "en-GB", group: ",", decimal: ".", symbol_first: true },
    LocaleRules { tag: "ja-JP", group: ",", decimal: ".", symbol_first: true },
    LocaleRules { tag: "de-DE", group: ".", decimal: ",", symbol_first: false },
    LocaleRules { tag: "es-ES", group: ".", decimal: ",", symbol_first: false },
    LocaleRules { tag: "fr-FR", group: " ", decimal: ",", symbol_first: false },
];

/// Locale tags accepted by [`try_format`].
pub const SUPPORTED_LOCALES: &[&str] = &["en-US", "en-GB", "ja-JP", "de-DE", "es-ES", "fr-FR"];

/// Formats `amount` in `code` for `locale`, using the currency's own precision.
pub fn try_format(amount: f64, code: &str, locale: &str) -> Result<String, FormatError> {
    let info = lookup(code).ok_or_else(|| FormatError::UnknownCurrency(code.to_string()))?;
    let rules = LOCALES
        .iter()
        .find(|l| l.tag.eq_ignore_ascii_case(locale))
        .ok_or_else(|| FormatError::UnsupportedLocale(locale.to_string()))?;
    if !amount.is_finite() {
        return Err(FormatError::NotFinite);
    }

    let digits = format!("{:.*}", info.decimal_digits as usize, amount.abs());
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };

    let mut number = group_digits(int_part, rules.group);
    if let Some(frac) = frac_part {
        number.push_str(rules.decimal);
        number.push_str(frac);
    }

    // "-0.00" reads as noise; only keep the sign when something is printed.
    let sign = if amount < 0.0 && number.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };

    Ok(if rules.symbol_first {
        format!("{}{}{}", sign, info.symbol, number)
    } else {
        format!("{}{} {}", sign, number, info.symbol)
    })
}

/// Formats with [`try_format`], falling back to [`fallback_format`] on any error.
pub fn format_amount(amount: f64, code: &str, locale: &str) -> String {
    try_format(amount, code, locale).unwrap_or_else(|_| fallback_format(amount, code))
}

/// The fixed `"<CODE> <amount with 2 decimals>"` representation.
pub fn fallback_format(amount: f64, code: &str) -> String {
    format!("{} {:.2}", code, amount)
}

fn group_digits(int_part: &str, sep: &str) -> String {
    let len = int_part.len();
    let mut out = String::with_capacity(len + (len / 3) * sep.len());
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(sep);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_en_us_grouping() {
        assert_eq!(try_format(1234567.25, "USD", "en-US").unwrap(), "$1,234,567.25");
    }

    #[test]
    fn test_de_de_symbol_after() {
        assert_eq!(try_format(1234.5, "EUR", "de-DE").unwrap(), "1.234,50 €");
    }

    #[test]
    fn test_fr_fr_space_grouping() {
        assert_eq!(try_format(1234567.0, "EUR", "fr-FR").unwrap(), "1 234 567,00 €");
    }

    #[test]
    fn test_zero_decimal_currency() {
        assert_eq!(try_format(1234.25, "JPY", "ja-JP").unwrap(), "¥1,234");
    }

    #[test]
    fn test_negative_amount() {
        assert_eq!(try_format(-42.5, "GBP", "en-GB").unwrap(), "-£42.50");
    }

    #[test]
    fn test_small_values_are_not_grouped() {
        assert_eq!(try_format(999.0, "USD", "en-US").unwrap(), "$999.00");
        assert_eq!(try_format(0.0, "USD", "en-US").unwrap(), "$0.00");
    }

    #[test]
    fn test_unknown_currency_error() {
        assert_eq!(
            try_format(1.0, "XYZ", "en-US"),
            Err(FormatError::UnknownCurrency("XYZ".into()))
        );
    }

    #[test]
    fn test_unknown_locale_error() {
        assert_eq!(
            try_format(1.0, "USD", "xx-XX"),
            Err(FormatError::UnsupportedLocale("xx-XX".into()))
        );
    }

    #[test]
    fn test_fallback_on_failure() {
        assert_eq!(format_amount(12.5, "XYZ", "en-US"), "XYZ 12.50");
        assert_eq!(format_amount(12.5, "USD", "xx-XX"), "USD 12.50");
        assert_eq!(format_amount(f64::NAN, "USD", "en-US"), "USD NaN");
    }

    #[test]
    fn test_supported_locales_match_rules() {
        for tag in SUPPORTED_LOCALES {
            assert!(try_format(1.0, "USD", tag).is_ok(), "{tag} should format");
        }
    }
}
