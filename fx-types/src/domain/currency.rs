//! Currency codes and rounding.

/// ISO 4217-like currency identifier.
///
/// Opaque to the engine: compared by exact string equality, never validated
/// beyond being present.
pub type CurrencyCode = String;

/// Precision used by [`round`] when the caller has no preference.
pub const DEFAULT_PRECISION: u32 = 2;

/// Rounds `value` to `precision` decimal places, half away from zero.
///
/// Every exchange rounds through this function so identical inputs give
/// identical outputs regardless of the exchange used.
pub fn round(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_two_places() {
        assert_eq!(round(123.456, 2), 123.46);
    }

    #[test]
    fn test_round_zero_places() {
        assert_eq!(round(123.456, 0), 123.0);
    }

    #[test]
    fn test_round_default_precision() {
        assert_eq!(round(123.456, DEFAULT_PRECISION), 123.46);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round(2.5, 0), 3.0);
        assert_eq!(round(-2.5, 0), -3.0);
    }

    #[test]
    fn test_round_keeps_sign() {
        assert_eq!(round(-0.126, 2), -0.13);
    }
}
