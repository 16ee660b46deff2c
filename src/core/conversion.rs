//! Converts amounts between currencies whose rates share a base currency.

use super::rates::RateSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("Rate unavailable for currency: {0}")]
    RateUnavailable(String),
}

fn resolve_rate(currency: &str, base: &str, rates: &RateSet) -> Result<f64, ConversionError> {
    if currency == base {
        return Ok(1.0);
    }
    rates
        .get(currency)
        .copied()
        .filter(|rate| *rate != 0.0 && !rate.is_nan())
        .ok_or_else(|| ConversionError::RateUnavailable(currency.to_string()))
}

/// Converts `amount` from `from` to `to`, failing when either rate is unknown or zero.
///
/// The amount is normalised into `base` and then into the target currency.
/// No rounding is applied.
pub fn try_convert(
    amount: f64,
    from: &str,
    to: &str,
    base: &str,
    rates: &RateSet,
) -> Result<f64, ConversionError> {
    if from == to {
        return Ok(amount);
    }

    let from_rate = resolve_rate(from, base, rates)?;
    let to_rate = resolve_rate(to, base, rates)?;

    Ok((amount / from_rate) * to_rate)
}

/// Same as [`try_convert`], but an unknown or zero rate yields `0.0`.
///
/// Display code relies on this to render "0.00" instead of failing; use
/// [`try_convert`] when a computed zero must be told apart from a missing rate.
pub fn convert(amount: f64, from: &str, to: &str, base: &str, rates: &RateSet) -> f64 {
    try_convert(amount, from, to, base, rates).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates() -> RateSet {
        RateSet::from([
            ("EUR".to_string(), 0.9),
            ("JPY".to_string(), 150.0),
            ("ZZZ".to_string(), 0.0),
        ])
    }

    #[test]
    fn test_same_currency_is_identity() {
        for amount in [0.0, 1.5, -42.0, 1e12] {
            assert_eq!(convert(amount, "EUR", "EUR", "USD", &rates()), amount);
            // Identity holds even without any known rate.
            assert_eq!(convert(amount, "XXX", "XXX", "USD", &RateSet::new()), amount);
        }
    }

    #[test]
    fn test_cross_conversion() {
        let result = convert(100.0, "EUR", "JPY", "USD", &rates());
        assert_eq!(result, 100.0 / 0.9 * 150.0);
        assert!((result - 16666.67).abs() < 0.01);
    }

    #[test]
    fn test_conversion_to_base_divides_by_from_rate() {
        assert_eq!(convert(45.0, "EUR", "USD", "USD", &rates()), 45.0 / 0.9);
        assert_eq!(convert(45.0, "USD", "JPY", "USD", &rates()), 45.0 * 150.0);
    }

    #[test]
    fn test_missing_rate_returns_zero() {
        assert_eq!(convert(100.0, "GBP", "JPY", "USD", &rates()), 0.0);
        assert_eq!(convert(100.0, "EUR", "GBP", "USD", &rates()), 0.0);
    }

    #[test]
    fn test_zero_and_nan_rates_are_unavailable() {
        assert_eq!(convert(100.0, "ZZZ", "EUR", "USD", &rates()), 0.0);

        let mut with_nan = rates();
        with_nan.insert("NAN".to_string(), f64::NAN);
        assert_eq!(convert(100.0, "EUR", "NAN", "USD", &with_nan), 0.0);
    }

    #[test]
    fn test_try_convert_names_missing_currency() {
        assert_eq!(
            try_convert(1.0, "EUR", "GBP", "USD", &rates()),
            Err(ConversionError::RateUnavailable("GBP".to_string()))
        );
        assert_eq!(
            try_convert(1.0, "ZZZ", "EUR", "USD", &rates())
                .unwrap_err()
                .to_string(),
            "Rate unavailable for currency: ZZZ"
        );
    }

    #[test]
    fn test_try_convert_distinguishes_computed_zero() {
        assert_eq!(try_convert(0.0, "EUR", "JPY", "USD", &rates()), Ok(0.0));
    }
}
