use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a command-line amount cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid amount '{input}': {source}")]
pub struct ParseAmountError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Strips surrounding whitespace, a leading `$` and `,` thousands separators.
fn normalize_amount(s: &str) -> String {
    let trimmed = s.trim();
    let unsigned = trimmed.strip_prefix('$').unwrap_or(trimmed);
    unsigned.replace(',', "")
}

/// Parses a user-supplied amount such as `"85,000"` or `"$1,234.56"`.
///
/// Empty input is treated as zero, which the calculator then reports as a
/// missing income.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_cli::utils::parse_amount;
///
/// assert_eq!(parse_amount("$85,000.50").unwrap(), dec!(85000.50));
/// ```
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let normalized = normalize_amount(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid amount: {}", e);
        ParseAmountError {
            input: s.to_string(),
            source: e,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_amount_accepts_comma_thousands_separator() {
        assert_eq!(parse_amount("1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_amount("1,234,567.89").unwrap(), dec!(1234567.89));
    }

    #[test]
    fn parse_amount_accepts_dollar_sign() {
        assert_eq!(parse_amount("$50,000").unwrap(), dec!(50000));
        assert_eq!(parse_amount(" $7 ").unwrap(), dec!(7));
    }

    #[test]
    fn parse_amount_keeps_sign() {
        assert_eq!(parse_amount("-500").unwrap(), dec!(-500));
    }

    #[test]
    fn parse_amount_empty_treated_as_zero() {
        assert_eq!(parse_amount("").unwrap(), Decimal::ZERO);
        assert_eq!(parse_amount("   ").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_amount_invalid_returns_error() {
        let err = parse_amount("fifty").unwrap_err();

        assert!(err.to_string().contains("fifty"));
    }
}
