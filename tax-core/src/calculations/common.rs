//! Shared arithmetic helpers for the tax calculations.
//!
//! Every tax amount the engine produces goes through [`round_half_up`].

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to cents, moving exact half-cent values away from zero.
///
/// Equivalent to scaling by 100, rounding to the nearest integer and scaling
/// back.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(3017.994)), dec!(3017.99));
/// assert_eq!(round_half_up(dec!(3017.995)), dec!(3018.00));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two amounts.
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::max;
///
/// assert_eq!(max(dec!(-250.00), Decimal::ZERO), Decimal::ZERO);
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}
