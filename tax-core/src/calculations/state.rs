use rust_decimal::Decimal;

use crate::StateCategory;
use crate::calculations::common::round_half_up;

/// Flat-rate state tax on gross (pre-deduction) income, rounded to cents.
pub fn state_tax(
    gross_income: Decimal,
    category: StateCategory,
) -> Decimal {
    round_half_up(gross_income * category.rate())
}
