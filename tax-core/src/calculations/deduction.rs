use rust_decimal::Decimal;

use crate::{FilingStatus, StandardDeductions};

/// Picks the deduction to subtract from gross income.
///
/// A present, non-zero custom amount wins; otherwise the standard deduction
/// for `filing_status` applies.
pub fn resolve_deduction(
    filing_status: FilingStatus,
    custom_deductions: Option<Decimal>,
    standard: &StandardDeductions,
) -> Decimal {
    match custom_deductions {
        Some(amount) if !amount.is_zero() => amount,
        _ => standard.amount_for(filing_status),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn custom_amount_wins_when_non_zero() {
        let standard = StandardDeductions::builtin();

        let deduction = resolve_deduction(FilingStatus::Single, Some(dec!(20000)), &standard);

        assert_eq!(deduction, dec!(20000));
    }

    #[test]
    fn zero_custom_amount_uses_standard() {
        let standard = StandardDeductions::builtin();

        let deduction = resolve_deduction(FilingStatus::MarriedJointly, Some(dec!(0.00)), &standard);

        assert_eq!(deduction, dec!(27700));
    }

    #[test]
    fn absent_custom_amount_uses_standard() {
        let standard = StandardDeductions::builtin();

        let deduction = resolve_deduction(FilingStatus::HeadOfHousehold, None, &standard);

        assert_eq!(deduction, dec!(20800));
    }

    #[test]
    fn married_separately_has_its_own_standard_amount() {
        let standard = StandardDeductions::builtin();

        let deduction = resolve_deduction(FilingStatus::MarriedSeparately, None, &standard);

        assert_eq!(deduction, dec!(13850));
    }
}
