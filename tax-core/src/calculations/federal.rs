//! Progressive federal tax over a bracket schedule.
//!
//! Each bracket taxes only the slice of income that falls inside it, so the
//! tax on `taxable_income` is the sum over every bracket whose minimum it
//! exceeds of `(min(taxable_income, max) - min) * rate`.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::FederalTaxEngine;
//! use tax_core::{BracketTable, FilingStatus};
//!
//! let table = BracketTable::builtin();
//! let engine = FederalTaxEngine::new(table.brackets_for(FilingStatus::Single));
//!
//! assert_eq!(engine.tax(dec!(36150)), dec!(4118.00));
//! assert_eq!(engine.marginal_rate(dec!(36150)), dec!(0.12));
//! ```

use rust_decimal::Decimal;

use crate::TaxBracket;
use crate::calculations::common::round_half_up;

/// Applies one filing status's bracket schedule.
#[derive(Debug, Clone, Copy)]
pub struct FederalTaxEngine<'a> {
    tax_brackets: &'a [TaxBracket],
}

impl<'a> FederalTaxEngine<'a> {
    /// `tax_brackets` should be sorted ascending by `min_income` with an
    /// unbounded top bracket, as [`crate::BracketTable`] guarantees.
    pub fn new(tax_brackets: &'a [TaxBracket]) -> Self {
        Self { tax_brackets }
    }

    /// Federal tax on `taxable_income`, rounded to cents. Zero for zero or
    /// negative income.
    pub fn tax(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        if taxable_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let tax: Decimal = self
            .tax_brackets
            .iter()
            .filter(|b| taxable_income > b.min_income)
            .map(|b| {
                let upper = b
                    .max_income
                    .map_or(taxable_income, |max| max.min(taxable_income));
                (upper - b.min_income) * b.tax_rate
            })
            .sum();

        round_half_up(tax)
    }

    /// Rate applied to the next unit of income above `taxable_income`.
    ///
    /// Picks the bracket with `min <= taxable_income < max`; if none matches
    /// the top bracket's rate is returned. An empty schedule has rate zero.
    pub fn marginal_rate(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        self.tax_brackets
            .iter()
            .find(|b| b.contains(taxable_income))
            .or_else(|| self.tax_brackets.last())
            .map_or(Decimal::ZERO, |b| b.tax_rate)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{BracketTable, FilingStatus};

    fn single() -> Vec<TaxBracket> {
        BracketTable::builtin()
            .brackets_for(FilingStatus::Single)
            .to_vec()
    }

    fn married_jointly() -> Vec<TaxBracket> {
        BracketTable::builtin()
            .brackets_for(FilingStatus::MarriedJointly)
            .to_vec()
    }

    // =========================================================================
    // tax
    // =========================================================================

    #[test]
    fn tax_is_zero_for_zero_income() {
        let brackets = single();
        let engine = FederalTaxEngine::new(&brackets);

        assert_eq!(engine.tax(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn tax_within_first_bracket() {
        let brackets = single();
        let engine = FederalTaxEngine::new(&brackets);

        assert_eq!(engine.tax(dec!(10000)), dec!(1000.00));
    }

    #[test]
    fn tax_at_first_boundary() {
        let brackets = single();
        let engine = FederalTaxEngine::new(&brackets);

        assert_eq!(engine.tax(dec!(11000)), dec!(1100.00));
    }

    #[test]
    fn tax_spans_two_brackets() {
        let brackets = single();
        let engine = FederalTaxEngine::new(&brackets);

        // 11000 * 0.10 + 25150 * 0.12
        assert_eq!(engine.tax(dec!(36150)), dec!(4118.00));
    }

    #[test]
    fn tax_reaches_unbounded_top_bracket() {
        let brackets = single();
        let engine = FederalTaxEngine::new(&brackets);

        // 1100 + 4047 + 11143 + 20814 + 15728 + 121406.25 + 156093.75
        assert_eq!(engine.tax(dec!(1000000)), dec!(330332.00));
    }

    #[test]
    fn tax_uses_married_jointly_schedule() {
        let brackets = married_jointly();
        let engine = FederalTaxEngine::new(&brackets);

        // 2200 + 67450 * 0.12 + 10550 * 0.22
        assert_eq!(engine.tax(dec!(100000)), dec!(12615.00));
    }

    #[test]
    fn tax_rounds_fractional_cents() {
        let brackets = single();
        let engine = FederalTaxEngine::new(&brackets);

        // 1234.565 * 0.10 = 123.4565
        assert_eq!(engine.tax(dec!(1234.565)), dec!(123.46));
    }

    #[test]
    fn tax_is_monotonic_across_boundaries() {
        let brackets = single();
        let engine = FederalTaxEngine::new(&brackets);

        let mut previous = Decimal::ZERO;
        let mut income = Decimal::ZERO;
        while income <= dec!(700000) {
            let tax = engine.tax(income);
            assert!(tax >= previous, "tax decreased at income {income}");
            previous = tax;
            income += dec!(2500.25);
        }
    }

    #[test]
    fn tax_on_empty_schedule_is_zero() {
        let engine = FederalTaxEngine::new(&[]);

        assert_eq!(engine.tax(dec!(50000)), Decimal::ZERO);
    }

    // =========================================================================
    // marginal_rate
    // =========================================================================

    #[test]
    fn marginal_rate_matches_containing_bracket() {
        let brackets = single();
        let engine = FederalTaxEngine::new(&brackets);

        for bracket in &brackets {
            assert_eq!(engine.marginal_rate(bracket.min_income), bracket.tax_rate);
            if let Some(max) = bracket.max_income {
                assert_eq!(engine.marginal_rate(max - dec!(0.01)), bracket.tax_rate);
            }
        }
    }

    #[test]
    fn marginal_rate_at_boundary_uses_upper_bracket() {
        let brackets = single();
        let engine = FederalTaxEngine::new(&brackets);

        assert_eq!(engine.marginal_rate(dec!(11000)), dec!(0.12));
    }

    #[test]
    fn marginal_rate_for_zero_income_is_lowest_rate() {
        let brackets = single();
        let engine = FederalTaxEngine::new(&brackets);

        assert_eq!(engine.marginal_rate(Decimal::ZERO), dec!(0.10));
    }

    #[test]
    fn marginal_rate_falls_back_to_top_bracket() {
        // A schedule whose top is bounded never comes out of BracketTable,
        // but the lookup still answers with the last rate.
        let brackets = vec![
            TaxBracket::new(dec!(0), Some(dec!(1000)), dec!(0.10)),
            TaxBracket::new(dec!(1000), Some(dec!(2000)), dec!(0.20)),
        ];
        let engine = FederalTaxEngine::new(&brackets);

        assert_eq!(engine.marginal_rate(dec!(5000)), dec!(0.20));
    }

    #[test]
    fn marginal_rate_on_empty_schedule_is_zero() {
        let engine = FederalTaxEngine::new(&[]);

        assert_eq!(engine.marginal_rate(dec!(100)), Decimal::ZERO);
    }
}
