//! Combines deduction, federal and state calculations into one result.
//!
//! # Steps
//!
//! | Step | Value |
//! |------|-------|
//! | 1 | Validate income (> 0) and filing status (present) |
//! | 2 | Deductions: custom amount if non-zero, else standard deduction |
//! | 3 | Taxable income: `max(0, income - deductions)` |
//! | 4 | Bracket schedule for the filing status (falls back to `single`) |
//! | 5 | Federal tax on taxable income; state tax on gross income |
//! | 6 | Total tax and after-tax income (not floored) |
//! | 7 | Effective rate: `total_tax / income` |
//! | 8 | Marginal rate at taxable income |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::orchestrate;
//! use tax_core::{CalculationInput, FilingStatus, StateCategory};
//!
//! let input = CalculationInput::new(dec!(50000), FilingStatus::Single)
//!     .with_custom_deductions(dec!(0))
//!     .with_state(StateCategory::Low);
//!
//! let result = orchestrate(&input).unwrap();
//!
//! assert_eq!(result.taxable_income, dec!(36150));
//! assert_eq!(result.total_tax, dec!(5618.00));
//! assert_eq!(result.after_tax_income, dec!(44382.00));
//! ```

use std::sync::LazyLock;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::max;
use crate::calculations::deduction::resolve_deduction;
use crate::calculations::federal::FederalTaxEngine;
use crate::calculations::state::state_tax;
use crate::{BracketTable, CalculationInput, CalculationResult, StandardDeductions};

static BUILTIN_BRACKETS: LazyLock<BracketTable> = LazyLock::new(BracketTable::builtin);
static BUILTIN_DEDUCTIONS: LazyLock<StandardDeductions> =
    LazyLock::new(StandardDeductions::builtin);

/// Input the user has to correct before a calculation can run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("please enter an income greater than zero")]
    MissingIncome,

    #[error("income cannot be negative: {0}")]
    NegativeIncome(Decimal),

    #[error("please select a filing status")]
    MissingFilingStatus,

    #[error("custom deductions cannot be negative: {0}")]
    NegativeDeductions(Decimal),
}

/// Calculates a [`CalculationResult`] with the built-in 2023 tables.
///
/// # Errors
///
/// Returns [`InvalidInput`] when income is missing, zero or negative, when
/// no filing status is given, or when custom deductions are negative.
pub fn orchestrate(input: &CalculationInput) -> Result<CalculationResult, InvalidInput> {
    TaxCalculator::new(&BUILTIN_BRACKETS, &BUILTIN_DEDUCTIONS).calculate(input)
}

/// Calculator bound to a bracket table and a standard deduction table.
#[derive(Debug, Clone, Copy)]
pub struct TaxCalculator<'a> {
    brackets: &'a BracketTable,
    deductions: &'a StandardDeductions,
}

impl<'a> TaxCalculator<'a> {
    pub fn new(
        brackets: &'a BracketTable,
        deductions: &'a StandardDeductions,
    ) -> Self {
        Self {
            brackets,
            deductions,
        }
    }

    /// Runs every step for `input`.
    ///
    /// # Errors
    ///
    /// See [`orchestrate`].
    pub fn calculate(
        &self,
        input: &CalculationInput,
    ) -> Result<CalculationResult, InvalidInput> {
        let income = match input.income {
            None => return Err(InvalidInput::MissingIncome),
            Some(income) if income.is_zero() => return Err(InvalidInput::MissingIncome),
            Some(income) if income < Decimal::ZERO => {
                return Err(InvalidInput::NegativeIncome(income));
            }
            Some(income) => income,
        };
        let filing_status = input.filing_status.ok_or(InvalidInput::MissingFilingStatus)?;
        if let Some(custom) = input.custom_deductions {
            if custom < Decimal::ZERO {
                return Err(InvalidInput::NegativeDeductions(custom));
            }
        }

        let deductions = resolve_deduction(filing_status, input.custom_deductions, self.deductions);
        let taxable_income = max(income - deductions, Decimal::ZERO);

        let engine = FederalTaxEngine::new(self.brackets.brackets_for(filing_status));
        let federal_tax = engine.tax(taxable_income);
        // Gross income, not taxable income.
        let state_tax = state_tax(income, input.state);

        let total_tax = federal_tax + state_tax;
        let after_tax_income = income - total_tax;
        let effective_rate = total_tax / income;
        let marginal_rate = engine.marginal_rate(taxable_income);

        debug!(
            %income,
            status = filing_status.as_str(),
            %deductions,
            %taxable_income,
            %federal_tax,
            %state_tax,
            "calculated tax"
        );

        Ok(CalculationResult {
            income,
            filing_status,
            deductions,
            taxable_income,
            federal_tax,
            state_tax,
            total_tax,
            after_tax_income,
            effective_rate,
            marginal_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{FilingStatus, StateCategory, TaxBracket};

    fn single_low(income: Decimal) -> CalculationInput {
        CalculationInput::new(income, FilingStatus::Single).with_state(StateCategory::Low)
    }

    // =========================================================================
    // validation
    // =========================================================================

    #[test]
    fn zero_income_is_rejected() {
        let input = CalculationInput::new(Decimal::ZERO, FilingStatus::Single);

        assert_eq!(orchestrate(&input), Err(InvalidInput::MissingIncome));
    }

    #[test]
    fn missing_income_is_rejected() {
        let input = CalculationInput {
            filing_status: Some(FilingStatus::Single),
            ..Default::default()
        };

        assert_eq!(orchestrate(&input), Err(InvalidInput::MissingIncome));
    }

    #[test]
    fn negative_income_is_rejected() {
        let input = CalculationInput::new(dec!(-10), FilingStatus::Single);

        assert_eq!(orchestrate(&input), Err(InvalidInput::NegativeIncome(dec!(-10))));
    }

    #[test]
    fn missing_filing_status_is_rejected() {
        let input = CalculationInput {
            income: Some(dec!(50000)),
            ..Default::default()
        };

        assert_eq!(orchestrate(&input), Err(InvalidInput::MissingFilingStatus));
    }

    #[test]
    fn negative_custom_deduction_is_rejected() {
        let input =
            CalculationInput::new(dec!(50000), FilingStatus::Single).with_custom_deductions(dec!(-1));

        assert_eq!(
            orchestrate(&input),
            Err(InvalidInput::NegativeDeductions(dec!(-1)))
        );
    }

    // =========================================================================
    // full calculations
    // =========================================================================

    #[test]
    fn single_filer_in_low_tax_state() {
        let input = single_low(dec!(50000)).with_custom_deductions(dec!(0));

        let result = orchestrate(&input).unwrap();

        assert_eq!(
            result,
            CalculationResult {
                income: dec!(50000),
                filing_status: FilingStatus::Single,
                deductions: dec!(13850),
                taxable_income: dec!(36150),
                federal_tax: dec!(4118.00),
                state_tax: dec!(1500.00),
                total_tax: dec!(5618.00),
                after_tax_income: dec!(44382.00),
                effective_rate: dec!(0.11236),
                marginal_rate: dec!(0.12),
            }
        );
    }

    #[test]
    fn married_separately_uses_single_brackets_and_own_deduction() {
        let separately = orchestrate(&CalculationInput::new(
            dec!(80000),
            FilingStatus::MarriedSeparately,
        ))
        .unwrap();
        let single = orchestrate(&CalculationInput::new(dec!(80000), FilingStatus::Single)).unwrap();

        assert_eq!(separately.deductions, dec!(13850));
        assert_eq!(separately.federal_tax, single.federal_tax);
        assert_eq!(separately.marginal_rate, single.marginal_rate);
        assert_eq!(separately.filing_status, FilingStatus::MarriedSeparately);
    }

    #[test]
    fn head_of_household_gets_larger_deduction_on_single_brackets() {
        let result = orchestrate(&CalculationInput::new(
            dec!(50000),
            FilingStatus::HeadOfHousehold,
        ))
        .unwrap();

        // 50000 - 20800 = 29200; 1100 + 18200 * 0.12
        assert_eq!(result.taxable_income, dec!(29200));
        assert_eq!(result.federal_tax, dec!(3284.00));
    }

    #[test]
    fn married_jointly_uses_own_schedule() {
        let result = orchestrate(&CalculationInput::new(
            dec!(127700),
            FilingStatus::MarriedJointly,
        ))
        .unwrap();

        assert_eq!(result.taxable_income, dec!(100000));
        assert_eq!(result.federal_tax, dec!(12615.00));
        assert_eq!(result.marginal_rate, dec!(0.22));
    }

    #[test]
    fn deduction_above_income_floors_taxable_income() {
        let input = single_low(dec!(10000));

        let result = orchestrate(&input).unwrap();

        assert_eq!(result.taxable_income, Decimal::ZERO);
        assert_eq!(result.federal_tax, Decimal::ZERO);
        assert_eq!(result.state_tax, dec!(300.00));
        assert_eq!(result.marginal_rate, dec!(0.10));
    }

    #[test]
    fn state_tax_uses_gross_income() {
        let input = CalculationInput::new(dec!(60000), FilingStatus::Single)
            .with_custom_deductions(dec!(25000))
            .with_state(StateCategory::High);

        let result = orchestrate(&input).unwrap();

        assert_eq!(result.state_tax, dec!(6000.00));
    }

    #[test]
    fn custom_deduction_replaces_standard() {
        let input = single_low(dec!(50000)).with_custom_deductions(dec!(20000));

        let result = orchestrate(&input).unwrap();

        assert_eq!(result.deductions, dec!(20000));
        assert_eq!(result.taxable_income, dec!(30000));
    }

    #[test]
    fn after_tax_income_is_not_floored() {
        // A 99% band makes total tax exceed gross income.
        let mut brackets = BracketTable::empty();
        brackets
            .insert(
                FilingStatus::Single,
                vec![TaxBracket::new(dec!(0), None, dec!(0.99))],
            )
            .unwrap();
        let deductions = StandardDeductions::empty();
        let calculator = TaxCalculator::new(&brackets, &deductions);
        let input = CalculationInput::new(dec!(100000), FilingStatus::Single)
            .with_custom_deductions(dec!(0.01))
            .with_state(StateCategory::High);

        let result = calculator.calculate(&input).unwrap();

        assert!(result.after_tax_income < Decimal::ZERO);
        assert_eq!(result.total_tax, result.federal_tax + result.state_tax);
    }

    #[test]
    fn custom_tables_are_honoured() {
        let mut brackets = BracketTable::builtin();
        brackets
            .insert(
                FilingStatus::HeadOfHousehold,
                vec![
                    TaxBracket::new(dec!(0), Some(dec!(15700)), dec!(0.10)),
                    TaxBracket::new(dec!(15700), None, dec!(0.12)),
                ],
            )
            .unwrap();
        let deductions = StandardDeductions::builtin();
        let calculator = TaxCalculator::new(&brackets, &deductions);

        let result = calculator
            .calculate(&CalculationInput::new(dec!(50000), FilingStatus::HeadOfHousehold))
            .unwrap();

        // 29200 taxable: 1570 + 13500 * 0.12
        assert_eq!(result.federal_tax, dec!(3190.00));
    }
}
