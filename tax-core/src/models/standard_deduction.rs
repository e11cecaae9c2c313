use std::collections::HashMap;

use rust_decimal::Decimal;

use super::FilingStatus;

/// Standard deduction for a single filer, used whenever a status has no
/// entry of its own.
pub const SINGLE_STANDARD_DEDUCTION: Decimal = Decimal::from_parts(13_850, 0, 0, false, 0);

/// Standard deduction amounts keyed by filing status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardDeductions {
    amounts: HashMap<FilingStatus, Decimal>,
}

impl StandardDeductions {
    pub fn empty() -> Self {
        Self {
            amounts: HashMap::new(),
        }
    }

    /// 2023 amounts for every filing status.
    pub fn builtin() -> Self {
        Self::empty()
            .with_amount(FilingStatus::Single, SINGLE_STANDARD_DEDUCTION)
            .with_amount(FilingStatus::MarriedJointly, Decimal::from(27_700))
            .with_amount(FilingStatus::MarriedSeparately, Decimal::from(13_850))
            .with_amount(FilingStatus::HeadOfHousehold, Decimal::from(20_800))
    }

    pub fn with_amount(
        mut self,
        status: FilingStatus,
        amount: Decimal,
    ) -> Self {
        self.amounts.insert(status, amount);
        self
    }

    /// Amount for `status`, falling back to the single-filer amount.
    pub fn amount_for(
        &self,
        status: FilingStatus,
    ) -> Decimal {
        self.amounts
            .get(&status)
            .or_else(|| self.amounts.get(&FilingStatus::Single))
            .copied()
            .unwrap_or(SINGLE_STANDARD_DEDUCTION)
    }
}

impl Default for StandardDeductions {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn builtin_amounts() {
        let table = StandardDeductions::builtin();

        assert_eq!(table.amount_for(FilingStatus::Single), dec!(13850));
        assert_eq!(table.amount_for(FilingStatus::MarriedJointly), dec!(27700));
        assert_eq!(table.amount_for(FilingStatus::MarriedSeparately), dec!(13850));
        assert_eq!(table.amount_for(FilingStatus::HeadOfHousehold), dec!(20800));
    }

    #[test]
    fn missing_status_uses_single_entry() {
        let table = StandardDeductions::empty().with_amount(FilingStatus::Single, dec!(12000));

        assert_eq!(table.amount_for(FilingStatus::HeadOfHousehold), dec!(12000));
    }

    #[test]
    fn empty_table_uses_single_constant() {
        let table = StandardDeductions::empty();

        assert_eq!(table.amount_for(FilingStatus::MarriedJointly), dec!(13850));
    }
}
