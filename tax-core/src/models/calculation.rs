use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::{FilingStatus, StateCategory};

/// Values supplied by the user for one calculation.
///
/// Deserialization is lenient about enumerated fields: an unrecognized
/// filing status becomes `single` and an unrecognized state category becomes
/// `none`. A missing or blank filing status stays `None` so that validation
/// can reject it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationInput {
    #[serde(default)]
    pub income: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient_filing_status")]
    pub filing_status: Option<FilingStatus>,

    #[serde(default)]
    pub custom_deductions: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient_state")]
    pub state: StateCategory,
}

impl CalculationInput {
    pub fn new(
        income: Decimal,
        filing_status: FilingStatus,
    ) -> Self {
        Self {
            income: Some(income),
            filing_status: Some(filing_status),
            ..Default::default()
        }
    }

    pub fn with_custom_deductions(
        mut self,
        amount: Decimal,
    ) -> Self {
        self.custom_deductions = Some(amount);
        self
    }

    pub fn with_state(
        mut self,
        state: StateCategory,
    ) -> Self {
        self.state = state;
        self
    }
}

fn lenient_filing_status<'de, D>(deserializer: D) -> Result<Option<FilingStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let code: Option<String> = Option::deserialize(deserializer)?;
    Ok(code
        .filter(|c| !c.trim().is_empty())
        .map(|c| FilingStatus::parse_or_default(&c)))
}

fn lenient_state<'de, D>(deserializer: D) -> Result<StateCategory, D::Error>
where
    D: Deserializer<'de>,
{
    let code: Option<String> = Option::deserialize(deserializer)?;
    Ok(code
        .map(|c| StateCategory::parse_or_default(&c))
        .unwrap_or_default())
}

/// Output of one calculation. All money fields are rounded to cents except
/// `income`, `deductions` and `taxable_income`, which carry the input
/// precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub income: Decimal,
    pub filing_status: FilingStatus,
    pub deductions: Decimal,
    pub taxable_income: Decimal,
    pub federal_tax: Decimal,
    pub state_tax: Decimal,
    pub total_tax: Decimal,
    /// May be negative; not floored.
    pub after_tax_income: Decimal,
    /// `total_tax / income`, unrounded.
    pub effective_rate: Decimal,
    pub marginal_rate: Decimal,
}
