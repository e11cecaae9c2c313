use chrono::Local;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CalculationResult, FilingStatus};

/// Format of [`HistoryEntry::date`].
pub const HISTORY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Summary of one past calculation, as kept in the recent-history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Human-readable local time the calculation ran.
    pub date: String,
    pub income: Decimal,
    pub filing_status: FilingStatus,
    pub federal_tax: Decimal,
    pub state_tax: Decimal,
    pub total_tax: Decimal,
    pub after_tax_income: Decimal,
}

impl HistoryEntry {
    pub fn from_result(
        result: &CalculationResult,
        date: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            income: result.income,
            filing_status: result.filing_status,
            federal_tax: result.federal_tax,
            state_tax: result.state_tax,
            total_tax: result.total_tax,
            after_tax_income: result.after_tax_income,
        }
    }

    /// Builds an entry stamped with the current local time.
    pub fn stamped(result: &CalculationResult) -> Self {
        Self::from_result(result, Local::now().format(HISTORY_DATE_FORMAT).to_string())
    }
}
