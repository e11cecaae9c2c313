mod calculation;
mod filing_status;
mod history_entry;
mod standard_deduction;
mod state_category;
mod tax_bracket;

pub use calculation::{CalculationInput, CalculationResult};
pub use filing_status::FilingStatus;
pub use history_entry::{HISTORY_DATE_FORMAT, HistoryEntry};
pub use standard_deduction::{SINGLE_STANDARD_DEDUCTION, StandardDeductions};
pub use state_category::StateCategory;
pub use tax_bracket::{BracketTable, BracketTableError, TaxBracket};
