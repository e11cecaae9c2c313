//! Plain-text rendering of results, history and bracket schedules.

use std::fmt::Write;

use rust_decimal::{Decimal, RoundingStrategy};
use tax_core::{CalculationResult, FilingStatus, HistoryEntry, TaxBracket};

/// Formats `amount` as US dollars with thousands separators.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_cli::render::format_currency;
///
/// assert_eq!(format_currency(dec!(1234567.891)), "$1,234,567.89");
/// assert_eq!(format_currency(dec!(-42)), "-$42.00");
/// ```
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Formats a fractional rate as a percentage with two decimals.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_cli::render::format_percent;
///
/// assert_eq!(format_percent(dec!(0.11236)), "11.24%");
/// ```
pub fn format_percent(rate: Decimal) -> String {
    let percent = (rate * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{percent:.2}%")
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

pub fn render_result(result: &CalculationResult) -> String {
    let rows = [
        ("Income", format_currency(result.income)),
        ("Filing status", result.filing_status.label().to_string()),
        ("Deductions", format_currency(result.deductions)),
        ("Taxable income", format_currency(result.taxable_income)),
        ("Federal tax", format_currency(result.federal_tax)),
        ("State tax", format_currency(result.state_tax)),
        ("Total tax", format_currency(result.total_tax)),
        ("After-tax income", format_currency(result.after_tax_income)),
        ("Effective rate", format_percent(result.effective_rate)),
        ("Marginal rate", format_percent(result.marginal_rate)),
    ];

    let mut out = String::new();
    for (label, value) in rows {
        let _ = writeln!(out, "{label:<18}{value:>16}");
    }
    out
}

/// One line per entry, newest first, or a notice when there is nothing stored.
pub fn render_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No calculations recorded.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<19}  {:<26}  {:>14}  {:>12}  {:>12}  {:>14}",
        "Date", "Filing status", "Income", "Federal", "State", "After tax"
    );
    for entry in entries {
        let _ = writeln!(
            out,
            "{:<19}  {:<26}  {:>14}  {:>12}  {:>12}  {:>14}",
            entry.date,
            entry.filing_status.label(),
            format_currency(entry.income),
            format_currency(entry.federal_tax),
            format_currency(entry.state_tax),
            format_currency(entry.after_tax_income),
        );
    }
    out
}

/// `inherited` marks a status that has no schedule of its own and is taxed
/// on the `single` one.
pub fn render_brackets(
    status: FilingStatus,
    brackets: &[TaxBracket],
    inherited: bool,
) -> String {
    let mut out = String::new();
    if inherited {
        let _ = writeln!(out, "{} (uses {} schedule)", status.label(), FilingStatus::Single.label());
    } else {
        let _ = writeln!(out, "{}", status.label());
    }

    for bracket in brackets {
        let upper = bracket
            .max_income
            .map(format_currency)
            .unwrap_or_else(|| "and up".to_string());
        let _ = writeln!(
            out,
            "  {:>14} - {:<14} {:>7}",
            format_currency(bracket.min_income),
            upper,
            format_percent(bracket.tax_rate),
        );
    }
    out
}
