use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tax_core::{CalculationInput, FilingStatus, StateCategory};

use crate::config::AppConfig;
use crate::utils::parse_amount;

/// Progressive income tax estimator.
///
/// Calculates federal and flat-rate state tax for a yearly income and keeps
/// the ten most recent calculations.
#[derive(Debug, Parser)]
#[command(name = "tax-estimator", version)]
pub struct Cli {
    /// Config file. Defaults to `tax-estimator.toml` when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage backend for history (`sqlite` or `memory`).
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Store connection string.
    /// For SQLite this is a file path (e.g. `tax-history.db`) or `:memory:`.
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Log level or full filter directive.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// CSV of bracket schedules to apply over the built-in table.
    #[arg(long, global = true)]
    pub brackets: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Calculate tax for an income and record it in history.
    Calc(CalcArgs),
    /// Show recorded calculations, newest first.
    History,
    /// Remove all recorded calculations.
    Clear,
    /// Show the bracket schedule in effect for each filing status.
    Brackets {
        /// Only show this filing status.
        #[arg(long)]
        status: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct CalcArgs {
    /// Gross yearly income, e.g. `85,000`.
    #[arg(value_parser = parse_amount, allow_hyphen_values = true)]
    pub income: Decimal,

    /// single, marriedJointly, marriedSeparately or headOfHousehold.
    #[arg(long, default_value = "single")]
    pub status: String,

    /// Custom deductions. Zero or absent uses the standard deduction.
    #[arg(long, value_parser = parse_amount, allow_hyphen_values = true)]
    pub deductions: Option<Decimal>,

    /// State category: none, low, medium or high.
    #[arg(long, default_value = "none")]
    pub state: String,
}

impl CalcArgs {
    /// Builds calculator input. Unrecognized status and state codes fall back
    /// to `single` and `none`; a blank status is left out so the calculator
    /// rejects it.
    pub fn to_input(&self) -> CalculationInput {
        let filing_status = Some(self.status.trim())
            .filter(|code| !code.is_empty())
            .map(FilingStatus::parse_or_default);

        CalculationInput {
            income: Some(self.income),
            filing_status,
            custom_deductions: self.deductions,
            state: StateCategory::parse_or_default(&self.state),
        }
    }
}

impl Cli {
    /// Applies command-line overrides on top of file configuration.
    pub fn apply_overrides(
        &self,
        config: &mut AppConfig,
    ) {
        if let Some(backend) = &self.backend {
            config.store.backend = backend.clone();
        }
        if let Some(db) = &self.db {
            config.store.connection_string = db.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(brackets) = &self.brackets {
            config.brackets_file = Some(brackets.clone());
        }
    }
}
