use std::io::Write;

use anyhow::{Context, Result};
use tax_core::db::{MemoryStoreFactory, StoreRegistry};
use tax_core::{BracketTable, CalculationInput, FilingStatus, HistoryStore, TaxEstimator};
use tax_data::BracketTableLoader;
use tax_db_sqlite::SqliteStoreFactory;
use tracing::debug;

use crate::cli::Command;
use crate::config::AppConfig;
use crate::render;

/// Creates a [`StoreRegistry`] with every backend compiled into this binary.
pub fn build_registry() -> StoreRegistry {
    let mut registry = StoreRegistry::new();
    registry.register(Box::new(MemoryStoreFactory));
    registry.register(Box::new(SqliteStoreFactory));
    registry
}

/// The built-in bracket table with `config.brackets_file` applied on top.
pub fn load_brackets(config: &AppConfig) -> Result<BracketTable> {
    let mut table = BracketTable::builtin();
    if let Some(path) = &config.brackets_file {
        BracketTableLoader::load_from_path(&mut table, path)
            .with_context(|| format!("failed to load brackets from '{}'", path.display()))?;
    }
    Ok(table)
}

/// Opens the configured store, loads history and returns a ready session.
pub async fn open_estimator(config: &AppConfig) -> Result<TaxEstimator> {
    let brackets = load_brackets(config)?;

    debug!("connecting to {} backend", config.store.backend);
    let store = build_registry()
        .create(&config.store)
        .await
        .with_context(|| format!("failed to open '{}' store", config.store.backend))?;

    let mut history = HistoryStore::with_key(store, config.history_key.clone());
    history.load().await;

    Ok(TaxEstimator::new(history).with_brackets(brackets))
}

/// Calculates and prints the result. When only recording it fails, the
/// result is still printed before the error is returned.
pub async fn run_calc(
    estimator: &mut TaxEstimator,
    input: &CalculationInput,
    out: &mut impl Write,
) -> Result<()> {
    match estimator.calculate(input).await {
        Ok(result) => write!(out, "{}", render::render_result(&result))?,
        Err(err) => {
            if let Some(result) = err.result() {
                write!(out, "{}", render::render_result(result))?;
            }
            return Err(err.into());
        }
    }
    Ok(())
}

/// Runs one command, writing its output to `out`.
pub async fn execute(
    command: &Command,
    config: &AppConfig,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Calc(args) => {
            let mut estimator = open_estimator(config).await?;
            run_calc(&mut estimator, &args.to_input(), out).await?;
        }
        Command::History => {
            let estimator = open_estimator(config).await?;
            write!(out, "{}", render::render_history(estimator.history()))?;
        }
        Command::Clear => {
            let mut estimator = open_estimator(config).await?;
            let count = estimator.history().len();
            estimator
                .clear_history()
                .await
                .context("failed to clear history")?;
            writeln!(out, "Cleared {count} recorded calculation(s).")?;
        }
        Command::Brackets { status } => {
            let table = load_brackets(config)?;
            let statuses = match status {
                Some(code) => vec![FilingStatus::parse_or_default(code)],
                None => FilingStatus::ALL.to_vec(),
            };
            for (i, status) in statuses.into_iter().enumerate() {
                if i > 0 {
                    writeln!(out)?;
                }
                let inherited = !table.has_schedule(status);
                write!(
                    out,
                    "{}",
                    render::render_brackets(status, table.brackets_for(status), inherited)
                )?;
            }
        }
    }
    Ok(())
}
