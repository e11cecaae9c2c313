use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{BracketTable, BracketTableError, FilingStatus, TaxBracket};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading bracket schedules.
#[derive(Debug, Error)]
pub enum BracketTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Unknown filing status '{status}' on row {row}")]
    InvalidFilingStatus { status: String, row: usize },

    #[error("Invalid bracket schedule: {0}")]
    InvalidTable(#[from] BracketTableError),

    #[error("Failed to read '{path}': {message}")]
    Io { path: String, message: String },
}

impl From<csv::Error> for BracketTableLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketTableLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of a bracket CSV file.
///
/// - `filing_status`: status code (`single`, `marriedJointly`,
///   `marriedSeparately`, `headOfHousehold`)
/// - `min_income`: inclusive lower bound of the bracket
/// - `max_income`: exclusive upper bound, empty for the unbounded top bracket
/// - `rate`: marginal rate as a fraction (e.g. `0.22`)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub filing_status: String,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loads bracket schedules from CSV into a [`BracketTable`].
///
/// Rows are grouped by filing status and each group replaces that status's
/// schedule in the target table. Statuses that do not appear in the file
/// keep whatever schedule the table already had.
pub struct BracketTableLoader;

impl BracketTableLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketTableLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Install `records` into `table`.
    ///
    /// Within a status, rows may appear in any order; they are sorted by
    /// `min_income` before validation. Either every schedule in the file is
    /// valid and installed, or `table` is left untouched.
    ///
    /// Returns the number of brackets installed.
    pub fn load_into(
        table: &mut BracketTable,
        records: &[BracketRecord],
    ) -> Result<usize, BracketTableLoaderError> {
        let mut order: Vec<FilingStatus> = Vec::new();
        let mut groups: HashMap<FilingStatus, Vec<TaxBracket>> = HashMap::new();

        for (index, record) in records.iter().enumerate() {
            // Row 1 is the header.
            let status = FilingStatus::parse(&record.filing_status).ok_or_else(|| {
                BracketTableLoaderError::InvalidFilingStatus {
                    status: record.filing_status.clone(),
                    row: index + 2,
                }
            })?;

            if !groups.contains_key(&status) {
                order.push(status);
            }
            groups.entry(status).or_default().push(TaxBracket::new(
                record.min_income,
                record.max_income,
                record.rate,
            ));
        }

        let mut staged = table.clone();
        let mut inserted = 0;
        for status in order {
            let mut brackets = groups.remove(&status).unwrap_or_default();
            brackets.sort_by(|a, b| a.min_income.cmp(&b.min_income));
            let count = brackets.len();

            staged.insert(status, brackets)?;
            debug!(status = status.as_str(), brackets = count, "schedule staged");
            inserted += count;
        }

        *table = staged;
        Ok(inserted)
    }

    /// Read `path` and install its schedules into `table`.
    pub fn load_from_path(
        table: &mut BracketTable,
        path: &Path,
    ) -> Result<usize, BracketTableLoaderError> {
        let file = File::open(path).map_err(|e| BracketTableLoaderError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let records = Self::parse(file)?;
        let inserted = Self::load_into(table, &records)?;

        info!(path = %path.display(), brackets = inserted, "loaded bracket schedules");
        Ok(inserted)
    }
}
