use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::FilingStatus;

/// One marginal-rate band. `max_income: None` marks the unbounded top band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        min_income: Decimal,
        max_income: Option<Decimal>,
        tax_rate: Decimal,
    ) -> Self {
        Self {
            min_income,
            max_income,
            tax_rate,
        }
    }

    /// True when `income` lies in `[min_income, max_income)`.
    pub fn contains(
        &self,
        income: Decimal,
    ) -> bool {
        income >= self.min_income && self.max_income.is_none_or(|max| income < max)
    }
}

/// Violations of the bracket schedule invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("no brackets provided for {0}")]
    Empty(FilingStatus),

    #[error("bracket {index} for {status} has negative minimum {min}")]
    NegativeMinimum {
        status: FilingStatus,
        index: usize,
        min: Decimal,
    },

    #[error("bracket {index} for {status} starts at {found}, expected {expected}")]
    NotContiguous {
        status: FilingStatus,
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("bracket {index} for {status} has maximum {max} not above minimum {min}")]
    EmptyRange {
        status: FilingStatus,
        index: usize,
        min: Decimal,
        max: Decimal,
    },

    #[error("bracket {index} for {status} is unbounded but is not the top bracket")]
    UnboundedBelowTop { status: FilingStatus, index: usize },

    #[error("top bracket for {0} must be unbounded")]
    BoundedTop(FilingStatus),

    #[error("bracket {index} for {status} has rate {rate} outside [0, 1)")]
    RateOutOfRange {
        status: FilingStatus,
        index: usize,
        rate: Decimal,
    },
}

/// Progressive bracket schedules keyed by filing status.
///
/// Statuses without a dedicated schedule are taxed on the `single`
/// schedule; see [`BracketTable::brackets_for`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketTable {
    schedules: HashMap<FilingStatus, Vec<TaxBracket>>,
}

impl BracketTable {
    /// Creates a table with no schedules at all.
    pub fn empty() -> Self {
        Self {
            schedules: HashMap::new(),
        }
    }

    /// The built-in 2023 federal schedules for `single` and
    /// `marriedJointly`.
    pub fn builtin() -> Self {
        let mut schedules = HashMap::new();
        schedules.insert(
            FilingStatus::Single,
            schedule(&[
                (0, Some(11_000), 10),
                (11_000, Some(44_725), 12),
                (44_725, Some(95_375), 22),
                (95_375, Some(182_100), 24),
                (182_100, Some(231_250), 32),
                (231_250, Some(578_125), 35),
                (578_125, None, 37),
            ]),
        );
        schedules.insert(
            FilingStatus::MarriedJointly,
            schedule(&[
                (0, Some(22_000), 10),
                (22_000, Some(89_450), 12),
                (89_450, Some(190_750), 22),
                (190_750, Some(364_200), 24),
                (364_200, Some(462_500), 32),
                (462_500, Some(693_750), 35),
                (693_750, None, 37),
            ]),
        );
        Self { schedules }
    }

    /// Validates `brackets` and installs them as the schedule for `status`,
    /// replacing any existing one.
    pub fn insert(
        &mut self,
        status: FilingStatus,
        brackets: Vec<TaxBracket>,
    ) -> Result<(), BracketTableError> {
        validate(status, &brackets)?;
        self.schedules.insert(status, brackets);
        Ok(())
    }

    pub fn has_schedule(
        &self,
        status: FilingStatus,
    ) -> bool {
        self.schedules.contains_key(&status)
    }

    /// Returns the schedule for `status`, or the `single` schedule when the
    /// status has none. Empty only if the table has no `single` schedule.
    pub fn brackets_for(
        &self,
        status: FilingStatus,
    ) -> &[TaxBracket] {
        self.schedules
            .get(&status)
            .or_else(|| self.schedules.get(&FilingStatus::Single))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl Default for BracketTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn schedule(rows: &[(i64, Option<i64>, i64)]) -> Vec<TaxBracket> {
    rows.iter()
        .map(|&(min, max, percent)| {
            TaxBracket::new(
                Decimal::from(min),
                max.map(Decimal::from),
                Decimal::new(percent, 2),
            )
        })
        .collect()
}

fn validate(
    status: FilingStatus,
    brackets: &[TaxBracket],
) -> Result<(), BracketTableError> {
    let Some(top) = brackets.last() else {
        return Err(BracketTableError::Empty(status));
    };

    let mut expected_min: Option<Decimal> = None;
    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.min_income < Decimal::ZERO {
            return Err(BracketTableError::NegativeMinimum {
                status,
                index,
                min: bracket.min_income,
            });
        }
        if let Some(expected) = expected_min {
            if bracket.min_income != expected {
                return Err(BracketTableError::NotContiguous {
                    status,
                    index,
                    expected,
                    found: bracket.min_income,
                });
            }
        }
        if bracket.tax_rate < Decimal::ZERO || bracket.tax_rate >= Decimal::ONE {
            return Err(BracketTableError::RateOutOfRange {
                status,
                index,
                rate: bracket.tax_rate,
            });
        }
        match bracket.max_income {
            Some(max) if max <= bracket.min_income => {
                return Err(BracketTableError::EmptyRange {
                    status,
                    index,
                    min: bracket.min_income,
                    max,
                });
            }
            Some(max) => expected_min = Some(max),
            None if index + 1 < brackets.len() => {
                return Err(BracketTableError::UnboundedBelowTop { status, index });
            }
            None => {}
        }
    }

    if top.max_income.is_some() {
        return Err(BracketTableError::BoundedTop(status));
    }
    Ok(())
}
