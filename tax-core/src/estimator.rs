use thiserror::Error;
use tracing::info;

use crate::calculations::{InvalidInput, TaxCalculator};
use crate::db::StoreError;
use crate::history::HistoryStore;
use crate::models::{BracketTable, CalculationInput, CalculationResult, HistoryEntry, StandardDeductions};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EstimatorError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),

    /// The calculation succeeded but its history entry was not stored.
    #[error("failed to record history: {source}")]
    History {
        result: Box<CalculationResult>,
        source: StoreError,
    },
}

impl EstimatorError {
    /// The computed result, when the failure happened after calculating.
    pub fn result(&self) -> Option<&CalculationResult> {
        match self {
            Self::History { result, .. } => Some(result),
            Self::InvalidInput(_) => None,
        }
    }
}

/// A calculation session: tables plus the history list every successful
/// calculation is recorded in.
pub struct TaxEstimator {
    brackets: BracketTable,
    deductions: StandardDeductions,
    history: HistoryStore,
}

impl TaxEstimator {
    /// Session over the built-in tables.
    pub fn new(history: HistoryStore) -> Self {
        Self {
            brackets: BracketTable::builtin(),
            deductions: StandardDeductions::builtin(),
            history,
        }
    }

    pub fn with_brackets(
        mut self,
        brackets: BracketTable,
    ) -> Self {
        self.brackets = brackets;
        self
    }

    pub fn brackets(&self) -> &BracketTable {
        &self.brackets
    }

    /// Calculates `input` and records a stamped [`HistoryEntry`].
    ///
    /// # Errors
    ///
    /// [`EstimatorError::InvalidInput`] leaves history untouched.
    /// [`EstimatorError::History`] carries the computed result; the entry
    /// could not be persisted and history is unchanged.
    pub async fn calculate(
        &mut self,
        input: &CalculationInput,
    ) -> Result<CalculationResult, EstimatorError> {
        let result = TaxCalculator::new(&self.brackets, &self.deductions).calculate(input)?;

        if let Err(source) = self.history.append(HistoryEntry::stamped(&result)).await {
            return Err(EstimatorError::History {
                result: Box::new(result),
                source,
            });
        }
        info!(
            income = %result.income,
            total_tax = %result.total_tax,
            "calculation recorded"
        );

        Ok(result)
    }

    /// Recorded entries, newest first.
    pub fn history(&self) -> &[HistoryEntry] {
        self.history.entries()
    }

    pub async fn clear_history(&mut self) -> Result<(), StoreError> {
        self.history.clear().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::db::{KeyValueStore, MemoryStore};
    use crate::{FilingStatus, StateCategory, TaxBracket};

    async fn estimator() -> (Arc<MemoryStore>, TaxEstimator) {
        let store = Arc::new(MemoryStore::new());
        let history = HistoryStore::open(Box::new(Arc::clone(&store))).await;
        (store, TaxEstimator::new(history))
    }

    #[tokio::test]
    async fn successful_calculation_is_recorded() {
        let (_, mut estimator) = estimator().await;
        let input = CalculationInput::new(dec!(50000), FilingStatus::Single)
            .with_custom_deductions(Decimal::ZERO)
            .with_state(StateCategory::Low);

        let result = estimator.calculate(&input).await.unwrap();

        assert_eq!(estimator.history().len(), 1);
        let entry = &estimator.history()[0];
        assert_eq!(entry.income, dec!(50000));
        assert_eq!(entry.federal_tax, dec!(4118.00));
        assert_eq!(entry.state_tax, dec!(1500.00));
        assert_eq!(entry.total_tax, result.total_tax);
        assert_eq!(entry.after_tax_income, dec!(44382.00));
    }

    #[tokio::test]
    async fn invalid_input_records_nothing() {
        let (store, mut estimator) = estimator().await;
        let input = CalculationInput::new(Decimal::ZERO, FilingStatus::Single);

        let result = estimator.calculate(&input).await;

        assert_eq!(result, Err(EstimatorError::InvalidInput(InvalidInput::MissingIncome)));
        assert!(estimator.history().is_empty());
        assert_eq!(store.get(crate::history::HISTORY_KEY).await, Ok(None));
    }

    #[tokio::test]
    async fn newest_calculation_comes_first() {
        let (_, mut estimator) = estimator().await;

        for income in [dec!(40000), dec!(60000), dec!(80000)] {
            estimator
                .calculate(&CalculationInput::new(income, FilingStatus::Single))
                .await
                .unwrap();
        }

        let incomes: Vec<_> = estimator.history().iter().map(|e| e.income).collect();
        assert_eq!(incomes, vec![dec!(80000), dec!(60000), dec!(40000)]);
    }

    #[tokio::test]
    async fn clear_history_empties_session_and_store() {
        let (store, mut estimator) = estimator().await;
        estimator
            .calculate(&CalculationInput::new(dec!(1000), FilingStatus::Single))
            .await
            .unwrap();

        estimator.clear_history().await.unwrap();

        assert!(estimator.history().is_empty());
        assert!(HistoryStore::open(Box::new(store)).await.is_empty());
    }

    /// Store that reads as empty and refuses every write.
    struct ReadOnlyStore;

    #[async_trait::async_trait]
    impl KeyValueStore for ReadOnlyStore {
        async fn get(
            &self,
            _key: &str,
        ) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        async fn set(
            &self,
            _key: &str,
            _value: &str,
        ) -> Result<(), StoreError> {
            Err(StoreError::Backend("read-only".to_string()))
        }

        async fn remove(
            &self,
            _key: &str,
        ) -> Result<(), StoreError> {
            Err(StoreError::Backend("read-only".to_string()))
        }
    }

    #[tokio::test]
    async fn failed_history_write_keeps_result() {
        let history = HistoryStore::open(Box::new(ReadOnlyStore)).await;
        let mut estimator = TaxEstimator::new(history);
        let input = CalculationInput::new(dec!(50000), FilingStatus::Single)
            .with_state(StateCategory::Low);

        let err = estimator.calculate(&input).await.unwrap_err();

        let EstimatorError::History { result, source } = &err else {
            panic!("expected history error, got {err:?}");
        };
        assert_eq!(result.total_tax, dec!(5618.00));
        assert_eq!(source, &StoreError::Backend("read-only".to_string()));
        assert_eq!(err.result().map(|r| r.after_tax_income), Some(dec!(44382.00)));
        assert!(estimator.history().is_empty());
    }

    #[tokio::test]
    async fn custom_brackets_apply_to_session() {
        let (_, estimator) = estimator().await;
        let mut brackets = BracketTable::builtin();
        brackets
            .insert(
                FilingStatus::MarriedSeparately,
                vec![TaxBracket::new(dec!(0), None, dec!(0.20))],
            )
            .unwrap();
        let mut estimator = estimator.with_brackets(brackets);

        let result = estimator
            .calculate(&CalculationInput::new(dec!(23850), FilingStatus::MarriedSeparately))
            .await
            .unwrap();

        assert_eq!(result.federal_tax, dec!(2000.00));
        assert!(estimator.brackets().has_schedule(FilingStatus::MarriedSeparately));
    }
}
