pub mod calculations;
pub mod db;
pub mod estimator;
pub mod history;
pub mod models;

pub use calculations::{InvalidInput, orchestrate};
pub use db::{KeyValueStore, StoreError};
pub use estimator::{EstimatorError, TaxEstimator};
pub use history::{HISTORY_KEY, HistoryStore, MAX_HISTORY_ENTRIES};
pub use models::*;
