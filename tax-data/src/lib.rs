//! Reference data loading for the tax estimator.

mod loader;

pub use loader::{BracketRecord, BracketTableLoader, BracketTableLoaderError};
