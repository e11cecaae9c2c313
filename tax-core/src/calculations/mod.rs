//! Tax calculations: deduction resolution, progressive federal brackets,
//! flat-rate state tax, and the orchestrator that combines them.

pub mod calculator;
pub mod common;
pub mod deduction;
pub mod federal;
pub mod state;

pub use calculator::{InvalidInput, TaxCalculator, orchestrate};
pub use deduction::resolve_deduction;
pub use federal::FederalTaxEngine;
pub use state::state_tax;
