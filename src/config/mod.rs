//! Tenant configuration for the payroll engine.
//!
//! This module contains the strongly-typed configuration structures
//! (statutory payroll rules and tax tables) and the [`ConfigLoader`] that
//! reads them from YAML files.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{PayrollRules, TaxConfiguration, TaxSlab, TaxType};
