//! Calculation logic for the payroll engine.
//!
//! This module contains the pure calculation functions payroll is built
//! from: attendance aggregation, the sandboxed formula evaluator, salary
//! component evaluation, statutory deductions (provident fund, insurance,
//! professional tax), progressive income tax, and gratuity accrual.
//! Everything here is side-effect-free; persistence and orchestration live
//! in the service layer.

mod attendance;
mod components;
mod formula;
mod gratuity;
mod statutory;
mod tax;

pub use attendance::aggregate_attendance;
pub use components::{ComponentBreakdown, PRORATION_DAYS, evaluate_components};
pub use formula::{FormulaError, evaluate_formula};
pub use gratuity::calculate_gratuity_accrual;
pub use statutory::{StatutoryDeductions, calculate_statutory_deductions};
pub use tax::{SlabTax, TaxAssessment, calculate_progressive_tax};

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a monetary amount to 2 decimal places, half away from zero.
///
/// Every amount the engine produces goes through this so that merged and
/// aggregated figures cannot drift.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
