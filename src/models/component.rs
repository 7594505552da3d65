//! Salary component configuration model.
//!
//! Salary components are tenant-scoped configuration describing the
//! allowances, deductions and bonuses that make up a payslip. The engine
//! reads them; it never writes them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The payslip bucket a component contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    /// Adds to gross on top of basic salary.
    Allowance,
    /// Subtracts from gross toward net salary.
    Deduction,
    /// A lump addition computed against the final gross.
    Bonus,
}

/// How a component's amount is calculated.
///
/// The variant also fixes the evaluation order: percentage-of-gross
/// components must see the gross produced by everything else, and formula
/// components may reference any previously computed component by code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationType {
    /// A fixed monthly amount, pro-rated by attendance.
    Fixed,
    /// A percentage of the monthly basic salary, pro-rated by attendance.
    PercentageOfBasic,
    /// A percentage of the running gross; not pro-rated again.
    PercentageOfGross,
    /// A formula over previously computed values; not pro-rated.
    Formula,
}

impl CalculationType {
    /// Returns the evaluation priority for this calculation type.
    ///
    /// Lower evaluates first. Within a priority tier, configuration order
    /// is preserved.
    pub fn priority(self) -> u8 {
        match self {
            CalculationType::Fixed => 1,
            CalculationType::PercentageOfBasic => 2,
            CalculationType::Formula => 3,
            CalculationType::PercentageOfGross => 4,
        }
    }
}

/// A configured salary component.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{CalculationType, ComponentType, SalaryComponent};
/// use rust_decimal::Decimal;
///
/// let hra = SalaryComponent {
///     code: "HRA".to_string(),
///     name: "House Rent Allowance".to_string(),
///     component_type: ComponentType::Allowance,
///     calculation_type: CalculationType::PercentageOfBasic,
///     value: Decimal::from(40),
///     formula: None,
///     is_active: true,
/// };
/// assert_eq!(hra.calculation_type.priority(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryComponent {
    /// Unique key for the component (e.g. "HRA", "PF").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Which payslip bucket this component feeds.
    pub component_type: ComponentType,
    /// How the amount is derived.
    pub calculation_type: CalculationType,
    /// The fixed amount or percentage, depending on calculation type.
    pub value: Decimal,
    /// Formula text for [`CalculationType::Formula`] components.
    #[serde(default)]
    pub formula: Option<String>,
    /// Inactive components are ignored by the engine.
    pub is_active: bool,
}
