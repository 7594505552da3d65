//! Salary component evaluation.
//!
//! Evaluates the configured salary components for one employee into
//! allowance, deduction and bonus amounts. Evaluation order is fixed by
//! calculation-type priority (fixed → percentage-of-basic → formula →
//! percentage-of-gross) so percentage-of-gross components see the gross
//! produced by everything else and formulas can reference previously
//! computed component codes. Configuration order breaks ties within a
//! priority tier.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{AttendanceSummary, CalculationType, ComponentType, SalaryComponent};

use super::formula::evaluate_formula;
use super::round_money;

/// The fixed proration denominator: component values and basic salary are
/// configured per 30-day month and scaled by days present.
pub const PRORATION_DAYS: u32 = 30;

/// The evaluated component amounts for one employee.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentBreakdown {
    /// Basic salary pro-rated by attendance.
    pub prorated_basic: Decimal,
    /// Allowance amounts by component code.
    pub allowances: BTreeMap<String, Decimal>,
    /// Deduction amounts by component code (zeros included; the payslip
    /// merge step drops them).
    pub deductions: BTreeMap<String, Decimal>,
    /// Bonus amounts by component code.
    pub bonuses: BTreeMap<String, Decimal>,
    /// Prorated basic plus all allowances.
    pub gross_salary: Decimal,
    /// Faults absorbed during evaluation (malformed formulas), for the
    /// batch summary.
    pub warnings: Vec<String>,
}

impl ComponentBreakdown {
    /// Returns the total of all allowance components.
    pub fn allowances_total(&self) -> Decimal {
        self.allowances.values().copied().sum()
    }

    /// Returns the total of all bonus components.
    pub fn bonuses_total(&self) -> Decimal {
        self.bonuses.values().copied().sum()
    }
}

/// Evaluates active salary components for one employee.
///
/// Allowances are evaluated first and accumulate the running gross on top
/// of the prorated basic; deductions and bonuses then evaluate against the
/// final gross. Fixed and percentage-of-basic amounts are pro-rated by
/// `(value / 30) * present_days`; percentage-of-gross and formula amounts
/// are not pro-rated again (the gross already reflects attendance, and
/// formulas can use `PRESENT_DAYS` themselves).
///
/// A malformed formula or missing formula text resolves that component to
/// zero with a logged warning; a configuration fault in one component must
/// never abort payroll.
///
/// # Arguments
///
/// * `components` - The tenant's salary components, in configuration order
/// * `basic_salary` - The employee's monthly basic salary
/// * `attendance` - Aggregated attendance for the cycle period
pub fn evaluate_components(
    components: &[SalaryComponent],
    basic_salary: Decimal,
    attendance: &AttendanceSummary,
) -> ComponentBreakdown {
    let proration_days = Decimal::from(PRORATION_DAYS);
    let prorated_basic = round_money(basic_salary / proration_days * attendance.present_days);

    // Stable sort: configuration order is preserved within a priority tier.
    let mut active: Vec<&SalaryComponent> =
        components.iter().filter(|c| c.is_active).collect();
    active.sort_by_key(|c| c.calculation_type.priority());

    let mut vars: HashMap<String, Decimal> = HashMap::new();
    vars.insert("BASIC".to_string(), basic_salary);
    vars.insert("BASIC_SALARY".to_string(), basic_salary);
    vars.insert("PRESENT_DAYS".to_string(), attendance.present_days);
    vars.insert("WORKING_DAYS".to_string(), attendance.working_days);

    let mut warnings = Vec::new();
    let mut allowances = BTreeMap::new();
    let mut running_gross = prorated_basic;

    for component in active
        .iter()
        .filter(|c| c.component_type == ComponentType::Allowance)
    {
        vars.insert("GROSS".to_string(), running_gross);
        vars.insert("GROSS_SALARY".to_string(), running_gross);
        let amount = evaluate_one(
            component,
            basic_salary,
            running_gross,
            attendance,
            &vars,
            &mut warnings,
        );
        running_gross += amount;
        vars.insert(component.code.to_ascii_uppercase(), amount);
        allowances.insert(component.code.clone(), amount);
    }

    let gross_salary = running_gross;
    vars.insert("GROSS".to_string(), gross_salary);
    vars.insert("GROSS_SALARY".to_string(), gross_salary);

    let mut deductions = BTreeMap::new();
    let mut bonuses = BTreeMap::new();

    for component in active
        .iter()
        .filter(|c| c.component_type != ComponentType::Allowance)
    {
        let amount = evaluate_one(
            component,
            basic_salary,
            gross_salary,
            attendance,
            &vars,
            &mut warnings,
        );
        vars.insert(component.code.to_ascii_uppercase(), amount);
        match component.component_type {
            ComponentType::Deduction => {
                deductions.insert(component.code.clone(), amount);
            }
            ComponentType::Bonus => {
                bonuses.insert(component.code.clone(), amount);
            }
            ComponentType::Allowance => unreachable!("allowances handled above"),
        }
    }

    ComponentBreakdown {
        prorated_basic,
        allowances,
        deductions,
        bonuses,
        gross_salary,
        warnings,
    }
}

/// Evaluates a single component to a rounded amount.
fn evaluate_one(
    component: &SalaryComponent,
    basic_salary: Decimal,
    gross: Decimal,
    attendance: &AttendanceSummary,
    vars: &HashMap<String, Decimal>,
    warnings: &mut Vec<String>,
) -> Decimal {
    let proration = attendance.present_days / Decimal::from(PRORATION_DAYS);
    let amount = match component.calculation_type {
        CalculationType::Fixed => component.value * proration,
        CalculationType::PercentageOfBasic => {
            basic_salary * component.value / Decimal::ONE_HUNDRED * proration
        }
        CalculationType::PercentageOfGross => gross * component.value / Decimal::ONE_HUNDRED,
        CalculationType::Formula => {
            let Some(formula) = component.formula.as_deref() else {
                warn!(
                    code = %component.code,
                    "formula component has no formula text, defaulting to 0"
                );
                warnings.push(format!(
                    "component '{}': no formula text, defaulted to 0",
                    component.code
                ));
                return Decimal::ZERO;
            };
            match evaluate_formula(formula, vars) {
                Ok(value) => value,
                Err(err) => {
                    warn!(
                        code = %component.code,
                        formula = %formula,
                        error = %err,
                        "formula evaluation failed, defaulting to 0"
                    );
                    warnings.push(format!(
                        "component '{}': {}, defaulted to 0",
                        component.code, err
                    ));
                    return Decimal::ZERO;
                }
            }
        }
    };
    round_money(amount)
}
