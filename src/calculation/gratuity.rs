//! Gratuity accrual calculation.
//!
//! Computes the monthly reserve toward an eventual lump-sum gratuity
//! payment. Eligibility is all-or-nothing: nothing accrues until the
//! tenure threshold is crossed, then the full monthly accrual applies.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::PayrollRules;

use super::round_money;

/// Calculates the monthly gratuity accrual for an employee.
///
/// Returns zero when gratuity is disabled for the tenant or when the
/// employee's tenure in whole years is below `gratuity_min_years`. Once
/// eligible:
///
/// ```text
/// accrual = round((basic / gratuity_divisor) * gratuity_days_factor / 12)
/// ```
///
/// The accrual is a liability memo tracked on the payslip; it never
/// reduces the employee's take-home pay.
///
/// # Arguments
///
/// * `basic_salary` - The employee's monthly basic salary
/// * `employment_start_date` - When the employee started
/// * `as_of` - The date tenure is measured against (the cycle's payment date)
/// * `rules` - Tenant statutory rules
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_gratuity_accrual;
/// use payroll_engine::config::PayrollRules;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let rules = PayrollRules::default();
/// let accrual = calculate_gratuity_accrual(
///     Decimal::from(26000),
///     NaiveDate::from_ymd_opt(2020, 7, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 7, 31).unwrap(),
///     &rules,
/// );
/// // (26000 / 26) * 15 / 12
/// assert_eq!(accrual, Decimal::from(1250));
/// ```
pub fn calculate_gratuity_accrual(
    basic_salary: Decimal,
    employment_start_date: NaiveDate,
    as_of: NaiveDate,
    rules: &PayrollRules,
) -> Decimal {
    if !rules.gratuity_enabled {
        return Decimal::ZERO;
    }

    let tenure_years = as_of.years_since(employment_start_date).unwrap_or(0);
    if tenure_years < rules.gratuity_min_years {
        return Decimal::ZERO;
    }

    let daily_wage = basic_salary / rules.gratuity_divisor;
    round_money(daily_wage * rules.gratuity_days_factor / Decimal::from(12))
}
