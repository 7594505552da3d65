//! Statutory deduction calculation.
//!
//! Computes the capped provident-fund contribution, the insurance
//! contribution with its wage-limit eligibility cliff, and the
//! professional-tax levy from tenant configuration.

use rust_decimal::Decimal;
use tracing::warn;

use crate::config::{PayrollRules, TaxConfiguration};

use super::round_money;

/// The statutory deductions for one employee for one month.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StatutoryDeductions {
    /// Provident fund: capped percentage of basic salary.
    pub pf: Decimal,
    /// Insurance contribution: percentage of gross, zero above the wage
    /// limit.
    pub esi: Decimal,
    /// Professional tax: flat amount for the wage band containing gross.
    pub professional_tax: Decimal,
}

impl StatutoryDeductions {
    /// Returns the sum of all statutory deductions.
    pub fn total(&self) -> Decimal {
        self.pf + self.esi + self.professional_tax
    }
}

/// Calculates statutory deductions from basic and gross salary.
///
/// - `PF = min(basic, pf_wage_limit) * pf_rate`; the wage limit caps the
///   contribution base, not the contribution.
/// - `ESI = gross * esi_rate` only when `gross <= esi_wage_limit`;
///   above the limit the contribution is zero. This is an eligibility
///   cliff, not a cap.
/// - Professional tax charges the flat amount of the wage band containing
///   the monthly gross, from the supplied table. No active table means
///   zero professional tax; that is a silent default, not an error.
///
/// # Arguments
///
/// * `basic_salary` - The employee's monthly basic salary
/// * `gross_salary` - The computed monthly gross
/// * `rules` - Tenant statutory rules
/// * `professional_tax` - The active professional-tax table, if any
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_statutory_deductions;
/// use payroll_engine::config::PayrollRules;
/// use rust_decimal::Decimal;
///
/// let rules = PayrollRules::default();
/// let result = calculate_statutory_deductions(
///     Decimal::from(20000),
///     Decimal::from(22000),
///     &rules,
///     None,
/// );
/// // PF base capped at 15000: 15000 * 0.12
/// assert_eq!(result.pf, Decimal::from(1800));
/// // Gross above the 21000 limit: no ESI
/// assert_eq!(result.esi, Decimal::ZERO);
/// ```
pub fn calculate_statutory_deductions(
    basic_salary: Decimal,
    gross_salary: Decimal,
    rules: &PayrollRules,
    professional_tax: Option<&TaxConfiguration>,
) -> StatutoryDeductions {
    let pf_base = basic_salary.min(rules.pf_wage_limit);
    let pf = round_money(pf_base * rules.pf_rate);

    let esi = if gross_salary <= rules.esi_wage_limit {
        round_money(gross_salary * rules.esi_rate)
    } else {
        Decimal::ZERO
    };

    let professional_tax = match professional_tax {
        Some(table) => table
            .slabs
            .iter()
            .find(|slab| slab.contains(gross_salary))
            .map(|slab| round_money(slab.rate))
            .unwrap_or(Decimal::ZERO),
        None => {
            warn!("no active professional tax configuration, defaulting to 0");
            Decimal::ZERO
        }
    };

    StatutoryDeductions {
        pf,
        esi,
        professional_tax,
    }
}
