//! Configuration types for payroll processing.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files: tenant-level statutory
//! rules and effective-dated tax tables.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tenant-level statutory payroll rules.
///
/// Every field has a hardcoded default so a tenant without a rules file
/// still gets a lawful baseline. Rates are fractions (0.12 = 12%), wage
/// limits are monthly amounts.
///
/// # Example
///
/// ```
/// use payroll_engine::config::PayrollRules;
/// use rust_decimal::Decimal;
///
/// let rules = PayrollRules::default();
/// assert_eq!(rules.pf_rate, Decimal::new(12, 2));
/// assert_eq!(rules.pf_wage_limit, Decimal::from(15000));
/// assert_eq!(rules.gratuity_min_years, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollRules {
    /// Provident fund rate applied to capped basic salary.
    pub pf_rate: Decimal,
    /// Monthly basic salary ceiling for provident fund.
    pub pf_wage_limit: Decimal,
    /// Insurance contribution rate applied to gross salary.
    pub esi_rate: Decimal,
    /// Monthly gross ceiling above which the insurance contribution is
    /// not applicable at all.
    pub esi_wage_limit: Decimal,
    /// Whether gratuity accrual is tracked for this tenant.
    pub gratuity_enabled: bool,
    /// Whole years of tenure before gratuity accrual starts.
    pub gratuity_min_years: u32,
    /// Days of salary accrued per year of service.
    pub gratuity_days_factor: Decimal,
    /// Divisor converting monthly basic into a daily wage for gratuity.
    pub gratuity_divisor: Decimal,
    /// Standard working hours per day, used for the overtime hourly rate.
    pub standard_daily_hours: Decimal,
    /// Multiplier applied to the hourly rate for overtime hours.
    pub overtime_multiplier: Decimal,
}

impl Default for PayrollRules {
    fn default() -> Self {
        Self {
            pf_rate: Decimal::new(12, 2),
            pf_wage_limit: Decimal::from(15_000),
            esi_rate: Decimal::new(75, 4),
            esi_wage_limit: Decimal::from(21_000),
            gratuity_enabled: true,
            gratuity_min_years: 5,
            gratuity_days_factor: Decimal::from(15),
            gratuity_divisor: Decimal::from(26),
            standard_daily_hours: Decimal::from(8),
            overtime_multiplier: Decimal::new(15, 1),
        }
    }
}

/// The kind of tax a [`TaxConfiguration`] describes.
///
/// The slab `rate` field is interpreted per type: a percentage for income
/// tax, a flat monthly amount for professional tax (wage-band levies are
/// flat charges, not percentages).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxType {
    /// Progressive tax on annualized income.
    IncomeTax,
    /// Flat slab-based monthly levy on gross salary.
    ProfessionalTax,
}

/// A tax-rate band defined by a minimum and optional maximum income.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSlab {
    /// The lower bound of the band (exclusive for tax accumulation).
    pub min: Decimal,
    /// The upper bound of the band; `None` means unbounded.
    #[serde(default)]
    pub max: Option<Decimal>,
    /// Percentage rate for income tax; flat amount for professional tax.
    pub rate: Decimal,
}

impl TaxSlab {
    /// Returns true if the given income falls inside this band.
    pub fn contains(&self, income: Decimal) -> bool {
        income > self.min && self.max.is_none_or(|max| income <= max)
    }

    /// Renders the band as a range label for breakdown rows.
    pub fn range_label(&self) -> String {
        match self.max {
            Some(max) => format!("{}-{}", self.min, max),
            None => format!("{}+", self.min),
        }
    }
}

/// An effective-dated tax table for one tax type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxConfiguration {
    /// Which tax this table describes.
    pub tax_type: TaxType,
    /// Human-readable name (e.g. "FY 2025-26 new regime").
    pub name: String,
    /// First date this table applies (inclusive).
    pub effective_from: NaiveDate,
    /// Last date this table applies (inclusive); `None` means open-ended.
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
    /// The rate bands, ordered ascending by `min`.
    pub slabs: Vec<TaxSlab>,
}

impl TaxConfiguration {
    /// Sorts the slabs ascending by their lower bound.
    ///
    /// Called on load so the progressive walk can rely on the order.
    pub fn sort_slabs(&mut self) {
        self.slabs.sort_by(|a, b| a.min.cmp(&b.min));
    }

    /// Returns true if this table is effective on the given date.
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        self.effective_from <= date && self.effective_to.is_none_or(|to| date <= to)
    }
}
