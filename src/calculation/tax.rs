//! Progressive tax calculation.
//!
//! Applies slab-based progressive tax to annualized income and produces a
//! per-slab breakdown alongside the monthly deduction.

use rust_decimal::Decimal;

use crate::config::TaxConfiguration;

use super::round_money;

/// Tax charged within a single slab.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SlabTax {
    /// The slab's income range, e.g. `"250000-500000"` or `"1000000+"`.
    pub range: String,
    /// The slab's percentage rate.
    pub rate: Decimal,
    /// The income taxed at this slab's rate.
    pub taxable_amount: Decimal,
    /// The tax charged by this slab.
    pub tax: Decimal,
}

/// The result of a progressive tax calculation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TaxAssessment {
    /// The annualized income the assessment was computed from.
    pub annual_income: Decimal,
    /// Total annual tax across all slabs.
    pub total_tax: Decimal,
    /// The monthly deduction: annual tax / 12.
    pub monthly_tax: Decimal,
    /// Tax as a percentage of income, at 2 decimal places.
    pub effective_rate: Decimal,
    /// Per-slab breakdown in ascending slab order.
    pub breakdown: Vec<SlabTax>,
}

impl TaxAssessment {
    /// An assessment of zero tax, used when no configuration is active.
    pub fn zero(annual_income: Decimal) -> Self {
        Self {
            annual_income,
            total_tax: Decimal::ZERO,
            monthly_tax: Decimal::ZERO,
            effective_rate: Decimal::ZERO,
            breakdown: Vec::new(),
        }
    }
}

/// Applies progressive slab tax to an annualized income.
///
/// Walks the slabs ascending by their lower bound. For each slab the
/// income reaches, the amount between the slab's bounds (or up to the
/// income, for the last applicable slab) is taxed at the slab's rate. The
/// walk stops at the first bounded slab containing the income.
///
/// A `None` configuration yields a zero assessment with an empty
/// breakdown; missing tax tables are a recoverable configuration gap, not
/// an error.
///
/// # Arguments
///
/// * `annual_income` - Annualized income (monthly gross × 12)
/// * `config` - The active tax table, if any; slabs must be sorted
///   ascending (the config loader guarantees this)
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_progressive_tax;
/// use rust_decimal::Decimal;
///
/// let assessment = calculate_progressive_tax(Decimal::from(600000), None);
/// assert_eq!(assessment.total_tax, Decimal::ZERO);
/// assert!(assessment.breakdown.is_empty());
/// ```
pub fn calculate_progressive_tax(
    annual_income: Decimal,
    config: Option<&TaxConfiguration>,
) -> TaxAssessment {
    let Some(config) = config else {
        return TaxAssessment::zero(annual_income);
    };

    let mut total_tax = Decimal::ZERO;
    let mut breakdown = Vec::new();

    for slab in &config.slabs {
        if annual_income <= slab.min {
            break;
        }
        let upper = match slab.max {
            Some(max) => annual_income.min(max),
            None => annual_income,
        };
        let taxable_amount = upper - slab.min;
        let tax = round_money(taxable_amount * slab.rate / Decimal::ONE_HUNDRED);
        total_tax += tax;
        breakdown.push(SlabTax {
            range: slab.range_label(),
            rate: slab.rate,
            taxable_amount,
            tax,
        });
        if slab.max.is_some_and(|max| annual_income <= max) {
            break;
        }
    }

    let monthly_tax = round_money(total_tax / Decimal::from(12));
    let effective_rate = if annual_income.is_zero() {
        Decimal::ZERO
    } else {
        round_money(total_tax / annual_income * Decimal::ONE_HUNDRED)
    };

    TaxAssessment {
        annual_income,
        total_tax,
        monthly_tax,
        effective_rate,
        breakdown,
    }
}
