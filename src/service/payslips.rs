//! Payslip generation and approval.
//!
//! The [`PayslipService`] owns the cycle lifecycle: it creates cycles,
//! runs the per-employee calculation pipeline in parallel, merges
//! statutory deductions into component deductions without double
//! counting, and approves the resulting payslips.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    aggregate_attendance, calculate_gratuity_accrual, calculate_progressive_tax,
    calculate_statutory_deductions, evaluate_components, round_money, PRORATION_DAYS,
};
use crate::config::{ConfigLoader, TaxType};
use crate::error::{EngineError, EngineResult};
use crate::models::{CycleStatus, Employee, Payslip, PayslipStatus, PayrollCycle};
use crate::store::PayrollStore;

/// An employee that could not be processed during generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEmployee {
    /// The employee that was skipped.
    pub employee_id: String,
    /// Why the employee was skipped.
    pub reason: String,
}

/// The outcome of generating payslips for a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    /// The cycle payslips were generated for.
    pub cycle_id: Uuid,
    /// The generated payslips, ordered by employee id.
    pub payslips: Vec<Payslip>,
    /// Employees skipped with their reasons.
    pub skipped: Vec<SkippedEmployee>,
    /// Sum of gross salaries across generated payslips.
    pub total_gross: Decimal,
    /// Sum of total deductions across generated payslips.
    pub total_deductions: Decimal,
    /// Sum of net salaries across generated payslips.
    pub total_net: Decimal,
}

/// Creates payroll cycles, generates payslips and approves them.
#[derive(Clone)]
pub struct PayslipService {
    store: Arc<dyn PayrollStore>,
    config: Arc<ConfigLoader>,
}

impl PayslipService {
    /// Creates a service over the given store and configuration.
    pub fn new(store: Arc<dyn PayrollStore>, config: Arc<ConfigLoader>) -> Self {
        Self { store, config }
    }

    /// Creates a new payroll cycle in draft.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidCycleDates`] when the period end
    /// precedes the period start or the payment date precedes the period
    /// end.
    pub fn create_cycle(
        &self,
        tenant_id: &str,
        period_start: NaiveDate,
        period_end: NaiveDate,
        payment_date: NaiveDate,
    ) -> EngineResult<PayrollCycle> {
        if period_end < period_start {
            return Err(EngineError::InvalidCycleDates {
                message: format!(
                    "period end {} precedes period start {}",
                    period_end, period_start
                ),
            });
        }
        if payment_date < period_end {
            return Err(EngineError::InvalidCycleDates {
                message: format!(
                    "payment date {} precedes period end {}",
                    payment_date, period_end
                ),
            });
        }

        let cycle = PayrollCycle {
            id: Uuid::new_v4(),
            tenant_id: tenant_id.to_string(),
            period_start,
            period_end,
            payment_date,
            status: CycleStatus::Draft,
            created_at: Utc::now(),
        };
        self.store.insert_cycle(cycle.clone());
        info!(
            cycle_id = %cycle.id,
            period_start = %period_start,
            period_end = %period_end,
            "payroll cycle created"
        );
        Ok(cycle)
    }

    /// Generates one payslip per payable employee for a draft cycle.
    ///
    /// Employees are computed concurrently; a failure for one employee is
    /// recorded in the summary and never aborts the batch. On success the
    /// cycle moves to processing. Re-running generation on a cycle that
    /// has left draft fails before touching any payslip.
    pub fn generate_payslips(&self, cycle_id: Uuid) -> EngineResult<GenerationSummary> {
        let cycle = self
            .store
            .cycle(cycle_id)
            .ok_or(EngineError::CycleNotFound { id: cycle_id })?;
        if cycle.status != CycleStatus::Draft {
            return Err(EngineError::InvalidCycleStatus {
                id: cycle_id,
                expected: CycleStatus::Draft.as_str().to_string(),
                actual: cycle.status.as_str().to_string(),
            });
        }

        let employees: Vec<Employee> = self
            .store
            .employees()
            .into_iter()
            .filter(|e| e.status == crate::models::EmploymentStatus::Active)
            .collect();

        // Each employee's computation is independent and side-effect-free;
        // results are captured per item so one failure cannot roll back
        // the others.
        let results: Vec<(String, EngineResult<Payslip>)> = employees
            .par_iter()
            .map(|employee| (employee.id.clone(), self.compute_payslip(&cycle, employee)))
            .collect();

        let mut payslips = Vec::new();
        let mut skipped = Vec::new();
        for (employee_id, result) in results {
            match result {
                Ok(payslip) => {
                    self.store.insert_payslip(payslip.clone());
                    payslips.push(payslip);
                }
                Err(err) => {
                    warn!(
                        cycle_id = %cycle_id,
                        employee_id = %employee_id,
                        error = %err,
                        "employee skipped during payslip generation"
                    );
                    skipped.push(SkippedEmployee {
                        employee_id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        self.store
            .transition_cycle(cycle_id, CycleStatus::Draft, CycleStatus::Processing)?;

        let total_gross = payslips.iter().map(|p| p.gross_salary).sum();
        let total_deductions = payslips.iter().map(|p| p.total_deductions).sum();
        let total_net = payslips.iter().map(|p| p.net_salary).sum();

        info!(
            cycle_id = %cycle_id,
            generated = payslips.len(),
            skipped = skipped.len(),
            %total_net,
            "payslip generation completed"
        );

        Ok(GenerationSummary {
            cycle_id,
            payslips,
            skipped,
            total_gross,
            total_deductions,
            total_net,
        })
    }

    /// Approves a draft payslip.
    pub fn approve_payslip(&self, payslip_id: Uuid, approver_id: &str) -> EngineResult<Payslip> {
        let payslip = self.store.transition_payslip(
            payslip_id,
            PayslipStatus::Approved,
            Some(approver_id.to_string()),
        )?;
        info!(
            payslip_id = %payslip_id,
            approver = %approver_id,
            "payslip approved"
        );
        Ok(payslip)
    }

    /// Returns one payslip by id.
    pub fn payslip(&self, id: Uuid) -> EngineResult<Payslip> {
        self.store
            .payslip(id)
            .ok_or(EngineError::PayslipNotFound { id })
    }

    /// Runs the full calculation pipeline for one employee.
    fn compute_payslip(&self, cycle: &PayrollCycle, employee: &Employee) -> EngineResult<Payslip> {
        let basic_salary =
            employee
                .basic_salary()
                .ok_or_else(|| EngineError::MissingSalaryStructure {
                    employee_id: employee.id.clone(),
                })?;
        let rules = self.config.rules();

        let entries =
            self.store
                .attendance_entries(&employee.id, cycle.period_start, cycle.period_end);
        let attendance = aggregate_attendance(&entries, Decimal::from(cycle.working_days()));

        let components = self.store.components();
        let breakdown = evaluate_components(&components, basic_salary, &attendance);

        // Overtime is paid at a multiple of the derived hourly rate.
        let hourly_rate =
            basic_salary / Decimal::from(PRORATION_DAYS) / rules.standard_daily_hours;
        let overtime_pay =
            round_money(attendance.overtime_hours * hourly_rate * rules.overtime_multiplier);

        let bonuses = breakdown.bonuses_total();
        let gross_salary = round_money(breakdown.gross_salary + bonuses + overtime_pay);

        let statutory = calculate_statutory_deductions(
            basic_salary,
            gross_salary,
            rules,
            self.config
                .active_tax_config(TaxType::ProfessionalTax, cycle.payment_date),
        );

        let assessment = calculate_progressive_tax(
            gross_salary * Decimal::from(12),
            self.config
                .active_tax_config(TaxType::IncomeTax, cycle.payment_date),
        );

        let gratuity_accrual = calculate_gratuity_accrual(
            basic_salary,
            employee.employment_start_date,
            cycle.payment_date,
            rules,
        );

        let deductions = merge_deductions(&breakdown.deductions, &statutory_pairs(&statutory));
        let total_deductions =
            round_money(deductions.values().copied().sum::<Decimal>() + assessment.monthly_tax);
        let net_salary = round_money(gross_salary - total_deductions);

        Ok(Payslip {
            id: Uuid::new_v4(),
            tenant_id: cycle.tenant_id.clone(),
            cycle_id: cycle.id,
            employee_id: employee.id.clone(),
            basic_salary: breakdown.prorated_basic,
            allowances: breakdown.allowances,
            bonuses,
            overtime_pay,
            gross_salary,
            tax_deduction: assessment.monthly_tax,
            deductions,
            total_deductions,
            net_salary,
            gratuity_accrual,
            attendance,
            status: PayslipStatus::Draft,
            approved_by: None,
            approved_at: None,
            created_at: Utc::now(),
        })
    }
}

/// Flattens statutory deductions into keyed pairs for the merge.
fn statutory_pairs(
    statutory: &crate::calculation::StatutoryDeductions,
) -> Vec<(&'static str, Decimal)> {
    vec![
        ("PF", statutory.pf),
        ("ESI", statutory.esi),
        ("PROFESSIONAL_TAX", statutory.professional_tax),
    ]
}

/// Merges statutory deductions into the component deduction map.
///
/// A statutory key enters the map only when no component deduction
/// already uses that exact key, so an organization that configured an
/// equivalent component is not charged twice. Zero-valued deductions from
/// either source are omitted.
fn merge_deductions(
    component_deductions: &BTreeMap<String, Decimal>,
    statutory: &[(&'static str, Decimal)],
) -> BTreeMap<String, Decimal> {
    let mut merged: BTreeMap<String, Decimal> = component_deductions
        .iter()
        .filter(|(_, amount)| !amount.is_zero())
        .map(|(code, amount)| (code.clone(), *amount))
        .collect();

    for (key, amount) in statutory {
        if amount.is_zero() {
            continue;
        }
        if merged.contains_key(*key) {
            warn!(
                key = %key,
                "statutory deduction suppressed by component with the same key"
            );
            continue;
        }
        merged.insert((*key).to_string(), *amount);
    }

    merged
}
