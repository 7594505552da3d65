//! Payslip model.
//!
//! A payslip is the computed, persisted pay record for one employee for
//! one cycle. It is created in draft, becomes immutable on approval except
//! for the final transition to paid.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AttendanceSummary;

/// The lifecycle of a payslip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayslipStatus {
    /// Generated but not yet approved; may be regenerated by deleting the
    /// cycle and starting over.
    Draft,
    /// Approved for payment; amounts are frozen.
    Approved,
    /// The linked disbursement completed. Terminal.
    Paid,
}

impl PayslipStatus {
    /// Returns the snake_case label used in errors and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            PayslipStatus::Draft => "draft",
            PayslipStatus::Approved => "approved",
            PayslipStatus::Paid => "paid",
        }
    }

    /// Returns true if a transition from `self` to `to` is allowed.
    ///
    /// The only legal moves are draft → approved and approved → paid.
    pub fn can_transition_to(self, to: PayslipStatus) -> bool {
        matches!(
            (self, to),
            (PayslipStatus::Draft, PayslipStatus::Approved)
                | (PayslipStatus::Approved, PayslipStatus::Paid)
        )
    }
}

/// The computed pay record for one employee for one cycle.
///
/// Amount fields satisfy two invariants maintained by the generator and
/// checked by [`Payslip::check_invariants`]:
///
/// - `gross_salary = basic_salary + allowances_total + bonuses + overtime_pay`
/// - `net_salary = gross_salary - total_deductions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payslip {
    /// Unique identifier for the payslip.
    pub id: Uuid,
    /// The tenant this payslip belongs to.
    pub tenant_id: String,
    /// The cycle this payslip was generated in.
    pub cycle_id: Uuid,
    /// The employee this payslip pays.
    pub employee_id: String,
    /// Basic salary pro-rated by attendance.
    pub basic_salary: Decimal,
    /// Allowance amounts by component code.
    pub allowances: BTreeMap<String, Decimal>,
    /// Total of all bonus components.
    pub bonuses: Decimal,
    /// Overtime pay for the period.
    pub overtime_pay: Decimal,
    /// Gross salary: basic + allowances + bonuses + overtime.
    pub gross_salary: Decimal,
    /// Monthly progressive tax deduction.
    pub tax_deduction: Decimal,
    /// Merged component and statutory deductions by key.
    pub deductions: BTreeMap<String, Decimal>,
    /// Sum of merged deductions plus the monthly tax deduction.
    pub total_deductions: Decimal,
    /// Net salary: gross minus total deductions.
    pub net_salary: Decimal,
    /// Monthly gratuity liability accrual. A memo value: it does not
    /// reduce net pay.
    pub gratuity_accrual: Decimal,
    /// The attendance facts this payslip was computed from.
    pub attendance: AttendanceSummary,
    /// Current lifecycle status.
    pub status: PayslipStatus,
    /// Who approved the payslip, once approved.
    pub approved_by: Option<String>,
    /// When the payslip was approved.
    pub approved_at: Option<DateTime<Utc>>,
    /// When the payslip was generated.
    pub created_at: DateTime<Utc>,
}

impl Payslip {
    /// Returns the total of all allowance components.
    pub fn allowances_total(&self) -> Decimal {
        self.allowances.values().copied().sum()
    }

    /// Verifies the payslip amount invariants.
    ///
    /// Returns true when gross equals basic + allowances + bonuses +
    /// overtime and net equals gross minus total deductions.
    pub fn check_invariants(&self) -> bool {
        let gross =
            self.basic_salary + self.allowances_total() + self.bonuses + self.overtime_pay;
        let net = self.gross_salary - self.total_deductions;
        self.gross_salary == gross && self.net_salary == net
    }
}
