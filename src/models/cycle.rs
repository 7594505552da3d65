//! Payroll cycle model.
//!
//! A payroll cycle is the period (and its processing lifecycle) being paid
//! for. Cycles are created by an operator and mutated only by the
//! generation, approval and disbursement steps.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The processing lifecycle of a payroll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleStatus {
    /// Created; payslips not yet generated.
    Draft,
    /// Payslips generated; approval and payment in flight.
    Processing,
    /// Every payslip in the cycle has been paid. Terminal.
    Completed,
}

impl CycleStatus {
    /// Returns the snake_case label used in errors and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            CycleStatus::Draft => "draft",
            CycleStatus::Processing => "processing",
            CycleStatus::Completed => "completed",
        }
    }
}

/// A payroll cycle: the period being paid and its processing status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollCycle {
    /// Unique identifier for the cycle.
    pub id: Uuid,
    /// The tenant this cycle belongs to.
    pub tenant_id: String,
    /// The start of the pay period (inclusive).
    pub period_start: NaiveDate,
    /// The end of the pay period (inclusive).
    pub period_end: NaiveDate,
    /// The date payments are scheduled to go out.
    pub payment_date: NaiveDate,
    /// Current processing status.
    pub status: CycleStatus,
    /// When the cycle was created.
    pub created_at: DateTime<Utc>,
}

impl PayrollCycle {
    /// Checks if a given date falls within the cycle period.
    ///
    /// The check is inclusive of both period start and end.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.period_start && date <= self.period_end
    }

    /// Returns the number of calendar days in the cycle period, inclusive.
    ///
    /// This is the `working_days` figure attendance aggregation assumes
    /// when no entries exist for an employee.
    pub fn working_days(&self) -> i64 {
        (self.period_end - self.period_start).num_days() + 1
    }
}
