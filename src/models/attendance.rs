//! Attendance entry and aggregate models.
//!
//! Raw attendance entries are captured by an external collaborator; the
//! engine consumes them (or their aggregate) for the cycle period.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The daily status recorded against an attendance entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Present on site for the full day.
    Present,
    /// Worked the full day remotely; counts as present.
    WorkFromHome,
    /// Absent without leave.
    Absent,
    /// On approved leave.
    Leave,
    /// Worked half the day; counts 0.5 present and 0.5 absent.
    HalfDay,
}

/// A single day's attendance record for an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    /// The employee this entry belongs to.
    pub employee_id: String,
    /// The day the entry covers.
    pub date: NaiveDate,
    /// The recorded status for the day.
    pub status: AttendanceStatus,
    /// Overtime hours worked on this day, if any.
    #[serde(default)]
    pub overtime_hours: Option<Decimal>,
}

/// Aggregated attendance facts for an employee over a cycle period.
///
/// Produced by [`crate::calculation::aggregate_attendance`] and embedded
/// in the payslip for traceability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// Days counted as present (half days contribute 0.5).
    pub present_days: Decimal,
    /// Days counted as absent (half days contribute 0.5).
    pub absent_days: Decimal,
    /// Days on approved leave.
    pub leave_days: Decimal,
    /// Total overtime hours across the period.
    pub overtime_hours: Decimal,
    /// Calendar days in the cycle period.
    pub working_days: Decimal,
}

impl AttendanceSummary {
    /// Returns a summary representing full attendance for the period.
    ///
    /// Used when no attendance entries exist for an employee: the contract
    /// is to assume full attendance rather than fail or zero out pay.
    pub fn full_attendance(working_days: Decimal) -> Self {
        Self {
            present_days: working_days,
            absent_days: Decimal::ZERO,
            leave_days: Decimal::ZERO,
            overtime_hours: Decimal::ZERO,
            working_days,
        }
    }
}
