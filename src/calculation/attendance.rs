//! Attendance aggregation.
//!
//! Converts raw per-day attendance entries for a cycle period into the
//! present/absent/leave/overtime totals the rest of payroll consumes.

use rust_decimal::Decimal;

use crate::models::{AttendanceEntry, AttendanceStatus, AttendanceSummary};

/// Aggregates raw attendance entries into period totals.
///
/// Present and work-from-home days count 1.0 present; half days count 0.5
/// present and 0.5 absent; absences and leave count 1.0 in their own
/// buckets. Overtime hours are summed across all entries.
///
/// If no entries exist for the period the employee is assumed fully
/// present (`present_days = working_days`, everything else zero). This is
/// a backward-compatible default for tenants that do not capture
/// attendance, not a failure.
///
/// # Arguments
///
/// * `entries` - The attendance entries falling inside the cycle period
/// * `working_days` - Calendar days in the period
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::aggregate_attendance;
/// use rust_decimal::Decimal;
///
/// let summary = aggregate_attendance(&[], Decimal::from(31));
/// assert_eq!(summary.present_days, Decimal::from(31));
/// assert_eq!(summary.absent_days, Decimal::ZERO);
/// ```
pub fn aggregate_attendance(
    entries: &[AttendanceEntry],
    working_days: Decimal,
) -> AttendanceSummary {
    if entries.is_empty() {
        return AttendanceSummary::full_attendance(working_days);
    }

    let half = Decimal::new(5, 1);
    let mut present_days = Decimal::ZERO;
    let mut absent_days = Decimal::ZERO;
    let mut leave_days = Decimal::ZERO;
    let mut overtime_hours = Decimal::ZERO;

    for entry in entries {
        match entry.status {
            AttendanceStatus::Present | AttendanceStatus::WorkFromHome => {
                present_days += Decimal::ONE;
            }
            AttendanceStatus::Absent => {
                absent_days += Decimal::ONE;
            }
            AttendanceStatus::Leave => {
                leave_days += Decimal::ONE;
            }
            AttendanceStatus::HalfDay => {
                present_days += half;
                absent_days += half;
            }
        }
        if let Some(hours) = entry.overtime_hours {
            overtime_hours += hours;
        }
    }

    AttendanceSummary {
        present_days,
        absent_days,
        leave_days,
        overtime_hours,
        working_days,
    }
}
