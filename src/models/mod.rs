//! Domain models for the payroll engine.
//!
//! This module contains the core types flowing through payroll processing:
//! employees and their salary structures, payroll cycles, attendance
//! entries and aggregates, salary components, payslips, and disbursements.

mod attendance;
mod component;
mod cycle;
mod disbursement;
mod employee;
mod payslip;

pub use attendance::{AttendanceEntry, AttendanceStatus, AttendanceSummary};
pub use component::{CalculationType, ComponentType, SalaryComponent};
pub use cycle::{CycleStatus, PayrollCycle};
pub use disbursement::{Disbursement, DisbursementStatus};
pub use employee::{BankAccount, Employee, EmploymentStatus, PaymentMethod, SalaryStructure};
pub use payslip::{Payslip, PayslipStatus};
