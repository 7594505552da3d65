//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during payroll processing.

use thiserror::Error;
use uuid::Uuid;

/// The main error type for the payroll engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::MissingSalaryStructure {
///     employee_id: "emp_042".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Employee 'emp_042' has no salary structure"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No payroll cycle exists with the given id.
    #[error("Payroll cycle not found: {id}")]
    CycleNotFound {
        /// The cycle id that was not found.
        id: Uuid,
    },

    /// No payslip exists with the given id.
    #[error("Payslip not found: {id}")]
    PayslipNotFound {
        /// The payslip id that was not found.
        id: Uuid,
    },

    /// No disbursement exists with the given id.
    #[error("Disbursement not found: {id}")]
    DisbursementNotFound {
        /// The disbursement id that was not found.
        id: Uuid,
    },

    /// No employee exists with the given id.
    #[error("Employee not found: {id}")]
    EmployeeNotFound {
        /// The employee id that was not found.
        id: String,
    },

    /// An employee is missing the salary structure required for payroll.
    #[error("Employee '{employee_id}' has no salary structure")]
    MissingSalaryStructure {
        /// The employee without a salary structure.
        employee_id: String,
    },

    /// A payroll cycle was created with inconsistent dates.
    #[error("Invalid cycle dates: {message}")]
    InvalidCycleDates {
        /// A description of what made the dates invalid.
        message: String,
    },

    /// An operation required a cycle in a different status.
    #[error("Cycle {id} is {actual}, expected {expected}")]
    InvalidCycleStatus {
        /// The cycle id.
        id: Uuid,
        /// The status the operation requires.
        expected: String,
        /// The status the cycle is actually in.
        actual: String,
    },

    /// A payslip status transition was not allowed.
    #[error("Payslip {id} cannot move from {from} to {to}")]
    InvalidPayslipTransition {
        /// The payslip id.
        id: Uuid,
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },

    /// A disbursement status transition was not allowed.
    #[error("Disbursement {id} cannot move from {from} to {to}")]
    InvalidDisbursementTransition {
        /// The disbursement id.
        id: Uuid,
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },

    /// A bulk operation was invoked with an empty selection.
    #[error("Empty selection: {message}")]
    EmptySelection {
        /// A description of the empty selection.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
