//! Employee model and related types.
//!
//! This module defines the Employee struct and its satellite types as the
//! engine consumes them from master data. Employee records are read-only
//! inputs here: payroll never creates or mutates them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents the employment status of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    /// Currently employed and eligible for payroll.
    Active,
    /// No longer employed; excluded from payroll generation.
    Inactive,
}

/// How an employee is paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Electronic bank transfer (requires a bank account on file).
    BankTransfer,
    /// Cash payout.
    Cash,
    /// Paper cheque.
    Cheque,
}

/// Bank account details used when rendering payment files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    /// The account number.
    pub account_number: String,
    /// The bank branch routing code.
    pub ifsc_code: String,
}

/// The monthly salary baseline for an employee.
///
/// Owned by employee master data; the engine only reads it. An employee
/// without a salary structure is skipped during payslip generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryStructure {
    /// The monthly basic salary.
    pub basic_salary: Decimal,
}

/// Represents an employee subject to payroll processing.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{Employee, EmploymentStatus, PaymentMethod, SalaryStructure};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     name: "Asha Verma".to_string(),
///     status: EmploymentStatus::Active,
///     employment_start_date: NaiveDate::from_ymd_opt(2019, 4, 1).unwrap(),
///     salary_structure: Some(SalaryStructure {
///         basic_salary: Decimal::new(50_000_00, 2),
///     }),
///     bank_account: None,
///     payment_method: PaymentMethod::BankTransfer,
/// };
/// assert!(employee.is_payable());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee (owned by master data).
    pub id: String,
    /// The employee's display name.
    pub name: String,
    /// Current employment status.
    pub status: EmploymentStatus,
    /// The date the employee started employment.
    pub employment_start_date: NaiveDate,
    /// The monthly salary baseline, if configured.
    pub salary_structure: Option<SalaryStructure>,
    /// Bank account used for disbursements, if on file.
    pub bank_account: Option<BankAccount>,
    /// How this employee is paid.
    pub payment_method: PaymentMethod,
}

impl Employee {
    /// Returns true if the employee is active and has a salary structure.
    ///
    /// Only payable employees take part in payslip generation; others are
    /// skipped with a recorded warning.
    pub fn is_payable(&self) -> bool {
        self.status == EmploymentStatus::Active && self.salary_structure.is_some()
    }

    /// Returns the monthly basic salary, if a salary structure exists.
    pub fn basic_salary(&self) -> Option<Decimal> {
        self.salary_structure.as_ref().map(|s| s.basic_salary)
    }
}
