//! Orchestration services for the payroll engine.
//!
//! Services tie the pure calculation functions to persisted state: the
//! [`PayslipService`] runs the cycle → payslip pipeline and the
//! [`DisbursementService`] drives the payment state machine, payment
//! files and reconciliation.

mod disbursements;
mod payment_file;
mod payslips;

pub use disbursements::{
    BulkUpdateOutcome, DisbursementService, ReconciliationEntry, ReconciliationOutcome,
    SkippedUpdate,
};
pub use payment_file::{PaymentFile, PaymentFileFormat};
pub use payslips::{GenerationSummary, PayslipService, SkippedEmployee};
