//! Disbursement model.
//!
//! A disbursement is a bank-payment instruction derived from an approved
//! payslip. Its status moves through a small state machine driven by
//! operator updates and bank reconciliation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PaymentMethod;

/// The lifecycle of a disbursement.
///
/// Transitions: pending → processing → {completed, failed}; pending may
/// also jump straight to completed or failed (e.g. reconciliation of a
/// payment that settled before any operator update).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisbursementStatus {
    /// Created from an approved payslip; not yet sent to the bank.
    Pending,
    /// Sent to the bank; awaiting confirmation.
    Processing,
    /// Confirmed paid. Terminal; flips the linked payslip to paid.
    Completed,
    /// Rejected or mismatched. Terminal.
    Failed,
}

impl DisbursementStatus {
    /// Returns the snake_case label used in errors and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            DisbursementStatus::Pending => "pending",
            DisbursementStatus::Processing => "processing",
            DisbursementStatus::Completed => "completed",
            DisbursementStatus::Failed => "failed",
        }
    }

    /// Returns true if a transition from `self` to `to` is allowed.
    pub fn can_transition_to(self, to: DisbursementStatus) -> bool {
        matches!(
            (self, to),
            (DisbursementStatus::Pending, DisbursementStatus::Processing)
                | (DisbursementStatus::Pending, DisbursementStatus::Completed)
                | (DisbursementStatus::Pending, DisbursementStatus::Failed)
                | (DisbursementStatus::Processing, DisbursementStatus::Completed)
                | (DisbursementStatus::Processing, DisbursementStatus::Failed)
        )
    }

    /// Returns true for the terminal states.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            DisbursementStatus::Completed | DisbursementStatus::Failed
        )
    }
}

/// A bank-payment instruction for one approved payslip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disbursement {
    /// Unique identifier for the disbursement.
    pub id: Uuid,
    /// The tenant this disbursement belongs to.
    pub tenant_id: String,
    /// The cycle the paying payslip was generated in.
    pub cycle_id: Uuid,
    /// The payslip this disbursement pays out.
    pub payslip_id: Uuid,
    /// The employee being paid.
    pub employee_id: String,
    /// The amount to pay; always equals the payslip's net salary.
    pub amount: Decimal,
    /// How the employee is paid.
    pub payment_method: PaymentMethod,
    /// Current lifecycle status.
    pub status: DisbursementStatus,
    /// Bank transaction reference, once known.
    pub transaction_ref: Option<String>,
    /// Why the disbursement failed, when it did.
    pub failure_reason: Option<String>,
    /// When the disbursement was created.
    pub created_at: DateTime<Utc>,
}
