//! Request types for the payroll engine API.
//!
//! These mirror the semantic operations the engine exposes; handlers
//! deserialize them and delegate to the services.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::config::TaxType;
use crate::models::DisbursementStatus;
use crate::service::{PaymentFileFormat, ReconciliationEntry};

/// Request body for creating a payroll cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCycleRequest {
    /// The tenant the cycle belongs to.
    pub tenant_id: String,
    /// Start of the pay period (inclusive).
    pub period_start: NaiveDate,
    /// End of the pay period (inclusive).
    pub period_end: NaiveDate,
    /// Scheduled payment date.
    pub payment_date: NaiveDate,
}

/// Request body for approving a payslip.
#[derive(Debug, Clone, Deserialize)]
pub struct ApprovePayslipRequest {
    /// Who is approving; recorded on the payslip for audit.
    pub approver_id: String,
}

/// Request body for generating a payment file.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentFileRequest {
    /// The disbursements to include.
    pub disbursement_ids: Vec<Uuid>,
    /// The file format to render.
    pub format: PaymentFileFormat,
}

/// Request body for a single disbursement status update.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    /// The status to move to.
    pub status: DisbursementStatus,
    /// Bank transaction reference, when known.
    #[serde(default)]
    pub transaction_ref: Option<String>,
    /// Failure reason, for transitions to failed.
    #[serde(default)]
    pub failure_reason: Option<String>,
}

/// Request body for a bulk disbursement status update.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkUpdateStatusRequest {
    /// The disbursements to update.
    pub disbursement_ids: Vec<Uuid>,
    /// The status to move to.
    pub status: DisbursementStatus,
    /// Bank transaction reference, when known.
    #[serde(default)]
    pub transaction_ref: Option<String>,
    /// Failure reason, for transitions to failed.
    #[serde(default)]
    pub failure_reason: Option<String>,
}

/// Request body for a reconciliation run.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconcileRequest {
    /// The externally reported confirmations to match.
    pub entries: Vec<ReconciliationEntry>,
}

/// Request body for a what-if tax calculation.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxPreviewRequest {
    /// The annualized income to assess.
    pub annual_income: Decimal,
    /// Which tax table to use.
    pub tax_type: TaxType,
}

/// Request body for a what-if statutory deduction calculation.
#[derive(Debug, Clone, Deserialize)]
pub struct StatutoryPreviewRequest {
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// Monthly gross salary.
    pub gross_salary: Decimal,
}
