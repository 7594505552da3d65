//! Disbursement lifecycle management.
//!
//! Creates disbursements from approved payslips, applies operator status
//! updates (single and bulk), renders payment files and reconciles bank
//! confirmations. Every status change goes through the store's
//! compare-and-set transition, so concurrent runs cannot double-complete
//! a row.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    CycleStatus, Disbursement, DisbursementStatus, PayslipStatus,
};
use crate::store::PayrollStore;

use super::payment_file::{render_file, PaymentFile, PaymentFileFormat};

/// An externally reported payment confirmation to reconcile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationEntry {
    /// The employee identifier the bank reported.
    pub employee_id: String,
    /// The amount the bank reported as paid.
    pub amount: Decimal,
    /// The bank's transaction reference, if provided.
    #[serde(default)]
    pub reference: Option<String>,
}

/// The outcome of a reconciliation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationOutcome {
    /// Disbursements confirmed and completed.
    pub completed: Vec<Disbursement>,
    /// Disbursements failed with a mismatch reason.
    pub failed: Vec<Disbursement>,
    /// Entries that matched no open disbursement.
    pub not_found: Vec<ReconciliationEntry>,
}

/// The outcome of a bulk status update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkUpdateOutcome {
    /// Disbursements that were updated.
    pub updated: Vec<Disbursement>,
    /// Disbursements that could not be updated, with reasons.
    pub failed: Vec<SkippedUpdate>,
}

/// A disbursement a bulk update could not transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedUpdate {
    /// The disbursement that was not updated.
    pub disbursement_id: Uuid,
    /// Why the update was rejected.
    pub reason: String,
}

/// Amounts within this distance reconcile as a match.
fn reconciliation_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

/// Drives the disbursement state machine.
#[derive(Clone)]
pub struct DisbursementService {
    store: Arc<dyn PayrollStore>,
}

impl DisbursementService {
    /// Creates a service over the given store.
    pub fn new(store: Arc<dyn PayrollStore>) -> Self {
        Self { store }
    }

    /// Creates one pending disbursement per approved payslip in a cycle.
    ///
    /// Payslips that already have a disbursement are skipped, so the
    /// operation is safe to re-run after a partial approval pass. Only
    /// approved payslips are eligible; draft and paid ones are ignored.
    pub fn create_disbursements(&self, cycle_id: Uuid) -> EngineResult<Vec<Disbursement>> {
        let cycle = self
            .store
            .cycle(cycle_id)
            .ok_or(EngineError::CycleNotFound { id: cycle_id })?;

        let mut created = Vec::new();
        for payslip in self.store.payslips_for_cycle(cycle_id) {
            if payslip.status != PayslipStatus::Approved {
                continue;
            }
            if self.store.disbursement_for_payslip(payslip.id).is_some() {
                continue;
            }
            let payment_method = self
                .store
                .employee(&payslip.employee_id)
                .map(|e| e.payment_method)
                .unwrap_or(crate::models::PaymentMethod::BankTransfer);

            let disbursement = Disbursement {
                id: Uuid::new_v4(),
                tenant_id: cycle.tenant_id.clone(),
                cycle_id,
                payslip_id: payslip.id,
                employee_id: payslip.employee_id.clone(),
                amount: payslip.net_salary,
                payment_method,
                status: DisbursementStatus::Pending,
                transaction_ref: None,
                failure_reason: None,
                created_at: Utc::now(),
            };
            self.store.insert_disbursement(disbursement.clone());
            created.push(disbursement);
        }

        info!(
            cycle_id = %cycle_id,
            created = created.len(),
            "disbursements created from approved payslips"
        );
        Ok(created)
    }

    /// Renders a payment file for a set of disbursements.
    ///
    /// File generation never changes disbursement status; the same set
    /// can be rendered again if a file is lost.
    pub fn generate_payment_file(
        &self,
        disbursement_ids: &[Uuid],
        format: PaymentFileFormat,
    ) -> EngineResult<PaymentFile> {
        if disbursement_ids.is_empty() {
            return Err(EngineError::EmptySelection {
                message: "payment file requested for no disbursements".to_string(),
            });
        }

        let mut rows = Vec::new();
        for &id in disbursement_ids {
            let disbursement = self
                .store
                .disbursement(id)
                .ok_or(EngineError::DisbursementNotFound { id })?;
            let employee = self.store.employee(&disbursement.employee_id);
            rows.push((disbursement, employee));
        }

        let file = render_file(&rows, format);
        info!(
            format = ?format,
            records = file.record_count,
            total = %file.total_amount,
            "payment file generated"
        );
        Ok(file)
    }

    /// Applies an operator-driven status update to one disbursement.
    ///
    /// A transition to completed also moves the linked payslip to paid,
    /// and completes the cycle once every payslip in it is paid.
    pub fn update_status(
        &self,
        id: Uuid,
        status: DisbursementStatus,
        transaction_ref: Option<String>,
        failure_reason: Option<String>,
    ) -> EngineResult<Disbursement> {
        let disbursement =
            self.store
                .transition_disbursement(id, status, transaction_ref, failure_reason)?;

        if status == DisbursementStatus::Completed {
            self.store
                .transition_payslip(disbursement.payslip_id, PayslipStatus::Paid, None)?;
            self.maybe_complete_cycle(disbursement.cycle_id);
        }

        info!(
            disbursement_id = %id,
            status = status.as_str(),
            "disbursement status updated"
        );
        Ok(disbursement)
    }

    /// Applies a status update to many disbursements, isolating failures.
    ///
    /// Rows that reject the transition are reported alongside the updated
    /// ones; one bad row never blocks the rest.
    pub fn update_status_bulk(
        &self,
        ids: &[Uuid],
        status: DisbursementStatus,
        transaction_ref: Option<String>,
        failure_reason: Option<String>,
    ) -> EngineResult<BulkUpdateOutcome> {
        if ids.is_empty() {
            return Err(EngineError::EmptySelection {
                message: "bulk update requested for no disbursements".to_string(),
            });
        }

        let mut updated = Vec::new();
        let mut failed = Vec::new();
        for &id in ids {
            match self.update_status(id, status, transaction_ref.clone(), failure_reason.clone())
            {
                Ok(disbursement) => updated.push(disbursement),
                Err(err) => {
                    warn!(
                        disbursement_id = %id,
                        error = %err,
                        "bulk update skipped disbursement"
                    );
                    failed.push(SkippedUpdate {
                        disbursement_id: id,
                        reason: err.to_string(),
                    });
                }
            }
        }
        Ok(BulkUpdateOutcome { updated, failed })
    }

    /// Reconciles externally reported payment confirmations.
    ///
    /// Each entry is matched to an open (pending or processing)
    /// disbursement by employee identifier. A matching amount within
    /// tolerance completes the disbursement (and pays its payslip); a
    /// mismatch fails it with a reason; an unmatched identifier is
    /// reported back under `not_found`. Entries are independent: one
    /// mismatch never stops the run.
    pub fn reconcile(&self, entries: &[ReconciliationEntry]) -> ReconciliationOutcome {
        let mut completed = Vec::new();
        let mut failed = Vec::new();
        let mut not_found = Vec::new();

        for entry in entries {
            let Some(open) = self.store.open_disbursement_for_employee(&entry.employee_id)
            else {
                warn!(
                    employee_id = %entry.employee_id,
                    "reconciliation entry matched no open disbursement"
                );
                not_found.push(entry.clone());
                continue;
            };

            let difference = (entry.amount - open.amount).abs();
            if difference <= reconciliation_tolerance() {
                match self.update_status(
                    open.id,
                    DisbursementStatus::Completed,
                    entry.reference.clone(),
                    None,
                ) {
                    Ok(disbursement) => completed.push(disbursement),
                    Err(err) => {
                        // Lost the row to a concurrent run; report the
                        // entry rather than the stale disbursement.
                        warn!(
                            disbursement_id = %open.id,
                            error = %err,
                            "reconciliation lost a transition race"
                        );
                        not_found.push(entry.clone());
                    }
                }
            } else {
                let reason = format!(
                    "amount mismatch: disbursement {} vs reported {}",
                    open.amount, entry.amount
                );
                match self.update_status(
                    open.id,
                    DisbursementStatus::Failed,
                    entry.reference.clone(),
                    Some(reason),
                ) {
                    Ok(disbursement) => failed.push(disbursement),
                    Err(err) => {
                        warn!(
                            disbursement_id = %open.id,
                            error = %err,
                            "reconciliation lost a transition race"
                        );
                        not_found.push(entry.clone());
                    }
                }
            }
        }

        info!(
            completed = completed.len(),
            failed = failed.len(),
            not_found = not_found.len(),
            "reconciliation run finished"
        );
        ReconciliationOutcome {
            completed,
            failed,
            not_found,
        }
    }

    /// Returns one disbursement by id.
    pub fn disbursement(&self, id: Uuid) -> EngineResult<Disbursement> {
        self.store
            .disbursement(id)
            .ok_or(EngineError::DisbursementNotFound { id })
    }

    /// Completes the cycle once every payslip in it is paid.
    fn maybe_complete_cycle(&self, cycle_id: Uuid) {
        let payslips = self.store.payslips_for_cycle(cycle_id);
        let all_paid =
            !payslips.is_empty() && payslips.iter().all(|p| p.status == PayslipStatus::Paid);
        if all_paid {
            match self
                .store
                .transition_cycle(cycle_id, CycleStatus::Processing, CycleStatus::Completed)
            {
                Ok(_) => info!(cycle_id = %cycle_id, "payroll cycle completed"),
                Err(err) => warn!(
                    cycle_id = %cycle_id,
                    error = %err,
                    "cycle completion skipped"
                ),
            }
        }
    }
}
