//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the handler functions for all API endpoints and
//! the router wiring them together.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::calculation::{calculate_progressive_tax, calculate_statutory_deductions};
use crate::config::TaxType;

use super::request::{
    ApprovePayslipRequest, BulkUpdateStatusRequest, CreateCycleRequest, PaymentFileRequest,
    ReconcileRequest, StatutoryPreviewRequest, TaxPreviewRequest, UpdateStatusRequest,
};
use super::response::{ApiErrorResponse, StatutoryPreviewResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/cycles", post(create_cycle))
        .route("/cycles/:id/payslips", post(generate_payslips))
        .route("/cycles/:id/disbursements", post(create_disbursements))
        .route("/payslips/:id/approve", post(approve_payslip))
        .route("/payment-files", post(generate_payment_file))
        .route("/disbursements/status", post(update_status_bulk))
        .route("/disbursements/:id/status", post(update_status))
        .route("/reconciliation", post(reconcile))
        .route("/tax/preview", post(tax_preview))
        .route("/statutory/preview", post(statutory_preview))
        .with_state(state)
}

/// Handler for POST /cycles.
async fn create_cycle(
    State(state): State<AppState>,
    payload: Result<Json<CreateCycleRequest>, JsonRejection>,
) -> Result<impl axum::response::IntoResponse, ApiErrorResponse> {
    let Json(request) = payload?;
    let cycle = state.payslips().create_cycle(
        &request.tenant_id,
        request.period_start,
        request.period_end,
        request.payment_date,
    )?;
    Ok((StatusCode::CREATED, Json(cycle)))
}

/// Handler for POST /cycles/{id}/payslips.
async fn generate_payslips(
    State(state): State<AppState>,
    Path(cycle_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiErrorResponse> {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        cycle_id = %cycle_id,
        "processing payslip generation request"
    );
    let summary = state.payslips().generate_payslips(cycle_id)?;
    info!(
        correlation_id = %correlation_id,
        generated = summary.payslips.len(),
        skipped = summary.skipped.len(),
        "payslip generation request completed"
    );
    Ok(Json(summary))
}

/// Handler for POST /payslips/{id}/approve.
async fn approve_payslip(
    State(state): State<AppState>,
    Path(payslip_id): Path<Uuid>,
    payload: Result<Json<ApprovePayslipRequest>, JsonRejection>,
) -> Result<impl axum::response::IntoResponse, ApiErrorResponse> {
    let Json(request) = payload?;
    let payslip = state
        .payslips()
        .approve_payslip(payslip_id, &request.approver_id)?;
    Ok(Json(payslip))
}

/// Handler for POST /cycles/{id}/disbursements.
async fn create_disbursements(
    State(state): State<AppState>,
    Path(cycle_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiErrorResponse> {
    let disbursements = state.disbursements().create_disbursements(cycle_id)?;
    Ok((StatusCode::CREATED, Json(disbursements)))
}

/// Handler for POST /payment-files.
async fn generate_payment_file(
    State(state): State<AppState>,
    payload: Result<Json<PaymentFileRequest>, JsonRejection>,
) -> Result<impl axum::response::IntoResponse, ApiErrorResponse> {
    let Json(request) = payload?;
    let file = state
        .disbursements()
        .generate_payment_file(&request.disbursement_ids, request.format)?;
    Ok(Json(file))
}

/// Handler for POST /disbursements/{id}/status.
async fn update_status(
    State(state): State<AppState>,
    Path(disbursement_id): Path<Uuid>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<impl axum::response::IntoResponse, ApiErrorResponse> {
    let Json(request) = payload?;
    let disbursement = state.disbursements().update_status(
        disbursement_id,
        request.status,
        request.transaction_ref,
        request.failure_reason,
    )?;
    Ok(Json(disbursement))
}

/// Handler for POST /disbursements/status (bulk).
async fn update_status_bulk(
    State(state): State<AppState>,
    payload: Result<Json<BulkUpdateStatusRequest>, JsonRejection>,
) -> Result<impl axum::response::IntoResponse, ApiErrorResponse> {
    let Json(request) = payload?;
    let outcome = state.disbursements().update_status_bulk(
        &request.disbursement_ids,
        request.status,
        request.transaction_ref,
        request.failure_reason,
    )?;
    Ok(Json(outcome))
}

/// Handler for POST /reconciliation.
async fn reconcile(
    State(state): State<AppState>,
    payload: Result<Json<ReconcileRequest>, JsonRejection>,
) -> Result<impl axum::response::IntoResponse, ApiErrorResponse> {
    let Json(request) = payload?;
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        entries = request.entries.len(),
        "processing reconciliation request"
    );
    let outcome = state.disbursements().reconcile(&request.entries);
    Ok(Json(outcome))
}

/// Handler for POST /tax/preview.
async fn tax_preview(
    State(state): State<AppState>,
    payload: Result<Json<TaxPreviewRequest>, JsonRejection>,
) -> Result<impl axum::response::IntoResponse, ApiErrorResponse> {
    let Json(request) = payload?;
    let today = Utc::now().date_naive();
    let assessment = calculate_progressive_tax(
        request.annual_income,
        state.config().active_tax_config(request.tax_type, today),
    );
    Ok(Json(assessment))
}

/// Handler for POST /statutory/preview.
async fn statutory_preview(
    State(state): State<AppState>,
    payload: Result<Json<StatutoryPreviewRequest>, JsonRejection>,
) -> Result<impl axum::response::IntoResponse, ApiErrorResponse> {
    let Json(request) = payload?;
    let today = Utc::now().date_naive();
    let deductions = calculate_statutory_deductions(
        request.basic_salary,
        request.gross_salary,
        state.config().rules(),
        state
            .config()
            .active_tax_config(TaxType::ProfessionalTax, today),
    );
    Ok(Json(StatutoryPreviewResponse::from(deductions)))
}
