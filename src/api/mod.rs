//! HTTP API for the payroll engine.
//!
//! This module provides the axum router, request/response types and
//! shared application state for exposing the engine's operations over
//! HTTP.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    ApprovePayslipRequest, BulkUpdateStatusRequest, CreateCycleRequest, PaymentFileRequest,
    ReconcileRequest, StatutoryPreviewRequest, TaxPreviewRequest, UpdateStatusRequest,
};
pub use response::{ApiError, ApiErrorResponse, StatutoryPreviewResponse};
pub use state::AppState;
