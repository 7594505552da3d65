//! Comprehensive integration tests for the payroll engine.
//!
//! This test suite drives the HTTP surface end to end:
//! - Cycle creation and date validation
//! - Payslip generation with components, statutory deductions and tax
//! - Attendance proration and overtime
//! - The statutory merge rule (no double counting)
//! - Approval, disbursement, payment files and reconciliation
//! - State guards (regeneration, double approval, double completion)
//! - Preview endpoints and error mapping

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use tower::ServiceExt;

use payroll_engine::api::{create_router, AppState};
use payroll_engine::config::ConfigLoader;
use payroll_engine::models::{
    AttendanceEntry, AttendanceStatus, BankAccount, CalculationType, ComponentType, Employee,
    EmploymentStatus, PaymentMethod, SalaryComponent, SalaryStructure,
};
use payroll_engine::store::InMemoryStore;

// =============================================================================
// Test Helpers
// =============================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Normalize decimal string by removing trailing zeros after decimal point
fn normalize_decimal(s: &str) -> String {
    Decimal::from_str(s).unwrap().normalize().to_string()
}

fn assert_amount(value: &Value, expected: &str) {
    let actual = value.as_str().unwrap();
    assert_eq!(
        normalize_decimal(actual),
        normalize_decimal(expected),
        "Expected {}, got {}",
        expected,
        actual
    );
}

fn employee(
    id: &str,
    basic: Option<&str>,
    status: EmploymentStatus,
    start: NaiveDate,
) -> Employee {
    Employee {
        id: id.to_string(),
        name: format!("Employee {}", id),
        status,
        employment_start_date: start,
        salary_structure: basic.map(|b| SalaryStructure {
            basic_salary: decimal(b),
        }),
        bank_account: Some(BankAccount {
            account_number: format!("0012345{}", id.len()),
            ifsc_code: "HDFC0001234".to_string(),
        }),
        payment_method: PaymentMethod::BankTransfer,
    }
}

fn component(
    code: &str,
    component_type: ComponentType,
    calculation_type: CalculationType,
    value: &str,
    formula: Option<&str>,
) -> SalaryComponent {
    SalaryComponent {
        code: code.to_string(),
        name: code.to_string(),
        component_type,
        calculation_type,
        value: decimal(value),
        formula: formula.map(str::to_string),
        is_active: true,
    }
}

fn seed_default_components(store: &InMemoryStore) {
    store.seed_component(component(
        "HRA",
        ComponentType::Allowance,
        CalculationType::PercentageOfBasic,
        "40",
        None,
    ));
    store.seed_component(component(
        "CONVEYANCE",
        ComponentType::Allowance,
        CalculationType::Fixed,
        "1600",
        None,
    ));
    store.seed_component(component(
        "SPECIAL",
        ComponentType::Allowance,
        CalculationType::Formula,
        "0",
        Some("10% of BASIC"),
    ));
}

/// Two payable employees, one without a salary structure, one inactive.
fn create_test_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    store.seed_employee(employee(
        "emp_amit",
        Some("20000"),
        EmploymentStatus::Active,
        date(2018, 6, 1),
    ));
    store.seed_employee(employee(
        "emp_neha",
        Some("50000"),
        EmploymentStatus::Active,
        date(2022, 1, 10),
    ));
    store.seed_employee(employee(
        "emp_noslip",
        None,
        EmploymentStatus::Active,
        date(2023, 3, 1),
    ));
    store.seed_employee(employee(
        "emp_gone",
        Some("15000"),
        EmploymentStatus::Inactive,
        date(2019, 1, 1),
    ));
    seed_default_components(&store);
    store
}

fn create_router_for_store(store: InMemoryStore) -> Router {
    let config = ConfigLoader::load("./config/payroll").expect("Failed to load config");
    create_router(AppState::new(Arc::new(store), config))
}

fn create_test_router() -> Router {
    create_router_for_store(create_test_store())
}

async fn post(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Creates a 30-day June 2025 cycle and returns its id.
async fn create_june_cycle(router: &Router) -> String {
    let (status, body) = post(
        router,
        "/cycles",
        json!({
            "tenant_id": "tenant_01",
            "period_start": "2025-06-01",
            "period_end": "2025-06-30",
            "payment_date": "2025-07-01"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "draft");
    body["id"].as_str().unwrap().to_string()
}

async fn generate(router: &Router, cycle_id: &str) -> Value {
    let (status, body) = post(
        router,
        &format!("/cycles/{}/payslips", cycle_id),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "generation failed: {}", body);
    body
}

async fn approve(router: &Router, payslip_id: &str) -> Value {
    let (status, body) = post(
        router,
        &format!("/payslips/{}/approve", payslip_id),
        json!({ "approver_id": "mgr_01" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "approval failed: {}", body);
    body
}

async fn create_disbursements(router: &Router, cycle_id: &str) -> Value {
    let (status, body) = post(
        router,
        &format!("/cycles/{}/disbursements", cycle_id),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "disbursement failed: {}", body);
    body
}

// =============================================================================
// Cycle creation
// =============================================================================

#[tokio::test]
async fn test_create_cycle_returns_draft() {
    let router = create_test_router();
    create_june_cycle(&router).await;
}

#[tokio::test]
async fn test_create_cycle_rejects_end_before_start() {
    let router = create_test_router();
    let (status, body) = post(
        &router,
        "/cycles",
        json!({
            "tenant_id": "tenant_01",
            "period_start": "2025-06-30",
            "period_end": "2025-06-01",
            "payment_date": "2025-07-01"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_cycle_rejects_payment_before_period_end() {
    let router = create_test_router();
    let (status, body) = post(
        &router,
        "/cycles",
        json!({
            "tenant_id": "tenant_01",
            "period_start": "2025-06-01",
            "period_end": "2025-06-30",
            "payment_date": "2025-06-15"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

// =============================================================================
// Payslip generation
// =============================================================================

#[tokio::test]
async fn test_generation_computes_full_payslip() {
    let router = create_test_router();
    let cycle_id = create_june_cycle(&router).await;
    let summary = generate(&router, &cycle_id).await;

    let payslips = summary["payslips"].as_array().unwrap();
    assert_eq!(payslips.len(), 2);

    // Inactive employees are not part of the batch; the employee without
    // a salary structure is skipped with a reason.
    let skipped = summary["skipped"].as_array().unwrap();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0]["employee_id"], "emp_noslip");
    assert!(skipped[0]["reason"]
        .as_str()
        .unwrap()
        .contains("no salary structure"));

    // emp_amit: basic 20000, full attendance over the 30-day period.
    let amit = &payslips[0];
    assert_eq!(amit["employee_id"], "emp_amit");
    assert_amount(&amit["basic_salary"], "20000");
    assert_amount(&amit["allowances"]["HRA"], "8000");
    assert_amount(&amit["allowances"]["CONVEYANCE"], "1600");
    assert_amount(&amit["allowances"]["SPECIAL"], "2000");
    assert_amount(&amit["gross_salary"], "31600");

    // PF capped at 15000 * 0.12; ESI zero above the 21000 limit;
    // professional tax 200 for the 20000+ band.
    assert_amount(&amit["deductions"]["PF"], "1800");
    assert!(amit["deductions"].get("ESI").is_none());
    assert_amount(&amit["deductions"]["PROFESSIONAL_TAX"], "200");

    // Annual income 379200: 129200 taxed at 5% = 6460, monthly 538.33.
    assert_amount(&amit["tax_deduction"], "538.33");
    assert_amount(&amit["total_deductions"], "2538.33");
    assert_amount(&amit["net_salary"], "29061.67");

    // Seven years of tenure: gratuity accrues 20000/26*15/12.
    assert_amount(&amit["gratuity_accrual"], "961.54");
    assert_eq!(amit["status"], "draft");

    // emp_neha: basic 50000, tenure below the gratuity threshold.
    let neha = &payslips[1];
    assert_eq!(neha["employee_id"], "emp_neha");
    assert_amount(&neha["gross_salary"], "76600");
    assert_amount(&neha["deductions"]["PF"], "1800");
    assert_amount(&neha["tax_deduction"], "8028.33");
    assert_amount(&neha["net_salary"], "66571.67");
    assert_amount(&neha["gratuity_accrual"], "0");

    // Summary totals are the sums over generated payslips.
    assert_amount(&summary["total_gross"], "108200");
    assert_amount(&summary["total_net"], "95633.34");
}

#[tokio::test]
async fn test_payslip_invariants_hold() {
    let router = create_test_router();
    let cycle_id = create_june_cycle(&router).await;
    let summary = generate(&router, &cycle_id).await;

    for payslip in summary["payslips"].as_array().unwrap() {
        let basic = decimal(payslip["basic_salary"].as_str().unwrap());
        let allowances: Decimal = payslip["allowances"]
            .as_object()
            .unwrap()
            .values()
            .map(|v| decimal(v.as_str().unwrap()))
            .sum();
        let bonuses = decimal(payslip["bonuses"].as_str().unwrap());
        let overtime = decimal(payslip["overtime_pay"].as_str().unwrap());
        let gross = decimal(payslip["gross_salary"].as_str().unwrap());
        let total_deductions = decimal(payslip["total_deductions"].as_str().unwrap());
        let net = decimal(payslip["net_salary"].as_str().unwrap());

        assert_eq!(gross, basic + allowances + bonuses + overtime);
        assert_eq!(net, gross - total_deductions);
    }
}

#[tokio::test]
async fn test_regeneration_is_rejected_and_leaves_payslips_intact() {
    let router = create_test_router();
    let cycle_id = create_june_cycle(&router).await;
    let summary = generate(&router, &cycle_id).await;
    let payslip_id = summary["payslips"][0]["id"].as_str().unwrap().to_string();

    let (status, body) = post(
        &router,
        &format!("/cycles/{}/payslips", cycle_id),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "STATE_ERROR");
    assert!(body["message"].as_str().unwrap().contains("processing"));

    // The original payslip still exists and can be approved.
    let approved = approve(&router, &payslip_id).await;
    assert_eq!(approved["status"], "approved");
    assert_eq!(approved["approved_by"], "mgr_01");
}

#[tokio::test]
async fn test_generation_for_unknown_cycle_is_404() {
    let router = create_test_router();
    let (status, body) = post(
        &router,
        "/cycles/00000000-0000-0000-0000-000000000042/payslips",
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_attendance_proration_and_overtime() {
    let store = create_test_store();
    // 15 present days, 14 absent, 1 half day; 2 overtime hours.
    for day in 1..=15 {
        store.seed_attendance(AttendanceEntry {
            employee_id: "emp_amit".to_string(),
            date: date(2025, 6, day),
            status: AttendanceStatus::Present,
            overtime_hours: if day == 1 { Some(decimal("2")) } else { None },
        });
    }
    for day in 16..=29 {
        store.seed_attendance(AttendanceEntry {
            employee_id: "emp_amit".to_string(),
            date: date(2025, 6, day),
            status: AttendanceStatus::Absent,
            overtime_hours: None,
        });
    }
    store.seed_attendance(AttendanceEntry {
        employee_id: "emp_amit".to_string(),
        date: date(2025, 6, 30),
        status: AttendanceStatus::HalfDay,
        overtime_hours: None,
    });

    let router = create_router_for_store(store);
    let cycle_id = create_june_cycle(&router).await;
    let summary = generate(&router, &cycle_id).await;
    let amit = &summary["payslips"][0];
    assert_eq!(amit["employee_id"], "emp_amit");

    // 15.5 present days: basic 20000/30*15.5.
    assert_amount(&amit["basic_salary"], "10333.33");
    assert_amount(&amit["attendance"]["present_days"], "15.5");
    assert_amount(&amit["attendance"]["absent_days"], "14.5");
    assert_amount(&amit["allowances"]["HRA"], "4133.33");
    assert_amount(&amit["allowances"]["CONVEYANCE"], "826.67");
    // Formula components are not prorated; 10% of the monthly basic.
    assert_amount(&amit["allowances"]["SPECIAL"], "2000");

    // Overtime: 2 hours at (20000/30/8) * 1.5.
    assert_amount(&amit["overtime_pay"], "250");
    // 10333.33 + 4133.33 + 826.67 + 2000 + 250
    assert_amount(&amit["gross_salary"], "17543.33");

    // Gross now sits under the ESI limit and in the 15000-20000 PT band.
    assert_amount(&amit["deductions"]["ESI"], "131.57");
    assert_amount(&amit["deductions"]["PROFESSIONAL_TAX"], "150");
    assert_amount(&amit["deductions"]["PF"], "1800");
}

// =============================================================================
// Merge rule
// =============================================================================

#[tokio::test]
async fn test_component_pf_suppresses_statutory_pf() {
    let store = create_test_store();
    store.seed_component(component(
        "PF",
        ComponentType::Deduction,
        CalculationType::Fixed,
        "1500",
        None,
    ));

    let router = create_router_for_store(store);
    let cycle_id = create_june_cycle(&router).await;
    let summary = generate(&router, &cycle_id).await;
    let amit = &summary["payslips"][0];

    // The configured PF component wins; the statutory 1800 is dropped.
    assert_amount(&amit["deductions"]["PF"], "1500");
    assert_amount(&amit["deductions"]["PROFESSIONAL_TAX"], "200");
    // 1500 + 200 + monthly tax 538.33
    assert_amount(&amit["total_deductions"], "2238.33");
}

// =============================================================================
// Approval, disbursement, payment files
// =============================================================================

#[tokio::test]
async fn test_double_approval_is_rejected() {
    let router = create_test_router();
    let cycle_id = create_june_cycle(&router).await;
    let summary = generate(&router, &cycle_id).await;
    let payslip_id = summary["payslips"][0]["id"].as_str().unwrap().to_string();

    approve(&router, &payslip_id).await;
    let (status, body) = post(
        &router,
        &format!("/payslips/{}/approve", payslip_id),
        json!({ "approver_id": "mgr_02" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "STATE_ERROR");
}

#[tokio::test]
async fn test_disbursements_created_only_for_approved_payslips() {
    let router = create_test_router();
    let cycle_id = create_june_cycle(&router).await;
    let summary = generate(&router, &cycle_id).await;
    let payslips = summary["payslips"].as_array().unwrap();

    // Approve only the first payslip.
    let first_id = payslips[0]["id"].as_str().unwrap().to_string();
    approve(&router, &first_id).await;

    let disbursements = create_disbursements(&router, &cycle_id).await;
    let rows = disbursements.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["employee_id"], "emp_amit");
    assert_eq!(rows[0]["status"], "pending");
    assert_amount(&rows[0]["amount"], "29061.67");

    // Approving the second and re-running creates only the missing one.
    let second_id = payslips[1]["id"].as_str().unwrap().to_string();
    approve(&router, &second_id).await;
    let disbursements = create_disbursements(&router, &cycle_id).await;
    let rows = disbursements.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["employee_id"], "emp_neha");
}

#[tokio::test]
async fn test_payment_file_csv() {
    let router = create_test_router();
    let cycle_id = create_june_cycle(&router).await;
    let summary = generate(&router, &cycle_id).await;
    for payslip in summary["payslips"].as_array().unwrap() {
        approve(&router, payslip["id"].as_str().unwrap()).await;
    }
    let disbursements = create_disbursements(&router, &cycle_id).await;
    let ids: Vec<&str> = disbursements
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_str().unwrap())
        .collect();

    let (status, file) = post(
        &router,
        "/payment-files",
        json!({ "disbursement_ids": ids, "format": "csv" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(file["record_count"], 2);
    assert_amount(&file["total_amount"], "95633.34");

    let payload = file["payload"].as_str().unwrap();
    let lines: Vec<&str> = payload.trim_end().lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("employee_id,"));
    assert!(payload.contains("emp_amit"));
    assert!(payload.contains("29061.67"));
}

#[tokio::test]
async fn test_payment_file_bank_transfer_schema() {
    let router = create_test_router();
    let cycle_id = create_june_cycle(&router).await;
    let summary = generate(&router, &cycle_id).await;
    let payslip_id = summary["payslips"][0]["id"].as_str().unwrap().to_string();
    approve(&router, &payslip_id).await;
    let disbursements = create_disbursements(&router, &cycle_id).await;
    let id = disbursements[0]["id"].as_str().unwrap();

    let (status, file) = post(
        &router,
        "/payment-files",
        json!({ "disbursement_ids": [id], "format": "bank_transfer" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let payload = file["payload"].as_str().unwrap();
    let lines: Vec<&str> = payload.trim_end().lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with('H'));
    assert!(lines[1].starts_with('D'));
    assert!(lines[2].starts_with('T'));
    // 29061.67 in paise, zero padded.
    assert!(lines[2].ends_with("000000002906167"));
}

#[tokio::test]
async fn test_payment_file_empty_selection_is_rejected() {
    let router = create_test_router();
    let (status, body) = post(
        &router,
        "/payment-files",
        json!({ "disbursement_ids": [], "format": "csv" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_payment_file_unknown_disbursement_is_404() {
    let router = create_test_router();
    let (status, body) = post(
        &router,
        "/payment-files",
        json!({
            "disbursement_ids": ["00000000-0000-0000-0000-000000000042"],
            "format": "csv"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

// =============================================================================
// Status updates and reconciliation
// =============================================================================

#[tokio::test]
async fn test_bulk_status_update_isolates_failures() {
    let router = create_test_router();
    let cycle_id = create_june_cycle(&router).await;
    let summary = generate(&router, &cycle_id).await;
    for payslip in summary["payslips"].as_array().unwrap() {
        approve(&router, payslip["id"].as_str().unwrap()).await;
    }
    let disbursements = create_disbursements(&router, &cycle_id).await;
    let first = disbursements[0]["id"].as_str().unwrap();
    let second = disbursements[1]["id"].as_str().unwrap();

    // Fail the second disbursement first, then bulk-move both to
    // processing: the terminal row is reported, not fatal.
    let (status, _) = post(
        &router,
        &format!("/disbursements/{}/status", second),
        json!({ "status": "failed", "failure_reason": "account closed" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, outcome) = post(
        &router,
        "/disbursements/status",
        json!({ "disbursement_ids": [first, second], "status": "processing" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["updated"].as_array().unwrap().len(), 1);
    assert_eq!(outcome["failed"].as_array().unwrap().len(), 1);
    assert_eq!(outcome["failed"][0]["disbursement_id"], second);
}

#[tokio::test]
async fn test_completion_marks_payslip_paid_and_completes_cycle() {
    // Single payable employee so one completion finishes the cycle.
    let store = InMemoryStore::new();
    store.seed_employee(employee(
        "emp_amit",
        Some("20000"),
        EmploymentStatus::Active,
        date(2018, 6, 1),
    ));
    seed_default_components(&store);
    let router = create_router_for_store(store);

    let cycle_id = create_june_cycle(&router).await;
    let summary = generate(&router, &cycle_id).await;
    let payslip_id = summary["payslips"][0]["id"].as_str().unwrap().to_string();
    approve(&router, &payslip_id).await;
    let disbursements = create_disbursements(&router, &cycle_id).await;
    let disbursement_id = disbursements[0]["id"].as_str().unwrap();

    let (status, updated) = post(
        &router,
        &format!("/disbursements/{}/status", disbursement_id),
        json!({ "status": "completed", "transaction_ref": "TXN001" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "completed");
    assert_eq!(updated["transaction_ref"], "TXN001");

    // The payslip is paid: approving it again conflicts with "paid".
    let (status, body) = post(
        &router,
        &format!("/payslips/{}/approve", payslip_id),
        json!({ "approver_id": "mgr_01" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("paid"));

    // The cycle is completed: regeneration reports the terminal status.
    let (status, body) = post(
        &router,
        &format!("/cycles/{}/payslips", cycle_id),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("completed"));
}

#[tokio::test]
async fn test_reconciliation_matches_mismatches_and_reports_unknown() {
    let router = create_test_router();
    let cycle_id = create_june_cycle(&router).await;
    let summary = generate(&router, &cycle_id).await;
    for payslip in summary["payslips"].as_array().unwrap() {
        approve(&router, payslip["id"].as_str().unwrap()).await;
    }
    create_disbursements(&router, &cycle_id).await;

    let (status, outcome) = post(
        &router,
        "/reconciliation",
        json!({
            "entries": [
                { "employee_id": "emp_amit", "amount": "29061.67", "reference": "TXN100" },
                { "employee_id": "emp_neha", "amount": "60000.00", "reference": "TXN101" },
                { "employee_id": "emp_ghost", "amount": "123.45" }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let completed = outcome["completed"].as_array().unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0]["employee_id"], "emp_amit");
    assert_eq!(completed[0]["status"], "completed");
    assert_eq!(completed[0]["transaction_ref"], "TXN100");

    let failed = outcome["failed"].as_array().unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0]["employee_id"], "emp_neha");
    assert_eq!(failed[0]["status"], "failed");
    assert!(failed[0]["failure_reason"]
        .as_str()
        .unwrap()
        .contains("amount mismatch"));

    let not_found = outcome["not_found"].as_array().unwrap();
    assert_eq!(not_found.len(), 1);
    assert_eq!(not_found[0]["employee_id"], "emp_ghost");
}

#[tokio::test]
async fn test_reconciliation_tolerates_one_paisa_difference() {
    let router = create_test_router();
    let cycle_id = create_june_cycle(&router).await;
    let summary = generate(&router, &cycle_id).await;
    let payslip_id = summary["payslips"][0]["id"].as_str().unwrap().to_string();
    approve(&router, &payslip_id).await;
    create_disbursements(&router, &cycle_id).await;

    let (status, outcome) = post(
        &router,
        "/reconciliation",
        json!({
            "entries": [
                { "employee_id": "emp_amit", "amount": "29061.68" }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["completed"].as_array().unwrap().len(), 1);
    assert!(outcome["failed"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_reconciled_disbursement_cannot_complete_twice() {
    let router = create_test_router();
    let cycle_id = create_june_cycle(&router).await;
    let summary = generate(&router, &cycle_id).await;
    let payslip_id = summary["payslips"][0]["id"].as_str().unwrap().to_string();
    approve(&router, &payslip_id).await;
    let disbursements = create_disbursements(&router, &cycle_id).await;
    let disbursement_id = disbursements[0]["id"].as_str().unwrap();

    let entries = json!({
        "entries": [
            { "employee_id": "emp_amit", "amount": "29061.67" }
        ]
    });
    let (_, first) = post(&router, "/reconciliation", entries.clone()).await;
    assert_eq!(first["completed"].as_array().unwrap().len(), 1);

    // The second run finds no open disbursement for the employee.
    let (_, second) = post(&router, "/reconciliation", entries).await;
    assert!(second["completed"].as_array().unwrap().is_empty());
    assert_eq!(second["not_found"].as_array().unwrap().len(), 1);

    // And a direct second completion is rejected by the state machine.
    let (status, body) = post(
        &router,
        &format!("/disbursements/{}/status", disbursement_id),
        json!({ "status": "completed" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "STATE_ERROR");
}

// =============================================================================
// Previews and error mapping
// =============================================================================

#[tokio::test]
async fn test_tax_preview() {
    let router = create_test_router();
    let (status, assessment) = post(
        &router,
        "/tax/preview",
        json!({ "annual_income": "600000", "tax_type": "income_tax" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_amount(&assessment["total_tax"], "32500");
    assert_amount(&assessment["monthly_tax"], "2708.33");
    assert_amount(&assessment["effective_rate"], "5.42");
    assert_eq!(assessment["breakdown"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_tax_preview_without_table_is_zero() {
    // A tenant with no tax tables configured previews zero tax.
    let router = create_router(AppState::new(
        Arc::new(create_test_store()),
        ConfigLoader::with_defaults(),
    ));
    let (status, assessment) = post(
        &router,
        "/tax/preview",
        json!({ "annual_income": "600000", "tax_type": "income_tax" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_amount(&assessment["total_tax"], "0");
    assert!(assessment["breakdown"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_statutory_preview_matches_worked_examples() {
    let router = create_test_router();

    let (status, preview) = post(
        &router,
        "/statutory/preview",
        json!({ "basic_salary": "20000", "gross_salary": "22000" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_amount(&preview["pf"], "1800");
    assert_amount(&preview["esi"], "0");

    let (_, preview) = post(
        &router,
        "/statutory/preview",
        json!({ "basic_salary": "12000", "gross_salary": "18000" }),
    )
    .await;
    assert_amount(&preview["pf"], "1440");
    assert_amount(&preview["esi"], "135");
    assert_amount(&preview["professional_tax"], "150");
    assert_amount(&preview["total"], "1725");
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let router = create_test_router();
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/cycles")
                .header("Content-Type", "application/json")
                .body(Body::from("{ not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(body["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_missing_field_is_a_validation_error() {
    let router = create_test_router();
    let (status, body) = post(
        &router,
        "/cycles",
        json!({ "tenant_id": "tenant_01", "period_start": "2025-06-01" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}
