//! Payment file rendering.
//!
//! Turns a set of disbursements into a bank-ready payload: either a
//! generic delimited file or the fixed-width bank-transfer schema with
//! header, detail and trailer records.

use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Disbursement, Employee};

/// Supported payment file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFileFormat {
    /// Generic comma-delimited file with a header row.
    Csv,
    /// Fixed-width bank transfer schema (H/D/T records).
    BankTransfer,
}

/// A rendered payment file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentFile {
    /// Suggested file name, stamped with the generation time.
    pub filename: String,
    /// The file contents.
    pub payload: String,
    /// Number of detail records in the file.
    pub record_count: usize,
    /// Sum of all disbursement amounts in the file.
    pub total_amount: Decimal,
}

/// Renders disbursements into the requested format.
///
/// Employee records supply names and bank details; a disbursement whose
/// employee is unknown renders with blank bank fields so the rest of the
/// file is still usable.
pub fn render_file(
    rows: &[(Disbursement, Option<Employee>)],
    format: PaymentFileFormat,
) -> PaymentFile {
    let total_amount: Decimal = rows.iter().map(|(d, _)| d.amount).sum();
    let stamp = Utc::now().format("%Y%m%d%H%M%S");

    let (filename, payload) = match format {
        PaymentFileFormat::Csv => (format!("payments_{}.csv", stamp), render_csv(rows)),
        PaymentFileFormat::BankTransfer => (
            format!("payments_{}.txt", stamp),
            render_bank_transfer(rows, total_amount),
        ),
    };

    PaymentFile {
        filename,
        payload,
        record_count: rows.len(),
        total_amount,
    }
}

fn render_csv(rows: &[(Disbursement, Option<Employee>)]) -> String {
    let mut out = String::from("employee_id,employee_name,account_number,ifsc_code,amount,reference\n");
    for (disbursement, employee) in rows {
        let name = employee.as_ref().map(|e| e.name.as_str()).unwrap_or("");
        let (account, ifsc) = bank_fields(employee.as_ref());
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            disbursement.employee_id,
            name,
            account,
            ifsc,
            disbursement.amount,
            disbursement.id.simple(),
        ));
    }
    out
}

/// Fixed-width schema:
///
/// ```text
/// H<yyyymmdd:8><count:6><total in paise:15>
/// D<account:20><ifsc:11><name:30><employee id:12><amount in paise:15>
/// T<count:6><total in paise:15>
/// ```
fn render_bank_transfer(rows: &[(Disbursement, Option<Employee>)], total: Decimal) -> String {
    let date = Utc::now().format("%Y%m%d");
    let mut out = format!(
        "H{}{:06}{:015}\n",
        date,
        rows.len(),
        to_paise(total)
    );
    for (disbursement, employee) in rows {
        let name = employee.as_ref().map(|e| e.name.as_str()).unwrap_or("");
        let (account, ifsc) = bank_fields(employee.as_ref());
        out.push_str(&format!(
            "D{:<20}{:<11}{:<30}{:<12}{:015}\n",
            truncate(&account, 20),
            truncate(&ifsc, 11),
            truncate(name, 30),
            truncate(&disbursement.employee_id, 12),
            to_paise(disbursement.amount),
        ));
    }
    out.push_str(&format!("T{:06}{:015}\n", rows.len(), to_paise(total)));
    out
}

fn bank_fields(employee: Option<&Employee>) -> (String, String) {
    match employee.and_then(|e| e.bank_account.as_ref()) {
        Some(account) => (account.account_number.clone(), account.ifsc_code.clone()),
        None => (String::new(), String::new()),
    }
}

/// Converts a 2-decimal amount to integer paise for fixed-width fields.
fn to_paise(amount: Decimal) -> i64 {
    (amount * Decimal::ONE_HUNDRED)
        .round()
        .to_i64()
        .unwrap_or(0)
}

fn truncate(value: &str, max: usize) -> &str {
    match value.char_indices().nth(max) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}
