//! In-memory store implementation.
//!
//! Backs the engine in tests and single-process deployments. All state
//! lives behind one `RwLock`, so every transition method is a per-row
//! atomic read-check-write: two concurrent reconciliation runs cannot
//! both complete the same disbursement.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceEntry, CycleStatus, Disbursement, DisbursementStatus, Employee, Payslip,
    PayslipStatus, PayrollCycle, SalaryComponent,
};

use super::PayrollStore;

#[derive(Default)]
struct Inner {
    employees: Vec<Employee>,
    components: Vec<SalaryComponent>,
    attendance: Vec<AttendanceEntry>,
    cycles: HashMap<Uuid, PayrollCycle>,
    payslips: HashMap<Uuid, Payslip>,
    disbursements: HashMap<Uuid, Disbursement>,
}

/// An in-memory [`PayrollStore`].
///
/// Master data (employees, components, attendance) is seeded through the
/// `seed_*` methods before the engine runs; the engine itself only reads
/// it.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an employee to the master data.
    pub fn seed_employee(&self, employee: Employee) {
        self.inner.write().unwrap().employees.push(employee);
    }

    /// Adds a salary component to the tenant configuration.
    ///
    /// Components keep their insertion order; the component engine relies
    /// on it to break priority ties.
    pub fn seed_component(&self, component: SalaryComponent) {
        self.inner.write().unwrap().components.push(component);
    }

    /// Adds an attendance entry.
    pub fn seed_attendance(&self, entry: AttendanceEntry) {
        self.inner.write().unwrap().attendance.push(entry);
    }
}

impl PayrollStore for InMemoryStore {
    fn employees(&self) -> Vec<Employee> {
        self.inner.read().unwrap().employees.clone()
    }

    fn employee(&self, id: &str) -> Option<Employee> {
        self.inner
            .read()
            .unwrap()
            .employees
            .iter()
            .find(|e| e.id == id)
            .cloned()
    }

    fn components(&self) -> Vec<SalaryComponent> {
        self.inner.read().unwrap().components.clone()
    }

    fn attendance_entries(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<AttendanceEntry> {
        self.inner
            .read()
            .unwrap()
            .attendance
            .iter()
            .filter(|a| a.employee_id == employee_id && a.date >= start && a.date <= end)
            .cloned()
            .collect()
    }

    fn insert_cycle(&self, cycle: PayrollCycle) {
        self.inner.write().unwrap().cycles.insert(cycle.id, cycle);
    }

    fn cycle(&self, id: Uuid) -> Option<PayrollCycle> {
        self.inner.read().unwrap().cycles.get(&id).cloned()
    }

    fn transition_cycle(
        &self,
        id: Uuid,
        from: CycleStatus,
        to: CycleStatus,
    ) -> EngineResult<PayrollCycle> {
        let mut inner = self.inner.write().unwrap();
        let cycle = inner
            .cycles
            .get_mut(&id)
            .ok_or(EngineError::CycleNotFound { id })?;
        if cycle.status != from {
            return Err(EngineError::InvalidCycleStatus {
                id,
                expected: from.as_str().to_string(),
                actual: cycle.status.as_str().to_string(),
            });
        }
        cycle.status = to;
        Ok(cycle.clone())
    }

    fn insert_payslip(&self, payslip: Payslip) {
        self.inner
            .write()
            .unwrap()
            .payslips
            .insert(payslip.id, payslip);
    }

    fn payslip(&self, id: Uuid) -> Option<Payslip> {
        self.inner.read().unwrap().payslips.get(&id).cloned()
    }

    fn payslips_for_cycle(&self, cycle_id: Uuid) -> Vec<Payslip> {
        let mut payslips: Vec<Payslip> = self
            .inner
            .read()
            .unwrap()
            .payslips
            .values()
            .filter(|p| p.cycle_id == cycle_id)
            .cloned()
            .collect();
        payslips.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        payslips
    }

    fn transition_payslip(
        &self,
        id: Uuid,
        to: PayslipStatus,
        approved_by: Option<String>,
    ) -> EngineResult<Payslip> {
        let mut inner = self.inner.write().unwrap();
        let payslip = inner
            .payslips
            .get_mut(&id)
            .ok_or(EngineError::PayslipNotFound { id })?;
        if !payslip.status.can_transition_to(to) {
            return Err(EngineError::InvalidPayslipTransition {
                id,
                from: payslip.status.as_str().to_string(),
                to: to.as_str().to_string(),
            });
        }
        payslip.status = to;
        if to == PayslipStatus::Approved {
            payslip.approved_by = approved_by;
            payslip.approved_at = Some(Utc::now());
        }
        Ok(payslip.clone())
    }

    fn insert_disbursement(&self, disbursement: Disbursement) {
        self.inner
            .write()
            .unwrap()
            .disbursements
            .insert(disbursement.id, disbursement);
    }

    fn disbursement(&self, id: Uuid) -> Option<Disbursement> {
        self.inner.read().unwrap().disbursements.get(&id).cloned()
    }

    fn disbursements_for_cycle(&self, cycle_id: Uuid) -> Vec<Disbursement> {
        let mut disbursements: Vec<Disbursement> = self
            .inner
            .read()
            .unwrap()
            .disbursements
            .values()
            .filter(|d| d.cycle_id == cycle_id)
            .cloned()
            .collect();
        disbursements.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        disbursements
    }

    fn disbursement_for_payslip(&self, payslip_id: Uuid) -> Option<Disbursement> {
        self.inner
            .read()
            .unwrap()
            .disbursements
            .values()
            .find(|d| d.payslip_id == payslip_id)
            .cloned()
    }

    fn open_disbursement_for_employee(&self, employee_id: &str) -> Option<Disbursement> {
        self.inner
            .read()
            .unwrap()
            .disbursements
            .values()
            .find(|d| {
                d.employee_id == employee_id
                    && matches!(
                        d.status,
                        DisbursementStatus::Pending | DisbursementStatus::Processing
                    )
            })
            .cloned()
    }

    fn transition_disbursement(
        &self,
        id: Uuid,
        to: DisbursementStatus,
        transaction_ref: Option<String>,
        failure_reason: Option<String>,
    ) -> EngineResult<Disbursement> {
        let mut inner = self.inner.write().unwrap();
        let disbursement = inner
            .disbursements
            .get_mut(&id)
            .ok_or(EngineError::DisbursementNotFound { id })?;
        if !disbursement.status.can_transition_to(to) {
            return Err(EngineError::InvalidDisbursementTransition {
                id,
                from: disbursement.status.as_str().to_string(),
                to: to.as_str().to_string(),
            });
        }
        disbursement.status = to;
        if let Some(reference) = transaction_ref {
            disbursement.transaction_ref = Some(reference);
        }
        if let Some(reason) = failure_reason {
            disbursement.failure_reason = Some(reason);
        }
        Ok(disbursement.clone())
    }
}
