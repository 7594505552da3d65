//! Persistence seam for the payroll engine.
//!
//! Services depend on the [`PayrollStore`] trait rather than a concrete
//! datastore, so the engine can run against an in-memory store in tests
//! and a real database in production. Status transitions are expressed as
//! compare-and-set style methods: the store checks the current status
//! under its own lock, which makes every transition a per-row atomic
//! read-check-write.

mod memory;

pub use memory::InMemoryStore;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{
    AttendanceEntry, Disbursement, DisbursementStatus, Employee, Payslip, PayslipStatus,
    PayrollCycle, CycleStatus, SalaryComponent,
};

/// Storage operations the payroll services depend on.
///
/// Employee, component and attendance data are read-only from the
/// engine's point of view; cycles, payslips and disbursements are owned
/// by it.
pub trait PayrollStore: Send + Sync {
    /// Returns all employees known to the tenant.
    fn employees(&self) -> Vec<Employee>;

    /// Returns one employee by id.
    fn employee(&self, id: &str) -> Option<Employee>;

    /// Returns the tenant's salary components in configuration order.
    fn components(&self) -> Vec<SalaryComponent>;

    /// Returns an employee's attendance entries within a date range,
    /// inclusive on both ends.
    fn attendance_entries(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<AttendanceEntry>;

    /// Persists a new payroll cycle.
    fn insert_cycle(&self, cycle: PayrollCycle);

    /// Returns one cycle by id.
    fn cycle(&self, id: Uuid) -> Option<PayrollCycle>;

    /// Moves a cycle from `from` to `to`, failing if the cycle is not
    /// currently in `from`.
    fn transition_cycle(
        &self,
        id: Uuid,
        from: CycleStatus,
        to: CycleStatus,
    ) -> EngineResult<PayrollCycle>;

    /// Persists a newly generated payslip.
    fn insert_payslip(&self, payslip: Payslip);

    /// Returns one payslip by id.
    fn payslip(&self, id: Uuid) -> Option<Payslip>;

    /// Returns all payslips generated in a cycle.
    fn payslips_for_cycle(&self, cycle_id: Uuid) -> Vec<Payslip>;

    /// Moves a payslip to `to`, enforcing the payslip state machine.
    ///
    /// `approved_by` is recorded on the transition to approved.
    fn transition_payslip(
        &self,
        id: Uuid,
        to: PayslipStatus,
        approved_by: Option<String>,
    ) -> EngineResult<Payslip>;

    /// Persists a new disbursement.
    fn insert_disbursement(&self, disbursement: Disbursement);

    /// Returns one disbursement by id.
    fn disbursement(&self, id: Uuid) -> Option<Disbursement>;

    /// Returns all disbursements created for a cycle.
    fn disbursements_for_cycle(&self, cycle_id: Uuid) -> Vec<Disbursement>;

    /// Returns the disbursement paying a payslip, if one exists.
    fn disbursement_for_payslip(&self, payslip_id: Uuid) -> Option<Disbursement>;

    /// Returns an employee's disbursement still awaiting confirmation
    /// (pending or processing), if any. Used by reconciliation to match
    /// bank entries by employee identifier.
    fn open_disbursement_for_employee(&self, employee_id: &str) -> Option<Disbursement>;

    /// Moves a disbursement to `to`, enforcing the disbursement state
    /// machine and recording the transaction reference or failure reason
    /// when supplied.
    fn transition_disbursement(
        &self,
        id: Uuid,
        to: DisbursementStatus,
        transaction_ref: Option<String>,
        failure_reason: Option<String>,
    ) -> EngineResult<Disbursement>;
}
