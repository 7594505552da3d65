//! Application state for the payroll engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::service::{DisbursementService, PayslipService};
use crate::store::PayrollStore;

/// Shared application state.
///
/// Wires the services to one store and one loaded configuration; cloning
/// is cheap, everything inside is reference counted.
#[derive(Clone)]
pub struct AppState {
    payslips: PayslipService,
    disbursements: DisbursementService,
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates application state over a store and loaded configuration.
    pub fn new(store: Arc<dyn PayrollStore>, config: ConfigLoader) -> Self {
        let config = Arc::new(config);
        Self {
            payslips: PayslipService::new(Arc::clone(&store), Arc::clone(&config)),
            disbursements: DisbursementService::new(store),
            config,
        }
    }

    /// Returns the payslip service.
    pub fn payslips(&self) -> &PayslipService {
        &self.payslips
    }

    /// Returns the disbursement service.
    pub fn disbursements(&self) -> &DisbursementService {
        &self.disbursements
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }
}
