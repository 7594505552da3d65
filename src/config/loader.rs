//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! configuration from YAML files.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::error::{EngineError, EngineResult};

use super::types::{PayrollRules, TaxConfiguration, TaxType};

/// Loads and provides access to payroll configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory and
/// provides lookups for statutory rules and effective-dated tax tables.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/payroll/
/// ├── rules.yaml           # Statutory payroll rules (optional)
/// └── tax/
///     ├── income_tax.yaml  # One tax table per file
///     └── professional_tax.yaml
/// ```
///
/// A missing `rules.yaml` is not an error: the engine falls back to the
/// built-in statutory defaults and logs the fallback. A malformed file is
/// an error; silently mis-reading statutory rates is worse than refusing
/// to start.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::{ConfigLoader, TaxType};
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/payroll").unwrap();
/// let date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
/// if let Some(table) = loader.active_tax_config(TaxType::IncomeTax, date) {
///     println!("Using tax table: {}", table.name);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    rules: PayrollRules,
    tax_configs: Vec<TaxConfiguration>,
}

impl ConfigLoader {
    /// Creates a loader from already-built configuration.
    ///
    /// Slabs of every tax table are sorted ascending by their lower bound.
    pub fn new(rules: PayrollRules, mut tax_configs: Vec<TaxConfiguration>) -> Self {
        for config in &mut tax_configs {
            config.sort_slabs();
        }
        Self { rules, tax_configs }
    }

    /// Creates a loader with default rules and no tax tables.
    ///
    /// Suitable for tests and for tenants that have not configured any
    /// tax tables yet (tax lookups then resolve to zero).
    pub fn with_defaults() -> Self {
        Self::new(PayrollRules::default(), Vec::new())
    }

    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g. "./config/payroll")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if a present file
    /// contains invalid YAML. A missing `rules.yaml` or `tax/` directory
    /// falls back to defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let rules_path = path.join("rules.yaml");
        let rules = if rules_path.exists() {
            Self::load_yaml::<PayrollRules>(&rules_path)?
        } else {
            warn!(
                path = %rules_path.display(),
                "rules.yaml not found, using built-in statutory defaults"
            );
            PayrollRules::default()
        };

        let tax_dir = path.join("tax");
        let tax_configs = if tax_dir.exists() {
            Self::load_tax_configs(&tax_dir)?
        } else {
            warn!(
                path = %tax_dir.display(),
                "tax directory not found, no tax tables loaded"
            );
            Vec::new()
        };

        Ok(Self::new(rules, tax_configs))
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all tax table files from the tax directory.
    fn load_tax_configs(tax_dir: &Path) -> EngineResult<Vec<TaxConfiguration>> {
        let tax_dir_str = tax_dir.display().to_string();

        let entries = fs::read_dir(tax_dir).map_err(|_| EngineError::ConfigNotFound {
            path: tax_dir_str.clone(),
        })?;

        let mut configs = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: tax_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let config = Self::load_yaml::<TaxConfiguration>(&path)?;
                configs.push(config);
            }
        }

        Ok(configs)
    }

    /// Returns the statutory payroll rules.
    pub fn rules(&self) -> &PayrollRules {
        &self.rules
    }

    /// Returns all loaded tax tables.
    pub fn tax_configs(&self) -> &[TaxConfiguration] {
        &self.tax_configs
    }

    /// Returns the tax table active for the given type and date.
    ///
    /// When several tables are effective on the date, the one with the
    /// latest `effective_from` wins. Returns `None` when no table applies;
    /// callers treat that as zero tax, not as an error.
    pub fn active_tax_config(&self, tax_type: TaxType, date: NaiveDate) -> Option<&TaxConfiguration> {
        self.tax_configs
            .iter()
            .filter(|c| c.tax_type == tax_type && c.is_effective_on(date))
            .max_by_key(|c| c.effective_from)
    }
}
