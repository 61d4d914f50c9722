//! Calculator configuration

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use domain_claims::reconciliation::{DEFAULT_ACCURATE_THRESHOLD_PCT, DEFAULT_MINOR_THRESHOLD_PCT};
use domain_claims::{CalculationSettings, ReconciliationPolicy};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::CliError;

/// Name of the optional configuration file, without extension
pub const CONFIG_FILE: &str = "claim_calculator";
/// Prefix of the configuration environment variables
pub const ENV_PREFIX: &str = "CLAIM";

/// How the result is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON of the full result
    #[default]
    Json,
    /// Fixed-width per-item table followed by totals
    Table,
}

/// Calculator configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Path of the bill extraction JSON
    pub bill_path: Option<PathBuf>,
    /// Path of the bond extraction JSON
    pub bond_path: Option<PathBuf>,
    /// Whether the no-claim bonus grows the sum insured
    pub apply_ncb_bonus: bool,
    /// Largest extraction gap, in percent, treated as accurate
    pub accurate_threshold_pct: Decimal,
    /// Largest extraction gap, in percent, treated as a minor discrepancy
    pub minor_threshold_pct: Decimal,
    pub output: OutputFormat,
    /// Log filter used when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            bill_path: None,
            bond_path: None,
            apply_ncb_bonus: true,
            accurate_threshold_pct: DEFAULT_ACCURATE_THRESHOLD_PCT,
            minor_threshold_pct: DEFAULT_MINOR_THRESHOLD_PCT,
            output: OutputFormat::Json,
            log_level: "info".to_string(),
        }
    }
}

impl CalculatorConfig {
    /// Loads configuration from `claim_calculator.toml` and `CLAIM_*`
    /// environment variables, in that order of precedence over the defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(CONFIG_FILE, Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads configuration from an optional file and an environment source
    pub fn load_from(file: &str, env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(file).required(false))
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    /// Overrides the input paths with positional arguments
    ///
    /// The first argument is the bill and the second the bond. Missing
    /// arguments leave the configured paths in place.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathBuf>,
    {
        let mut args = args.into_iter();
        if let Some(bill) = args.next() {
            self.bill_path = Some(bill.into());
        }
        if let Some(bond) = args.next() {
            self.bond_path = Some(bond.into());
        }
        self
    }

    /// Returns the bill and bond paths
    ///
    /// # Errors
    ///
    /// Returns `CliError::MissingInput` if either path is not configured
    pub fn input_paths(&self) -> Result<(PathBuf, PathBuf), CliError> {
        let bill = self
            .bill_path
            .clone()
            .ok_or(CliError::MissingInput("bill path (argument 1 or CLAIM_BILL_PATH)"))?;
        let bond = self
            .bond_path
            .clone()
            .ok_or(CliError::MissingInput("bond path (argument 2 or CLAIM_BOND_PATH)"))?;
        Ok((bill, bond))
    }

    /// Builds the calculation settings
    ///
    /// # Errors
    ///
    /// Returns `ClaimError::InvalidPolicy` if the thresholds do not form a
    /// valid reconciliation table
    pub fn calculation_settings(&self) -> Result<CalculationSettings, CliError> {
        let reconciliation =
            ReconciliationPolicy::with_thresholds(self.accurate_threshold_pct, self.minor_threshold_pct)?;
        Ok(CalculationSettings {
            apply_ncb_bonus: self.apply_ncb_bonus,
            reconciliation,
        })
    }
}
