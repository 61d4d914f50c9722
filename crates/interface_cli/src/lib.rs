//! Command-line Interface Layer
//!
//! Loads a bill and a bond extraction from JSON files, runs the claim
//! calculation, and renders the result.
//!
//! # Architecture
//!
//! - **Config**: defaults, optional `claim_calculator.toml`, `CLAIM_*` environment
//! - **Report**: fixed-width table rendering
//! - **Error Handling**: `CliError` wraps configuration, I/O and extraction failures
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_cli::{config::CalculatorConfig, run};
//!
//! let config = CalculatorConfig::load()?.with_args(["bill.json", "bond.json"]);
//! println!("{}", run(&config)?);
//! ```

pub mod config;
pub mod error;
pub mod report;

use std::fs;
use std::path::Path;

use domain_claims::{BillExtraction, BondExtraction, CalculationResult, CalculationService, ClaimError};

use crate::config::{CalculatorConfig, OutputFormat};
use crate::error::CliError;

/// Reads and validates one extraction file
///
/// # Errors
///
/// Returns `CliError::Io` if the file cannot be read and
/// `CliError::Extraction` if its content is malformed or invalid
pub fn read_extraction<T>(
    path: &Path,
    parse: impl FnOnce(&str) -> Result<T, ClaimError>,
) -> Result<T, CliError> {
    let raw = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&raw).map_err(|source| CliError::Extraction {
        path: path.to_path_buf(),
        source,
    })
}

/// Runs one calculation from the configured input files
pub fn calculate(config: &CalculatorConfig) -> Result<CalculationResult, CliError> {
    let (bill_path, bond_path) = config.input_paths()?;
    let service = CalculationService::new(config.calculation_settings()?);

    let bill = read_extraction(&bill_path, BillExtraction::from_json)?;
    let bond = read_extraction(&bond_path, BondExtraction::from_json)?;
    tracing::debug!(
        bill = %bill_path.display(),
        bond = %bond_path.display(),
        line_items = bill.line_items.len(),
        coverage_limits = bond.coverage_limits.len(),
        "Extractions loaded"
    );

    Ok(service.calculate_claim(&bill, &bond))
}

/// Renders a result in the configured output format
pub fn render(result: &CalculationResult, output: OutputFormat) -> Result<String, CliError> {
    match output {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Table => Ok(report::render_table(result)),
    }
}

/// Runs one calculation and renders it
pub fn run(config: &CalculatorConfig) -> Result<String, CliError> {
    let result = calculate(config)?;
    render(&result, config.output)
}
