//! Claim Calculator Binary
//!
//! Computes the insurer and patient shares of a hospital bill under a policy
//! bond, from two extraction JSON files.
//!
//! # Usage
//!
//! ```bash
//! # JSON result on stdout
//! claim-calculator bill.json bond.json
//!
//! # Fixed-width table, NCB not applied
//! CLAIM_OUTPUT=table CLAIM_APPLY_NCB_BONUS=false claim-calculator bill.json bond.json
//! ```
//!
//! # Environment Variables
//!
//! * `CLAIM_BILL_PATH` - Bill extraction path when no argument is given
//! * `CLAIM_BOND_PATH` - Bond extraction path when no second argument is given
//! * `CLAIM_APPLY_NCB_BONUS` - Apply the no-claim bonus (default: true)
//! * `CLAIM_ACCURATE_THRESHOLD_PCT` - Accurate extraction band (default: 1)
//! * `CLAIM_MINOR_THRESHOLD_PCT` - Minor discrepancy band (default: 5)
//! * `CLAIM_OUTPUT` - `json` or `table` (default: json)
//! * `CLAIM_LOG_LEVEL` - Log filter when `RUST_LOG` is unset (default: info)

use anyhow::Context;
use interface_cli::config::CalculatorConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the calculator.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded or has invalid thresholds
/// - An input path is missing or unreadable
/// - An extraction is malformed or fails validation
fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = CalculatorConfig::load()
        .context("Failed to load calculator configuration")?
        .with_args(std::env::args().skip(1));

    init_tracing(&config.log_level);

    tracing::info!(
        bill = ?config.bill_path,
        bond = ?config.bond_path,
        output = ?config.output,
        "Starting claim calculation"
    );

    let output = interface_cli::run(&config).context("Claim calculation failed")?;
    println!("{}", output);

    Ok(())
}

/// Initializes the tracing subscriber, writing to stderr so stdout carries
/// only the result.
///
/// # Arguments
///
/// * `log_level` - Filter used when `RUST_LOG` is not set
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}
