//! CLI error handling

use std::path::PathBuf;

use domain_claims::ClaimError;
use thiserror::Error;

/// Errors raised while preparing or running a calculation from the command line
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Missing input: {0}")]
    MissingInput(&'static str),

    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    Extraction {
        path: PathBuf,
        #[source]
        source: ClaimError,
    },

    #[error(transparent)]
    Claim(#[from] ClaimError),

    #[error("Cannot encode result: {0}")]
    Encode(#[from] serde_json::Error),
}
