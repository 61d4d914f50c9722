//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! claim adjudication test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built bills and bonds for the reference scenarios
//! - `builders`: Builder patterns for bill and bond construction
//! - `assertions`: Custom assertion helpers for money and results
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
