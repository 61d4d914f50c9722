//! Core Kernel - Foundational types for claim adjudication
//!
//! This crate provides the building blocks shared by the claims engine
//! and its callers:
//! - Money with precise decimal arithmetic in a single implicit currency
//! - Percentage rates applied to money amounts

pub mod money;

pub use money::{Money, MoneyError, Rate, CURRENCY_DECIMAL_PLACES};
