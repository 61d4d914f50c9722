//! Claims Adjudication Domain
//!
//! This crate computes how a hospital bill is split between insurer and
//! patient under a policy bond's coverage limits.
//!
//! # Pipeline
//!
//! ```text
//! BondExtraction -> bonus resolution -> effective sum insured
//!                -> coverage index
//! BillExtraction -> per item: limit resolution -> adjudication
//!                -> aggregate totals (capped at sum insured)
//!                -> extraction reconciliation -> CalculationResult
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_claims::{BillExtraction, BondExtraction, CalculationService};
//!
//! let bill = BillExtraction::from_json(&bill_json)?;
//! let bond = BondExtraction::from_json(&bond_json)?;
//! let result = CalculationService::default().calculate_claim(&bill, &bond);
//! ```

pub mod extraction;
pub mod bonus;
pub mod lookup;
pub mod limit;
pub mod adjudication;
pub mod aggregate;
pub mod reconciliation;
pub mod calculation;
pub mod error;

pub use extraction::{
    BillExtraction, BillLineItem, BondExtraction, BonusStructure, BonusType, CoverageLimit,
    Exclusion, LimitType,
};
pub use bonus::{resolve_sum_insured, SumInsuredBreakdown};
pub use lookup::{CoverageIndex, ItemLookup};
pub use limit::resolve_limit;
pub use adjudication::{CoverageStatus, ItemAdjudicator, ItemSplit, MatchedItem};
pub use aggregate::ClaimTotals;
pub use reconciliation::{
    CorrectiveAction, DiscrepancyDirection, ExtractionCheck, ExtractionStatus, ReconciliationPolicy,
    ReconciliationRule,
};
pub use calculation::{calculate_claim, CalculationResult, CalculationService, CalculationSettings};
pub use error::ClaimError;
