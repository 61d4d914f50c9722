//! Claim calculation service
//!
//! Runs the full adjudication pipeline for one claim:
//!
//! ```text
//! bond -> bonus resolution -> effective sum insured
//! bond -> coverage index
//! bill items -> limit resolution + item adjudication -> matched items
//! item splits -> aggregate totals capped at sum insured
//! bill -> extraction check -> reconciliation of the totals
//! ```
//!
//! The service is a pure computation over its arguments. It keeps no state
//! between calls, so one instance can serve any number of claims
//! concurrently.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::Money;
use crate::adjudication::{AdjudicatedItem, ItemAdjudicator, MatchedItem};
use crate::aggregate::ClaimTotals;
use crate::bonus::{resolve_sum_insured, SumInsuredBreakdown};
use crate::extraction::{BillExtraction, BondExtraction};
use crate::lookup::CoverageIndex;
use crate::reconciliation::{ExtractionCheck, ExtractionStatus, ReconciliationPolicy};

/// Decimal places of the published discrepancy percentage
const DISCREPANCY_PCT_DECIMAL_PLACES: u32 = 1;
/// Decimal places of the published scale factor
const SCALE_FACTOR_DECIMAL_PLACES: u32 = 4;

/// Tunable parts of the calculation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculationSettings {
    /// Whether the no-claim bonus grows the sum insured
    pub apply_ncb_bonus: bool,
    pub reconciliation: ReconciliationPolicy,
}

impl Default for CalculationSettings {
    fn default() -> Self {
        Self {
            apply_ncb_bonus: true,
            reconciliation: ReconciliationPolicy::default(),
        }
    }
}

/// Result of one claim calculation
///
/// Item-level figures are the adjudicated splits. The claim-level insurer
/// and patient totals additionally reflect the sum insured cap and the
/// reconciliation correction, so they need not equal the sum of the items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub sum_insured: SumInsuredBreakdown,

    pub total_bill_amount: Money,
    pub total_discount: Money,
    pub net_bill_amount: Money,

    pub matched_items: Vec<MatchedItem>,

    pub total_eligible: Money,
    pub total_excess: Money,
    pub total_copay: Money,
    pub general_copay_percentage: Decimal,
    pub insurer_pays: Money,
    pub patient_pays: Money,
    /// Insurer liability above the effective sum insured moved to the patient
    pub sum_insured_overflow: Money,

    pub extraction_status: ExtractionStatus,
    pub sum_of_extracted_items: Money,
    /// Extracted items less net bill; negative when items are missing
    pub extraction_discrepancy: Money,
    pub extraction_discrepancy_pct: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_factor: Option<Decimal>,
    pub warning: String,
}

impl CalculationResult {
    /// Effective sum insured the claim was capped at
    pub fn effective_sum_insured(&self) -> Money {
        self.sum_insured.effective_sum_insured
    }
}

/// Service computing insurer and patient shares of a hospital bill
#[derive(Debug, Clone, Default)]
pub struct CalculationService {
    settings: CalculationSettings,
}

impl CalculationService {
    /// Creates a service with the given settings
    pub fn new(settings: CalculationSettings) -> Self {
        Self { settings }
    }

    /// Returns the active settings
    pub fn settings(&self) -> &CalculationSettings {
        &self.settings
    }

    /// Calculates the claim for one bill against one policy bond
    ///
    /// # Arguments
    ///
    /// * `bill` - Extracted hospital bill
    /// * `bond` - Extracted policy bond with coverage limits and exclusions
    ///
    /// # Returns
    ///
    /// The full breakdown. The calculation is total over validated inputs;
    /// gaps in coverage or extraction are reported in the result, not as
    /// errors.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let service = CalculationService::default();
    /// let result = service.calculate_claim(&bill, &bond);
    /// println!("insurer pays {}", result.insurer_pays);
    /// ```
    pub fn calculate_claim(&self, bill: &BillExtraction, bond: &BondExtraction) -> CalculationResult {
        let sum_insured = resolve_sum_insured(
            bond.sum_insured,
            bond.ncb_bonus.as_ref(),
            bond.loyalty_bonus.as_ref(),
            self.settings.apply_ncb_bonus,
        );
        let effective_sum_insured = sum_insured.effective_sum_insured;
        let general_copay_percentage = bond.general_copay_percentage;

        let index = CoverageIndex::build(bond);
        let adjudicator = ItemAdjudicator::new(&index, effective_sum_insured, general_copay_percentage);
        let adjudicated: Vec<AdjudicatedItem> = bill
            .line_items
            .iter()
            .map(|item| adjudicator.adjudicate(item))
            .collect();

        let totals = ClaimTotals::aggregate(adjudicated.iter().map(|a| &a.split), effective_sum_insured);

        let check = ExtractionCheck::measure(bill);
        let reconciliation = self
            .settings
            .reconciliation
            .reconcile(&check, totals.insurer_pays, totals.patient_pays);

        let result = CalculationResult {
            sum_insured,
            total_bill_amount: bill.total_amount.round_to_currency(),
            total_discount: bill.discount.round_to_currency(),
            net_bill_amount: check.net_bill.round_to_currency(),
            matched_items: adjudicated.into_iter().map(|a| a.matched).collect(),
            total_eligible: totals.total_eligible.round_to_currency(),
            total_excess: totals.total_excess.round_to_currency(),
            total_copay: totals.total_copay.round_to_currency(),
            general_copay_percentage,
            insurer_pays: reconciliation.insurer_pays.round_to_currency(),
            patient_pays: reconciliation.patient_pays.round_to_currency(),
            sum_insured_overflow: totals.sum_insured_overflow.round_to_currency(),
            extraction_status: reconciliation.status,
            sum_of_extracted_items: check.sum_of_items.round_to_currency(),
            extraction_discrepancy: check.discrepancy.round_to_currency(),
            extraction_discrepancy_pct: check.discrepancy_pct.round_dp(DISCREPANCY_PCT_DECIMAL_PLACES),
            scale_factor: reconciliation
                .scale_factor
                .map(|f| f.round_dp(SCALE_FACTOR_DECIMAL_PLACES)),
            warning: reconciliation.warning,
        };

        tracing::info!(
            items = result.matched_items.len(),
            effective_sum_insured = %result.effective_sum_insured(),
            insurer_pays = %result.insurer_pays,
            patient_pays = %result.patient_pays,
            extraction_status = result.extraction_status.as_str(),
            "Claim calculated"
        );

        result
    }
}

/// Calculates a claim with default settings
pub fn calculate_claim(bill: &BillExtraction, bond: &BondExtraction) -> CalculationResult {
    CalculationService::default().calculate_claim(bill, bond)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjudication::CoverageStatus;
    use crate::extraction::{BillLineItem, BonusStructure, BonusType, CoverageLimit, Exclusion, LimitType};
    use rust_decimal_macros::dec;

    fn line(name: &str, amount: Decimal) -> BillLineItem {
        BillLineItem {
            item_name: name.to_string(),
            amount: Money::new(amount),
            ..Default::default()
        }
    }

    fn sample_bond() -> BondExtraction {
        BondExtraction {
            sum_insured: Money::new(dec!(100000)),
            general_copay_percentage: dec!(10),
            ncb_bonus: Some(BonusStructure::with_percentage(BonusType::Ncb, dec!(20))),
            loyalty_bonus: Some(BonusStructure::with_percentage(BonusType::Loyalty, dec!(10))),
            coverage_limits: vec![
                CoverageLimit {
                    bill_item: "Room Rent".to_string(),
                    coverage_name: Some("Room charges".to_string()),
                    limit_value: Some(dec!(1)),
                    limit_type: Some(LimitType::Percentage),
                    ..Default::default()
                },
                CoverageLimit {
                    bill_item: "Surgery".to_string(),
                    coverage_name: Some("Surgical procedures".to_string()),
                    limit_value: Some(dec!(0)),
                    limit_type: Some(LimitType::SumInsured),
                    ..Default::default()
                },
            ],
            exclusions: vec![Exclusion {
                bill_item: "Attendant Charges".to_string(),
                exclusion_reason: Some("Non-medical".to_string()),
                ..Default::default()
            }],
        }
    }

    #[test]
    fn test_full_pipeline() {
        let bill = BillExtraction {
            total_amount: Money::new(dec!(62000)),
            discount: Money::new(dec!(2000)),
            line_items: vec![
                line("Room Rent", dec!(5000)),
                line("Surgery", dec!(50000)),
                line("Attendant Charges", dec!(3000)),
                line("Pharmacy", dec!(2000)),
            ],
        };

        let result = calculate_claim(&bill, &sample_bond());

        assert_eq!(result.effective_sum_insured().amount(), dec!(130000));
        assert_eq!(result.net_bill_amount.amount(), dec!(60000));

        let statuses: Vec<_> = result.matched_items.iter().map(|m| m.coverage_status).collect();
        assert_eq!(
            statuses,
            vec![
                CoverageStatus::Covered,
                CoverageStatus::Covered,
                CoverageStatus::Excluded,
                CoverageStatus::NotMentioned,
            ]
        );

        // Room rent limited to 1% of 130000
        assert_eq!(result.matched_items[0].eligible_amount.amount(), dec!(1300));
        assert_eq!(result.total_eligible.amount(), dec!(51300));
        assert_eq!(result.total_copay.amount(), dec!(5130));
        assert_eq!(result.insurer_pays.amount(), dec!(46170));
        assert_eq!(result.patient_pays.amount(), dec!(13830));
        assert_eq!(result.extraction_status, ExtractionStatus::Accurate);
        assert!(result.scale_factor.is_none());
    }

    #[test]
    fn test_ncb_gate_from_settings() {
        let service = CalculationService::new(CalculationSettings {
            apply_ncb_bonus: false,
            ..Default::default()
        });
        let bill = BillExtraction::default();

        let result = service.calculate_claim(&bill, &sample_bond());

        assert_eq!(result.effective_sum_insured().amount(), dec!(110000));
        assert!(!result.sum_insured.is_ncb_applied);
    }

    #[test]
    fn test_empty_bill_is_accurate_and_zero() {
        let result = calculate_claim(&BillExtraction::default(), &BondExtraction::default());

        assert!(result.matched_items.is_empty());
        assert!(result.insurer_pays.is_zero());
        assert!(result.patient_pays.is_zero());
        assert_eq!(result.extraction_status, ExtractionStatus::Accurate);
        assert_eq!(result.extraction_discrepancy_pct, dec!(0));
    }

    #[test]
    fn test_result_serializes_statuses() {
        let bill = BillExtraction {
            total_amount: Money::new(dec!(100)),
            line_items: vec![line("Pharmacy", dec!(100))],
            ..Default::default()
        };
        let result = calculate_claim(&bill, &sample_bond());
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["extraction_status"], "accurate");
        assert_eq!(json["matched_items"][0]["coverage_status"], "not_mentioned");
        assert!(json.get("scale_factor").is_none());
    }
}
