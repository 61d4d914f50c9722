//! Per-item claim adjudication
//!
//! Each bill line item is classified as covered, excluded or not mentioned,
//! and its amount is split between insurer and patient. A covered item is
//! paid up to its resolved limit less copay; everything else is borne by the
//! patient in full.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Money, Rate};
use crate::extraction::{BillLineItem, LimitType};
use crate::limit::resolve_coverage_limit;
use crate::lookup::CoverageIndex;

/// Coverage classification of a bill item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageStatus {
    /// Matched to a named coverage with a resolvable limit
    Covered,
    /// Not covered, and the bond names an exclusion reason
    Excluded,
    /// Not covered and not excluded
    NotMentioned,
}

impl CoverageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoverageStatus::Covered => "covered",
            CoverageStatus::Excluded => "excluded",
            CoverageStatus::NotMentioned => "not_mentioned",
        }
    }
}

/// Unrounded payment split of one bill item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemSplit {
    pub eligible_amount: Money,
    pub excess_amount: Money,
    pub copay_percentage: Decimal,
    pub copay_amount: Money,
    pub insurer_pays: Money,
    pub patient_pays: Money,
}

impl ItemSplit {
    /// Splits a covered item against its resolved limit
    pub fn covered(bill_amount: Money, limit: Money, copay_percentage: Decimal) -> Self {
        let eligible_amount = bill_amount.min(limit);
        let excess_amount = (bill_amount - limit).non_negative();
        let copay_amount = Rate::from_percentage(copay_percentage).apply(&eligible_amount);

        Self {
            eligible_amount,
            excess_amount,
            copay_percentage,
            copay_amount,
            insurer_pays: eligible_amount - copay_amount,
            patient_pays: excess_amount + copay_amount,
        }
    }

    /// Patient pays the whole bill amount
    pub fn uncovered(bill_amount: Money) -> Self {
        Self {
            eligible_amount: Money::zero(),
            excess_amount: bill_amount,
            copay_percentage: Decimal::ZERO,
            copay_amount: Money::zero(),
            insurer_pays: Money::zero(),
            patient_pays: bill_amount,
        }
    }
}

/// Copay rate that applies to an item
///
/// An item-specific copay can raise the general rate but never lower it.
pub fn effective_copay_percentage(item_specific: Option<Decimal>, general: Decimal) -> Decimal {
    match item_specific {
        Some(item_pct) => item_pct.max(general),
        None => general,
    }
}

/// Adjudicated bill item as published in a calculation result
///
/// All amounts are rounded to the currency's decimal places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedItem {
    pub bill_item: String,
    pub bill_amount: Money,
    pub is_covered: bool,
    pub coverage_status: CoverageStatus,
    pub matched_category: Option<String>,
    pub matched_coverage: Option<String>,
    pub policy_line: Option<String>,
    pub page_number: Option<i64>,
    /// Resolved absolute limit
    pub policy_limit: Option<Money>,
    pub limit_type: Option<LimitType>,
    pub eligible_amount: Money,
    pub excess_amount: Money,
    pub copay_percentage: Decimal,
    pub copay_amount: Money,
    pub insurer_pays: Money,
    pub patient_pays: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusion_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusion_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusion_policy_line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusion_page_number: Option<i64>,
}

/// A published item together with the unrounded split used for aggregation
#[derive(Debug, Clone, PartialEq)]
pub struct AdjudicatedItem {
    pub matched: MatchedItem,
    pub split: ItemSplit,
}

/// Adjudicates bill items against one bond
pub struct ItemAdjudicator<'a> {
    index: &'a CoverageIndex<'a>,
    effective_sum_insured: Money,
    general_copay_percentage: Decimal,
}

impl<'a> ItemAdjudicator<'a> {
    /// Creates an adjudicator
    ///
    /// # Arguments
    ///
    /// * `index` - Coverage and exclusion index of the bond
    /// * `effective_sum_insured` - Sum insured after bonuses
    /// * `general_copay_percentage` - Copay that applies to every covered item
    pub fn new(
        index: &'a CoverageIndex<'a>,
        effective_sum_insured: Money,
        general_copay_percentage: Decimal,
    ) -> Self {
        Self {
            index,
            effective_sum_insured,
            general_copay_percentage,
        }
    }

    /// Classifies one bill item and splits its amount
    pub fn adjudicate(&self, item: &BillLineItem) -> AdjudicatedItem {
        let lookup = self.index.lookup(&item.item_name);
        let bill_amount = item.amount;

        let covered_limit = lookup
            .coverage
            .filter(|c| c.coverage_name.is_some())
            .and_then(|c| {
                resolve_coverage_limit(c, item.days, self.effective_sum_insured)
                    .map(|limit| (c, limit))
            });
        let exclusion = lookup.exclusion.filter(|e| e.exclusion_reason.is_some());

        let mut matched = MatchedItem {
            bill_item: item.item_name.clone(),
            bill_amount: bill_amount.round_to_currency(),
            is_covered: covered_limit.is_some(),
            coverage_status: CoverageStatus::NotMentioned,
            matched_category: None,
            matched_coverage: None,
            policy_line: None,
            page_number: None,
            policy_limit: None,
            limit_type: None,
            eligible_amount: Money::zero(),
            excess_amount: Money::zero(),
            copay_percentage: Decimal::ZERO,
            copay_amount: Money::zero(),
            insurer_pays: Money::zero(),
            patient_pays: Money::zero(),
            exclusion_reason: None,
            exclusion_category: None,
            exclusion_policy_line: None,
            exclusion_page_number: None,
        };

        let split = match (covered_limit, exclusion) {
            (Some((coverage, limit)), _) => {
                let copay_pct = effective_copay_percentage(
                    item.item_specific_copay,
                    self.general_copay_percentage,
                );
                matched.coverage_status = CoverageStatus::Covered;
                matched.matched_category = coverage.matched_category.clone();
                matched.matched_coverage = coverage.coverage_name.clone();
                matched.policy_line = coverage.policy_line.clone();
                matched.page_number = coverage.page_number;
                matched.policy_limit = Some(limit.round_to_currency());
                matched.limit_type = coverage.limit_type;
                ItemSplit::covered(bill_amount, limit, copay_pct)
            }
            (None, Some(exclusion)) => {
                matched.coverage_status = CoverageStatus::Excluded;
                matched.exclusion_reason = exclusion.exclusion_reason.clone();
                matched.exclusion_category = exclusion.exclusion_category.clone();
                matched.exclusion_policy_line = exclusion.policy_line.clone();
                matched.exclusion_page_number = exclusion.page_number;
                ItemSplit::uncovered(bill_amount)
            }
            (None, None) => ItemSplit::uncovered(bill_amount),
        };

        matched.eligible_amount = split.eligible_amount.round_to_currency();
        matched.excess_amount = split.excess_amount.round_to_currency();
        matched.copay_percentage = split.copay_percentage;
        matched.copay_amount = split.copay_amount.round_to_currency();
        matched.insurer_pays = split.insurer_pays.round_to_currency();
        matched.patient_pays = split.patient_pays.round_to_currency();

        tracing::debug!(
            item = %matched.bill_item,
            status = matched.coverage_status.as_str(),
            insurer_pays = %matched.insurer_pays,
            patient_pays = %matched.patient_pays,
            "Adjudicated bill item"
        );

        AdjudicatedItem { matched, split }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{BondExtraction, CoverageLimit, Exclusion};
    use rust_decimal_macros::dec;

    fn item(name: &str, amount: Decimal) -> BillLineItem {
        BillLineItem {
            item_name: name.to_string(),
            amount: Money::new(amount),
            ..Default::default()
        }
    }

    fn absolute_cover(name: &str, limit: Decimal) -> CoverageLimit {
        CoverageLimit {
            bill_item: name.to_string(),
            matched_category: Some("Hospitalisation".to_string()),
            coverage_name: Some(format!("{} cover", name)),
            policy_line: Some("Section 2.1".to_string()),
            page_number: Some(4),
            limit_value: Some(limit),
            limit_type: Some(LimitType::Absolute),
            per_day_max: None,
        }
    }

    fn bond() -> BondExtraction {
        BondExtraction {
            sum_insured: Money::new(dec!(100000)),
            general_copay_percentage: dec!(20),
            coverage_limits: vec![
                absolute_cover("Surgery", dec!(5000)),
                CoverageLimit {
                    coverage_name: None,
                    ..absolute_cover("Diet", dec!(500))
                },
            ],
            exclusions: vec![Exclusion {
                bill_item: "Toiletries".to_string(),
                exclusion_reason: Some("Non-medical expense".to_string()),
                exclusion_category: Some("Consumables".to_string()),
                policy_line: Some("Annexure I".to_string()),
                page_number: Some(12),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_copay_stacking_higher_rate_wins() {
        assert_eq!(effective_copay_percentage(Some(dec!(10)), dec!(20)), dec!(20));
        assert_eq!(effective_copay_percentage(Some(dec!(30)), dec!(20)), dec!(30));
        assert_eq!(effective_copay_percentage(None, dec!(20)), dec!(20));

        let split = ItemSplit::covered(Money::new(dec!(1000)), Money::new(dec!(5000)), dec!(20));
        assert_eq!(split.copay_amount.amount(), dec!(200));
    }

    #[test]
    fn test_covered_item_over_limit() {
        let bond = bond();
        let index = CoverageIndex::build(&bond);
        let adjudicator = ItemAdjudicator::new(&index, Money::new(dec!(100000)), dec!(20));

        let result = adjudicator.adjudicate(&item("surgery", dec!(8000)));
        let m = &result.matched;

        assert_eq!(m.coverage_status, CoverageStatus::Covered);
        assert!(m.is_covered);
        assert_eq!(m.policy_limit.map(|l| l.amount()), Some(dec!(5000)));
        assert_eq!(m.eligible_amount.amount(), dec!(5000));
        assert_eq!(m.excess_amount.amount(), dec!(3000));
        assert_eq!(m.copay_amount.amount(), dec!(1000));
        assert_eq!(m.insurer_pays.amount(), dec!(4000));
        assert_eq!(m.patient_pays.amount(), dec!(4000));
        assert_eq!(m.matched_category.as_deref(), Some("Hospitalisation"));
        assert_eq!(m.page_number, Some(4));
        assert!(m.exclusion_reason.is_none());
    }

    #[test]
    fn test_item_specific_copay_raises_rate() {
        let bond = bond();
        let index = CoverageIndex::build(&bond);
        let adjudicator = ItemAdjudicator::new(&index, Money::new(dec!(100000)), dec!(20));

        let mut surgery = item("Surgery", dec!(1000));
        surgery.item_specific_copay = Some(dec!(35));
        let result = adjudicator.adjudicate(&surgery);

        assert_eq!(result.matched.copay_percentage, dec!(35));
        assert_eq!(result.matched.copay_amount.amount(), dec!(350));
    }

    #[test]
    fn test_excluded_item() {
        let bond = bond();
        let index = CoverageIndex::build(&bond);
        let adjudicator = ItemAdjudicator::new(&index, Money::new(dec!(100000)), dec!(20));

        let result = adjudicator.adjudicate(&item("Toiletries", dec!(450.75)));
        let m = &result.matched;

        assert_eq!(m.coverage_status, CoverageStatus::Excluded);
        assert!(m.insurer_pays.is_zero());
        assert_eq!(m.patient_pays.amount(), dec!(450.75));
        assert_eq!(m.exclusion_reason.as_deref(), Some("Non-medical expense"));
        assert_eq!(m.exclusion_page_number, Some(12));
        assert!(m.matched_coverage.is_none());
    }

    #[test]
    fn test_coverage_without_name_is_not_mentioned() {
        let bond = bond();
        let index = CoverageIndex::build(&bond);
        let adjudicator = ItemAdjudicator::new(&index, Money::new(dec!(100000)), dec!(20));

        let result = adjudicator.adjudicate(&item("Diet", dec!(300)));

        assert_eq!(result.matched.coverage_status, CoverageStatus::NotMentioned);
        assert!(result.matched.policy_limit.is_none());
        assert_eq!(result.split, ItemSplit::uncovered(Money::new(dec!(300))));
    }

    #[test]
    fn test_published_amounts_rounded_split_unrounded() {
        let bond = bond();
        let index = CoverageIndex::build(&bond);
        let adjudicator = ItemAdjudicator::new(&index, Money::new(dec!(100000)), dec!(12.5));

        let result = adjudicator.adjudicate(&item("Surgery", dec!(100.03)));

        assert_eq!(result.split.copay_amount.amount(), dec!(12.50375));
        assert_eq!(result.matched.copay_amount.amount(), dec!(12.50));
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&CoverageStatus::NotMentioned).unwrap();
        assert_eq!(json, "\"not_mentioned\"");
    }
}
