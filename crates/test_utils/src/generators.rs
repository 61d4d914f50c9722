//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating bills and bonds that pass
//! boundary validation.

use core_kernel::Money;
use domain_claims::{
    BillExtraction, BillLineItem, BondExtraction, BonusStructure, BonusType, CoverageLimit,
    Exclusion, LimitType,
};
use proptest::collection::vec;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Item names shared by bill and bond strategies so that lookups hit
pub const ITEM_NAMES: &[&str] = &[
    "Room Rent",
    "ICU Charges",
    "Surgery",
    "Pharmacy",
    "Consumables",
    "Diagnostics",
    "Doctor Fees",
    "Toiletries",
];

/// Strategy for non-negative amounts in minor units, up to ten million
pub fn amount_minor_strategy() -> impl Strategy<Value = i64> {
    0i64..1_000_000_000i64
}

/// Strategy for non-negative Money values with two decimal places
pub fn money_strategy() -> impl Strategy<Value = Money> {
    amount_minor_strategy().prop_map(|minor| Money::new(Decimal::new(minor, 2)))
}

/// Strategy for positive Money values
pub fn positive_money_strategy() -> impl Strategy<Value = Money> {
    (1i64..1_000_000_000i64).prop_map(|minor| Money::new(Decimal::new(minor, 2)))
}

/// Strategy for percentages between 0 and 100 with two decimal places
pub fn percentage_strategy() -> impl Strategy<Value = Decimal> {
    (0u32..=10_000u32).prop_map(|n| Decimal::new(n as i64, 2))
}

/// Strategy for bill item names, mixing known names with case variants
pub fn item_name_strategy() -> impl Strategy<Value = String> {
    (prop::sample::select(ITEM_NAMES), any::<bool>(), any::<bool>()).prop_map(
        |(name, upper, padded)| {
            let name = if upper { name.to_uppercase() } else { name.to_string() };
            if padded {
                format!("  {} ", name)
            } else {
                name
            }
        },
    )
}

/// Strategy for limit types
pub fn limit_type_strategy() -> impl Strategy<Value = LimitType> {
    prop_oneof![
        Just(LimitType::Absolute),
        Just(LimitType::Percentage),
        Just(LimitType::PerDay),
        Just(LimitType::SumInsured),
    ]
}

/// Strategy for bill line items
pub fn line_item_strategy() -> impl Strategy<Value = BillLineItem> {
    (
        item_name_strategy(),
        money_strategy(),
        prop::option::of(1i64..30i64),
        prop::option::of(percentage_strategy()),
    )
        .prop_map(|(item_name, amount, days, item_specific_copay)| BillLineItem {
            item_name,
            amount,
            per_day_rate: None,
            days,
            item_specific_copay,
        })
}

/// Strategy for whole bills, with a printed total that may or may not
/// match the items
pub fn bill_strategy() -> impl Strategy<Value = BillExtraction> {
    (vec(line_item_strategy(), 0..12), money_strategy(), any::<bool>()).prop_map(
        |(line_items, discount, exact)| {
            let items_total: Money = line_items.iter().map(|i| i.amount).sum();
            let total_amount = if exact {
                items_total + discount
            } else {
                // Within 30% either side of the items
                items_total.multiply(Decimal::new(7 + (line_items.len() as i64 % 7), 1)) + discount
            };
            BillExtraction {
                total_amount,
                discount,
                line_items,
            }
        },
    )
}

/// Strategy for coverage entries
pub fn coverage_limit_strategy() -> impl Strategy<Value = CoverageLimit> {
    (
        prop::sample::select(ITEM_NAMES),
        prop::option::of(percentage_strategy()),
        prop::option::of(limit_type_strategy()),
        prop::option::of(money_strategy()),
        any::<bool>(),
    )
        .prop_map(|(name, limit_value, limit_type, per_day_max, named)| CoverageLimit {
            bill_item: name.to_string(),
            matched_category: Some("Hospitalisation".to_string()),
            coverage_name: named.then(|| format!("{} cover", name)),
            policy_line: None,
            page_number: Some(1),
            limit_value,
            limit_type,
            per_day_max,
        })
}

/// Strategy for exclusion entries
pub fn exclusion_strategy() -> impl Strategy<Value = Exclusion> {
    prop::sample::select(ITEM_NAMES).prop_map(|name| Exclusion {
        bill_item: name.to_string(),
        exclusion_reason: Some("Not payable".to_string()),
        ..Default::default()
    })
}

/// Strategy for policy bonds
pub fn bond_strategy() -> impl Strategy<Value = BondExtraction> {
    (
        positive_money_strategy(),
        percentage_strategy(),
        prop::option::of(percentage_strategy()),
        prop::option::of(percentage_strategy()),
        vec(coverage_limit_strategy(), 0..8),
        vec(exclusion_strategy(), 0..3),
    )
        .prop_map(|(sum_insured, copay, ncb, loyalty, coverage_limits, exclusions)| {
            BondExtraction {
                sum_insured,
                general_copay_percentage: copay,
                ncb_bonus: ncb.map(|pct| BonusStructure::with_percentage(BonusType::Ncb, pct)),
                loyalty_bonus: loyalty
                    .map(|pct| BonusStructure::with_percentage(BonusType::Loyalty, pct)),
                coverage_limits,
                exclusions,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_bills_validate(bill in bill_strategy()) {
            prop_assert!(bill.validate().is_ok());
        }

        #[test]
        fn generated_bonds_validate(bond in bond_strategy()) {
            prop_assert!(bond.validate().is_ok());
        }
    }
}
