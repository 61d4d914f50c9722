//! Pre-built Test Fixtures
//!
//! Ready-to-use bills and bonds for the reference claim scenarios. The
//! figures are chosen so expected results can be checked by hand.

use domain_claims::{BillExtraction, BondExtraction, LimitType};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use crate::builders::{BillBuilder, BondBuilder};

/// Fixture for policy bonds
pub struct BondFixtures;

impl BondFixtures {
    /// Base 100000 with 20% NCB and 10% loyalty, effective 130000
    pub fn with_bonuses() -> BondExtraction {
        BondBuilder::new()
            .sum_insured(dec!(100000))
            .ncb(dec!(20))
            .loyalty(dec!(10))
            .build()
    }

    /// Typical hospitalisation bond with room, ICU, surgery and pharmacy
    /// cover, a 10% general copay, and two exclusions
    pub fn hospitalisation() -> BondExtraction {
        BondBuilder::new()
            .sum_insured(dec!(100000))
            .general_copay(dec!(10))
            .cover("Room Rent", LimitType::Percentage, dec!(1))
            .cover_per_day("ICU Charges", dec!(2000))
            .cover("Surgery", LimitType::SumInsured, dec!(100))
            .cover("Pharmacy", LimitType::Absolute, dec!(5000))
            .exclude("Toiletries", "Non-medical consumables are not payable")
            .exclude("Attendant Charges", "Attendant charges are excluded")
            .build()
    }

    /// Small sum insured that a single surgery exceeds
    pub fn low_sum_insured() -> BondExtraction {
        BondBuilder::new()
            .sum_insured(dec!(50000))
            .cover("Surgery", LimitType::SumInsured, dec!(100))
            .cover("Implants", LimitType::SumInsured, dec!(100))
            .build()
    }

    /// Raw extractor output for the hospitalisation bond, with nulls where
    /// the extractor found nothing
    pub fn hospitalisation_json() -> Value {
        json!({
            "sum_insured": 100000,
            "general_copay_percentage": 10,
            "ncb_bonus": { "bonus_type": "ncb", "current_percentage": 20 },
            "loyalty_bonus": null,
            "coverage_limits": [
                {
                    "bill_item": "Room Rent",
                    "matched_category": "Room charges",
                    "coverage_name": "Room, boarding and nursing",
                    "policy_line": "Room rent up to 1% of sum insured per day",
                    "page_number": 3,
                    "limit_value": 1,
                    "limit_type": "percentage",
                    "per_day_max": null
                },
                {
                    "bill_item": "ICU Charges",
                    "coverage_name": "Intensive care",
                    "limit_value": 2000,
                    "limit_type": "Per Day",
                    "per_day_max": 2000
                }
            ],
            "exclusions": [
                {
                    "bill_item": "Toiletries",
                    "exclusion_reason": "Non-medical consumables",
                    "exclusion_category": "Consumables",
                    "policy_line": "Annexure I, item 14",
                    "page_number": 21
                }
            ]
        })
    }
}

/// Fixture for hospital bills
pub struct BillFixtures;

impl BillFixtures {
    /// Bill matching the hospitalisation bond, total equals the items
    pub fn hospitalisation() -> BillExtraction {
        BillBuilder::new()
            .item("Room Rent", dec!(6000))
            .per_day_item("ICU Charges", dec!(2500), 5)
            .item("Surgery", dec!(40000))
            .item_with_copay("Pharmacy", dec!(3000), dec!(25))
            .item("Toiletries", dec!(500))
            .item("Diet Charges", dec!(1500))
            .build()
    }

    /// Items sum to 10050 against a net bill of 10000 (0.5% over)
    pub fn accurate() -> BillExtraction {
        BillBuilder::new()
            .item("Room Rent", dec!(6050))
            .item("Pharmacy", dec!(4000))
            .total(dec!(10000))
            .build()
    }

    /// Items sum to 12000 against a net bill of 10000 (20% over)
    pub fn over_extracted() -> BillExtraction {
        BillBuilder::new()
            .item("Surgery", dec!(9000))
            .item("Pharmacy", dec!(3000))
            .total(dec!(10000))
            .build()
    }

    /// Items sum to 8000 against a net bill of 10000 (20% under)
    pub fn under_extracted() -> BillExtraction {
        BillBuilder::new()
            .item("Surgery", dec!(6000))
            .item("Pharmacy", dec!(2000))
            .total(dec!(10000))
            .build()
    }

    /// Raw extractor output with null and missing fields
    pub fn hospitalisation_json() -> Value {
        json!({
            "total_amount": 12000,
            "discount": null,
            "line_items": [
                { "item_name": "Room Rent", "amount": 3000, "per_day_rate": 1000, "days": 3 },
                { "item_name": "ICU Charges", "amount": 7500, "per_day_rate": 2500, "days": 3 },
                { "item_name": "Toiletries", "amount": 400 },
                { "item_name": "Registration", "amount": 1100, "item_specific_copay": null }
            ]
        })
    }
}
