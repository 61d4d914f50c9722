//! Test Data Builders
//!
//! Provides builder patterns for constructing bills and bonds with sensible
//! defaults. Tests specify only the fields that matter to them.

use core_kernel::Money;
use domain_claims::{
    BillExtraction, BillLineItem, BondExtraction, BonusStructure, BonusType, CoverageLimit,
    Exclusion, LimitType,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Builder for hospital bill extractions
///
/// Unless set explicitly, the bill total is the sum of the line items, so
/// the bill reconciles as accurate.
#[derive(Debug, Clone, Default)]
pub struct BillBuilder {
    total_amount: Option<Decimal>,
    discount: Decimal,
    line_items: Vec<BillLineItem>,
}

impl BillBuilder {
    /// Creates an empty bill builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plain line item
    pub fn item(mut self, name: &str, amount: Decimal) -> Self {
        self.line_items.push(BillLineItem {
            item_name: name.to_string(),
            amount: Money::new(amount),
            ..Default::default()
        });
        self
    }

    /// Adds a line item billed per day
    pub fn per_day_item(mut self, name: &str, rate: Decimal, days: i64) -> Self {
        self.line_items.push(BillLineItem {
            item_name: name.to_string(),
            amount: Money::new(rate * Decimal::from(days)),
            per_day_rate: Some(Money::new(rate)),
            days: Some(days),
            item_specific_copay: None,
        });
        self
    }

    /// Adds a line item with its own copay percentage
    pub fn item_with_copay(mut self, name: &str, amount: Decimal, copay: Decimal) -> Self {
        self.line_items.push(BillLineItem {
            item_name: name.to_string(),
            amount: Money::new(amount),
            item_specific_copay: Some(copay),
            ..Default::default()
        });
        self
    }

    /// Sets the printed bill total
    pub fn total(mut self, total: Decimal) -> Self {
        self.total_amount = Some(total);
        self
    }

    /// Sets the printed discount
    pub fn discount(mut self, discount: Decimal) -> Self {
        self.discount = discount;
        self
    }

    /// Builds the bill extraction
    pub fn build(self) -> BillExtraction {
        let items_total: Money = self.line_items.iter().map(|i| i.amount).sum();
        let total_amount = self
            .total_amount
            .map(Money::new)
            .unwrap_or(items_total + Money::new(self.discount));

        BillExtraction {
            total_amount,
            discount: Money::new(self.discount),
            line_items: self.line_items,
        }
    }
}

/// Builder for policy bond extractions
#[derive(Debug, Clone)]
pub struct BondBuilder {
    bond: BondExtraction,
}

impl Default for BondBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BondBuilder {
    /// Creates a bond with a sum insured of 100000 and no copay
    pub fn new() -> Self {
        Self {
            bond: BondExtraction {
                sum_insured: Money::new(dec!(100000)),
                ..Default::default()
            },
        }
    }

    /// Sets the base sum insured
    pub fn sum_insured(mut self, amount: Decimal) -> Self {
        self.bond.sum_insured = Money::new(amount);
        self
    }

    /// Sets the general copay percentage
    pub fn general_copay(mut self, percentage: Decimal) -> Self {
        self.bond.general_copay_percentage = percentage;
        self
    }

    /// Sets the no-claim bonus percentage
    pub fn ncb(mut self, percentage: Decimal) -> Self {
        self.bond.ncb_bonus = Some(BonusStructure::with_percentage(BonusType::Ncb, percentage));
        self
    }

    /// Sets the loyalty bonus percentage
    pub fn loyalty(mut self, percentage: Decimal) -> Self {
        self.bond.loyalty_bonus = Some(BonusStructure::with_percentage(BonusType::Loyalty, percentage));
        self
    }

    /// Adds a coverage entry with the given limit
    pub fn cover(mut self, bill_item: &str, limit_type: LimitType, limit_value: Decimal) -> Self {
        self.bond.coverage_limits.push(CoverageLimit {
            bill_item: bill_item.to_string(),
            matched_category: Some("Hospitalisation".to_string()),
            coverage_name: Some(format!("{} coverage", bill_item)),
            policy_line: Some(format!("Limit for {}", bill_item)),
            page_number: Some(3),
            limit_value: Some(limit_value),
            limit_type: Some(limit_type),
            per_day_max: None,
        });
        self
    }

    /// Adds a per-day coverage entry with an explicit daily maximum
    pub fn cover_per_day(mut self, bill_item: &str, per_day_max: Decimal) -> Self {
        self.bond.coverage_limits.push(CoverageLimit {
            bill_item: bill_item.to_string(),
            coverage_name: Some(format!("{} coverage", bill_item)),
            limit_value: Some(per_day_max),
            limit_type: Some(LimitType::PerDay),
            per_day_max: Some(Money::new(per_day_max)),
            ..Default::default()
        });
        self
    }

    /// Adds a raw coverage entry
    pub fn coverage_entry(mut self, entry: CoverageLimit) -> Self {
        self.bond.coverage_limits.push(entry);
        self
    }

    /// Adds an exclusion entry
    pub fn exclude(mut self, bill_item: &str, reason: &str) -> Self {
        self.bond.exclusions.push(Exclusion {
            bill_item: bill_item.to_string(),
            exclusion_reason: Some(reason.to_string()),
            exclusion_category: Some("General exclusions".to_string()),
            policy_line: Some(format!("{} is not payable", bill_item)),
            page_number: Some(9),
        });
        self
    }

    /// Builds the bond extraction
    pub fn build(self) -> BondExtraction {
        self.bond
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_builder_defaults_total_to_items() {
        let bill = BillBuilder::new()
            .item("Room Rent", dec!(4000))
            .per_day_item("ICU", dec!(3000), 2)
            .discount(dec!(500))
            .build();

        assert_eq!(bill.line_items.len(), 2);
        assert_eq!(bill.total_amount.amount(), dec!(10500));
        assert_eq!(bill.net_amount().amount(), dec!(10000));
    }

    #[test]
    fn test_bond_builder() {
        let bond = BondBuilder::new()
            .ncb(dec!(20))
            .cover("Room Rent", LimitType::Absolute, dec!(5000))
            .exclude("Toiletries", "Non-medical")
            .build();

        assert_eq!(bond.coverage_limits.len(), 1);
        assert_eq!(bond.exclusions.len(), 1);
        assert!(bond.ncb_bonus.is_some());
        assert!(bond.validate().is_ok());
    }
}
