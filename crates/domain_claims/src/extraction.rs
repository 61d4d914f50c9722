//! Typed records for extracted bill and policy bond data
//!
//! Document extraction hands over loosely shaped JSON. These records are the
//! boundary where that data becomes typed: missing or `null` amounts are
//! normalized to zero, missing collections become empty, and `validate`
//! rejects values the adjudication engine must never see. Once a record has
//! been built and validated, the engine treats it as immutable input.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};

use core_kernel::Money;
use crate::error::ClaimError;

/// Deserializes a missing or `null` field as the type's default value
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Extracted data from a hospital bill
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillExtraction {
    /// Total printed on the bill, before discount
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_amount: Money,
    /// Discount printed on the bill
    #[serde(default, deserialize_with = "null_as_default")]
    pub discount: Money,
    /// Line items in bill order
    #[serde(default, deserialize_with = "null_as_default")]
    pub line_items: Vec<BillLineItem>,
}

/// Single line item from a hospital bill
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillLineItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub item_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: Money,
    /// Daily rate for room rent, ICU and similar charges
    #[serde(default)]
    pub per_day_rate: Option<Money>,
    /// Number of days billed
    #[serde(default)]
    pub days: Option<i64>,
    /// Copay percentage that applies to this item only
    #[serde(default)]
    pub item_specific_copay: Option<Decimal>,
}

/// Kind of sum insured bonus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BonusType {
    /// No-claim bonus
    #[serde(alias = "NCB", alias = "Ncb")]
    Ncb,
    /// Tenure-based loyalty bonus
    #[serde(alias = "LOYALTY", alias = "Loyalty")]
    Loyalty,
}

/// NCB or loyalty bonus structure from the policy bond
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusStructure {
    pub bonus_type: BonusType,
    /// Currently applicable percentage of the base sum insured
    #[serde(default)]
    pub current_percentage: Option<Decimal>,
    /// Yearly progression, e.g. `[20, 40, 60, 80, 100]`
    #[serde(default)]
    pub yearly_increase: Option<Vec<Decimal>>,
    /// Cap on the bonus percentage
    #[serde(default)]
    pub max_percentage: Option<Decimal>,
    /// Bonus expressed as a fixed amount instead of a percentage
    #[serde(default)]
    pub absolute_amount: Option<Money>,
}

impl BonusStructure {
    /// Creates a bonus with only a current percentage
    pub fn with_percentage(bonus_type: BonusType, current_percentage: Decimal) -> Self {
        Self {
            bonus_type,
            current_percentage: Some(current_percentage),
            yearly_increase: None,
            max_percentage: None,
            absolute_amount: None,
        }
    }
}

/// How a coverage limit is expressed in the policy bond
///
/// Any value that is not recognised reads as `Absolute`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum LimitType {
    /// A fixed currency amount
    Absolute,
    /// A percentage of the effective sum insured
    Percentage,
    /// A daily cap multiplied by the number of days billed
    PerDay,
    /// Covered up to the effective sum insured
    SumInsured,
}

impl From<String> for LimitType {
    fn from(raw: String) -> Self {
        let normalized = raw.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "percentage" => LimitType::Percentage,
            "per_day" => LimitType::PerDay,
            "sum_insured" => LimitType::SumInsured,
            _ => LimitType::Absolute,
        }
    }
}

/// A bill item matched to a coverage clause of the policy bond
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageLimit {
    /// Bill item name this clause was matched to
    #[serde(default, deserialize_with = "null_as_default")]
    pub bill_item: String,
    #[serde(default)]
    pub matched_category: Option<String>,
    #[serde(default)]
    pub coverage_name: Option<String>,
    #[serde(default)]
    pub policy_line: Option<String>,
    #[serde(default)]
    pub page_number: Option<i64>,
    #[serde(default)]
    pub limit_value: Option<Decimal>,
    #[serde(default)]
    pub limit_type: Option<LimitType>,
    #[serde(default)]
    pub per_day_max: Option<Money>,
}

/// A bill item matched to an exclusion clause of the policy bond
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Exclusion {
    #[serde(default, deserialize_with = "null_as_default")]
    pub bill_item: String,
    #[serde(default)]
    pub exclusion_reason: Option<String>,
    #[serde(default)]
    pub exclusion_category: Option<String>,
    #[serde(default)]
    pub policy_line: Option<String>,
    #[serde(default)]
    pub page_number: Option<i64>,
}

/// Extracted data from a policy bond
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BondExtraction {
    #[serde(default, deserialize_with = "null_as_default")]
    pub sum_insured: Money,
    #[serde(default, deserialize_with = "null_as_default")]
    pub general_copay_percentage: Decimal,
    #[serde(default)]
    pub ncb_bonus: Option<BonusStructure>,
    #[serde(default)]
    pub loyalty_bonus: Option<BonusStructure>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub coverage_limits: Vec<CoverageLimit>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub exclusions: Vec<Exclusion>,
}

/// Largest currency amount accepted from an extraction
///
/// With `MAX_PERCENTAGE` and `MAX_DAYS` this keeps every product and sum the
/// calculation forms well inside `Decimal` range.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);
/// Largest bonus or percentage limit accepted from an extraction
pub const MAX_PERCENTAGE: Decimal = dec!(1000);
/// Largest number of billed days accepted from an extraction
pub const MAX_DAYS: i64 = 3650;

const MAX_COPAY_PERCENTAGE: Decimal = Decimal::ONE_HUNDRED;

fn ensure_non_negative(field: &str, value: Decimal) -> Result<(), ClaimError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ClaimError::invalid_field(
            field,
            format!("value {} must not be negative", value),
        ));
    }
    Ok(())
}

fn ensure_in_range(field: &str, value: Decimal, max: Decimal) -> Result<(), ClaimError> {
    ensure_non_negative(field, value)?;
    if value > max {
        return Err(ClaimError::invalid_field(
            field,
            format!("value {} exceeds {}", value, max),
        ));
    }
    Ok(())
}

fn ensure_amount(field: &str, value: &Money) -> Result<(), ClaimError> {
    ensure_in_range(field, value.amount(), MAX_AMOUNT)
}

fn ensure_copay_percentage(field: &str, value: Decimal) -> Result<(), ClaimError> {
    ensure_non_negative(field, value)?;
    if value > MAX_COPAY_PERCENTAGE {
        return Err(ClaimError::invalid_field(
            field,
            format!("copay {}% exceeds {}%", value, MAX_COPAY_PERCENTAGE),
        ));
    }
    Ok(())
}

impl BillExtraction {
    /// Parses and validates a bill extraction from JSON
    pub fn from_json(json: &str) -> Result<Self, ClaimError> {
        let bill: BillExtraction = serde_json::from_str(json)?;
        bill.validate()?;
        Ok(bill)
    }

    /// Parses and validates a bill extraction from an already decoded JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self, ClaimError> {
        let bill: BillExtraction = serde_json::from_value(value)?;
        bill.validate()?;
        Ok(bill)
    }

    /// Net amount the patient was billed
    pub fn net_amount(&self) -> Money {
        self.total_amount - self.discount
    }

    /// Rejects values the engine is not defined for
    pub fn validate(&self) -> Result<(), ClaimError> {
        ensure_amount("total_amount", &self.total_amount)?;
        ensure_amount("discount", &self.discount)?;
        if self.discount > self.total_amount {
            return Err(ClaimError::invalid_field(
                "discount",
                format!(
                    "discount {} exceeds bill total {}",
                    self.discount, self.total_amount
                ),
            ));
        }

        for (index, item) in self.line_items.iter().enumerate() {
            let prefix = format!("line_items[{}]", index);
            ensure_amount(&format!("{}.amount", prefix), &item.amount)?;
            if let Some(rate) = &item.per_day_rate {
                ensure_amount(&format!("{}.per_day_rate", prefix), rate)?;
            }
            if let Some(days) = item.days.filter(|d| *d > MAX_DAYS) {
                return Err(ClaimError::invalid_field(
                    format!("{}.days", prefix),
                    format!("{} days exceeds {}", days, MAX_DAYS),
                ));
            }
            if let Some(copay) = item.item_specific_copay {
                ensure_copay_percentage(&format!("{}.item_specific_copay", prefix), copay)?;
            }
        }
        Ok(())
    }
}

impl BondExtraction {
    /// Parses and validates a bond extraction from JSON
    pub fn from_json(json: &str) -> Result<Self, ClaimError> {
        let bond: BondExtraction = serde_json::from_str(json)?;
        bond.validate()?;
        Ok(bond)
    }

    /// Parses and validates a bond extraction from an already decoded JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self, ClaimError> {
        let bond: BondExtraction = serde_json::from_value(value)?;
        bond.validate()?;
        Ok(bond)
    }

    /// Rejects values the engine is not defined for
    pub fn validate(&self) -> Result<(), ClaimError> {
        ensure_amount("sum_insured", &self.sum_insured)?;
        ensure_copay_percentage("general_copay_percentage", self.general_copay_percentage)?;

        for (field, bonus) in [("ncb_bonus", &self.ncb_bonus), ("loyalty_bonus", &self.loyalty_bonus)] {
            if let Some(pct) = bonus.as_ref().and_then(|b| b.current_percentage) {
                ensure_in_range(&format!("{}.current_percentage", field), pct, MAX_PERCENTAGE)?;
            }
        }

        for (index, limit) in self.coverage_limits.iter().enumerate() {
            if let Some(value) = limit.limit_value {
                let max = match limit.limit_type {
                    Some(LimitType::Percentage) => MAX_PERCENTAGE,
                    _ => MAX_AMOUNT,
                };
                ensure_in_range(&format!("coverage_limits[{}].limit_value", index), value, max)?;
            }
            if let Some(per_day_max) = &limit.per_day_max {
                ensure_amount(&format!("coverage_limits[{}].per_day_max", index), per_day_max)?;
            }
        }
        Ok(())
    }
}
