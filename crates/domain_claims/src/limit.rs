//! Coverage limit resolution
//!
//! Policy bonds express limits in several shapes. Resolution turns each of
//! them into an absolute ceiling so it can be compared with a bill amount.

use rust_decimal::Decimal;

use core_kernel::{Money, Rate};
use crate::extraction::{CoverageLimit, LimitType};

/// Converts a raw limit into an absolute amount
///
/// # Arguments
///
/// * `limit_value` - Raw limit number from the bond
/// * `limit_type` - How `limit_value` is expressed
/// * `per_day_max` - Daily cap for `PerDay` limits, preferred over `limit_value`
/// * `days` - Days billed; missing or non-positive counts as one day
/// * `effective_sum_insured` - Sum insured after bonuses
///
/// # Returns
///
/// `None` when the value or the type is missing, meaning the bond has no
/// usable limit for the item.
pub fn resolve_limit(
    limit_value: Option<Decimal>,
    limit_type: Option<LimitType>,
    per_day_max: Option<Money>,
    days: Option<i64>,
    effective_sum_insured: Money,
) -> Option<Money> {
    let (value, limit_type) = (limit_value?, limit_type?);

    let resolved = match limit_type {
        LimitType::Percentage => Rate::from_percentage(value).apply(&effective_sum_insured),
        LimitType::PerDay => {
            let daily = per_day_max.unwrap_or(Money::new(value));
            let days = days.filter(|d| *d > 0).unwrap_or(1);
            daily * Decimal::from(days)
        }
        LimitType::SumInsured => effective_sum_insured,
        LimitType::Absolute => Money::new(value),
    };
    Some(resolved)
}

/// Resolves the limit of a coverage entry for a bill item billed over `days`
pub fn resolve_coverage_limit(
    coverage: &CoverageLimit,
    days: Option<i64>,
    effective_sum_insured: Money,
) -> Option<Money> {
    resolve_limit(
        coverage.limit_value,
        coverage.limit_type,
        coverage.per_day_max,
        days,
        effective_sum_insured,
    )
}
