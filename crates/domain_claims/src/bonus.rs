//! Sum insured bonus resolution
//!
//! Grows the base sum insured by the no-claim bonus and the loyalty bonus.
//! Both bonuses are percentages of the base sum insured, never of each other.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Money, Rate};
use crate::extraction::BonusStructure;

/// Effective sum insured and the bonuses that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SumInsuredBreakdown {
    pub base_sum_insured: Money,
    /// Whether the no-claim bonus was allowed to apply
    pub is_ncb_applied: bool,
    pub ncb_percentage: Decimal,
    pub ncb_bonus_applied: Money,
    pub loyalty_percentage: Decimal,
    pub loyalty_bonus_applied: Money,
    pub effective_sum_insured: Money,
}

/// Computes the bonus amount for a bonus structure, or zero when absent
fn bonus_share(base: &Money, bonus: Option<&BonusStructure>) -> (Decimal, Money) {
    match bonus.and_then(|b| b.current_percentage) {
        Some(percentage) => (percentage, Rate::from_percentage(percentage).apply(base)),
        None => (Decimal::ZERO, Money::zero()),
    }
}

/// Resolves the effective sum insured
///
/// # Arguments
///
/// * `base_sum_insured` - Sum insured printed on the policy bond
/// * `ncb_bonus` - No-claim bonus structure, if the bond has one
/// * `loyalty_bonus` - Loyalty bonus structure, if the bond has one
/// * `apply_ncb` - Gate for the no-claim bonus; loyalty is always applied
///
/// Missing bonuses or percentages contribute nothing. All published amounts
/// are rounded to the currency's decimal places; the effective sum insured
/// is rounded from the unrounded total.
pub fn resolve_sum_insured(
    base_sum_insured: Money,
    ncb_bonus: Option<&BonusStructure>,
    loyalty_bonus: Option<&BonusStructure>,
    apply_ncb: bool,
) -> SumInsuredBreakdown {
    let (ncb_percentage, ncb_applied) = if apply_ncb {
        bonus_share(&base_sum_insured, ncb_bonus)
    } else {
        (Decimal::ZERO, Money::zero())
    };
    let (loyalty_percentage, loyalty_applied) = bonus_share(&base_sum_insured, loyalty_bonus);

    let effective = base_sum_insured + ncb_applied + loyalty_applied;

    tracing::debug!(
        base = %base_sum_insured,
        ncb = %ncb_applied,
        loyalty = %loyalty_applied,
        effective = %effective,
        "Resolved effective sum insured"
    );

    SumInsuredBreakdown {
        base_sum_insured,
        is_ncb_applied: apply_ncb,
        ncb_percentage,
        ncb_bonus_applied: ncb_applied.round_to_currency(),
        loyalty_percentage,
        loyalty_bonus_applied: loyalty_applied.round_to_currency(),
        effective_sum_insured: effective.round_to_currency(),
    }
}
