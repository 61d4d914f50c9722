//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for claim results that give
//! more meaningful error messages than standard assertions.

use core_kernel::Money;
use domain_claims::{CalculationResult, CoverageStatus, MatchedItem};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Tolerance for comparing amounts that were rounded independently
pub const ROUNDING_TOLERANCE: Decimal = dec!(0.05);

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the amounts differ by more than tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual,
        expected,
        diff,
        tolerance
    );
}

/// Asserts that a Money value equals a decimal amount exactly
pub fn assert_money_eq(actual: &Money, expected: Decimal) {
    assert_eq!(
        actual.amount(),
        expected,
        "Expected {}, got {}",
        expected,
        actual
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(money.is_zero(), "Expected zero money, got {}", money);
}

/// Asserts that a Money value is not negative
pub fn assert_money_non_negative(money: &Money) {
    assert!(!money.is_negative(), "Expected non-negative money, got {}", money);
}

/// Asserts that an item's insurer and patient shares add up to its bill amount
pub fn assert_item_conserves_amount(item: &MatchedItem) {
    assert_money_approx_eq(
        &(item.insurer_pays + item.patient_pays),
        &item.bill_amount,
        ROUNDING_TOLERANCE,
    );
    assert_money_approx_eq(
        &(item.eligible_amount + item.excess_amount),
        &item.bill_amount,
        ROUNDING_TOLERANCE,
    );
}

/// Asserts that an excluded or unlisted item is charged wholly to the patient
pub fn assert_item_uncovered(item: &MatchedItem) {
    assert!(!item.is_covered, "Expected {} to be uncovered", item.bill_item);
    assert_ne!(item.coverage_status, CoverageStatus::Covered);
    assert_money_zero(&item.eligible_amount);
    assert_money_zero(&item.copay_amount);
    assert_money_zero(&item.insurer_pays);
    assert_eq!(item.excess_amount, item.bill_amount);
    assert_eq!(item.patient_pays, item.bill_amount);
}

/// Asserts that the insurer never pays more than the effective sum insured
pub fn assert_within_sum_insured(result: &CalculationResult) {
    let cap = result.effective_sum_insured();
    assert!(
        result.insurer_pays <= cap,
        "Insurer pays {} above effective sum insured {}",
        result.insurer_pays,
        cap
    );
}

/// Looks up a matched item by bill item name
///
/// # Panics
///
/// Panics if the result has no item with that name
pub fn find_item<'a>(result: &'a CalculationResult, bill_item: &str) -> &'a MatchedItem {
    result
        .matched_items
        .iter()
        .find(|item| item.bill_item == bill_item)
        .unwrap_or_else(|| panic!("No matched item named {}", bill_item))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq_within_tolerance() {
        assert_money_approx_eq(
            &Money::new(dec!(100.00)),
            &Money::new(dec!(100.01)),
            dec!(0.01),
        );
    }

    #[test]
    #[should_panic(expected = "differ by more than tolerance")]
    fn test_approx_eq_outside_tolerance() {
        assert_money_approx_eq(
            &Money::new(dec!(100.00)),
            &Money::new(dec!(100.10)),
            dec!(0.01),
        );
    }
}
