//! Unit tests for the Money module
//!
//! Tests cover creation, arithmetic, rounding, ratios, rates and
//! serialization of the single-currency money type.

use core_kernel::{Money, MoneyError, Rate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_keeps_amount_unrounded() {
        let m = Money::new(dec!(100.123456789));
        assert_eq!(m.amount(), dec!(100.123456789));
    }

    #[test]
    fn test_zero_and_default_agree() {
        assert!(Money::zero().is_zero());
        assert_eq!(Money::default(), Money::zero());
    }

    #[test]
    fn test_from_decimal() {
        let m: Money = dec!(42.50).into();
        assert_eq!(m.amount(), dec!(42.50));
    }
}

mod predicates {
    use super::*;

    #[test]
    fn test_is_positive_false_for_zero() {
        assert!(!Money::zero().is_positive());
    }

    #[test]
    fn test_is_negative_true_for_negative_amount() {
        assert!(Money::new(dec!(-0.01)).is_negative());
    }

    #[test]
    fn test_negative_zero_is_not_negative() {
        let m = -Money::zero();
        assert!(!m.is_negative());
        assert!(m.is_zero());
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_add_assign_and_sub_assign() {
        let mut m = Money::new(dec!(100));
        m += Money::new(dec!(25.50));
        m -= Money::new(dec!(5.50));
        assert_eq!(m.amount(), dec!(120.00));
    }

    #[test]
    fn test_sub_can_go_negative() {
        let m = Money::new(dec!(50)) - Money::new(dec!(80));
        assert_eq!(m.amount(), dec!(-30));
    }

    #[test]
    fn test_multiply_operator() {
        let m = Money::new(dec!(10000)) * dec!(0.02);
        assert_eq!(m.amount(), dec!(200));
    }

    #[test]
    fn test_checked_multiply_overflow() {
        let result = Money::new(Decimal::MAX).checked_multiply(dec!(2));
        assert_eq!(result, Err(MoneyError::Overflow));
    }

    #[test]
    fn test_sum_of_owned_and_borrowed() {
        let parts = vec![Money::new(dec!(1.10)), Money::new(dec!(2.20)), Money::new(dec!(3.30))];
        let borrowed: Money = parts.iter().sum();
        let owned: Money = parts.into_iter().sum();
        assert_eq!(borrowed, owned);
        assert_eq!(owned.amount(), dec!(6.60));
    }

    #[test]
    fn test_non_negative_clamps() {
        assert_eq!(Money::new(dec!(-5)).non_negative(), Money::zero());
        assert_eq!(Money::new(dec!(5)).non_negative().amount(), dec!(5));
    }

    #[test]
    fn test_ordering() {
        let small = Money::new(dec!(1000));
        let large = Money::new(dec!(2000));
        assert_eq!(small.min(large), small);
        assert_eq!(small.max(large), large);
    }
}

mod ratios {
    use super::*;

    #[test]
    fn test_ratio_to() {
        let ratio = Money::new(dec!(10000)).ratio_to(&Money::new(dec!(12000))).unwrap();
        assert_eq!(ratio.round_dp(4), dec!(0.8333));
    }

    #[test]
    fn test_ratio_to_zero_errors() {
        assert_eq!(
            Money::new(dec!(1)).ratio_to(&Money::zero()),
            Err(MoneyError::DivisionByZero)
        );
    }

    #[test]
    fn test_percentage_of() {
        let pct = Money::new(dec!(50)).percentage_of(&Money::new(dec!(10000))).unwrap();
        assert_eq!(pct, dec!(0.5));
    }
}

mod rounding {
    use super::*;

    #[test]
    fn test_round_to_currency_two_places() {
        assert_eq!(Money::new(dec!(123.4567)).round_to_currency().amount(), dec!(123.46));
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(Money::new(dec!(0.125)).round_to_currency().amount(), dec!(0.12));
        assert_eq!(Money::new(dec!(0.135)).round_to_currency().amount(), dec!(0.14));
    }

    #[test]
    fn test_round_dp_one_place() {
        assert_eq!(Money::new(dec!(20.04)).round_dp(1).amount(), dec!(20.0));
    }
}

mod rate {
    use super::*;

    #[test]
    fn test_rate_from_percentage() {
        let rate = Rate::from_percentage(dec!(10));
        assert_eq!(rate.as_decimal(), dec!(0.1));
        assert_eq!(rate.as_percentage(), dec!(10));
    }

    #[test]
    fn test_rate_ordering_picks_higher() {
        let item = Rate::from_percentage(dec!(10));
        let general = Rate::from_percentage(dec!(20));
        assert_eq!(item.max(general), general);
    }

    #[test]
    fn test_rate_display() {
        assert_eq!(Rate::from_percentage(dec!(12.5)).to_string(), "12.5%");
    }
}

mod serialization {
    use super::*;

    #[test]
    fn test_money_serializes_transparently() {
        let json = serde_json::to_string(&Money::new(dec!(100.50))).unwrap();
        assert_eq!(json, "\"100.50\"");
    }

    #[test]
    fn test_money_deserializes_from_number() {
        let m: Money = serde_json::from_str("2500.75").unwrap();
        assert_eq!(m.amount(), dec!(2500.75));
    }
}
