//! # Amount Utilities
//!
//! Aggregation runs on exact [`Decimal`] values; return documents carry
//! whole rupees. [`to_rupees`] is the single rounding point between the
//! two, so every "sum of" field can be recomputed from already-rounded
//! constituents with [`sum_rupees`].

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Round a decimal amount to whole rupees, half away from zero.
///
/// Values beyond the `i64` range saturate; that can only happen with
/// corrupt input, so the anomaly is logged rather than propagated.
pub fn to_rupees(amount: Decimal) -> i64 {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    rounded.to_i64().unwrap_or_else(|| {
        tracing::warn!(
            amount = %amount,
            "amount exceeds i64 rupee range, saturating"
        );
        if amount.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        }
    })
}

/// Saturating sum of whole-rupee amounts.
pub fn sum_rupees<I>(amounts: I) -> i64
where
    I: IntoIterator<Item = i64>,
{
    amounts.into_iter().fold(0i64, i64::saturating_add)
}

/// Positive part of an amount (`max(amount, 0)`).
pub fn positive(amount: i64) -> i64 {
    amount.max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(to_rupees(dec!(10.5)), 11);
        assert_eq!(to_rupees(dec!(10.49)), 10);
        assert_eq!(to_rupees(dec!(-10.5)), -11);
        assert_eq!(to_rupees(dec!(0)), 0);
    }

    #[test]
    fn saturates_beyond_i64() {
        let huge = Decimal::from(i64::MAX) * dec!(10);
        assert_eq!(to_rupees(huge), i64::MAX);
        assert_eq!(to_rupees(-huge), i64::MIN);
    }

    #[test]
    fn sum_saturates() {
        assert_eq!(sum_rupees([1, 2, 3]), 6);
        assert_eq!(sum_rupees([i64::MAX, 1]), i64::MAX);
        assert_eq!(sum_rupees(Vec::<i64>::new()), 0);
    }

    #[test]
    fn positive_clamps_losses() {
        assert_eq!(positive(-5), 0);
        assert_eq!(positive(5), 5);
    }

    proptest::proptest! {
        #[test]
        fn rounding_moves_at_most_half_a_rupee(paise in -1_000_000_000_000i64..1_000_000_000_000) {
            let amount = Decimal::new(paise, 2);
            let rupees = to_rupees(amount);
            proptest::prop_assert!((Decimal::from(rupees) - amount).abs() <= dec!(0.5));
            proptest::prop_assert_eq!(to_rupees(Decimal::from(rupees)), rupees);
        }
    }
}
