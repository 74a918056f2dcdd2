//! Money arithmetic helpers.
//!
//! All monetary amounts are `rust_decimal::Decimal` in the currency's major
//! unit (dollars). The payment provider wants minor units (cents), so the
//! conversion lives here next to the rounding rules.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Unit price of a catalog line after applying the product's discount.
///
/// `discount_percent` outside 0..=100 is clamped rather than rejected: the
/// column carries a CHECK constraint, so out-of-range values only appear in
/// hand-built test data. Result is rounded to cents, away from zero on the
/// midpoint.
#[must_use]
pub fn discounted_unit_price(price: Decimal, discount_percent: i32) -> Decimal {
    let percent = discount_percent.clamp(0, 100);
    let multiplier = Decimal::from(100 - percent) / Decimal::ONE_HUNDRED;
    (price * multiplier).round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a major-unit amount into minor units (cents) for the payment
/// provider. Returns `None` when the amount does not fit an `i64` or carries
/// sub-cent precision that rounding cannot hide.
#[must_use]
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    (amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_no_discount_is_identity() {
        assert_eq!(discounted_unit_price(dec("19.99"), 0), dec("19.99"));
    }

    #[test]
    fn test_percentage_discount() {
        assert_eq!(discounted_unit_price(dec("20.00"), 25), dec("15.00"));
        assert_eq!(discounted_unit_price(dec("9.99"), 10), dec("8.99"));
    }

    #[test]
    fn test_full_discount() {
        assert_eq!(discounted_unit_price(dec("42.00"), 100), dec("0.00"));
    }

    #[test]
    fn test_discount_clamped() {
        assert_eq!(discounted_unit_price(dec("10.00"), -5), dec("10.00"));
        assert_eq!(discounted_unit_price(dec("10.00"), 150), dec("0.00"));
    }

    #[test]
    fn test_to_minor_units() {
        assert_eq!(to_minor_units(dec("25.00")), Some(2500));
        assert_eq!(to_minor_units(dec("0.01")), Some(1));
        assert_eq!(to_minor_units(dec("19.995")), Some(2000));
    }
}
