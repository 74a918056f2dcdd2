//! Promo code lookup and application.
//!
//! A fixed in-code table. Applying a code never mutates the cart; the
//! discount only enters the math at total-computation time.

use rust_decimal::Decimal;

use juniper_core::wire::PromoDiscount;

/// The active promo codes.
const PROMO_CODES: &[(&str, PromoDiscount)] = &[
    ("WELCOME10", PromoDiscount::Percentage(10)),
    ("JUNIPER15", PromoDiscount::Percentage(15)),
    ("TAKE5", PromoDiscount::Fixed(Decimal::from_parts(500, 0, 0, false, 2))),
];

/// Look up a promo code, case-insensitively. Unknown codes are a negative
/// result, not an error.
#[must_use]
pub fn lookup(code: &str) -> Option<PromoDiscount> {
    let normalized = code.trim().to_uppercase();
    PROMO_CODES
        .iter()
        .find(|(c, _)| *c == normalized)
        .map(|(_, d)| *d)
}

/// Apply a discount to a goods total. Floored at zero and rounded to cents.
#[must_use]
pub fn apply(discount: PromoDiscount, subtotal: Decimal) -> Decimal {
    let discounted = match discount {
        PromoDiscount::Percentage(percent) => {
            let percent = Decimal::from(percent.min(100));
            subtotal * (Decimal::ONE_HUNDRED - percent) / Decimal::ONE_HUNDRED
        }
        PromoDiscount::Fixed(amount) => subtotal - amount,
    };

    discounted
        .max(Decimal::ZERO)
        .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_lookup_known_code() {
        assert_eq!(lookup("WELCOME10"), Some(PromoDiscount::Percentage(10)));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(lookup("welcome10"), Some(PromoDiscount::Percentage(10)));
        assert_eq!(lookup("  take5 "), Some(PromoDiscount::Fixed(dec("5.00"))));
    }

    #[test]
    fn test_lookup_unknown_code() {
        assert_eq!(lookup("NOTACODE"), None);
        assert_eq!(lookup(""), None);
    }

    #[test]
    fn test_apply_percentage() {
        assert_eq!(apply(PromoDiscount::Percentage(10), dec("25.00")), dec("22.50"));
    }

    #[test]
    fn test_apply_fixed() {
        assert_eq!(apply(PromoDiscount::Fixed(dec("5.00")), dec("25.00")), dec("20.00"));
    }

    #[test]
    fn test_apply_fixed_floors_at_zero() {
        assert_eq!(apply(PromoDiscount::Fixed(dec("30.00")), dec("25.00")), dec("0.00"));
    }
}
