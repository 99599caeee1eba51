use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional digits carried by every externally exposed rate.
pub const RATE_DECIMAL_PLACES: u32 = 4;

/// Round a monetary value to a whole currency unit.
///
/// Half-up with ties away from zero: 2.5 rounds to 3, -2.5 rounds to -3.
/// Saturates at the i64 bounds; engine inputs are range-capped far below.
pub fn round_currency(value: Decimal) -> i64 {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    rounded.to_i64().unwrap_or_else(|| {
        if rounded.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        }
    })
}

/// Round a rate to four fractional digits, half-up with ties away from zero.
///
/// The result always carries scale 4, so 0.25 comes back as 0.2500.
pub fn round_rate(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(RATE_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(RATE_DECIMAL_PLACES);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_rounds_half_up() {
        assert_eq!(round_currency(dec!(2.5)), 3);
        assert_eq!(round_currency(dec!(2.4)), 2);
        assert_eq!(round_currency(dec!(1052.631578)), 1053);
        assert_eq!(round_currency(dec!(1333.333333)), 1333);
    }

    #[test]
    fn test_currency_negative_ties_round_away_from_zero() {
        assert_eq!(round_currency(dec!(-2.5)), -3);
        assert_eq!(round_currency(dec!(-2.4)), -2);
        assert_eq!(round_currency(dec!(-0.5)), -1);
    }

    #[test]
    fn test_currency_whole_values_unchanged() {
        assert_eq!(round_currency(dec!(0)), 0);
        assert_eq!(round_currency(dec!(1250)), 1250);
        assert_eq!(round_currency(dec!(-4000000)), -4000000);
    }

    #[test]
    fn test_rate_rounds_to_four_places() {
        assert_eq!(round_rate(dec!(0.123450)), dec!(0.1235));
        assert_eq!(round_rate(dec!(0.123449)), dec!(0.1234));
        assert_eq!(round_rate(dec!(0.249812)), dec!(0.2498));
    }

    #[test]
    fn test_rate_always_carries_scale_four() {
        assert_eq!(round_rate(dec!(0.25)).scale(), 4);
        assert_eq!(round_rate(dec!(0.25)).to_string(), "0.2500");
        assert_eq!(round_rate(dec!(1)).to_string(), "1.0000");
    }

    #[test]
    fn test_rate_negative_ties() {
        assert_eq!(round_rate(dec!(-0.00005)), dec!(-0.0001));
    }
}
