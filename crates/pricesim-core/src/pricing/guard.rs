use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::recommendation::price_at_margin;
use crate::rounding::round_currency;
use crate::types::{Money, Rate};

/// Minimum acceptable margin backing the price floor.
pub const MIN_MARGIN_RATE: Rate = dec!(0.05);

/// Advisory attached when the recommended price breaks the floor.
pub const BELOW_MINIMUM_MESSAGE: &str = "Recommended price is below the minimum acceptable price";

/// Advisory attached when the floor holds.
pub const MEETS_MINIMUM_MESSAGE: &str = "Recommended price meets the minimum acceptable price";

/// Outcome of the minimum-price floor check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardInfo {
    pub minimum_price_per_unit: i64,
    pub is_below_min: bool,
    pub message: String,
}

/// Check a rounded recommended price against the floor price at the
/// minimum acceptable margin.
pub fn check_minimum_price(unit_cost: Money, recommended_price_per_unit: i64) -> GuardInfo {
    let minimum_price_per_unit = round_currency(price_at_margin(unit_cost, MIN_MARGIN_RATE));
    let is_below_min = recommended_price_per_unit < minimum_price_per_unit;
    let message = if is_below_min {
        BELOW_MINIMUM_MESSAGE
    } else {
        MEETS_MINIMUM_MESSAGE
    };

    GuardInfo {
        minimum_price_per_unit,
        is_below_min,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_floor_price_at_five_percent_margin() {
        // 1000 / 0.95 = 1052.63... => 1053
        let guard = check_minimum_price(dec!(1000), 1100);
        assert_eq!(guard.minimum_price_per_unit, 1053);
        assert!(!guard.is_below_min);
        assert_eq!(guard.message, MEETS_MINIMUM_MESSAGE);
    }

    #[test]
    fn test_price_below_floor_is_flagged() {
        let guard = check_minimum_price(dec!(1000), 1031);
        assert_eq!(guard.minimum_price_per_unit, 1053);
        assert!(guard.is_below_min);
        assert_eq!(guard.message, BELOW_MINIMUM_MESSAGE);
    }

    #[test]
    fn test_price_exactly_at_floor_passes() {
        let guard = check_minimum_price(dec!(1000), 1053);
        assert!(!guard.is_below_min);
    }
}
