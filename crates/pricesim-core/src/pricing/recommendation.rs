use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::guard::{check_minimum_price, GuardInfo, MIN_MARGIN_RATE};
use crate::rounding::{round_currency, round_rate};
use crate::types::{with_metadata, ComputationOutput, Money, Quantity, Rate};
use crate::{PriceSimError, PriceSimResult};

/// Preset margins quoted alongside every simulation, in display order.
pub const MARGIN_PRESETS: [Rate; 5] = [
    dec!(0.10),
    dec!(0.15),
    dec!(0.20),
    dec!(0.25),
    dec!(0.30),
];

/// Highest target margin the input contract accepts.
pub const MARGIN_RATE_MAX: Rate = dec!(0.90);

pub const UNIT_COST_MIN: Money = dec!(0.01);
pub const UNIT_COST_MAX: Money = dec!(999_999_999.999);
pub const QUANTITY_MAX: Quantity = dec!(999_999_999.999);

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSimulationInput {
    /// Display label only; the computation never reads it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub unit_cost_per_unit: Money,
    pub target_margin_rate: Rate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Quantity>,
}

/// Price and profit quoted at one of the preset margins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePattern {
    pub margin_rate: Rate,
    pub price_per_unit: i64,
    pub profit_per_unit: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSimulationOutput {
    pub recommended_price_per_unit: i64,
    pub gross_profit_per_unit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross_profit_total: Option<i64>,
    /// Realized margin at the rounded price, not the requested target.
    pub margin_rate: Rate,
    pub price_patterns: Vec<PricePattern>,
    pub guard: GuardInfo,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Recommend a sale price for one unit of product at a target margin.
///
/// The recommended price, the five preset patterns, and the minimum-price
/// floor all come from the same formula, parameterized only by the margin.
pub fn recommend(
    input: &PriceSimulationInput,
) -> PriceSimResult<ComputationOutput<PriceSimulationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let unit_cost = input.unit_cost_per_unit;

    let recommended_price = round_currency(price_at_margin(unit_cost, input.target_margin_rate));
    let rounded_price = Decimal::from(recommended_price);

    if rounded_price.is_zero() {
        // Sub-unit cost at a zero margin rounds down to a free product.
        return Err(PriceSimError::DivisionByZero {
            context: "gross profit / recommended price".to_string(),
        });
    }

    // Profit derives from the rounded price so the two stay consistent at
    // integer granularity.
    let gross_profit = round_currency(rounded_price - unit_cost);
    let profit = Decimal::from(gross_profit);

    let margin_rate = round_rate(profit / rounded_price);

    let gross_profit_total = match input.quantity {
        Some(quantity) if quantity > Decimal::ZERO => Some(round_currency(profit * quantity)),
        _ => None,
    };

    let price_patterns: Vec<PricePattern> = MARGIN_PRESETS
        .iter()
        .map(|&preset| {
            let price = round_currency(price_at_margin(unit_cost, preset));
            PricePattern {
                margin_rate: round_rate(preset),
                price_per_unit: price,
                profit_per_unit: round_currency(Decimal::from(price) - unit_cost),
            }
        })
        .collect();

    let guard = check_minimum_price(unit_cost, recommended_price);
    if guard.is_below_min {
        warnings.push(format!(
            "Recommended price {recommended_price} is below the minimum acceptable price {}.",
            guard.minimum_price_per_unit
        ));
    }

    let output = PriceSimulationOutput {
        recommended_price_per_unit: recommended_price,
        gross_profit_per_unit: gross_profit,
        gross_profit_total,
        margin_rate,
        price_patterns,
        guard,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "pricing_formula": "unit_cost / (1 - margin_rate)",
        "margin_presets": MARGIN_PRESETS.iter().map(|p| p.to_string()).collect::<Vec<_>>(),
        "minimum_margin_rate": MIN_MARGIN_RATE.to_string(),
        "currency_rounding": "half-up to whole units",
    });

    Ok(with_metadata(
        "Cost-plus price recommendation (margin on selling price)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

/// The single pricing formula: the margin is taken on the selling price.
///
/// Callers validate `margin_rate < 1` first; the divisor is zero otherwise.
pub(crate) fn price_at_margin(unit_cost: Money, margin_rate: Rate) -> Decimal {
    unit_cost / (Decimal::ONE - margin_rate)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &PriceSimulationInput) -> PriceSimResult<()> {
    if input.unit_cost_per_unit < UNIT_COST_MIN {
        return Err(PriceSimError::InvalidInput {
            field: "unit_cost_per_unit".into(),
            reason: format!("Unit cost must be at least {UNIT_COST_MIN}."),
        });
    }
    if input.unit_cost_per_unit > UNIT_COST_MAX {
        return Err(PriceSimError::InvalidInput {
            field: "unit_cost_per_unit".into(),
            reason: format!("Unit cost cannot exceed {UNIT_COST_MAX}."),
        });
    }
    if input.target_margin_rate < Decimal::ZERO
        || input.target_margin_rate >= Decimal::ONE
        || input.target_margin_rate > MARGIN_RATE_MAX
    {
        return Err(PriceSimError::InvalidMargin {
            rate: input.target_margin_rate,
        });
    }
    if let Some(quantity) = input.quantity {
        if quantity < Decimal::ZERO {
            return Err(PriceSimError::InvalidInput {
                field: "quantity".into(),
                reason: "Quantity cannot be negative.".into(),
            });
        }
        if quantity > QUANTITY_MAX {
            return Err(PriceSimError::InvalidInput {
                field: "quantity".into(),
                reason: format!("Quantity cannot exceed {QUANTITY_MAX}."),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_input() -> PriceSimulationInput {
        PriceSimulationInput {
            product_name: Some("Ribeye trim".into()),
            unit_cost_per_unit: dec!(1000),
            target_margin_rate: dec!(0.25),
            quantity: None,
        }
    }

    #[test]
    fn test_recommended_price_and_profit() {
        let result = recommend(&sample_input()).unwrap();
        let out = &result.result;

        // 1000 / 0.75 = 1333.33... => 1333, profit 333
        assert_eq!(out.recommended_price_per_unit, 1333);
        assert_eq!(out.gross_profit_per_unit, 333);
        assert_eq!(out.gross_profit_total, None);
    }

    #[test]
    fn test_realized_margin_drifts_from_target() {
        let result = recommend(&sample_input()).unwrap();
        // 333 / 1333 = 0.249812... => 0.2498, not the requested 0.25
        assert_eq!(result.result.margin_rate, dec!(0.2498));
    }

    #[test]
    fn test_total_profit_scales_with_quantity() {
        let mut input = sample_input();
        input.unit_cost_per_unit = dec!(500);
        input.target_margin_rate = dec!(0.20);
        input.quantity = Some(dec!(40));
        let result = recommend(&input).unwrap();

        // 500 / 0.8 = 625, profit 125, total 125 * 40 = 5000
        assert_eq!(result.result.recommended_price_per_unit, 625);
        assert_eq!(result.result.gross_profit_per_unit, 125);
        assert_eq!(result.result.gross_profit_total, Some(5000));
    }

    #[test]
    fn test_zero_quantity_omits_total_profit() {
        let mut input = sample_input();
        input.quantity = Some(Decimal::ZERO);
        let result = recommend(&input).unwrap();
        assert_eq!(result.result.gross_profit_total, None);
    }

    #[test]
    fn test_patterns_follow_preset_order() {
        let result = recommend(&sample_input()).unwrap();
        let patterns = &result.result.price_patterns;

        let margins: Vec<Rate> = patterns.iter().map(|p| p.margin_rate).collect();
        assert_eq!(
            margins,
            vec![
                dec!(0.1000),
                dec!(0.1500),
                dec!(0.2000),
                dec!(0.2500),
                dec!(0.3000)
            ]
        );

        // 1000/0.9=1111.1 => 1111, 1000/0.85=1176.5 => 1176, 1000/0.8=1250,
        // 1000/0.75=1333.3 => 1333, 1000/0.7=1428.6 => 1429
        let prices: Vec<i64> = patterns.iter().map(|p| p.price_per_unit).collect();
        assert_eq!(prices, vec![1111, 1176, 1250, 1333, 1429]);

        let profits: Vec<i64> = patterns.iter().map(|p| p.profit_per_unit).collect();
        assert_eq!(profits, vec![111, 176, 250, 333, 429]);
    }

    #[test]
    fn test_patterns_ignore_requested_margin() {
        let mut input = sample_input();
        input.target_margin_rate = dec!(0.03);
        let low = recommend(&input).unwrap();
        let base = recommend(&sample_input()).unwrap();
        assert_eq!(low.result.price_patterns, base.result.price_patterns);
    }

    #[test]
    fn test_low_margin_trips_the_guard() {
        let mut input = sample_input();
        input.target_margin_rate = dec!(0.03);
        let result = recommend(&input).unwrap();
        let out = &result.result;

        // 1000/0.97 = 1030.9 => 1031, below the 1053 floor
        assert_eq!(out.recommended_price_per_unit, 1031);
        assert_eq!(out.guard.minimum_price_per_unit, 1053);
        assert!(out.guard.is_below_min);
        assert!(result.warnings.iter().any(|w| w.contains("below")));
    }

    #[test]
    fn test_healthy_margin_passes_the_guard() {
        let result = recommend(&sample_input()).unwrap();
        assert!(!result.result.guard.is_below_min);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_margin_of_one_rejected() {
        let mut input = sample_input();
        input.target_margin_rate = Decimal::ONE;
        let err = recommend(&input).unwrap_err();
        match err {
            PriceSimError::InvalidMargin { rate } => assert_eq!(rate, Decimal::ONE),
            other => panic!("Expected InvalidMargin, got {other:?}"),
        }
    }

    #[test]
    fn test_margin_above_cap_rejected() {
        let mut input = sample_input();
        input.target_margin_rate = dec!(0.95);
        assert!(matches!(
            recommend(&input).unwrap_err(),
            PriceSimError::InvalidMargin { .. }
        ));
    }

    #[test]
    fn test_negative_margin_rejected() {
        let mut input = sample_input();
        input.target_margin_rate = dec!(-0.1);
        assert!(matches!(
            recommend(&input).unwrap_err(),
            PriceSimError::InvalidMargin { .. }
        ));
    }

    #[test]
    fn test_zero_unit_cost_rejected() {
        let mut input = sample_input();
        input.unit_cost_per_unit = Decimal::ZERO;
        let err = recommend(&input).unwrap_err();
        match err {
            PriceSimError::InvalidInput { field, .. } => assert_eq!(field, "unit_cost_per_unit"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let mut input = sample_input();
        input.quantity = Some(dec!(-1));
        assert!(matches!(
            recommend(&input).unwrap_err(),
            PriceSimError::InvalidInput { .. }
        ));
    }

    #[test]
    fn test_sub_unit_cost_at_zero_margin_fails_cleanly() {
        let input = PriceSimulationInput {
            product_name: None,
            unit_cost_per_unit: dec!(0.01),
            target_margin_rate: Decimal::ZERO,
            quantity: None,
        };
        assert!(matches!(
            recommend(&input).unwrap_err(),
            PriceSimError::DivisionByZero { .. }
        ));
    }

    #[test]
    fn test_metadata_populated() {
        let result = recommend(&sample_input()).unwrap();
        assert!(!result.methodology.is_empty());
        assert_eq!(result.metadata.precision, "rust_decimal_128bit");
    }
}
