use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::rounding::{round_currency, round_rate};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::{PriceSimError, PriceSimResult};

/// Monthly fixed cost assumed when no period record exists.
pub const DEFAULT_FIXED_COST: Money = dec!(4_000_000);

/// Cost-structure placeholders applied when a period has no revenue.
pub const DEFAULT_VARIABLE_COST_RATE: Rate = dec!(0.75);
pub const DEFAULT_GROSS_MARGIN_RATE: Rate = dec!(0.25);

/// Achievement-rate thresholds for the risk status, checked in descending
/// order.
pub const SAFE_ACHIEVEMENT_THRESHOLD: Rate = dec!(1.5);
pub const WARNING_ACHIEVEMENT_THRESHOLD: Rate = dec!(1.0);

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakEvenInput {
    pub fixed_cost: Money,
    pub revenue: Money,
    pub variable_cost: Money,
}

/// How far the period sits from its break-even point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskStatus {
    Safe,
    Warning,
    Danger,
}

impl std::fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Safe => "safe",
            Self::Warning => "warning",
            Self::Danger => "danger",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakEvenOutput {
    pub fixed_cost: i64,
    pub revenue: i64,
    pub variable_cost_rate: Rate,
    pub gross_margin_rate: Rate,
    /// 0 when the gross margin rate is not positive.
    pub break_even_revenue: i64,
    /// 0 when break-even revenue is 0.
    pub achievement_rate: Rate,
    pub delta_revenue: i64,
    pub status: RiskStatus,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Break-even analysis for a single period.
pub fn analyze(input: &BreakEvenInput) -> PriceSimResult<ComputationOutput<BreakEvenOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let (variable_cost_rate, gross_margin_rate) = if input.revenue > Decimal::ZERO {
        (
            round_rate(input.variable_cost / input.revenue),
            round_rate((input.revenue - input.variable_cost) / input.revenue),
        )
    } else {
        warnings.push(
            "No revenue recorded for the period; falling back to the default cost structure."
                .into(),
        );
        (
            round_rate(DEFAULT_VARIABLE_COST_RATE),
            round_rate(DEFAULT_GROSS_MARGIN_RATE),
        )
    };

    let break_even_revenue = if gross_margin_rate > Decimal::ZERO {
        round_currency(input.fixed_cost / gross_margin_rate)
    } else {
        warnings.push("Gross margin rate is not positive; break-even revenue is unreachable.".into());
        0
    };

    let achievement_rate = if break_even_revenue > 0 {
        round_rate(input.revenue / Decimal::from(break_even_revenue))
    } else {
        round_rate(Decimal::ZERO)
    };

    let delta_revenue = round_currency(input.revenue - Decimal::from(break_even_revenue));
    let status = classify_achievement(achievement_rate);

    let output = BreakEvenOutput {
        fixed_cost: round_currency(input.fixed_cost),
        revenue: round_currency(input.revenue),
        variable_cost_rate,
        gross_margin_rate,
        break_even_revenue,
        achievement_rate,
        delta_revenue,
        status,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "safe_threshold": SAFE_ACHIEVEMENT_THRESHOLD.to_string(),
        "warning_threshold": WARNING_ACHIEVEMENT_THRESHOLD.to_string(),
        "zero_revenue_fallback": {
            "variable_cost_rate": DEFAULT_VARIABLE_COST_RATE.to_string(),
            "gross_margin_rate": DEFAULT_GROSS_MARGIN_RATE.to_string(),
        },
    });

    Ok(with_metadata(
        "Cost-volume-profit break-even analysis",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

/// Map an achievement rate to a risk status, descending threshold order.
pub fn classify_achievement(achievement_rate: Rate) -> RiskStatus {
    if achievement_rate >= SAFE_ACHIEVEMENT_THRESHOLD {
        RiskStatus::Safe
    } else if achievement_rate >= WARNING_ACHIEVEMENT_THRESHOLD {
        RiskStatus::Warning
    } else {
        RiskStatus::Danger
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &BreakEvenInput) -> PriceSimResult<()> {
    if input.fixed_cost < Decimal::ZERO {
        return Err(PriceSimError::InvalidInput {
            field: "fixed_cost".into(),
            reason: "Fixed cost cannot be negative.".into(),
        });
    }
    if input.revenue < Decimal::ZERO {
        return Err(PriceSimError::InvalidInput {
            field: "revenue".into(),
            reason: "Revenue cannot be negative.".into(),
        });
    }
    if input.variable_cost < Decimal::ZERO {
        return Err(PriceSimError::InvalidInput {
            field: "variable_cost".into(),
            reason: "Variable cost cannot be negative.".into(),
        });
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

    #[test]
    fn test_quarter_margin_period() {
        let input = BreakEvenInput {
            fixed_cost: dec!(4_000_000),
            revenue: dec!(25_000_000),
            variable_cost: dec!(18_750_000),
        };
        let result = analyze(&input).unwrap();
        let out = &result.result;

        assert_eq!(out.variable_cost_rate, dec!(0.7500));
        assert_eq!(out.gross_margin_rate, dec!(0.2500));
        // 4M / 0.25 = 16M
        assert_eq!(out.break_even_revenue, 16_000_000);
        // 25M / 16M = 1.5625
        assert_eq!(out.achievement_rate, dec!(1.5625));
        assert_eq!(out.delta_revenue, 9_000_000);
        assert_eq!(out.status, RiskStatus::Safe);
    }

    #[test]
    fn test_thin_margin_period() {
        let input = BreakEvenInput {
            fixed_cost: dec!(4_000_000),
            revenue: dec!(25_000_000),
            variable_cost: dec!(18_850_000),
        };
        let result = analyze(&input).unwrap();
        let out = &result.result;

        assert_eq!(out.variable_cost_rate, dec!(0.7540));
        assert_eq!(out.gross_margin_rate, dec!(0.2460));
        // 4M / 0.246 = 16260162.6 => 16260163
        assert_eq!(out.break_even_revenue, 16_260_163);
        // 25M / 16260163 = 1.53749... => 1.5375
        assert_eq!(out.achievement_rate, dec!(1.5375));
        assert_eq!(out.delta_revenue, 8_739_837);
        assert_eq!(out.status, RiskStatus::Safe);
    }

    #[test]
    fn test_zero_revenue_falls_back_to_default_rates() {
        let input = BreakEvenInput {
            fixed_cost: dec!(4_000_000),
            revenue: Decimal::ZERO,
            variable_cost: dec!(9_999_999),
        };
        let result = analyze(&input).unwrap();
        let out = &result.result;

        // Fallbacks apply no matter what the variable cost says.
        assert_eq!(out.variable_cost_rate, dec!(0.7500));
        assert_eq!(out.gross_margin_rate, dec!(0.2500));
        assert_eq!(out.break_even_revenue, 16_000_000);
        assert_eq!(out.achievement_rate, dec!(0.0000));
        assert_eq!(out.delta_revenue, -16_000_000);
        assert_eq!(out.status, RiskStatus::Danger);
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn test_negative_margin_has_no_break_even_point() {
        let input = BreakEvenInput {
            fixed_cost: dec!(4_000_000),
            revenue: dec!(10_000_000),
            variable_cost: dec!(12_000_000),
        };
        let result = analyze(&input).unwrap();
        let out = &result.result;

        assert_eq!(out.variable_cost_rate, dec!(1.2000));
        assert_eq!(out.gross_margin_rate, dec!(-0.2000));
        assert_eq!(out.break_even_revenue, 0);
        assert_eq!(out.achievement_rate, dec!(0.0000));
        assert_eq!(out.delta_revenue, 10_000_000);
        assert_eq!(out.status, RiskStatus::Danger);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("unreachable")));
    }

    #[test]
    fn test_achievement_exactly_at_safe_threshold() {
        let input = BreakEvenInput {
            fixed_cost: dec!(4_000_000),
            revenue: dec!(24_000_000),
            variable_cost: dec!(18_000_000),
        };
        let result = analyze(&input).unwrap();
        // 24M / 16M = 1.5 exactly
        assert_eq!(result.result.achievement_rate, dec!(1.5000));
        assert_eq!(result.result.status, RiskStatus::Safe);
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(classify_achievement(dec!(1.5)), RiskStatus::Safe);
        assert_eq!(classify_achievement(dec!(1.4999)), RiskStatus::Warning);
        assert_eq!(classify_achievement(dec!(1.0)), RiskStatus::Warning);
        assert_eq!(classify_achievement(dec!(0.9999)), RiskStatus::Danger);
        assert_eq!(classify_achievement(Decimal::ZERO), RiskStatus::Danger);
    }

    #[test]
    fn test_negative_fixed_cost_rejected() {
        let input = BreakEvenInput {
            fixed_cost: dec!(-1),
            revenue: dec!(1_000_000),
            variable_cost: dec!(500_000),
        };
        let err = analyze(&input).unwrap_err();
        match err {
            PriceSimError::InvalidInput { field, .. } => assert_eq!(field, "fixed_cost"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_revenue_rejected() {
        let input = BreakEvenInput {
            fixed_cost: dec!(4_000_000),
            revenue: dec!(-100),
            variable_cost: Decimal::ZERO,
        };
        assert!(matches!(
            analyze(&input).unwrap_err(),
            PriceSimError::InvalidInput { .. }
        ));
    }
}
