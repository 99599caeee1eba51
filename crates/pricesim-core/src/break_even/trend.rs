use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::analysis::{analyze, BreakEvenOutput, DEFAULT_FIXED_COST};
use super::period::{period_input, FixedCostRecord, SalesRecord, YearMonth};
use crate::types::{with_metadata, ComputationOutput};
use crate::PriceSimResult;

/// Trailing months shown in a report when the caller does not choose.
pub const DEFAULT_TREND_MONTHS: u32 = 3;

/// Revenue against break-even revenue for one trailing month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub period: YearMonth,
    pub revenue: i64,
    pub break_even_revenue: i64,
}

/// Full report for one period: the analysis plus its trailing trend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodReport {
    pub period: YearMonth,
    #[serde(flatten)]
    pub analysis: BreakEvenOutput,
    pub trend: Vec<TrendPoint>,
}

/// Break-even trend over the trailing `months` ending at `through`,
/// oldest first.
pub fn trend(
    fixed_costs: &[FixedCostRecord],
    sales: &[SalesRecord],
    through: YearMonth,
    months: u32,
) -> PriceSimResult<Vec<TrendPoint>> {
    let mut periods = Vec::with_capacity(months as usize);
    let mut current = through;
    for _ in 0..months {
        periods.push(current);
        current = current.pred();
    }
    periods.reverse();

    let mut points = Vec::with_capacity(periods.len());
    for period in periods {
        let input = period_input(fixed_costs, sales, period);
        let analysis = analyze(&input)?;
        points.push(TrendPoint {
            period,
            revenue: analysis.result.revenue,
            break_even_revenue: analysis.result.break_even_revenue,
        });
    }

    Ok(points)
}

/// Resolve a period's inputs from collaborator records, analyze it, and
/// attach the trailing trend.
pub fn period_report(
    fixed_costs: &[FixedCostRecord],
    sales: &[SalesRecord],
    period: YearMonth,
    trend_months: u32,
) -> PriceSimResult<ComputationOutput<PeriodReport>> {
    let start = Instant::now();

    let input = period_input(fixed_costs, sales, period);
    let ComputationOutput {
        result, warnings, ..
    } = analyze(&input)?;
    let trend_points = trend(fixed_costs, sales, period, trend_months)?;

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "default_fixed_cost": DEFAULT_FIXED_COST.to_string(),
        "trend_months": trend_months,
    });

    Ok(with_metadata(
        "Cost-volume-profit break-even report with trailing trend",
        &assumptions,
        warnings,
        elapsed,
        PeriodReport {
            period,
            analysis: result,
            trend: trend_points,
        },
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
