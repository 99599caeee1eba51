use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use pricesim_core::break_even::analysis::{self, BreakEvenInput, DEFAULT_FIXED_COST};
use pricesim_core::break_even::period::{FixedCostRecord, SalesRecord, YearMonth};
use pricesim_core::break_even::trend::{self, DEFAULT_TREND_MONTHS};

use crate::input;

/// Arguments for a single-period break-even analysis
#[derive(Args)]
pub struct BreakEvenArgs {
    /// Fixed cost for the period (defaults to the standard assumption)
    #[arg(long)]
    pub fixed_cost: Option<Decimal>,

    /// Aggregated revenue for the period
    #[arg(long)]
    pub revenue: Option<Decimal>,

    /// Aggregated variable cost for the period
    #[arg(long)]
    pub variable_cost: Option<Decimal>,

    /// Target period (YYYY-MM); defaults to the current month. Ledger mode only
    #[arg(long)]
    pub period: Option<String>,

    /// Path to a JSON sales ledger to aggregate, instead of passing totals
    #[arg(long)]
    pub sales: Option<String>,

    /// Path to a JSON list of per-period fixed costs
    #[arg(long)]
    pub fixed_costs: Option<String>,

    /// Months of trend history in the report (ledger mode)
    #[arg(long, default_value_t = DEFAULT_TREND_MONTHS)]
    pub trend_months: u32,

    /// Path to JSON input file with the three period aggregates
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_break_even(args: BreakEvenArgs) -> Result<Value, Box<dyn std::error::Error>> {
    // Ledger mode: resolve the period's aggregates from records and return
    // the full report with trend history.
    if let Some(ref sales_path) = args.sales {
        let sales: Vec<SalesRecord> = input::read_json(sales_path)?;
        let fixed_costs: Vec<FixedCostRecord> = match args.fixed_costs {
            Some(ref path) => input::read_json(path)?,
            None => Vec::new(),
        };
        let period = resolve_period(args.period.as_deref())?;

        let report = trend::period_report(&fixed_costs, &sales, period, args.trend_months)?;
        return Ok(serde_json::to_value(report)?);
    }

    let be_input: BreakEvenInput = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        BreakEvenInput {
            fixed_cost: args.fixed_cost.unwrap_or(DEFAULT_FIXED_COST),
            revenue: args
                .revenue
                .ok_or("--revenue is required (or provide --sales / --input)")?,
            variable_cost: args
                .variable_cost
                .ok_or("--variable-cost is required (or provide --sales / --input)")?,
        }
    };

    let result = analysis::analyze(&be_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for a standalone trend listing
#[derive(Args)]
pub struct TrendArgs {
    /// Path to a JSON sales ledger
    #[arg(long)]
    pub sales: String,

    /// Path to a JSON list of per-period fixed costs
    #[arg(long)]
    pub fixed_costs: Option<String>,

    /// Last period of the trend (YYYY-MM); defaults to the current month
    #[arg(long)]
    pub through: Option<String>,

    /// Number of trailing months
    #[arg(long, default_value_t = DEFAULT_TREND_MONTHS)]
    pub months: u32,
}

pub fn run_trend(args: TrendArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sales: Vec<SalesRecord> = input::read_json(&args.sales)?;
    let fixed_costs: Vec<FixedCostRecord> = match args.fixed_costs {
        Some(ref path) => input::read_json(path)?,
        None => Vec::new(),
    };
    let through = resolve_period(args.through.as_deref())?;

    let points = trend::trend(&fixed_costs, &sales, through, args.months)?;
    Ok(serde_json::to_value(points)?)
}

fn resolve_period(key: Option<&str>) -> Result<YearMonth, Box<dyn std::error::Error>> {
    match key {
        Some(s) => Ok(s.parse()?),
        None => Ok(YearMonth::from_date(chrono::Local::now().date_naive())),
    }
}
