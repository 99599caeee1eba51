use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use pricesim_core::pricing::recommendation::{self, PriceSimulationInput};

use crate::input;

/// Arguments for a price simulation
#[derive(Args)]
pub struct SimulateArgs {
    /// Unit cost of the product (currency per unit)
    #[arg(long)]
    pub unit_cost: Option<Decimal>,

    /// Target margin rate on the selling price (e.g. 0.25 for 25%)
    #[arg(long, alias = "margin")]
    pub target_margin_rate: Option<Decimal>,

    /// Quantity on hand, for a total-profit figure
    #[arg(long)]
    pub quantity: Option<Decimal>,

    /// Product name carried through to history and displays
    #[arg(long)]
    pub product_name: Option<String>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sim_input: PriceSimulationInput = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        PriceSimulationInput {
            product_name: args.product_name.clone(),
            unit_cost_per_unit: args
                .unit_cost
                .ok_or("--unit-cost is required (or provide --input)")?,
            target_margin_rate: args
                .target_margin_rate
                .ok_or("--target-margin-rate is required (or provide --input)")?,
            quantity: args.quantity,
        }
    };

    let result = recommendation::recommend(&sim_input)?;
    Ok(serde_json::to_value(result)?)
}
