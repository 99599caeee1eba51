use clap::Args;
use serde_json::Value;

use pricesim_core::records::{self, ProductRow};

use crate::input;

/// Arguments for pre-import row validation
#[derive(Args)]
pub struct CheckRowsArgs {
    /// Path to a JSON list of parsed product rows
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_check_rows(args: CheckRowsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rows: Vec<ProductRow> = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input file (or piped JSON) is required for row validation".into());
    };

    let report = records::check_product_rows(&rows)?;
    Ok(serde_json::to_value(report)?)
}
