mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::break_even::{BreakEvenArgs, TrendArgs};
use commands::pricing::SimulateArgs;
use commands::records::CheckRowsArgs;

/// Price simulation and break-even analysis
#[derive(Parser)]
#[command(
    name = "psim",
    version,
    about = "Price simulation and break-even analysis",
    long_about = "A CLI for product pricing decisions with decimal precision. \
                  Recommends sale prices from unit cost and target margin, quotes \
                  preset margin patterns with a minimum-price guard, and analyzes \
                  monthly gross-margin break-even points with trend history."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend a sale price from unit cost and target margin
    Simulate(SimulateArgs),
    /// Break-even analysis for one period
    BreakEven(BreakEvenArgs),
    /// Break-even trend over trailing months
    Trend(TrendArgs),
    /// Validate product rows prepared for import
    CheckRows(CheckRowsArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Simulate(args) => commands::pricing::run_simulate(args),
        Commands::BreakEven(args) => commands::break_even::run_break_even(args),
        Commands::Trend(args) => commands::break_even::run_trend(args),
        Commands::CheckRows(args) => commands::records::run_check_rows(args),
        Commands::Version => {
            println!("psim {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
