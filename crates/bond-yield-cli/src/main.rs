mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::bond::{CalculateArgs, ScheduleArgs};

/// Bond yield and cash flow calculations
#[derive(Parser)]
#[command(
    name = "bondcalc",
    version,
    about = "Bond yield, yield-to-maturity and cash flow calculations",
    long_about = "A CLI for bond analytics with decimal precision. Computes current \
                  yield, Newton-Raphson yield to maturity, total coupon interest, \
                  premium/discount/par status and the coupon cash flow schedule."
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
    /// Calculate current yield, YTM, total interest, status and schedule
    Calculate(CalculateArgs),
    /// Print only the period-by-period cash flow schedule
    Schedule(ScheduleArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => commands::bond::run_calculate(args),
        Commands::Schedule(args) => commands::bond::run_schedule(args),
        Commands::Version => {
            println!("bondcalc {}", env!("CARGO_PKG_VERSION"));
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
