mod commands;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::margin::{MarginArgs, ValidateArgs};
use commands::stock::StockReportArgs;

/// Vehicle margin, VAT and profitability calculations
#[derive(Parser)]
#[command(
    name = "dmargin",
    version,
    about = "Vehicle margin, VAT and profitability calculations",
    long_about = "A CLI for dealership vehicle profitability with decimal precision. \
                  Computes UK margin-scheme VAT, gross and net profit, margin \
                  percentages, profit tiers and holding periods for single \
                  vehicles or a whole stock book."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate VAT, profit and margin figures for one vehicle
    Margin(MarginArgs),
    /// Check a vehicle record without calculating
    Validate(ValidateArgs),
    /// Aggregate margins across a stock book
    StockReport(StockReportArgs),
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

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Margin(args) => commands::margin::run_margin(args),
        Commands::Validate(args) => commands::margin::run_validate(args),
        Commands::StockReport(args) => commands::stock::run_stock_report(args),
        Commands::Version => {
            println!("dmargin {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
