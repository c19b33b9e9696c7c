use clap::Args;
use serde_json::Value;

use dealer_margin_core::margin::calculator;
use dealer_margin_core::reporting::stock::{self, StockMarginInput};

use super::CalculationOptions;
use crate::input;

/// Arguments for the stock book margin report
#[derive(Args)]
pub struct StockReportArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub options: CalculationOptions,
}

pub fn run_stock_report(args: StockReportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut stock_input: StockMarginInput = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file> or stdin required for stock report".into());
    };

    if args.options.as_of.is_some() {
        stock_input.as_of = args.options.as_of;
    }
    if let Some(policy) = args.options.load_policy()? {
        stock_input.policy = Some(policy);
    }

    let mut result = stock::analyze_stock_margins(&stock_input)?;
    if let Some(dp) = args.options.round {
        for vehicle in result.result.vehicles.iter_mut() {
            *vehicle = calculator::round_result(vehicle, dp);
        }
    }
    Ok(serde_json::to_value(result)?)
}
