use clap::Args;
use serde_json::Value;

use dealer_margin_core::margin::analysis::{self, MarginAnalysisInput};
use dealer_margin_core::margin::{calculator, validation, VehicleMarginInput};

use super::CalculationOptions;
use crate::input;

/// Arguments for a single-vehicle margin calculation
#[derive(Args)]
pub struct MarginArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub options: CalculationOptions,
}

/// Arguments for record validation
#[derive(Args)]
pub struct ValidateArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_margin(args: MarginArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut margin_input: MarginAnalysisInput = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file> or stdin required for margin calculation".into());
    };

    // Command-line flags win over values in the document
    if args.options.as_of.is_some() {
        margin_input.as_of = args.options.as_of;
    }
    if let Some(policy) = args.options.load_policy()? {
        margin_input.policy = Some(policy);
    }

    let mut result = analysis::analyze_vehicle_margin(&margin_input)?;
    if let Some(dp) = args.options.round {
        result.result = calculator::round_result(&result.result, dp);
    }
    Ok(serde_json::to_value(result)?)
}

pub fn run_validate(args: ValidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let vehicle: VehicleMarginInput = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file> or stdin required for validation".into());
    };
    let result = validation::validate_margin_data(&vehicle);
    Ok(serde_json::json!({ "result": result }))
}
