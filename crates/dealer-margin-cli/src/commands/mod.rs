pub mod margin;
pub mod stock;

use chrono::NaiveDate;
use clap::Args;
use dealer_margin_core::margin::MarginPolicy;

use crate::input;

/// Options shared by every calculating command.
#[derive(Args)]
pub struct CalculationOptions {
    /// Valuation date for unsold vehicles (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// JSON or YAML file overriding the VAT divisor and profit-tier thresholds
    #[arg(long)]
    pub policy: Option<String>,

    /// Round monetary and percentage fields to this many decimal places
    #[arg(long)]
    pub round: Option<u32>,
}

impl CalculationOptions {
    /// Policy from `--policy`, if given.
    pub fn load_policy(&self) -> Result<Option<MarginPolicy>, Box<dyn std::error::Error>> {
        match self.policy {
            Some(ref path) => Ok(Some(input::file::read_document(path)?)),
            None => Ok(None),
        }
    }
}
