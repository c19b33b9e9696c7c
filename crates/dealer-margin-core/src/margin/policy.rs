use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::types::ProfitCategory;
use crate::error::MarginError;
use crate::types::Percent;
use crate::MarginResult;

/// VAT fraction for the 20% standard rate: VAT-inclusive amount / 6.
pub const STANDARD_VAT_FRACTION_DIVISOR: Decimal = dec!(6);
pub const DEFAULT_MEDIUM_THRESHOLD_PCT: Percent = dec!(10);
pub const DEFAULT_HIGH_THRESHOLD_PCT: Percent = dec!(20);

/// Tunable constants of the margin calculation. Missing fields in a policy
/// file fall back to the UK standard-rate defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginPolicy {
    /// Divisor extracting VAT from a VAT-inclusive amount
    pub vat_fraction_divisor: Decimal,
    /// Net margin above which a vehicle is at least MEDIUM
    pub medium_threshold_pct: Percent,
    /// Net margin above which a vehicle is HIGH
    pub high_threshold_pct: Percent,
}

impl Default for MarginPolicy {
    fn default() -> Self {
        Self {
            vat_fraction_divisor: STANDARD_VAT_FRACTION_DIVISOR,
            medium_threshold_pct: DEFAULT_MEDIUM_THRESHOLD_PCT,
            high_threshold_pct: DEFAULT_HIGH_THRESHOLD_PCT,
        }
    }
}

impl MarginPolicy {
    pub fn validate(&self) -> MarginResult<()> {
        if self.vat_fraction_divisor <= Decimal::ZERO {
            return Err(MarginError::InvalidInput {
                field: "vat_fraction_divisor".to_string(),
                reason: "VAT fraction divisor must be positive".to_string(),
            });
        }
        if self.medium_threshold_pct > self.high_threshold_pct {
            return Err(MarginError::InvalidInput {
                field: "medium_threshold_pct".to_string(),
                reason: format!(
                    "Medium threshold ({}) cannot exceed high threshold ({})",
                    self.medium_threshold_pct, self.high_threshold_pct
                ),
            });
        }
        Ok(())
    }

    /// VAT content of a VAT-inclusive amount. Zero when the divisor is zero
    /// or the quotient does not fit in a Decimal.
    pub fn vat_fraction(&self, amount: Decimal) -> Decimal {
        amount
            .checked_div(self.vat_fraction_divisor)
            .unwrap_or(Decimal::ZERO)
    }

    /// Tier for a net margin: LOW up to and including the medium threshold,
    /// MEDIUM up to and including the high threshold, HIGH above it.
    pub fn categorize(&self, net_margin_percent: Percent) -> ProfitCategory {
        if net_margin_percent > self.high_threshold_pct {
            ProfitCategory::High
        } else if net_margin_percent > self.medium_threshold_pct {
            ProfitCategory::Medium
        } else {
            ProfitCategory::Low
        }
    }
}
