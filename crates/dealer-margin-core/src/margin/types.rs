use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Financial record of a single vehicle, as assembled by the caller from
/// inventory, sale and cost-tracking data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleMarginInput {
    /// Opaque identifier, carried through for traceability only
    pub vehicle_id: String,
    /// Display registration, not validated for format
    pub registration: String,
    pub purchase_price: Money,
    pub sale_price: Money,
    /// Sum of all ancillary costs (transport, repairs, preparation, ...)
    pub total_costs: Money,
    /// Portion of total_costs on which VAT was paid and can be reclaimed
    pub vatable_costs: Money,
    /// Portion of total_costs with no reclaimable VAT
    pub non_vatable_costs: Money,
    pub purchase_date: NaiveDate,
    /// Absent while the vehicle is still in stock
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_date: Option<NaiveDate>,
    /// True only when the purchase itself attracted VAT
    #[serde(default)]
    pub is_commercial_purchase: bool,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Coarse profitability tier derived from net margin percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProfitCategory {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for ProfitCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfitCategory::Low => write!(f, "LOW"),
            ProfitCategory::Medium => write!(f, "MEDIUM"),
            ProfitCategory::High => write!(f, "HIGH"),
        }
    }
}

/// Complete set of derived VAT, profit, margin and holding metrics for one
/// vehicle. Monetary fields keep full decimal precision; rounding is left to
/// the presentation layer (see `round_result`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleMarginResult {
    pub vehicle_id: String,
    pub registration: String,

    // --- VAT ---
    /// vatable_costs / 6
    pub vat_on_spend: Money,
    /// purchase_price / 6 for commercial purchases, otherwise zero
    pub vat_on_purchase: Money,
    /// (sale_price - purchase_price) / 6, margin scheme basis
    pub vat_on_sale_price: Money,
    /// vat_on_sale_price - vat_on_spend - vat_on_purchase; negative is a reclaim
    pub vat_to_pay: Money,

    // --- Profit ---
    /// sale_price - purchase_price
    pub gross_profit: Money,
    /// gross_profit - vat_on_spend - outlay_on_vehicle
    pub net_profit: Money,
    /// sale_price - purchase_price - outlay_on_vehicle
    pub profit_margin_pre_vat: Money,
    /// profit_margin_pre_vat - vat_to_pay
    pub profit_margin_post_vat: Money,

    // --- Aggregates ---
    pub outlay_on_vehicle: Money,
    /// purchase_price + total_costs
    pub total_investment: Money,
    pub percentage_uplift_after_all_costs: Percent,
    pub gross_margin_percent: Percent,
    pub net_margin_percent: Percent,
    pub profit_category: ProfitCategory,

    // --- Holding period ---
    pub days_in_stock: i64,
    /// net_profit / days_in_stock, or net_profit itself for a same-day sale
    pub profit_per_day: Money,
    pub purchase_month: String,
    pub purchase_quarter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_quarter: Option<String>,
}

impl VehicleMarginResult {
    pub fn is_sold(&self) -> bool {
        self.sale_month.is_some()
    }
}

/// Outcome of the validation pre-check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}
