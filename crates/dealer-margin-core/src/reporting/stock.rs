use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::MarginError;
use crate::margin::analysis::collect_warnings;
use crate::margin::calculator::calculate_detailed_margins_with_policy;
use crate::margin::periods::{month_label, quarter_label, quarter_of};
use crate::margin::policy::MarginPolicy;
use crate::margin::types::{ProfitCategory, VehicleMarginInput, VehicleMarginResult};
use crate::margin::validation::validate_margin_data;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::MarginResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A batch of vehicles to report on, e.g. a dealership's stock book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMarginInput {
    pub vehicles: Vec<VehicleMarginInput>,
    /// Valuation date for unsold vehicles; defaults to today (UTC)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<MarginPolicy>,
}

/// A vehicle excluded from the report because it failed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedVehicle {
    pub vehicle_id: String,
    pub registration: String,
    pub errors: Vec<String>,
}

/// Number of vehicles in each profit tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl CategoryCounts {
    fn record(&mut self, category: ProfitCategory) {
        match category {
            ProfitCategory::Low => self.low += 1,
            ProfitCategory::Medium => self.medium += 1,
            ProfitCategory::High => self.high += 1,
        }
    }
}

/// Totals across every accepted vehicle.
///
/// Purchase, cost, sales, profit and VAT totals, averages and profit-tier
/// counts are realised figures over sold vehicles only, so
/// `total_gross_profit == total_sales - total_purchase`. Unsold stock is
/// reported separately: the money tied up in it and the net profit its
/// asking prices would realise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSummary {
    pub vehicle_count: usize,
    pub sold_count: usize,
    pub unsold_count: usize,
    pub rejected_count: usize,
    pub total_purchase: Money,
    pub total_costs: Money,
    pub total_sales: Money,
    pub total_gross_profit: Money,
    pub total_net_profit: Money,
    pub total_vat_to_pay: Money,
    pub average_net_margin_percent: Percent,
    pub average_days_in_stock: Decimal,
    pub categories: CategoryCounts,
    /// Purchase price plus costs of vehicles still in stock
    pub unsold_investment: Money,
    /// Net profit of unsold vehicles at their asking price
    pub projected_net_profit: Money,
}

/// Sold vehicles grouped into a calendar month or quarter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub period: String,
    pub vehicles_sold: usize,
    pub total_sales: Money,
    pub total_net_profit: Money,
    pub average_net_margin_percent: Percent,
}

/// Full stock margin report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMarginReport {
    pub vehicles: Vec<VehicleMarginResult>,
    pub rejected: Vec<RejectedVehicle>,
    pub summary: StockSummary,
    pub by_sale_quarter: Vec<PeriodSummary>,
    pub by_sale_month: Vec<PeriodSummary>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn average(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    }
}

#[derive(Default)]
struct PeriodAccumulator {
    label: String,
    vehicles_sold: usize,
    total_sales: Money,
    total_net_profit: Money,
    margin_sum: Percent,
}

impl PeriodAccumulator {
    fn add(&mut self, sale_price: Money, result: &VehicleMarginResult) {
        self.vehicles_sold += 1;
        self.total_sales += sale_price;
        self.total_net_profit += result.net_profit;
        self.margin_sum += result.net_margin_percent;
    }

    fn finish(self) -> PeriodSummary {
        PeriodSummary {
            period: self.label,
            vehicles_sold: self.vehicles_sold,
            total_sales: self.total_sales,
            total_net_profit: self.total_net_profit,
            average_net_margin_percent: average(self.margin_sum, self.vehicles_sold),
        }
    }
}

/// Buckets keyed by (year, period number) so iteration is chronological.
type PeriodBuckets = BTreeMap<(i32, u32), PeriodAccumulator>;

fn bucket(
    buckets: &mut PeriodBuckets,
    key: (i32, u32),
    label: String,
) -> &mut PeriodAccumulator {
    buckets.entry(key).or_insert_with(|| PeriodAccumulator {
        label,
        ..PeriodAccumulator::default()
    })
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Calculate margins for every vehicle in a stock book and aggregate them
/// into realised totals, profit-tier counts, per-period sales summaries and
/// the position of unsold stock.
///
/// Vehicles failing validation are listed under `rejected` and left out of
/// every aggregate.
pub fn analyze_stock_margins(
    input: &StockMarginInput,
) -> MarginResult<ComputationOutput<StockMarginReport>> {
    let start = Instant::now();

    if input.vehicles.is_empty() {
        return Err(MarginError::InsufficientData(
            "Stock margin report requires at least one vehicle".into(),
        ));
    }

    let policy = input.policy.clone().unwrap_or_default();
    policy.validate()?;
    let as_of = input.as_of.unwrap_or_else(|| Utc::now().date_naive());

    let mut warnings: Vec<String> = Vec::new();
    let mut results: Vec<VehicleMarginResult> = Vec::new();
    let mut rejected: Vec<RejectedVehicle> = Vec::new();

    let mut total_purchase = Decimal::ZERO;
    let mut total_costs = Decimal::ZERO;
    let mut total_sales = Decimal::ZERO;
    let mut total_gross_profit = Decimal::ZERO;
    let mut total_net_profit = Decimal::ZERO;
    let mut total_vat_to_pay = Decimal::ZERO;
    let mut sold_margin_sum = Decimal::ZERO;
    let mut sold_days_sum = Decimal::ZERO;
    let mut unsold_investment = Decimal::ZERO;
    let mut projected_net_profit = Decimal::ZERO;
    let mut categories = CategoryCounts::default();
    let mut quarters = PeriodBuckets::new();
    let mut months = PeriodBuckets::new();

    for vehicle in &input.vehicles {
        let validation = validate_margin_data(vehicle);
        if !validation.is_valid {
            rejected.push(RejectedVehicle {
                vehicle_id: vehicle.vehicle_id.clone(),
                registration: vehicle.registration.clone(),
                errors: validation.errors,
            });
            continue;
        }

        warnings.extend(collect_warnings(vehicle));
        let result = calculate_detailed_margins_with_policy(vehicle, &policy, as_of);

        let Some(sale_date) = vehicle.sale_date else {
            unsold_investment += result.total_investment;
            projected_net_profit += result.net_profit;
            results.push(result);
            continue;
        };

        total_purchase += vehicle.purchase_price;
        total_costs += vehicle.total_costs;
        total_sales += vehicle.sale_price;
        total_gross_profit += result.gross_profit;
        total_net_profit += result.net_profit;
        total_vat_to_pay += result.vat_to_pay;
        sold_margin_sum += result.net_margin_percent;
        sold_days_sum += Decimal::from(result.days_in_stock);
        categories.record(result.profit_category);

        let year = sale_date.year();
        bucket(&mut quarters, (year, quarter_of(sale_date)), quarter_label(sale_date))
            .add(vehicle.sale_price, &result);
        bucket(&mut months, (year, sale_date.month()), month_label(sale_date))
            .add(vehicle.sale_price, &result);

        results.push(result);
    }

    if results.is_empty() {
        warnings.push("Every vehicle failed validation; report totals are zero".to_string());
    }

    let sold_count = results.iter().filter(|r| r.is_sold()).count();
    let unsold_count = results.len() - sold_count;
    if unsold_count > 0 {
        warnings.push(format!(
            "{unsold_count} vehicle(s) unsold; holding periods measured to {as_of} and \
             excluded from realised totals"
        ));
    }

    let summary = StockSummary {
        vehicle_count: results.len(),
        sold_count,
        unsold_count,
        rejected_count: rejected.len(),
        total_purchase,
        total_costs,
        total_sales,
        total_gross_profit,
        total_net_profit,
        total_vat_to_pay,
        average_net_margin_percent: average(sold_margin_sum, sold_count),
        average_days_in_stock: average(sold_days_sum, sold_count),
        categories,
        unsold_investment,
        projected_net_profit,
    };

    tracing::debug!(
        accepted = summary.vehicle_count,
        rejected = summary.rejected_count,
        total_net_profit = %summary.total_net_profit,
        "stock margin report built"
    );

    let report = StockMarginReport {
        vehicles: results,
        rejected,
        summary,
        by_sale_quarter: quarters.into_values().map(PeriodAccumulator::finish).collect(),
        by_sale_month: months.into_values().map(PeriodAccumulator::finish).collect(),
    };

    Ok(with_metadata(
        "Stock Book Margin Report (UK Margin Scheme VAT)",
        serde_json::json!({
            "vehicles": input.vehicles.len(),
            "as_of": as_of.to_string(),
            "vat_fraction_divisor": policy.vat_fraction_divisor.to_string(),
            "medium_threshold_pct": policy.medium_threshold_pct.to_string(),
            "high_threshold_pct": policy.high_threshold_pct.to_string(),
        }),
        warnings,
        start,
        report,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
