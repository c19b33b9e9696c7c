use chrono::{NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::periods::{days_between, month_label, quarter_label};
use super::policy::MarginPolicy;
use super::types::{VehicleMarginInput, VehicleMarginResult};
use super::validation::validate_margin_data;
use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Safe percentage: returns Decimal::ZERO when the denominator is zero or
/// the ratio does not fit in a Decimal.
fn safe_pct(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator
        .checked_div(denominator)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .unwrap_or(Decimal::ZERO)
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Derive every VAT, profit, margin and holding metric for a vehicle using
/// the standard-rate policy.
///
/// `as_of` stands in for the sale date of an unsold vehicle. The input is
/// assumed validated; degenerate values fall back to zero and out-of-range
/// sums saturate rather than panic.
pub fn calculate_detailed_margins(
    input: &VehicleMarginInput,
    as_of: NaiveDate,
) -> VehicleMarginResult {
    calculate_detailed_margins_with_policy(input, &MarginPolicy::default(), as_of)
}

/// Same as [`calculate_detailed_margins`] with an explicit policy.
pub fn calculate_detailed_margins_with_policy(
    input: &VehicleMarginInput,
    policy: &MarginPolicy,
    as_of: NaiveDate,
) -> VehicleMarginResult {
    let outlay_on_vehicle = input.total_costs;
    let price_difference = input.sale_price.saturating_sub(input.purchase_price);

    // --- VAT (margin scheme) ---
    let vat_on_spend = policy.vat_fraction(input.vatable_costs);
    let vat_on_purchase = if input.is_commercial_purchase {
        policy.vat_fraction(input.purchase_price)
    } else {
        Decimal::ZERO
    };
    let vat_on_sale_price = policy.vat_fraction(price_difference);
    let vat_to_pay = vat_on_sale_price
        .saturating_sub(vat_on_spend)
        .saturating_sub(vat_on_purchase);

    // --- Profit ---
    let gross_profit = price_difference;
    let net_profit = gross_profit
        .saturating_sub(vat_on_spend)
        .saturating_sub(outlay_on_vehicle);
    let profit_margin_pre_vat = price_difference.saturating_sub(outlay_on_vehicle);
    let profit_margin_post_vat = profit_margin_pre_vat.saturating_sub(vat_to_pay);

    // --- Margins ---
    let total_investment = input.purchase_price.saturating_add(input.total_costs);
    let investment_return = input.sale_price.saturating_sub(total_investment);
    let percentage_uplift_after_all_costs = safe_pct(investment_return, total_investment);
    let gross_margin_percent = safe_pct(price_difference, input.sale_price);
    let net_margin_percent = safe_pct(investment_return, input.sale_price);
    let profit_category = policy.categorize(net_margin_percent);

    // --- Holding period ---
    let end_date = input.sale_date.unwrap_or(as_of);
    let days_in_stock = days_between(input.purchase_date, end_date);
    let profit_per_day = if days_in_stock > 0 {
        net_profit / Decimal::from(days_in_stock)
    } else {
        net_profit
    };

    tracing::debug!(
        vehicle_id = %input.vehicle_id,
        net_profit = %net_profit,
        net_margin_percent = %net_margin_percent,
        category = %profit_category,
        days_in_stock,
        "vehicle margin calculated"
    );

    VehicleMarginResult {
        vehicle_id: input.vehicle_id.clone(),
        registration: input.registration.clone(),
        vat_on_spend,
        vat_on_purchase,
        vat_on_sale_price,
        vat_to_pay,
        gross_profit,
        net_profit,
        profit_margin_pre_vat,
        profit_margin_post_vat,
        outlay_on_vehicle,
        total_investment,
        percentage_uplift_after_all_costs,
        gross_margin_percent,
        net_margin_percent,
        profit_category,
        days_in_stock,
        profit_per_day,
        purchase_month: month_label(input.purchase_date),
        purchase_quarter: quarter_label(input.purchase_date),
        sale_month: input.sale_date.map(month_label),
        sale_quarter: input.sale_date.map(quarter_label),
    }
}

// ---------------------------------------------------------------------------
// Validate-then-calculate
// ---------------------------------------------------------------------------

/// Validate the record and, if it passes, calculate its margins. When
/// `as_of` is `None` the holding period of an unsold vehicle runs to
/// today's UTC date.
pub fn compute_vehicle_margin(
    input: &VehicleMarginInput,
    as_of: Option<NaiveDate>,
) -> Result<VehicleMarginResult, ValidationError> {
    compute_vehicle_margin_with_policy(input, &MarginPolicy::default(), as_of)
}

/// Same as [`compute_vehicle_margin`] with an explicit policy.
pub fn compute_vehicle_margin_with_policy(
    input: &VehicleMarginInput,
    policy: &MarginPolicy,
    as_of: Option<NaiveDate>,
) -> Result<VehicleMarginResult, ValidationError> {
    let validation = validate_margin_data(input);
    if !validation.is_valid {
        return Err(ValidationError {
            errors: validation.errors,
        });
    }
    let as_of = as_of.unwrap_or_else(|| Utc::now().date_naive());
    Ok(calculate_detailed_margins_with_policy(input, policy, as_of))
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

/// Copy of `result` with every monetary and percentage field rounded to
/// `dp` decimal places, half away from zero.
pub fn round_result(result: &VehicleMarginResult, dp: u32) -> VehicleMarginResult {
    let r = |v: Decimal| v.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    VehicleMarginResult {
        vat_on_spend: r(result.vat_on_spend),
        vat_on_purchase: r(result.vat_on_purchase),
        vat_on_sale_price: r(result.vat_on_sale_price),
        vat_to_pay: r(result.vat_to_pay),
        gross_profit: r(result.gross_profit),
        net_profit: r(result.net_profit),
        profit_margin_pre_vat: r(result.profit_margin_pre_vat),
        profit_margin_post_vat: r(result.profit_margin_post_vat),
        outlay_on_vehicle: r(result.outlay_on_vehicle),
        total_investment: r(result.total_investment),
        percentage_uplift_after_all_costs: r(result.percentage_uplift_after_all_costs),
        gross_margin_percent: r(result.gross_margin_percent),
        net_margin_percent: r(result.net_margin_percent),
        profit_per_day: r(result.profit_per_day),
        ..result.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
