use chrono::NaiveDate;
use dealer_margin_core::margin::{
    calculate_detailed_margins, compute_vehicle_margin, validate_margin_data, ProfitCategory,
    VehicleMarginInput,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Fixture
// ===========================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn as_of() -> NaiveDate {
    date(2024, 6, 1)
}

fn reference_vehicle() -> VehicleMarginInput {
    VehicleMarginInput {
        vehicle_id: "test-vehicle-1".to_string(),
        registration: "AB12 CDE".to_string(),
        purchase_price: dec!(10000),
        sale_price: dec!(15000),
        total_costs: dec!(1200),
        vatable_costs: dec!(600),
        non_vatable_costs: dec!(600),
        purchase_date: date(2024, 1, 15),
        sale_date: Some(date(2024, 3, 15)),
        is_commercial_purchase: false,
    }
}

// ===========================================================================
// Reference vehicle
// ===========================================================================

#[test]
fn test_reference_vehicle_full_breakdown() {
    let m = calculate_detailed_margins(&reference_vehicle(), as_of());

    assert_eq!(m.vat_on_spend, dec!(100));
    assert_eq!(m.vat_on_purchase, dec!(0));
    assert_eq!(m.vat_on_sale_price.round_dp(2), dec!(833.33));
    assert_eq!(m.vat_to_pay.round_dp(2), dec!(733.33));

    assert_eq!(m.gross_profit, dec!(5000));
    assert_eq!(m.net_profit, dec!(3700));
    assert_eq!(m.profit_margin_pre_vat, dec!(3800));
    assert_eq!(m.profit_margin_post_vat.round_dp(2), dec!(3066.67));

    assert_eq!(m.outlay_on_vehicle, dec!(1200));
    assert_eq!(m.total_investment, dec!(11200));
    assert_eq!(m.percentage_uplift_after_all_costs.round_dp(2), dec!(33.93));
    assert_eq!(m.gross_margin_percent.round_dp(2), dec!(33.33));
    assert_eq!(m.net_margin_percent.round_dp(2), dec!(25.33));
    assert_eq!(m.profit_category, ProfitCategory::High);

    assert_eq!(m.days_in_stock, 60);
    assert_eq!(m.profit_per_day.round_dp(2), dec!(61.67));
    assert_eq!(m.purchase_month, "January 2024");
    assert_eq!(m.purchase_quarter, "Q1 2024");
    assert_eq!(m.sale_month.as_deref(), Some("March 2024"));
    assert_eq!(m.sale_quarter.as_deref(), Some("Q1 2024"));
}

#[test]
fn test_commercial_purchase_reclaims_purchase_vat() {
    let mut input = reference_vehicle();
    input.is_commercial_purchase = true;
    let m = calculate_detailed_margins(&input, as_of());

    assert_eq!(m.vat_on_purchase.round_dp(2), dec!(1666.67));
    // 833.33 - 100 - 1666.67
    assert_eq!(m.vat_to_pay.round_dp(2), dec!(-933.33));
    assert_eq!(m.profit_margin_post_vat.round_dp(2), dec!(4733.33));
    // purchase VAT does not feed net profit
    assert_eq!(m.net_profit, dec!(3700));
}

#[test]
fn test_low_margin_sale() {
    let mut input = reference_vehicle();
    input.sale_price = dec!(11000);
    let m = calculate_detailed_margins(&input, as_of());
    assert!(m.net_margin_percent <= dec!(10));
    assert_eq!(m.profit_category, ProfitCategory::Low);
}

#[test]
fn test_medium_margin_sale() {
    let mut input = reference_vehicle();
    input.sale_price = dec!(13000);
    let m = calculate_detailed_margins(&input, as_of());
    assert!(m.net_margin_percent > dec!(10));
    assert!(m.net_margin_percent <= dec!(20));
    assert_eq!(m.profit_category, ProfitCategory::Medium);
}

#[test]
fn test_zero_costs() {
    let mut input = reference_vehicle();
    input.total_costs = Decimal::ZERO;
    input.vatable_costs = Decimal::ZERO;
    input.non_vatable_costs = Decimal::ZERO;
    let m = calculate_detailed_margins(&input, as_of());
    assert_eq!(m.outlay_on_vehicle, Decimal::ZERO);
    assert_eq!(m.vat_on_spend, Decimal::ZERO);
    assert_eq!(m.net_profit, m.gross_profit);
}

#[test]
fn test_unsold_vehicle_has_no_sale_period() {
    let mut input = reference_vehicle();
    input.sale_date = None;
    let m = compute_vehicle_margin(&input, None).unwrap();
    assert_eq!(m.sale_month, None);
    assert_eq!(m.sale_quarter, None);
    // measured against the real clock, which is well past 2024-01-15
    assert!(m.days_in_stock > 0);
}

#[test]
fn test_loss_making_vehicle() {
    let mut input = reference_vehicle();
    input.sale_price = dec!(8000);
    input.total_costs = dec!(2000);
    input.vatable_costs = dec!(1200);
    input.non_vatable_costs = dec!(800);
    let m = calculate_detailed_margins(&input, as_of());
    assert_eq!(m.gross_profit, dec!(-2000));
    assert!(m.net_profit < Decimal::ZERO);
    // -2000 - 200 - 2000
    assert_eq!(m.net_profit, dec!(-4200));
    assert_eq!(m.profit_category, ProfitCategory::Low);
}

#[test]
fn test_validator_reports_both_missing_prices() {
    let mut input = reference_vehicle();
    input.purchase_price = Decimal::ZERO;
    input.sale_price = Decimal::ZERO;
    let v = validate_margin_data(&input);
    assert!(!v.is_valid);
    assert!(v
        .errors
        .contains(&"Valid purchase price is required".to_string()));
    assert!(v.errors.contains(&"Valid sale price is required".to_string()));
}

// ===========================================================================
// Category boundaries
// ===========================================================================

fn vehicle_with_margin(purchase: Decimal, sale: Decimal) -> VehicleMarginInput {
    VehicleMarginInput {
        total_costs: Decimal::ZERO,
        vatable_costs: Decimal::ZERO,
        non_vatable_costs: Decimal::ZERO,
        purchase_price: purchase,
        sale_price: sale,
        ..reference_vehicle()
    }
}

#[test]
fn test_exactly_ten_percent_is_low() {
    let m = calculate_detailed_margins(&vehicle_with_margin(dec!(9000), dec!(10000)), as_of());
    assert_eq!(m.net_margin_percent, dec!(10));
    assert_eq!(m.profit_category, ProfitCategory::Low);
}

#[test]
fn test_exactly_twenty_percent_is_medium() {
    let m = calculate_detailed_margins(&vehicle_with_margin(dec!(8000), dec!(10000)), as_of());
    assert_eq!(m.net_margin_percent, dec!(20));
    assert_eq!(m.profit_category, ProfitCategory::Medium);
}

#[test]
fn test_just_above_twenty_percent_is_high() {
    let m = calculate_detailed_margins(&vehicle_with_margin(dec!(7999), dec!(10000)), as_of());
    assert_eq!(m.net_margin_percent, dec!(20.01));
    assert_eq!(m.profit_category, ProfitCategory::High);
}

// ===========================================================================
// Serialisation contract
// ===========================================================================

#[test]
fn test_result_omits_absent_sale_period() {
    let mut input = reference_vehicle();
    input.sale_date = None;
    let m = calculate_detailed_margins(&input, as_of());
    let json = serde_json::to_value(&m).unwrap();
    assert!(json.get("sale_month").is_none());
    assert!(json.get("sale_quarter").is_none());
    assert_eq!(json["profit_category"], "HIGH");
}
