use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::types::{ValidationResult, VehicleMarginInput};
use crate::types::Money;

/// Smallest accepted price: one minor currency unit.
pub const MIN_PRICE: Money = dec!(0.01);
/// Largest accepted amount. Sums and ratios of amounts within
/// [MIN_PRICE, MAX_AMOUNT] stay far inside Decimal's range.
pub const MAX_AMOUNT: Money = dec!(1_000_000_000_000);

pub const PURCHASE_PRICE_REQUIRED: &str = "Valid purchase price is required";
pub const SALE_PRICE_REQUIRED: &str = "Valid sale price is required";
pub const TOTAL_COSTS_NEGATIVE: &str = "Total costs cannot be negative";
pub const VATABLE_COSTS_NEGATIVE: &str = "VATable costs cannot be negative";
pub const NON_VATABLE_COSTS_NEGATIVE: &str = "Non-VATable costs cannot be negative";
pub const PURCHASE_PRICE_TOO_LARGE: &str = "Purchase price exceeds the maximum supported amount";
pub const SALE_PRICE_TOO_LARGE: &str = "Sale price exceeds the maximum supported amount";
pub const TOTAL_COSTS_TOO_LARGE: &str = "Total costs exceed the maximum supported amount";
pub const VATABLE_COSTS_TOO_LARGE: &str = "VATable costs exceed the maximum supported amount";
pub const NON_VATABLE_COSTS_TOO_LARGE: &str =
    "Non-VATable costs exceed the maximum supported amount";

/// Check a vehicle record before calculation, collecting every problem
/// rather than stopping at the first.
///
/// Decimal amounts are always finite and `NaiveDate` values are always real
/// calendar dates, so only sign and range rules remain to be checked. Prices
/// below one minor unit count as missing.
pub fn validate_margin_data(input: &VehicleMarginInput) -> ValidationResult {
    let mut errors: Vec<String> = Vec::new();

    let price_checks = [
        (input.purchase_price, PURCHASE_PRICE_REQUIRED, PURCHASE_PRICE_TOO_LARGE),
        (input.sale_price, SALE_PRICE_REQUIRED, SALE_PRICE_TOO_LARGE),
    ];
    for (amount, missing, too_large) in price_checks {
        if amount < MIN_PRICE {
            errors.push(missing.to_string());
        } else if amount > MAX_AMOUNT {
            errors.push(too_large.to_string());
        }
    }

    // Zero costs are fine: a vehicle may have none recorded
    let cost_checks = [
        (input.total_costs, TOTAL_COSTS_NEGATIVE, TOTAL_COSTS_TOO_LARGE),
        (input.vatable_costs, VATABLE_COSTS_NEGATIVE, VATABLE_COSTS_TOO_LARGE),
        (
            input.non_vatable_costs,
            NON_VATABLE_COSTS_NEGATIVE,
            NON_VATABLE_COSTS_TOO_LARGE,
        ),
    ];
    for (amount, negative, too_large) in cost_checks {
        if amount < Decimal::ZERO {
            errors.push(negative.to_string());
        } else if amount > MAX_AMOUNT {
            errors.push(too_large.to_string());
        }
    }

    if !errors.is_empty() {
        tracing::warn!(
            vehicle_id = %input.vehicle_id,
            error_count = errors.len(),
            "vehicle margin input rejected"
        );
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn valid_input() -> VehicleMarginInput {
        VehicleMarginInput {
            vehicle_id: "veh-001".to_string(),
            registration: "AB12 CDE".to_string(),
            purchase_price: dec!(10000),
            sale_price: dec!(15000),
            total_costs: dec!(1200),
            vatable_costs: dec!(600),
            non_vatable_costs: dec!(600),
            purchase_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            sale_date: NaiveDate::from_ymd_opt(2024, 3, 15),
            is_commercial_purchase: false,
        }
    }

    #[test]
    fn test_valid_input_passes() {
        let result = validate_margin_data(&valid_input());
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_zero_prices_report_both_errors() {
        let mut input = valid_input();
        input.purchase_price = Decimal::ZERO;
        input.sale_price = Decimal::ZERO;
        let result = validate_margin_data(&input);
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec![
                PURCHASE_PRICE_REQUIRED.to_string(),
                SALE_PRICE_REQUIRED.to_string()
            ]
        );
    }

    #[test]
    fn test_negative_purchase_price_rejected() {
        let mut input = valid_input();
        input.purchase_price = dec!(-1);
        let result = validate_margin_data(&input);
        assert!(!result.is_valid);
        assert!(result.errors.contains(&PURCHASE_PRICE_REQUIRED.to_string()));
    }

    #[test]
    fn test_zero_costs_are_valid() {
        let mut input = valid_input();
        input.total_costs = Decimal::ZERO;
        input.vatable_costs = Decimal::ZERO;
        input.non_vatable_costs = Decimal::ZERO;
        assert!(validate_margin_data(&input).is_valid);
    }

    #[test]
    fn test_negative_costs_each_reported() {
        let mut input = valid_input();
        input.total_costs = dec!(-10);
        input.vatable_costs = dec!(-5);
        input.non_vatable_costs = dec!(-5);
        let result = validate_margin_data(&input);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 3);
        assert!(result.errors.contains(&TOTAL_COSTS_NEGATIVE.to_string()));
        assert!(result.errors.contains(&VATABLE_COSTS_NEGATIVE.to_string()));
        assert!(result.errors.contains(&NON_VATABLE_COSTS_NEGATIVE.to_string()));
    }

    #[test]
    fn test_sub_minor_unit_price_rejected() {
        let mut input = valid_input();
        input.purchase_price = Decimal::new(1, 28);
        let result = validate_margin_data(&input);
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec![PURCHASE_PRICE_REQUIRED.to_string()]);

        input.purchase_price = MIN_PRICE;
        assert!(validate_margin_data(&input).is_valid);
    }

    #[test]
    fn test_amounts_beyond_maximum_rejected() {
        let mut input = valid_input();
        input.purchase_price = Decimal::MAX;
        input.sale_price = Decimal::MAX;
        input.total_costs = Decimal::MAX;
        input.vatable_costs = MAX_AMOUNT;
        input.non_vatable_costs = MAX_AMOUNT + dec!(0.01);
        let result = validate_margin_data(&input);
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec![
                PURCHASE_PRICE_TOO_LARGE.to_string(),
                SALE_PRICE_TOO_LARGE.to_string(),
                TOTAL_COSTS_TOO_LARGE.to_string(),
                NON_VATABLE_COSTS_TOO_LARGE.to_string(),
            ]
        );
    }

    #[test]
    fn test_unsold_vehicle_is_valid() {
        let mut input = valid_input();
        input.sale_date = None;
        assert!(validate_margin_data(&input).is_valid);
    }
}
