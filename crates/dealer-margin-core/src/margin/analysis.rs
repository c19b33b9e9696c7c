use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::calculator::calculate_detailed_margins_with_policy;
use super::policy::MarginPolicy;
use super::types::{VehicleMarginInput, VehicleMarginResult};
use super::validation::validate_margin_data;
use crate::error::{MarginError, ValidationError};
use crate::types::{with_metadata, ComputationOutput};
use crate::MarginResult;

/// Request for a single-vehicle margin analysis, as read by the CLI and the
/// bindings. Vehicle fields sit at the top level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarginAnalysisInput {
    #[serde(flatten)]
    pub vehicle: VehicleMarginInput,
    /// Valuation date for unsold vehicles; defaults to today (UTC)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<MarginPolicy>,
}

/// Non-fatal observations about a record that passed validation. Unsold
/// vehicles are left to the caller, which knows the valuation date.
pub(crate) fn collect_warnings(input: &VehicleMarginInput) -> Vec<String> {
    let mut warnings = Vec::new();
    let label = if input.vehicle_id.trim().is_empty() {
        warnings.push("Vehicle id is empty; result cannot be traced to a record".to_string());
        input.registration.clone()
    } else {
        input.vehicle_id.clone()
    };

    let split = input.vatable_costs + input.non_vatable_costs;
    if split != input.total_costs {
        warnings.push(format!(
            "{label}: vatable ({}) + non-vatable ({}) costs differ from total_costs ({})",
            input.vatable_costs, input.non_vatable_costs, input.total_costs
        ));
    }

    if let Some(sale_date) = input.sale_date {
        if sale_date < input.purchase_date {
            warnings.push(format!(
                "{label}: sale date {sale_date} precedes purchase date {}; \
                 days in stock clamped to 0",
                input.purchase_date
            ));
        }
    }

    warnings
}

/// Validate and calculate a single vehicle's margins, wrapped in the
/// standard computation envelope.
pub fn analyze_vehicle_margin(
    input: &MarginAnalysisInput,
) -> MarginResult<ComputationOutput<VehicleMarginResult>> {
    let start = Instant::now();

    let policy = input.policy.clone().unwrap_or_default();
    policy.validate()?;

    let validation = validate_margin_data(&input.vehicle);
    if !validation.is_valid {
        return Err(MarginError::Validation(ValidationError {
            errors: validation.errors,
        }));
    }

    let as_of = input.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let mut warnings = collect_warnings(&input.vehicle);
    if input.vehicle.sale_date.is_none() {
        warnings.push(format!("Vehicle unsold; holding period measured to {as_of}"));
    }
    let output = calculate_detailed_margins_with_policy(&input.vehicle, &policy, as_of);

    Ok(with_metadata(
        "UK Margin Scheme VAT and Vehicle Profitability Analysis",
        serde_json::json!({
            "vehicle_id": input.vehicle.vehicle_id,
            "is_commercial_purchase": input.vehicle.is_commercial_purchase,
            "as_of": as_of.to_string(),
            "vat_fraction_divisor": policy.vat_fraction_divisor.to_string(),
            "medium_threshold_pct": policy.medium_threshold_pct.to_string(),
            "high_threshold_pct": policy.high_threshold_pct.to_string(),
        }),
        warnings,
        start,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn analysis_input() -> MarginAnalysisInput {
        MarginAnalysisInput {
            vehicle: VehicleMarginInput {
                vehicle_id: "veh-001".to_string(),
                registration: "AB12 CDE".to_string(),
                purchase_price: dec!(10000),
                sale_price: dec!(15000),
                total_costs: dec!(1200),
                vatable_costs: dec!(600),
                non_vatable_costs: dec!(600),
                purchase_date: date(2024, 1, 15),
                sale_date: Some(date(2024, 3, 15)),
                is_commercial_purchase: false,
            },
            as_of: Some(date(2024, 6, 1)),
            policy: None,
        }
    }

    #[test]
    fn test_clean_record_has_no_warnings() {
        let out = analyze_vehicle_margin(&analysis_input()).unwrap();
        assert!(out.warnings.is_empty());
        assert_eq!(out.result.net_profit, dec!(3700));
        assert_eq!(out.assumptions["as_of"], "2024-06-01");
    }

    #[test]
    fn test_cost_split_mismatch_warns() {
        let mut input = analysis_input();
        input.vehicle.vatable_costs = dec!(700);
        let out = analyze_vehicle_margin(&input).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("differ from total_costs"));
    }

    #[test]
    fn test_reversed_dates_warn_and_clamp() {
        let mut input = analysis_input();
        input.vehicle.sale_date = Some(date(2024, 1, 1));
        let out = analyze_vehicle_margin(&input).unwrap();
        assert_eq!(out.result.days_in_stock, 0);
        assert!(out.warnings.iter().any(|w| w.contains("precedes purchase date")));
    }

    #[test]
    fn test_unsold_vehicle_warns_with_as_of() {
        let mut input = analysis_input();
        input.vehicle.sale_date = None;
        let out = analyze_vehicle_margin(&input).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("2024-06-01")));
        assert_eq!(out.result.days_in_stock, 138);
    }

    #[test]
    fn test_validation_failure_is_itemised() {
        let mut input = analysis_input();
        input.vehicle.purchase_price = Decimal::ZERO;
        input.vehicle.sale_price = Decimal::ZERO;
        match analyze_vehicle_margin(&input) {
            Err(MarginError::Validation(err)) => assert_eq!(err.errors.len(), 2),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let mut input = analysis_input();
        input.policy = Some(MarginPolicy {
            vat_fraction_divisor: dec!(-6),
            ..MarginPolicy::default()
        });
        assert!(matches!(
            analyze_vehicle_margin(&input),
            Err(MarginError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_deserializes_flattened_request() {
        let input: MarginAnalysisInput = serde_json::from_value(serde_json::json!({
            "vehicle_id": "veh-009",
            "registration": "XY70 ZZZ",
            "purchase_price": "10000",
            "sale_price": "15000",
            "total_costs": "1200",
            "vatable_costs": "600",
            "non_vatable_costs": "600",
            "purchase_date": "2024-01-15",
            "sale_date": "2024-03-15",
            "as_of": "2024-06-01",
            "policy": { "high_threshold_pct": "30" }
        }))
        .unwrap();
        assert_eq!(input.vehicle.vehicle_id, "veh-009");
        assert_eq!(input.as_of, Some(date(2024, 6, 1)));
        assert_eq!(input.policy.unwrap().high_threshold_pct, dec!(30));
    }
}
