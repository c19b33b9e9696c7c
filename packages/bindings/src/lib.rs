use napi::Result as NapiResult;
use napi_derive::napi;

use serde::de::DeserializeOwned;

use dealer_margin_core::margin::periods;
use dealer_margin_core::margin::{self, MarginAnalysisInput, VehicleMarginInput};
use dealer_margin_core::reporting::stock::{self, StockMarginInput};
use dealer_margin_core::MarginError;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Deserialize a JSON argument, reporting failures as serialization errors.
fn parse_json<T: DeserializeOwned>(input_json: &str) -> NapiResult<T> {
    serde_json::from_str(input_json)
        .map_err(MarginError::from)
        .map_err(to_napi_error)
}

/// Optional ISO date argument; absent means "today".
fn parse_as_of(as_of: Option<String>) -> NapiResult<Option<chrono::NaiveDate>> {
    as_of
        .map(|s| periods::parse_as_of(&s).map_err(to_napi_error))
        .transpose()
}

// ---------------------------------------------------------------------------
// Single vehicle
// ---------------------------------------------------------------------------

#[napi]
pub fn validate_margin_data(input_json: String) -> NapiResult<String> {
    let input: VehicleMarginInput = parse_json(&input_json)?;
    let output = margin::validate_margin_data(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_detailed_margins(
    input_json: String,
    as_of: Option<String>,
) -> NapiResult<String> {
    let input: VehicleMarginInput = parse_json(&input_json)?;
    let as_of = parse_as_of(as_of)?.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let output = margin::calculate_detailed_margins(&input, as_of);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compute_vehicle_margin(input_json: String, as_of: Option<String>) -> NapiResult<String> {
    let input: VehicleMarginInput = parse_json(&input_json)?;
    let output =
        margin::compute_vehicle_margin(&input, parse_as_of(as_of)?).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_vehicle_margin(input_json: String) -> NapiResult<String> {
    let input: MarginAnalysisInput = parse_json(&input_json)?;
    let output = margin::analyze_vehicle_margin(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Stock book
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_stock_margins(input_json: String) -> NapiResult<String> {
    let input: StockMarginInput = parse_json(&input_json)?;
    let output = stock::analyze_stock_margins(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
