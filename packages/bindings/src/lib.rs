use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use pricesim_core::break_even::period::{FixedCostRecord, SalesRecord, YearMonth};
use pricesim_core::break_even::trend::DEFAULT_TREND_MONTHS;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

#[napi]
pub fn simulate_price(input_json: String) -> NapiResult<String> {
    let input: pricesim_core::pricing::recommendation::PriceSimulationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        pricesim_core::pricing::recommendation::recommend(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Break-even
// ---------------------------------------------------------------------------

#[napi]
pub fn break_even_analysis(input_json: String) -> NapiResult<String> {
    let input: pricesim_core::break_even::analysis::BreakEvenInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = pricesim_core::break_even::analysis::analyze(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Request shape for a full period report.
#[derive(Deserialize)]
struct PeriodReportRequest {
    period: YearMonth,
    #[serde(default)]
    trend_months: Option<u32>,
    #[serde(default)]
    fixed_costs: Vec<FixedCostRecord>,
    #[serde(default)]
    sales: Vec<SalesRecord>,
}

#[napi]
pub fn break_even_report(input_json: String) -> NapiResult<String> {
    let request: PeriodReportRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let months = request.trend_months.unwrap_or(DEFAULT_TREND_MONTHS);
    let output = pricesim_core::break_even::trend::period_report(
        &request.fixed_costs,
        &request.sales,
        request.period,
        months,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Import checks
// ---------------------------------------------------------------------------

#[napi]
pub fn check_product_rows(input_json: String) -> NapiResult<String> {
    let rows: Vec<pricesim_core::records::ProductRow> =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = pricesim_core::records::check_product_rows(&rows).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
