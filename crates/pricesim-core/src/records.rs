use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::pricing::guard::MIN_MARGIN_RATE;
use crate::rounding::round_rate;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::PriceSimResult;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// One product row already parsed out of an inbound spreadsheet.
///
/// File handling and column mapping stay with the import collaborator;
/// this module only judges the values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRow {
    /// 1-based row number in the source sheet, for error reporting.
    pub row: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_cost_per_unit: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price_per_unit: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowError {
    pub row: u32,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowWarning {
    pub row: u32,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowCheckReport {
    pub accepted: u32,
    pub rejected: u32,
    pub errors: Vec<RowError>,
    pub warnings: Vec<RowWarning>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Validate product rows ahead of an import.
///
/// A row is rejected when its identity is missing or a money value is
/// negative; a priced row whose implied margin sits under the minimum
/// acceptable margin is accepted with a warning.
pub fn check_product_rows(
    rows: &[ProductRow],
) -> PriceSimResult<ComputationOutput<RowCheckReport>> {
    let start = Instant::now();

    let mut accepted = 0u32;
    let mut rejected = 0u32;
    let mut errors: Vec<RowError> = Vec::new();
    let mut warnings: Vec<RowWarning> = Vec::new();

    for row in rows {
        if let Some(reason) = reject_reason(row) {
            rejected += 1;
            errors.push(RowError {
                row: row.row,
                reason,
            });
            continue;
        }

        accepted += 1;

        if let Some(margin) = implied_margin(row) {
            if margin < MIN_MARGIN_RATE {
                warnings.push(RowWarning {
                    row: row.row,
                    message: format!(
                        "Implied margin {} is below the minimum acceptable margin {MIN_MARGIN_RATE}.",
                        round_rate(margin)
                    ),
                });
            }
        }
    }

    let report = RowCheckReport {
        accepted,
        rejected,
        errors,
        warnings,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "minimum_margin_rate": MIN_MARGIN_RATE.to_string(),
    });

    Ok(with_metadata(
        "Pre-import product row validation",
        &assumptions,
        Vec::new(),
        elapsed,
        report,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn reject_reason(row: &ProductRow) -> Option<String> {
    let code_missing = row
        .product_code
        .as_deref()
        .map_or(true, |c| c.trim().is_empty());
    let name_missing = row
        .product_name
        .as_deref()
        .map_or(true, |n| n.trim().is_empty());
    if code_missing || name_missing {
        return Some("Product code or product name is missing.".into());
    }

    if matches!(row.unit_cost_per_unit, Some(cost) if cost < Decimal::ZERO) {
        return Some("Negative unit cost is not allowed.".into());
    }
    if matches!(row.unit_price_per_unit, Some(price) if price < Decimal::ZERO) {
        return Some("Negative unit price is not allowed.".into());
    }

    None
}

/// Margin implied by the row's own price and cost, when both are usable.
fn implied_margin(row: &ProductRow) -> Option<Decimal> {
    let cost = row.unit_cost_per_unit?;
    let price = row.unit_price_per_unit?;
    if price <= Decimal::ZERO {
        return None;
    }
    Some((price - cost) / price)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
