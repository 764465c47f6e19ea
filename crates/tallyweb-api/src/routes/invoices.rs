//! Invoice computation endpoints
//!
//! The invoice form recomputes its derived figures on every input change;
//! these endpoints expose that computation. Nothing here persists anything —
//! saving an invoice belongs to the upstream service.

use axum::extract::State;
use serde::Deserialize;

use tallyweb_core::{
    compute_invoice_totals, money, update_line_item, ItemField, LineItem, PaymentPolicy,
};

use crate::error::ApiError;
use crate::AppState;

/// Request body for a totals recomputation
#[derive(Debug, Deserialize)]
pub struct TotalsRequest {
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default, deserialize_with = "money::de_coerced_opt_f64")]
    pub discount_percent: Option<f64>,
    #[serde(default, deserialize_with = "money::de_coerced_opt_f64")]
    pub tax_percent: Option<f64>,
    #[serde(default)]
    pub full_payment: bool,
    #[serde(default, deserialize_with = "money::de_coerced_f64")]
    pub paid_amount: f64,
}

/// Request body for a line-item field edit
#[derive(Debug, Deserialize)]
pub struct LineItemEditRequest {
    pub item: LineItem,
    pub field: ItemField,
    #[serde(default, deserialize_with = "money::de_coerced_f64")]
    pub value: f64,
}

/// Recompute invoice totals from the posted form state
pub async fn api_invoice_totals(
    _state: State<AppState>,
    body: String,
) -> Result<String, ApiError> {
    let request: TotalsRequest =
        serde_json::from_str(&body).map_err(|e| ApiError::BadRequest {
            message: e.to_string(),
        })?;

    let policy = if request.full_payment {
        PaymentPolicy::full()
    } else {
        PaymentPolicy::partial(request.paid_amount)
    };

    let totals = compute_invoice_totals(
        &request.items,
        request.discount_percent,
        request.tax_percent,
        &policy,
    );

    Ok(serde_json::to_string(&totals).unwrap_or_default())
}

/// Apply one field edit to a line item and return the consistent row
pub async fn api_line_item_update(
    _state: State<AppState>,
    body: String,
) -> Result<String, ApiError> {
    let request: LineItemEditRequest =
        serde_json::from_str(&body).map_err(|e| ApiError::BadRequest {
            message: e.to_string(),
        })?;

    let updated = update_line_item(&request.item, request.field, request.value);
    Ok(serde_json::to_string(&updated).unwrap_or_default())
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_request_accepts_loose_numbers() {
        let body = r#"{
            "items": [
                {"id": "1", "name": "Widget", "quantity": 2, "unit_price": 50, "amount": 100},
                {"id": "2", "name": "Gadget", "quantity": 1, "unit_price": 30, "amount": 30}
            ],
            "discount_percent": "10",
            "tax_percent": "",
            "full_payment": false,
            "paid_amount": "50"
        }"#;
        let request: TotalsRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.discount_percent, Some(10.0));
        assert_eq!(request.tax_percent, Some(0.0));
        assert_eq!(request.paid_amount, 50.0);
    }

    #[test]
    fn test_line_item_edit_request() {
        let body = r#"{
            "item": {"id": "1", "name": "Widget", "quantity": 4, "unit_price": 25, "amount": 100},
            "field": "amount",
            "value": "90"
        }"#;
        let request: LineItemEditRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.field, ItemField::Amount);
        let updated = update_line_item(&request.item, request.field, request.value);
        assert_eq!(updated.unit_price, 22.5);
    }
}
