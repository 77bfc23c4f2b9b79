//! Payment API handlers
//!
//! POST /api/payments/push     — trigger an STK push for a payable order
//! POST /api/payments/callback — Daraja result callback

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use shared::{ApiResponse, AppError, AppResult};

use crate::gateways::mpesa::StkCallbackEnvelope;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushPaymentRequest {
    #[serde(default)]
    pub order_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushPaymentResponse {
    pub order_id: String,
    /// Gateway correlation key the callback will echo back
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_message: Option<String>,
}

/// POST /api/payments/push — the order must be awaiting payment
pub async fn request_push_payment(
    State(state): State<AppState>,
    Json(req): Json<PushPaymentRequest>,
) -> AppResult<ApiResponse<PushPaymentResponse>> {
    let order_id = req.order_id.trim();
    if order_id.is_empty() {
        return Err(AppError::missing_fields(vec!["orderId"]));
    }

    let ack = state.lifecycle.initiate_push_payment(order_id).await?;
    Ok(ApiResponse::success(PushPaymentResponse {
        order_id: order_id.to_string(),
        request_id: ack.request_id,
        customer_message: ack.customer_message,
    }))
}

/// POST /api/payments/callback
///
/// Daraja expects `{"ResultCode": 0, "ResultDesc": "Accepted"}` back no
/// matter what we made of the callback, so this handler never fails.
pub async fn payment_callback(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Json<Value> {
    match serde_json::from_value::<StkCallbackEnvelope>(payload) {
        Ok(envelope) => {
            let cb = envelope.callback();
            state
                .lifecycle
                .handle_payment_callback(&cb.checkout_request_id, cb.result_code, &cb.result_desc)
                .await;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Malformed payment callback");
        }
    }
    Json(json!({ "ResultCode": 0, "ResultDesc": "Accepted" }))
}
