//! WhatsApp webhook handlers
//!
//! GET  /api/webhooks/whatsapp — subscription verification handshake
//! POST /api/webhooks/whatsapp — inbound messages (owner replies)

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::Value;

use crate::state::AppState;

/// Query parameters of the verification handshake
#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// GET /api/webhooks/whatsapp
///
/// Echo the challenge when the mode and token match, 403 otherwise.
pub async fn verify_subscription(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Response {
    let mode_ok = params.mode.as_deref() == Some("subscribe");
    let token_ok = params.verify_token.as_deref() == Some(state.verify_token.as_str());

    match (mode_ok && token_ok, params.challenge) {
        (true, Some(challenge)) => {
            tracing::info!("WhatsApp webhook verified");
            (StatusCode::OK, challenge).into_response()
        }
        _ => {
            tracing::warn!("WhatsApp webhook verification failed");
            StatusCode::FORBIDDEN.into_response()
        }
    }
}

/// Pull the sender and message text out of the nested webhook payload
fn extract_text_message(payload: &Value) -> Option<(String, String)> {
    let message = &payload["entry"][0]["changes"][0]["value"]["messages"][0];
    let from = message["from"].as_str()?;
    let text = message["text"]["body"].as_str()?;
    Some((from.to_string(), text.to_string()))
}

/// POST /api/webhooks/whatsapp
///
/// Always returns 200: the channel retries on anything else.
pub async fn receive_message(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> StatusCode {
    let Some((from, text)) = extract_text_message(&payload) else {
        // Delivery receipts and status updates carry no text message
        return StatusCode::OK;
    };

    if from != state.owner_number {
        tracing::info!(from = %from, "Ignoring message from non-owner sender");
        return StatusCode::OK;
    }

    match state.lifecycle.handle_owner_reply(&text).await {
        Ok(Some(order)) => {
            tracing::info!(order_id = %order.id, status = ?order.status, "Owner reply applied");
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(error = %e, "Owner reply handling failed");
        }
    }
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_sender_and_text() {
        let payload = json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "1234567890",
                "changes": [{
                    "field": "messages",
                    "value": {
                        "messaging_product": "whatsapp",
                        "messages": [{
                            "from": "254700000001",
                            "id": "wamid.abc",
                            "type": "text",
                            "text": { "body": "YES 20 mins" }
                        }]
                    }
                }]
            }]
        });

        let (from, text) = extract_text_message(&payload).unwrap();
        assert_eq!(from, "254700000001");
        assert_eq!(text, "YES 20 mins");
    }

    #[test]
    fn status_update_has_no_text() {
        let payload = json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "changes": [{
                    "field": "messages",
                    "value": {
                        "messaging_product": "whatsapp",
                        "statuses": [{ "id": "wamid.abc", "status": "delivered" }]
                    }
                }]
            }]
        });

        assert!(extract_text_message(&payload).is_none());
    }

    #[test]
    fn non_text_message_is_skipped() {
        let payload = json!({
            "entry": [{
                "changes": [{
                    "value": {
                        "messages": [{
                            "from": "254700000001",
                            "type": "image",
                            "image": { "id": "media-1" }
                        }]
                    }
                }]
            }]
        });

        assert!(extract_text_message(&payload).is_none());
    }
}
