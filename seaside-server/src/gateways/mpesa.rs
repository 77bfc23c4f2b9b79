//! M-Pesa Daraja STK push client via REST (no SDK dependency)
//!
//! Flow per payment: fetch an OAuth token, then POST an STK push request.
//! Daraja answers synchronously with a `CheckoutRequestID` and later calls
//! back asynchronously with the final result, so the callback types here
//! are public for the API layer to deserialize.

use super::{GatewayError, PaymentGateway, PushPaymentAck};
use crate::config::Config;
use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;

const SANDBOX_BASE: &str = "https://sandbox.safaricom.co.ke";
const PRODUCTION_BASE: &str = "https://api.safaricom.co.ke";

/// M-Pesa Daraja STK push client
#[derive(Debug, Clone)]
pub struct MpesaGateway {
    client: reqwest::Client,
    consumer_key: String,
    consumer_secret: String,
    shortcode: String,
    passkey: String,
    callback_url: String,
    base_url: String,
}

impl MpesaGateway {
    pub fn new(config: &Config) -> Self {
        let base_url = if config.mpesa_env == "production" {
            PRODUCTION_BASE
        } else {
            SANDBOX_BASE
        };
        Self {
            client: reqwest::Client::new(),
            consumer_key: config.mpesa_consumer_key.clone(),
            consumer_secret: config.mpesa_consumer_secret.clone(),
            shortcode: config.mpesa_shortcode.clone(),
            passkey: config.mpesa_passkey.clone(),
            callback_url: config.mpesa_callback_url.clone(),
            base_url: base_url.to_string(),
        }
    }

    fn is_configured(&self) -> bool {
        // require_secret substitutes "dev-..." placeholders in development
        ![&self.consumer_key, &self.consumer_secret, &self.passkey]
            .iter()
            .any(|s| s.is_empty() || s.starts_with("dev-"))
    }

    /// Fetch a short-lived OAuth bearer token
    async fn access_token(&self) -> Result<String, GatewayError> {
        let resp: serde_json::Value = self
            .client
            .get(format!(
                "{}/oauth/v1/generate?grant_type=client_credentials",
                self.base_url
            ))
            .basic_auth(&self.consumer_key, Some(&self.consumer_secret))
            .send()
            .await?
            .json()
            .await?;

        resp["access_token"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| GatewayError::Rejected(format!("M-Pesa auth failed: {resp}")))
    }

    /// Daraja request password: base64(shortcode + passkey + timestamp)
    fn password(&self, timestamp: &str) -> String {
        base64::engine::general_purpose::STANDARD.encode(format!(
            "{}{}{}",
            self.shortcode, self.passkey, timestamp
        ))
    }
}

/// Daraja timestamp format: YYYYMMDDHHmmss
fn daraja_timestamp() -> String {
    chrono::Utc::now().format("%Y%m%d%H%M%S").to_string()
}

#[async_trait]
impl PaymentGateway for MpesaGateway {
    async fn initiate_push(
        &self,
        phone: &str,
        amount: i64,
        reference: &str,
        description: &str,
    ) -> Result<PushPaymentAck, GatewayError> {
        if !self.is_configured() {
            return Err(GatewayError::NotConfigured("M-Pesa"));
        }

        let token = self.access_token().await?;
        let timestamp = daraja_timestamp();

        let resp: StkPushResponse = self
            .client
            .post(format!(
                "{}/mpesa/stkpush/v1/processrequest",
                self.base_url
            ))
            .bearer_auth(token)
            .json(&serde_json::json!({
                "BusinessShortCode": self.shortcode,
                "Password": self.password(&timestamp),
                "Timestamp": timestamp,
                "TransactionType": "CustomerPayBillOnline",
                "Amount": amount,
                "PartyA": phone,
                "PartyB": self.shortcode,
                "PhoneNumber": phone,
                "CallBackURL": self.callback_url,
                "AccountReference": reference,
                "TransactionDesc": description
            }))
            .send()
            .await?
            .json()
            .await?;

        if resp.response_code.as_deref() != Some("0") {
            let reason = resp
                .error_message
                .or(resp.response_description)
                .unwrap_or_else(|| "STK push rejected".to_string());
            return Err(GatewayError::Rejected(reason));
        }

        let request_id = resp.checkout_request_id.ok_or_else(|| {
            GatewayError::Rejected("STK push response missing CheckoutRequestID".to_string())
        })?;

        Ok(PushPaymentAck {
            request_id,
            customer_message: resp.customer_message,
        })
    }
}

/// Synchronous STK push response
///
/// Success and error responses share this shape: success carries
/// `ResponseCode: "0"` (a string) and a `CheckoutRequestID`, errors carry
/// `errorMessage`.
#[derive(Debug, Deserialize)]
struct StkPushResponse {
    #[serde(rename = "ResponseCode")]
    response_code: Option<String>,
    #[serde(rename = "ResponseDescription")]
    response_description: Option<String>,
    #[serde(rename = "CheckoutRequestID")]
    checkout_request_id: Option<String>,
    #[serde(rename = "CustomerMessage")]
    customer_message: Option<String>,
    #[serde(rename = "errorMessage")]
    error_message: Option<String>,
}

/// Asynchronous STK callback envelope: `{"Body": {"stkCallback": {...}}}`
#[derive(Debug, Clone, Deserialize)]
pub struct StkCallbackEnvelope {
    #[serde(rename = "Body")]
    body: StkCallbackBody,
}

#[derive(Debug, Clone, Deserialize)]
struct StkCallbackBody {
    #[serde(rename = "stkCallback")]
    stk_callback: StkCallback,
}

/// Final result of one STK push request. `ResultCode` 0 means paid.
#[derive(Debug, Clone, Deserialize)]
pub struct StkCallback {
    #[serde(rename = "CheckoutRequestID")]
    pub checkout_request_id: String,
    #[serde(rename = "ResultCode")]
    pub result_code: i64,
    #[serde(rename = "ResultDesc", default)]
    pub result_desc: String,
}

impl StkCallbackEnvelope {
    /// Unwrap the nested callback payload
    pub fn callback(self) -> StkCallback {
        self.body.stk_callback
    }
}
