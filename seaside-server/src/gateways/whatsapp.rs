//! WhatsApp Cloud API client via REST (no SDK dependency)
//!
//! Sends free-form text messages through the Graph API. Inbound webhook
//! parsing lives in the API layer; this module is outbound only.

use super::{GatewayError, NotificationGateway};
use async_trait::async_trait;

const GRAPH_API_BASE: &str = "https://graph.facebook.com/v18.0";

/// WhatsApp Cloud API messaging client
#[derive(Debug, Clone)]
pub struct WhatsAppGateway {
    client: reqwest::Client,
    access_token: String,
    phone_number_id: String,
}

impl WhatsAppGateway {
    pub fn new(access_token: impl Into<String>, phone_number_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token: access_token.into(),
            phone_number_id: phone_number_id.into(),
        }
    }

    fn is_configured(&self) -> bool {
        // require_secret substitutes "dev-..." placeholders in development
        !self.access_token.is_empty()
            && !self.access_token.starts_with("dev-")
            && !self.phone_number_id.is_empty()
    }
}

#[async_trait]
impl NotificationGateway for WhatsAppGateway {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), GatewayError> {
        if !self.is_configured() {
            return Err(GatewayError::NotConfigured("WhatsApp"));
        }

        let resp = self
            .client
            .post(format!(
                "{}/{}/messages",
                GRAPH_API_BASE, self.phone_number_id
            ))
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({
                "messaging_product": "whatsapp",
                "to": to,
                "type": "text",
                "text": { "body": body }
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected(format!(
                "WhatsApp send failed ({}): {}",
                status, detail
            )));
        }

        Ok(())
    }
}
