//! External gateway clients
//!
//! The lifecycle talks to the outside world through two trait objects: a
//! [`NotificationGateway`] for outbound messages and a [`PaymentGateway`]
//! for push payment requests. Production wires in the WhatsApp Cloud API
//! and M-Pesa STK push clients; tests substitute recording fakes.

use async_trait::async_trait;
use shared::AppError;
use thiserror::Error;

pub mod mpesa;
pub mod whatsapp;

pub use mpesa::MpesaGateway;
pub use whatsapp::WhatsAppGateway;

/// Error from an external gateway call
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Credentials for the named gateway are missing or placeholders
    #[error("gateway not configured: {0}")]
    NotConfigured(&'static str),
    /// The request never completed (DNS, connect, timeout)
    #[error("gateway transport error: {0}")]
    Transport(String),
    /// The gateway answered but refused the request
    #[error("gateway rejected request: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Transport(err.to_string())
    }
}

/// Mapping used on the payment path, where gateway failures surface to the
/// API caller. Notification failures are logged at call sites instead.
impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotConfigured(what) => {
                AppError::configuration(format!("{} credentials are not configured", what))
            }
            GatewayError::Transport(msg) => AppError::network(msg),
            GatewayError::Rejected(msg) => AppError::payment_failed(msg),
        }
    }
}

/// Outbound text messaging
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), GatewayError>;
}

/// Synchronous acknowledgement of an accepted push payment request
#[derive(Debug, Clone)]
pub struct PushPaymentAck {
    /// Correlation key echoed back in the asynchronous callback
    pub request_id: String,
    /// Gateway-provided text to relay to the customer
    pub customer_message: Option<String>,
}

/// Push payment initiation
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn initiate_push(
        &self,
        phone: &str,
        amount: i64,
        reference: &str,
        description: &str,
    ) -> Result<PushPaymentAck, GatewayError>;
}
