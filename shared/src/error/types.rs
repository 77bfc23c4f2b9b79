//! Application error and API envelope

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use crate::order::OrderStatus;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Error carried through every fallible path of the service.
///
/// Pairs a registry [`ErrorCode`] with a message and optional structured
/// details, and knows how to render itself as an HTTP response.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    /// Structured context for the client, offending field names and the like
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// Rejected order creation, names every absent field at once
    pub fn missing_fields(fields: Vec<&'static str>) -> Self {
        Self::with_message(ErrorCode::RequiredField, "Missing required fields")
            .with_detail("missing", fields)
    }

    pub fn order_not_found(order_id: impl Into<String>) -> Self {
        let id = order_id.into();
        Self::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
            .with_detail("orderId", id)
    }

    /// Payment was pushed at an order that is not in `PAYMENT_PENDING`
    pub fn order_not_payable(order_id: impl Into<String>, status: OrderStatus) -> Self {
        let id = order_id.into();
        Self::with_message(
            ErrorCode::OrderNotPayable,
            format!("Order {id} is not awaiting payment"),
        )
        .with_detail("orderId", id)
        .with_detail("status", serde_json::json!(status))
    }

    pub fn payment_failed(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PaymentInitFailed, msg)
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::NetworkError, msg)
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ConfigError, msg)
    }
}

/// Wire envelope for every JSON API response.
///
/// Success carries `code: 0` and the payload in `data`; failure carries
/// the error's registry code, message, and details. Absent fields are
/// omitted from the JSON entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: Some(0),
            message: "OK".to_string(),
            data: Some(data),
            details: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(err: &AppError) -> Self {
        Self {
            code: Some(err.code.code()),
            message: err.message.clone(),
            data: None,
            details: err.details.clone(),
        }
    }
}

// ===== Axum integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // System failures get logged here, client mistakes do not
        if self.code.category() == ErrorCategory::System {
            tracing::error!(code = %self.code, message = %self.message, "System error");
        }
        let body = ApiResponse::<()>::error(&self);
        (self.http_status(), axum::Json(body)).into_response()
    }
}

impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        let status = match self.code {
            None | Some(0) => StatusCode::OK,
            Some(code) => ErrorCode::try_from(code)
                .map_or(StatusCode::INTERNAL_SERVER_ERROR, |c| c.http_status()),
        };
        (status, axum::Json(self)).into_response()
    }
}
