//! Error code registry
//!
//! Codes travel over the wire as bare numbers, so every variant pins an
//! explicit value and the assignments never change meaning:
//! - 0xxx: general request errors
//! - 4xxx: order errors
//! - 5xxx: payment errors
//! - 9xxx: system errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable numeric error code shared with API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Not an error
    Success = 0,
    /// Anything we could not classify
    Unknown = 1,
    /// Request payload failed validation
    ValidationFailed = 2,
    /// Resource does not exist
    NotFound = 3,
    /// Request is malformed or not applicable
    InvalidRequest = 4,
    /// One or more required fields are missing
    RequiredField = 5,
    /// A numeric field is outside its allowed range
    ValueOutOfRange = 6,

    // ==================== 4xxx: Order ====================
    /// No order with the given ID
    OrderNotFound = 4001,
    /// Order exists but is not awaiting payment
    OrderNotPayable = 4002,

    // ==================== 5xxx: Payment ====================
    /// The payment gateway refused to start a push payment
    PaymentInitFailed = 5001,

    // ==================== 9xxx: System ====================
    /// Unhandled internal failure
    InternalError = 9001,
    /// Could not reach an external gateway
    NetworkError = 9002,
    /// Service is missing required configuration
    ConfigError = 9003,
}

impl ErrorCode {
    /// Every defined code, in registry order
    pub const ALL: [ErrorCode; 13] = [
        ErrorCode::Success,
        ErrorCode::Unknown,
        ErrorCode::ValidationFailed,
        ErrorCode::NotFound,
        ErrorCode::InvalidRequest,
        ErrorCode::RequiredField,
        ErrorCode::ValueOutOfRange,
        ErrorCode::OrderNotFound,
        ErrorCode::OrderNotPayable,
        ErrorCode::PaymentInitFailed,
        ErrorCode::InternalError,
        ErrorCode::NetworkError,
        ErrorCode::ConfigError,
    ];

    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Default developer-facing message, used when no custom message is set
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "OK",
            ErrorCode::Unknown => "An unexpected error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "A required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderNotPayable => "Order is not awaiting payment",
            ErrorCode::PaymentInitFailed => "Could not initiate push payment",
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::NetworkError => "Upstream gateway unreachable",
            ErrorCode::ConfigError => "Service configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// A u16 that does not name any registered code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|code| code.code() == value)
            .ok_or(InvalidErrorCode(value))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_u16() {
        for code in ErrorCode::ALL {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn unregistered_numbers_are_rejected() {
        for bad in [7u16, 100, 4000, 4003, 5000, 9000, 65535] {
            assert_eq!(ErrorCode::try_from(bad), Err(InvalidErrorCode(bad)));
        }
    }

    #[test]
    fn domain_codes_keep_their_pinned_values() {
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::OrderNotPayable.code(), 4002);
        assert_eq!(ErrorCode::PaymentInitFailed.code(), 5001);
        assert_eq!(ErrorCode::ConfigError.code(), 9003);
    }

    #[test]
    fn only_zero_is_success() {
        for code in ErrorCode::ALL {
            assert_eq!(code.is_success(), code == ErrorCode::Success);
        }
    }

    #[test]
    fn serializes_as_bare_number() {
        let json = serde_json::to_string(&ErrorCode::OrderNotPayable).unwrap();
        assert_eq!(json, "4002");
        let back: ErrorCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ErrorCode::OrderNotPayable);
        assert!(serde_json::from_str::<ErrorCode>("123").is_err());
    }

    #[test]
    fn display_is_numeric() {
        assert_eq!(ErrorCode::Success.to_string(), "0");
        assert_eq!(ErrorCode::OrderNotFound.to_string(), "4001");
        assert_eq!(InvalidErrorCode(42).to_string(), "invalid error code: 42");
    }

    #[test]
    fn every_code_has_a_message() {
        for code in ErrorCode::ALL {
            assert!(!code.message().is_empty());
        }
    }
}
