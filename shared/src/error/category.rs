//! Coarse error classification
//!
//! The category drives log severity: [`ErrorCategory::System`] failures are
//! the ones worth paging over, everything else is a client or domain
//! problem reported back over the API.

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Which slice of the code registry an error falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// 0xxx, request-shaped problems
    General,
    /// 4xxx, order lifecycle problems
    Order,
    /// 5xxx, payment gateway problems
    Payment,
    /// 9xxx, the service itself misbehaving
    System,
}

impl ErrorCategory {
    pub const fn from_code(code: u16) -> Self {
        match code {
            0..1000 => ErrorCategory::General,
            4000..5000 => ErrorCategory::Order,
            5000..6000 => ErrorCategory::Payment,
            _ => ErrorCategory::System,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            ErrorCategory::General => "general",
            ErrorCategory::Order => "order",
            ErrorCategory::Payment => "payment",
            ErrorCategory::System => "system",
        }
    }
}

impl ErrorCode {
    #[inline]
    pub const fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
