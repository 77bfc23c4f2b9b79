//! Error handling for the Seaside order service
//!
//! Everything fallible funnels into [`AppError`], which ties a stable
//! numeric [`ErrorCode`] to a message and optional details. Responses
//! leave the API wrapped in [`ApiResponse`], the same envelope for
//! success and failure.
//!
//! ```
//! use shared::error::{ApiResponse, AppError, ErrorCode};
//!
//! let err = AppError::order_not_found("ORD-7");
//! assert_eq!(err.code, ErrorCode::OrderNotFound);
//!
//! let body = ApiResponse::<()>::error(&err);
//! assert_eq!(body.code, Some(4001));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
