//! Shared types for the Seaside order service
//!
//! Common types used by the server crate and its tests: the unified
//! error system, order domain types, and time/format helpers.

pub mod error;
pub mod order;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use serde::{Deserialize, Serialize};
