//! Order domain types
//!
//! This module provides the types shared between the order service and its
//! tests:
//! - Status: the order lifecycle state machine
//! - Records: the stored order and the inbound order payload
//! - Changes: partial updates merged into a stored order

pub mod record;
pub mod status;

// Re-exports
pub use record::{OrderChanges, OrderPayload, OrderRecord};
pub use status::{DeliveryMode, OrderStatus};
