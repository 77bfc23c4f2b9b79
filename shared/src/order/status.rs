//! Order lifecycle status and delivery mode
//!
//! Every order starts in `PENDING_OWNER_APPROVAL` and moves through the
//! lifecycle as the owner replies and the payment gateway calls back:
//!
//! ```text
//! PENDING_OWNER_APPROVAL --> REJECTED                  (owner says no)
//! PENDING_OWNER_APPROVAL --> APPROVED                  (owner says yes, AS_IS)
//! PENDING_OWNER_APPROVAL --> PAYMENT_PENDING           (owner says yes, CLEANED)
//! PAYMENT_PENDING        --> PAYMENT_COMPLETED         (gateway reports success)
//! ```

use serde::{Deserialize, Serialize};

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    PendingOwnerApproval,
    Approved,
    Rejected,
    PaymentPending,
    PaymentCompleted,
    /// Reserved for a future delivery confirmation flow. No trigger handled
    /// by this service moves an order here.
    Delivered,
}

impl OrderStatus {
    /// Whether any further trigger handled by this service can still move
    /// the order. `APPROVED` orders settle in cash on delivery, so they are
    /// terminal from the service's point of view.
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Approved
                | OrderStatus::Rejected
                | OrderStatus::PaymentCompleted
                | OrderStatus::Delivered
        )
    }
}

/// How the customer wants the fish prepared
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryMode {
    /// Delivered whole, paid in cash on delivery
    #[default]
    AsIs,
    /// Cleaned and gutted, cleaning fee added, paid up front
    Cleaned,
}
