//! Order domain: storage, reply parsing, lifecycle orchestration and
//! outbound notifications

pub mod lifecycle;
pub mod notify;
pub mod reply;
pub mod repository;

// Re-exports
pub use lifecycle::OrderLifecycle;
pub use reply::{DEFAULT_ETA, OwnerDecision, parse_owner_reply};
pub use repository::{InMemoryOrderRepository, OrderRepository, TransitionOutcome};
