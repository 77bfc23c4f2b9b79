//! Seaside Seafood order service
//!
//! Backend for a small seafood delivery business: the storefront posts
//! orders, the owner approves or rejects them over WhatsApp, and cleaned
//! orders are settled up front through M-Pesa STK push.
//!
//! # Module structure
//!
//! ```text
//! seaside-server/src/
//! ├── config.rs      # Environment configuration
//! ├── state.rs       # Shared application state
//! ├── api/           # HTTP routes and handlers
//! ├── orders/        # Store, lifecycle, reply parsing, notifications
//! └── gateways/      # WhatsApp and M-Pesa clients
//! ```

pub mod api;
pub mod config;
pub mod gateways;
pub mod orders;
pub mod state;

// Re-exports
pub use config::Config;
pub use state::AppState;
