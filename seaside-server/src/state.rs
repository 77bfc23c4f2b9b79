//! Application state for seaside-server

use std::sync::Arc;

use crate::config::Config;
use crate::gateways::{MpesaGateway, WhatsAppGateway};
use crate::orders::{InMemoryOrderRepository, OrderLifecycle, OrderRepository};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Owner's WhatsApp number, used to filter inbound webhook messages
    pub owner_number: String,
    /// Expected hub.verify_token during webhook subscription verification
    pub verify_token: String,
    /// Order lifecycle controller
    pub lifecycle: Arc<OrderLifecycle>,
    /// Order store, shared with the lifecycle
    pub repository: Arc<dyn OrderRepository>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let repository: Arc<dyn OrderRepository> = Arc::new(InMemoryOrderRepository::new());
        let notifier = Arc::new(WhatsAppGateway::new(
            config.waba_access_token.clone(),
            config.waba_phone_number_id.clone(),
        ));
        let payments = Arc::new(MpesaGateway::new(config));
        let lifecycle = Arc::new(OrderLifecycle::new(
            repository.clone(),
            notifier,
            payments,
            config.waba_owner_number.clone(),
            config.default_cleaning_fee,
        ));

        Self {
            owner_number: config.waba_owner_number.clone(),
            verify_token: config.waba_verify_token.clone(),
            lifecycle,
            repository,
        }
    }
}
