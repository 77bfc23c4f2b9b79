//! API routes for seaside-server

pub mod health;
pub mod orders;
pub mod payments;
pub mod whatsapp_webhook;

use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

/// Assemble the full route tree
pub fn create_router(state: AppState) -> Router {
    // Storefront order API
    let orders = Router::new()
        .route(
            "/api/orders",
            post(orders::create_order).get(orders::list_orders),
        )
        .route("/api/orders/{id}", get(orders::get_order));

    // Push payment initiation + Daraja result callback
    let payments = Router::new()
        .route("/api/payments/push", post(payments::request_push_payment))
        .route("/api/payments/callback", post(payments::payment_callback));

    // WhatsApp webhook (GET verification handshake, POST inbound messages)
    let webhook = Router::new().route(
        "/api/webhooks/whatsapp",
        get(whatsapp_webhook::verify_subscription).post(whatsapp_webhook::receive_message),
    );

    Router::new()
        .route("/health", get(health::health_check))
        .merge(orders)
        .merge(payments)
        .merge(webhook)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
