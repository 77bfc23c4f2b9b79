//! Order API handlers
//!
//! POST /api/orders      — create order (storefront checkout)
//! GET  /api/orders/{id} — fetch one order
//! GET  /api/orders      — list all orders, newest first

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;
use shared::order::{OrderPayload, OrderRecord, OrderStatus};
use shared::{ApiResponse, AppError, AppResult};

use crate::state::AppState;

/// Subset of the order echoed back on creation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrder {
    pub order_id: String,
    pub status: OrderStatus,
    pub total: i64,
}

/// POST /api/orders — validate, store and alert the owner
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<OrderPayload>,
) -> AppResult<ApiResponse<CreatedOrder>> {
    let order = state.lifecycle.create_order(payload).await?;
    Ok(ApiResponse::success(CreatedOrder {
        order_id: order.id,
        status: order.status,
        total: order.total,
    }))
}

/// GET /api/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OrderRecord>> {
    let order = state
        .repository
        .get(&id)
        .ok_or_else(|| AppError::order_not_found(&id))?;
    Ok(ApiResponse::success(order))
}

/// GET /api/orders
pub async fn list_orders(State(state): State<AppState>) -> ApiResponse<Vec<OrderRecord>> {
    ApiResponse::success(state.repository.list_all())
}
