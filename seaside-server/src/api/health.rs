//! Liveness endpoint

use axum::Json;

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "seaside-server",
        "version": env!("CARGO_PKG_VERSION"),
        "time": shared::util::now_millis(),
    }))
}
