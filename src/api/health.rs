use axum::Json;
use serde_json::{json, Value};

/// GET / - home payload for the external renderer
pub async fn home() -> Json<Value> {
    Json(json!({
        "service": "showbill",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "showbill",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
