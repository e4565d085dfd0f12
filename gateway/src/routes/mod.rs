//! Route handlers, one module per upstream resource.

pub mod auth;
pub mod products;
pub mod users;

use axum::Json;
use serde_json::{json, Value};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
