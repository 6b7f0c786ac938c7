//! # 系统处理器
//!
//! 存活探针与健康检查，不要求登录态。

use axum::response::{Json, Response};
use serde_json::{Value, json};

use crate::management::response;

/// Ping 探针
pub async fn ping_handler() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}

/// 健康检查
pub async fn health_check() -> Response {
    response::success(json!({
        "status": "healthy",
        "service": "gym-console-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
