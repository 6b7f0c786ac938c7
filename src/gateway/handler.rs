//! # 网关路由
//!
//! 通配路径 `/proxy/{*path}`，支持 GET/POST/PUT/PATCH/DELETE 五种方法。

use axum::Router;
use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, Method};
use axum::response::Response;
use axum::routing::get;
use bytes::Bytes;

use super::forwarder;
use crate::management::server::AppState;

/// 网关转发路由
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/proxy/{*path}",
        get(forward)
            .post(forward)
            .put(forward)
            .patch(forward)
            .delete(forward),
    )
}

/// 统一的转发入口，五种方法共用
async fn forward(
    State(state): State<AppState>,
    method: Method,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    forwarder::forward_to_upstream(
        &state.http_client,
        &state.config.gateway.upstream_origin,
        &method,
        &path,
        query.as_deref(),
        &headers,
        &body,
    )
    .await
}
