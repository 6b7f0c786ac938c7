//! # 出站转发
//!
//! 网关的出站一跳：构造上游请求、透传白名单头、回传上游响应。
//!
//! 转发策略（与控制台前端约定一致，改动需双方同步）：
//! - 入站方法原样使用，GET/DELETE 不读取也不转发请求体；
//! - 其余方法的请求体按 JSON 尽力解析，解析失败视为无请求体，不报错；
//! - 头部仅透传 `Authorization` 与场馆标识头，`Content-Type` 恒为 JSON；
//! - 上游响应体解析失败时以 `{}` 代替，状态码仍按原样回传；
//! - 仅当出站请求本身失败时，才由网关自行合成 503 响应。

use axum::Json;
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::upstream_url::build_target_url;

/// 场馆标识头（入站匹配大小写不敏感）
pub const GYM_SCOPE_HEADER: &str = "x-gym-id";

/// 出站使用的场馆标识头规范写法
pub const CANONICAL_GYM_SCOPE_HEADER: &str = "X-Gym-Id";

/// 出站连接失败时的固定提示语
pub const CONNECT_FAILURE_MESSAGE: &str = "Failed to connect to external API";

/// 将入站请求转发到上游，并把上游响应翻译回下游响应
///
/// 任何出站失败都不会向调用方抛出异常，总是返回一个完整的 HTTP 响应。
pub async fn forward_to_upstream(
    client: &reqwest::Client,
    origin: &str,
    method: &Method,
    path: &str,
    raw_query: Option<&str>,
    headers: &HeaderMap,
    body: &Bytes,
) -> Response {
    let target_url = build_target_url(origin, path, raw_query);
    debug!("Forwarding {method} {path} to {target_url}");

    let mut request = client
        .request(method.clone(), &target_url)
        .header(header::CONTENT_TYPE, "application/json");

    // `Authorization` 原样透传（入站查找大小写不敏感）
    if let Some(authorization) = headers.get(header::AUTHORIZATION) {
        request = request.header(header::AUTHORIZATION, authorization.clone());
    }

    // 场馆标识头：接受任意大小写，出站统一为规范写法
    if let Some(gym_id) = headers.get(GYM_SCOPE_HEADER) {
        request = request.header(CANONICAL_GYM_SCOPE_HEADER, gym_id.clone());
    }

    // GET/DELETE 不携带请求体；其余方法尽力解析 JSON，失败按无请求体处理
    if let Some(json_body) = parse_forward_body(method, body) {
        request = request.json(&json_body);
    }

    match request.send().await {
        Ok(upstream) => {
            let status = upstream.status();

            // 响应体解析失败时以空对象代替，状态码仍按原样回传
            let payload: Value = match upstream.bytes().await {
                Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|_| json!({})),
                Err(_) => json!({}),
            };

            (status, Json(payload)).into_response()
        }
        Err(err) => {
            warn!("Gateway request to {target_url} failed: {err}");
            connect_failure_response()
        }
    }
}

/// 解析需要转发的请求体
///
/// GET/DELETE 恒为 `None`；空请求体与非法 JSON 也为 `None`。
fn parse_forward_body(method: &Method, body: &Bytes) -> Option<Value> {
    if *method == Method::GET || *method == Method::DELETE {
        return None;
    }
    if body.is_empty() {
        return None;
    }
    serde_json::from_slice(body).ok()
}

/// 网关唯一会自行合成的错误响应
fn connect_failure_response() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({
            "success": false,
            "error": { "message": CONNECT_FAILURE_MESSAGE }
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_delete_never_carry_body() {
        let body = Bytes::from_static(b"{\"ignored\":true}");
        assert!(parse_forward_body(&Method::GET, &body).is_none());
        assert!(parse_forward_body(&Method::DELETE, &body).is_none());
    }

    #[test]
    fn test_malformed_body_treated_as_absent() {
        let body = Bytes::from_static(b"{not json");
        assert!(parse_forward_body(&Method::POST, &body).is_none());
    }

    #[test]
    fn test_valid_body_parsed_for_mutating_methods() {
        let body = Bytes::from_static(b"{\"name\":\"Alice\"}");
        let parsed = parse_forward_body(&Method::POST, &body).unwrap();
        assert_eq!(parsed["name"], "Alice");

        assert!(parse_forward_body(&Method::PUT, &body).is_some());
        assert!(parse_forward_body(&Method::PATCH, &body).is_some());
    }

    #[test]
    fn test_empty_body_is_absent() {
        assert!(parse_forward_body(&Method::POST, &Bytes::new()).is_none());
    }
}
