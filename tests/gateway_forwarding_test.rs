//! # 网关转发集成测试
//!
//! 以 wiremock 充当外部后端，逐条验证转发契约：
//! 目标 URL 拼装、方法与头部透传、请求体策略、上游响应回传、
//! 以及出站失败时固定的 503 响应。

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gym_console_api::config::AppConfig;
use gym_console_api::management::server::ManagementServer;

/// 构建指向指定上游的测试应用
async fn build_app(upstream_origin: &str) -> Router {
    let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
    let mut config = AppConfig::default();
    config.gateway.upstream_origin = upstream_origin.to_string();
    ManagementServer::new(Arc::new(db), Arc::new(config)).into_router()
}

/// 发送请求并解析 JSON 响应体
async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_all_methods_forwarded_with_path_and_query() {
    let upstream = MockServer::start().await;

    for verb in ["GET", "POST", "PUT", "PATCH", "DELETE"] {
        Mock::given(method(verb))
            .and(path("/api/members/42/notes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": verb })))
            .mount(&upstream)
            .await;
    }

    let app = build_app(&upstream.uri()).await;

    for verb in ["GET", "POST", "PUT", "PATCH", "DELETE"] {
        let request = Request::builder()
            .method(verb)
            .uri("/api/proxy/members/42/notes?page=2&limit=10")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK, "method {verb}");
        assert_eq!(body, json!({ "ok": verb }));
    }

    // 查询串按原文透传
    let received = upstream.received_requests().await.unwrap();
    assert!(!received.is_empty());
    for req in &received {
        assert_eq!(req.url.path(), "/api/members/42/notes");
        assert_eq!(req.url.query(), Some("page=2&limit=10"));
    }
}

#[tokio::test]
async fn test_duplicate_query_keys_passed_verbatim() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&upstream)
        .await;

    let app = build_app(&upstream.uri()).await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/proxy/search?tag=a&tag=b&q=x%20y")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    let received = upstream.received_requests().await.unwrap();
    assert_eq!(received[0].url.query(), Some("tag=a&tag=b&q=x%20y"));
}

#[tokio::test]
async fn test_get_and_delete_never_forward_body() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&upstream)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&upstream)
        .await;

    let app = build_app(&upstream.uri()).await;

    // 即便入站请求带了请求体，GET/DELETE 的出站请求也不携带
    for verb in ["GET", "DELETE"] {
        let request = Request::builder()
            .method(verb)
            .uri("/api/proxy/members")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"should":"be ignored"}"#))
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
    }

    let received = upstream.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);
    for req in &received {
        assert!(req.body.is_empty(), "{} must not carry a body", req.method);
    }
}

#[tokio::test]
async fn test_authorization_header_forwarded_verbatim() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .and(header("authorization", "Bearer X"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": 1 })))
        .mount(&upstream)
        .await;

    let app = build_app(&upstream.uri()).await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/proxy/profile")
        .header("Authorization", "Bearer X")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "user": 1 }));
}

#[tokio::test]
async fn test_gym_scope_header_normalized_to_canonical_casing() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/members"))
        .and(header("x-gym-id", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&upstream)
        .await;

    let app = build_app(&upstream.uri()).await;

    // 两种入站写法都被接受
    for header_name in ["x-gym-id", "X-Gym-Id"] {
        let request = Request::builder()
            .method("GET")
            .uri("/api/proxy/members")
            .header(header_name, "7")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK, "inbound casing {header_name}");
    }
}

#[tokio::test]
async fn test_missing_gym_scope_header_is_omitted() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&upstream)
        .await;

    let app = build_app(&upstream.uri()).await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/proxy/members")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    let received = upstream.received_requests().await.unwrap();
    assert!(received[0].headers.get("x-gym-id").is_none());
}

#[tokio::test]
async fn test_upstream_status_and_body_relayed_unchanged() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/members"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "success": true, "data": { "id": 42 } })),
        )
        .mount(&upstream)
        .await;

    let app = build_app(&upstream.uri()).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/proxy/members")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"name":"Alice"}"#))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "success": true, "data": { "id": 42 } }));
}

#[tokio::test]
async fn test_upstream_error_status_relayed_not_translated() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/members/999"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "success": false, "error": { "message": "not found" } })),
        )
        .mount(&upstream)
        .await;

    let app = build_app(&upstream.uri()).await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/proxy/members/999")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "success": false, "error": { "message": "not found" } })
    );
}

#[tokio::test]
async fn test_non_json_upstream_body_becomes_empty_object() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/members"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<html>not json</html>"))
        .mount(&upstream)
        .await;

    let app = build_app(&upstream.uri()).await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/proxy/members")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;

    // 状态码仍按原样回传，响应体以空对象代替
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn test_malformed_inbound_body_forwarded_without_body() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accepted": true })))
        .mount(&upstream)
        .await;

    let app = build_app(&upstream.uri()).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/proxy/members")
        .header("content-type", "application/json")
        .body(Body::from("{definitely not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;

    // 解析失败不是错误：转发仍然发生，只是不携带请求体
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "accepted": true }));

    let received = upstream.received_requests().await.unwrap();
    assert!(received[0].body.is_empty());
}

#[tokio::test]
async fn test_connection_failure_returns_fixed_503_envelope() {
    // 无人监听的端口，出站连接必然失败
    let app = build_app("http://127.0.0.1:9").await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/proxy/members")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body,
        json!({
            "success": false,
            "error": { "message": "Failed to connect to external API" }
        })
    );
}

#[tokio::test]
async fn test_body_reserialized_as_json_for_mutating_methods() {
    let upstream = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/members/1"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "updated": true })))
        .mount(&upstream)
        .await;

    let app = build_app(&upstream.uri()).await;
    let request = Request::builder()
        .method("PUT")
        .uri("/api/proxy/members/1")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"name":"Bob","phone":null}"#))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    let received = upstream.received_requests().await.unwrap();
    let forwarded: Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(forwarded, json!({ "name": "Bob", "phone": null }));
}
