//! # 认证流程集成测试
//!
//! 登录签发令牌、令牌校验、未认证访问被拒绝。

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::{Value, json};
use tower::ServiceExt;

use entity::users;
use gym_console_api::auth::AuthUtils;
use gym_console_api::config::AppConfig;
use gym_console_api::management::server::ManagementServer;

const TEST_PASSWORD: &str = "front-desk-pass-1";

async fn create_test_db() -> DatabaseConnection {
    let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

/// 建表并写入一个已知密码的操作员账号
async fn seed_operator(db: &DatabaseConnection, username: &str, is_active: bool) {
    let now = chrono::Utc::now().naive_utc();
    users::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{username}@gym.example")),
        password_hash: Set(AuthUtils::hash_password(TEST_PASSWORD).unwrap()),
        salt: Set(AuthUtils::generate_salt()),
        is_active: Set(is_active),
        is_admin: Set(false),
        last_login: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
}

async fn build_app(db: DatabaseConnection) -> Router {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    ManagementServer::new(Arc::new(db), Arc::new(config)).into_router()
}

async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
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

fn login_request(username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "username": username, "password": password }).to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn test_login_and_validate_token() {
    let db = create_test_db().await;
    seed_operator(&db, "frontdesk", true).await;
    let app = build_app(db).await;

    let (status, body) = send_json(&app, login_request("frontdesk", TEST_PASSWORD)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["user"]["username"], json!("frontdesk"));

    let access_token = body["data"]["token"]["access_token"].as_str().unwrap();

    // 携带令牌访问校验接口
    let request = Request::builder()
        .method("GET")
        .uri("/api/auth/validate")
        .header("Authorization", format!("Bearer {access_token}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send_json(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], json!("frontdesk"));
    assert_eq!(body["data"]["is_admin"], json!(false));
}

#[tokio::test]
async fn test_login_rejects_bad_password() {
    let db = create_test_db().await;
    seed_operator(&db, "frontdesk", true).await;
    let app = build_app(db).await;

    let (status, body) = send_json(&app, login_request("frontdesk", "wrong-password")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("AUTH_ERROR"));
}

#[tokio::test]
async fn test_login_rejects_unknown_user_with_same_error() {
    let db = create_test_db().await;
    let app = build_app(db).await;

    let (status, body) = send_json(&app, login_request("nobody", TEST_PASSWORD)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], json!("AUTH_ERROR"));
}

#[tokio::test]
async fn test_login_rejects_inactive_account() {
    let db = create_test_db().await;
    seed_operator(&db, "retired", false).await;
    let app = build_app(db).await;

    let (status, body) = send_json(&app, login_request("retired", TEST_PASSWORD)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], json!("PERMISSION_ERROR"));
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let db = create_test_db().await;
    let app = build_app(db).await;

    // 无 Authorization 头
    let request = Request::builder()
        .method("GET")
        .uri("/api/members")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send_json(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // 伪造令牌
    let request = Request::builder()
        .method("GET")
        .uri("/api/members")
        .header("Authorization", "Bearer not-a-real-token")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send_json(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_endpoints_do_not_require_token() {
    let db = create_test_db().await;
    let app = build_app(db).await;

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send_json(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("healthy"));

    let request = Request::builder()
        .method("GET")
        .uri("/ping")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send_json(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("pong"));
}
