//! # 会员与套餐 API 集成测试
//!
//! 通过完整路由验证 CRUD、分页与冲突处理。

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use tower::ServiceExt;

use gym_console_api::auth::JwtManager;
use gym_console_api::config::AppConfig;
use gym_console_api::management::server::ManagementServer;

struct TestApp {
    app: Router,
    token: String,
}

async fn setup() -> TestApp {
    let db: DatabaseConnection = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let mut config = AppConfig::default();
    config.auth.jwt_secret = "members-api-test-secret".to_string();

    // 直接签发令牌，跳过登录流程
    let jwt = JwtManager::new(Arc::new(config.auth.clone()));
    let token = jwt
        .generate_access_token(1, "admin".to_string(), true)
        .unwrap();

    let app = ManagementServer::new(Arc::new(db), Arc::new(config)).into_router();
    TestApp { app, token }
}

impl TestApp {
    async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Authorization", format!("Bearer {}", self.token));

        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
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
}

#[tokio::test]
async fn test_member_crud_roundtrip() {
    let harness = setup().await;

    // 创建
    let (status, body) = harness
        .request(
            "POST",
            "/api/members",
            Some(json!({
                "name": "Alice Zhang",
                "email": "alice@example.com",
                "phone": "13800000000",
                "package_id": 1
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    let member_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["status"], json!("active"));

    // 查询
    let (status, body) = harness
        .request("GET", &format!("/api/members/{member_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], json!("alice@example.com"));

    // 更新
    let (status, body) = harness
        .request(
            "PUT",
            &format!("/api/members/{member_id}"),
            Some(json!({ "name": "Alice Z.", "status": "inactive" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], json!("Alice Z."));
    assert_eq!(body["data"]["status"], json!("inactive"));

    // 删除
    let (status, _) = harness
        .request("DELETE", &format!("/api/members/{member_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    // 再查询应 404
    let (status, body) = harness
        .request("GET", &format!("/api/members/{member_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], json!("RESOURCE_NOT_FOUND"));
}

#[tokio::test]
async fn test_member_duplicate_email_conflict() {
    let harness = setup().await;

    let payload = json!({ "name": "Alice", "email": "dup@example.com" });
    let (status, _) = harness
        .request("POST", "/api/members", Some(payload.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = harness
        .request(
            "POST",
            "/api/members",
            Some(json!({ "name": "Bob", "email": "dup@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], json!("RESOURCE_CONFLICT"));
}

#[tokio::test]
async fn test_member_validation_errors() {
    let harness = setup().await;

    // 空名称
    let (status, body) = harness
        .request(
            "POST",
            "/api/members",
            Some(json!({ "name": "   ", "email": "a@b.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));

    // 非法邮箱
    let (status, _) = harness
        .request(
            "POST",
            "/api/members",
            Some(json!({ "name": "Alice", "email": "not-an-email" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 引用不存在的套餐
    let (status, _) = harness
        .request(
            "POST",
            "/api/members",
            Some(json!({ "name": "Alice", "email": "a@b.com", "package_id": 999 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_member_list_pagination_and_filters() {
    let harness = setup().await;

    for i in 0..25 {
        let (status, _) = harness
            .request(
                "POST",
                "/api/members",
                Some(json!({
                    "name": format!("Member {i}"),
                    "email": format!("member{i}@example.com")
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    // 第二页，每页 10 条
    let (status, body) = harness
        .request("GET", "/api/members?page=2&limit=10", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
    assert_eq!(body["pagination"]["total"], json!(25));
    assert_eq!(body["pagination"]["pages"], json!(3));

    // 搜索过滤
    let (status, body) = harness
        .request("GET", "/api/members?search=member7", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["email"], json!("member7@example.com"));
}

#[tokio::test]
async fn test_package_crud_and_delete_guard() {
    let harness = setup().await;

    // 迁移已种入 3 个套餐
    let (status, body) = harness.request("GET", "/api/packages", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], json!(3));

    // 创建
    let (status, body) = harness
        .request(
            "POST",
            "/api/packages",
            Some(json!({
                "name": "Day Pass",
                "duration_days": 1,
                "price_cents": 1500
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let package_id = body["data"]["id"].as_i64().unwrap();

    // 非法数值被拒绝
    let (status, _) = harness
        .request(
            "POST",
            "/api/packages",
            Some(json!({ "name": "Bad", "duration_days": 0, "price_cents": 100 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 被会员引用的套餐不可删除
    let (status, _) = harness
        .request(
            "POST",
            "/api/members",
            Some(json!({
                "name": "Holder",
                "email": "holder@example.com",
                "package_id": package_id
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = harness
        .request("DELETE", &format!("/api/packages/{package_id}"), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], json!("RESOURCE_CONFLICT"));

    // 解除引用后可删除
    let (status, body) = harness.request("GET", "/api/members?search=holder", None).await;
    assert_eq!(status, StatusCode::OK);
    let member_id = body["data"][0]["id"].as_i64().unwrap();
    let (status, _) = harness
        .request("DELETE", &format!("/api/members/{member_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = harness
        .request("DELETE", &format!("/api/packages/{package_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}
