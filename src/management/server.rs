//! # 管理服务器
//!
//! Axum HTTP服务器，承载控制台 API 与网关转发路由

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::auth::JwtManager;
use crate::config::AppConfig;
use crate::error::Result;

/// 服务器应用状态
#[derive(Clone)]
pub struct AppState {
    /// 数据库连接
    pub database: Arc<DatabaseConnection>,
    /// 应用配置
    pub config: Arc<AppConfig>,
    /// JWT 管理器
    pub jwt_manager: Arc<JwtManager>,
    /// 网关出站 HTTP 客户端
    ///
    /// 不设置超时：调用方感受到的延迟即上游的真实延迟。
    pub http_client: reqwest::Client,
}

impl AppState {
    /// 创建应用状态
    pub fn new(database: Arc<DatabaseConnection>, config: Arc<AppConfig>) -> Self {
        let jwt_manager = Arc::new(JwtManager::new(Arc::new(config.auth.clone())));
        Self {
            database,
            config,
            jwt_manager,
            http_client: reqwest::Client::new(),
        }
    }
}

/// 管理服务器
pub struct ManagementServer {
    /// 应用状态
    state: AppState,
    /// 路由器
    router: Router,
}

impl ManagementServer {
    /// 创建新的管理服务器
    pub fn new(database: Arc<DatabaseConnection>, config: Arc<AppConfig>) -> Self {
        let state = AppState::new(database, config);
        let router = Self::create_router(state.clone());

        Self { state, router }
    }

    /// 创建路由器
    fn create_router(state: AppState) -> Router {
        let config = &state.config.server;
        let api_routes = super::routes::create_routes(state.clone());

        let mut app = Router::new()
            .nest(&config.api_prefix, api_routes) // 将所有API路由嵌套在/api下
            .route("/ping", get(super::handlers::system::ping_handler))
            .route("/health", get(super::handlers::system::health_check));

        // 添加中间件
        let service_builder = ServiceBuilder::new().layer(TraceLayer::new_for_http());

        // 配置CORS
        if config.enable_cors {
            let mut cors_layer = CorsLayer::new()
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PUT,
                    axum::http::Method::DELETE,
                    axum::http::Method::PATCH,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::ACCEPT,
                    axum::http::header::ORIGIN,
                ]);

            // 配置允许的源
            if config.cors_origins.contains(&"*".to_string()) {
                cors_layer = cors_layer.allow_origin(Any);
            } else {
                let origins = config
                    .cors_origins
                    .iter()
                    .map(|origin| origin.parse::<axum::http::HeaderValue>())
                    .collect::<std::result::Result<Vec<_>, axum::http::header::InvalidHeaderValue>>(
                    );

                match origins {
                    Ok(origins) => {
                        cors_layer = cors_layer.allow_origin(origins);
                    }
                    Err(e) => {
                        warn!(
                            "Invalid CORS origin configuration: {e}, falling back to allow any"
                        );
                        cors_layer = cors_layer.allow_origin(Any);
                    }
                }
            }

            app = app.layer(service_builder.layer(cors_layer));
        } else {
            app = app.layer(service_builder);
        }

        app
    }

    /// 获取状态引用（测试用）
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// 启动服务器
    pub async fn serve(self) -> Result<()> {
        let bind_address = self.state.config.server.bind_address.clone();
        let ip = bind_address
            .parse::<std::net::IpAddr>()
            .map_err(|e| crate::config_error!("Invalid bind address '{}': {}", bind_address, e))?;
        let addr = SocketAddr::new(ip, self.state.config.server.port);

        info!("Starting management server on {addr}");

        let listener = TcpListener::bind(&addr).await?;

        axum::serve(listener, self.router)
            .await
            .map_err(|e| crate::error::ConsoleError::network(format!("Server error: {e}")))?;

        Ok(())
    }

    /// 构建路由器（测试用入口）
    #[must_use]
    pub fn into_router(self) -> Router {
        self.router
    }
}
