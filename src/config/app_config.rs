//! # 应用配置结构定义

use serde::{Deserialize, Serialize};

/// 网关默认转发的外部后端地址
pub const DEFAULT_UPSTREAM_ORIGIN: &str = "http://localhost:5000";

/// 应用主配置结构
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP 服务配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,
    /// 控制台认证配置
    #[serde(default)]
    pub auth: AuthConfig,
    /// 网关转发配置
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    pub bind_address: String,
    /// 监听端口
    pub port: u16,
    /// 是否启用CORS
    pub enable_cors: bool,
    /// 允许的CORS源地址
    pub cors_origins: Vec<String>,
    /// API前缀
    pub api_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            cors_origins: vec!["*".to_string()],
            api_prefix: "/api".to_string(), // 与前端保持一致
        }
    }
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://data/console.db?mode=rwc".to_string(),
            max_connections: 10,
        }
    }
}

/// 控制台认证配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// JWT签名密钥
    pub jwt_secret: String,
    /// 访问令牌有效期（秒）
    pub jwt_expires_in: i64,
    /// 刷新令牌有效期（秒）
    pub refresh_expires_in: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expires_in: 3600,
            refresh_expires_in: 86400,
        }
    }
}

/// 网关转发配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// 外部后端服务的根地址，转发目标为 `{upstream_origin}/api/...`
    pub upstream_origin: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            upstream_origin: DEFAULT_UPSTREAM_ORIGIN.to_string(),
        }
    }
}

impl AppConfig {
    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), String> {
        if self.database.url.is_empty() {
            return Err("Database URL cannot be empty".to_string());
        }
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }

        if self.auth.jwt_secret.is_empty() {
            return Err("JWT secret cannot be empty".to_string());
        }
        if self.auth.jwt_expires_in <= 0 {
            return Err("jwt_expires_in must be greater than 0".to_string());
        }

        let origin = self.gateway.upstream_origin.trim();
        if origin.is_empty() {
            return Err("Gateway upstream origin cannot be empty".to_string());
        }
        url::Url::parse(origin)
            .map_err(|e| format!("Invalid gateway upstream origin '{origin}': {e}"))?;

        Ok(())
    }
}
