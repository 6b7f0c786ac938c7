//! # 配置模块
//!
//! 应用配置结构与加载逻辑

pub mod app_config;
pub mod manager;

pub use app_config::{AppConfig, AuthConfig, DatabaseConfig, GatewayConfig, ServerConfig};
pub use manager::ConfigManager;
