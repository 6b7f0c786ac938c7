//! # 配置管理器
//!
//! 统一的配置加载接口：TOML 文件 + 环境变量覆盖

use std::env;
use std::path::Path;

use tracing::{debug, info};

use super::AppConfig;
use crate::error::Result;

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 按默认查找顺序加载配置
    ///
    /// 优先使用 `GYM_CONSOLE_CONFIG` 指定的配置文件路径；
    /// 未指定时尝试 `config/config.toml`，不存在则使用内置默认值。
    pub fn load() -> Result<AppConfig> {
        let config_file =
            env::var("GYM_CONSOLE_CONFIG").unwrap_or_else(|_| "config/config.toml".to_string());
        Self::from_file(&config_file)
    }

    /// 从指定文件加载配置
    pub fn from_file(config_path: impl AsRef<Path>) -> Result<AppConfig> {
        let config_path = config_path.as_ref();

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: AppConfig = toml::from_str(&content).map_err(|e| {
                crate::config_error!("解析配置文件失败 {}: {e}", config_path.display())
            })?;
            info!("Loaded configuration from {}", config_path.display());
            config
        } else {
            debug!(
                "Config file {} not found, using defaults",
                config_path.display()
            );
            AppConfig::default()
        };

        Self::apply_env_overrides(&mut config);

        config
            .validate()
            .map_err(|e| crate::config_error!("配置校验失败: {}", e))?;

        Ok(config)
    }

    /// 应用环境变量覆盖
    fn apply_env_overrides(config: &mut AppConfig) {
        if let Ok(url) = env::var("DATABASE_URL")
            && !url.is_empty()
        {
            config.database.url = url;
        }

        if let Ok(origin) = env::var("EXTERNAL_API_URL")
            && !origin.is_empty()
        {
            config.gateway.upstream_origin = origin;
        }

        if let Ok(secret) = env::var("JWT_SECRET")
            && !secret.is_empty()
        {
            config.auth.jwt_secret = secret;
        }

        if let Ok(port) = env::var("PORT")
            && let Ok(port) = port.parse::<u16>()
        {
            config.server.port = port;
        }
    }
}
