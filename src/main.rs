//! # Gym Console API 主程序
//!
//! 健身房管理平台控制台后端：资源 API + 外部服务网关

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use gym_console_api::{
    ConsoleError, Result,
    config::{AppConfig, ConfigManager},
    database, logging,
    management::server::ManagementServer,
};

/// 命令行参数
#[derive(Debug, Parser)]
#[command(name = "gym-console-api", about = "Gym management console backend")]
struct Cli {
    /// 配置文件路径（覆盖 GYM_CONSOLE_CONFIG）
    #[arg(long)]
    config: Option<String>,

    /// 监听端口（覆盖配置文件）
    #[arg(long)]
    port: Option<u16>,

    /// 日志级别（info / debug / trace）
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志系统
    logging::init_logging(cli.log_level.as_ref());

    // 加载配置
    let mut config = match &cli.config {
        Some(path) => ConfigManager::from_file(path)?,
        None => ConfigManager::load()?,
    };
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    let config = Arc::new(config);

    // 执行数据初始化（数据库迁移等）
    let db = run_data_initialization(&config)
        .await
        .map_err(|e| ConsoleError::Database {
            message: format!("数据初始化失败: {e}"),
            source: Some(e),
        })?;

    // 启动服务
    info!("服务启动");
    let server = ManagementServer::new(Arc::new(db), config);
    if let Err(e) = server.serve().await {
        error!("服务启动失败: {e:?}");
        std::process::exit(1);
    }

    info!("服务正常关闭");
    Ok(())
}

/// 数据初始化函数
async fn run_data_initialization(config: &AppConfig) -> anyhow::Result<sea_orm::DatabaseConnection> {
    info!("开始数据初始化过程...");

    let db = database::init_database(&config.database.url)
        .await
        .map_err(|e| anyhow::anyhow!("数据库连接失败: {e}"))?;

    // 运行数据库迁移，确保表结构与初始数据存在
    info!("执行数据库迁移...");
    database::run_migrations(&db)
        .await
        .map_err(|e| anyhow::anyhow!("数据库迁移失败: {e}"))?;

    info!("数据初始化过程完成");
    Ok(db)
}
