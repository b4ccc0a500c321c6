//! 患者记录服务主程序

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use clinic_core::DatabaseSettings;
use clinic_database::{MySqlConnectionProvider, MySqlPatientRepository};
use clinic_web::{AppState, WebServer};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 服务器命令行参数
#[derive(Parser, Debug)]
#[command(name = "clinic-server")]
#[command(about = "患者记录登记服务")]
struct Args {
    /// 监听地址
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// 监听端口
    #[arg(short, long, default_value = "5000")]
    port: u16,

    /// 数据库配置文件路径，格式按扩展名识别（toml/json/yaml/ini），环境变量 DB_* 优先
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 启动时创建 patients 表
    #[arg(long)]
    init_schema: bool,

    /// 日志级别，RUST_LOG 优先
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 初始化日志
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("启动患者记录服务...");

    let settings = DatabaseSettings::load(args.config.as_deref())
        .context("failed to load database settings")?;

    info!("数据库配置:");
    info!("  主机: {}:{}", settings.host, settings.port);
    info!("  数据库: {}", settings.name);

    let repository = MySqlPatientRepository::new(MySqlConnectionProvider::new(&settings));

    if args.init_schema {
        repository
            .create_table()
            .await
            .context("failed to create patients table")?;
    }

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", args.host, args.port))?;

    let server = WebServer::new(addr, AppState::new(Arc::new(repository)));
    server.run(shutdown_signal()).await?;

    info!("服务已停止");
    Ok(())
}

/// 等待 Ctrl+C 或 SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            warn!("Received SIGTERM, shutting down");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["clinic-server"]);

        assert_eq!(args.port, 5000);
        assert_eq!(args.host, "127.0.0.1");
        assert!(!args.init_schema);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_init_schema_flag() {
        let args = Args::parse_from(["clinic-server", "--init-schema", "-p", "8080"]);

        assert!(args.init_schema);
        assert_eq!(args.port, 8080);
    }

    #[test]
    fn test_config_help_names_supported_formats() {
        let command = Args::command();
        let help = command
            .get_arguments()
            .find(|arg| arg.get_id() == "config")
            .and_then(|arg| arg.get_help())
            .map(|help| help.to_string())
            .unwrap();

        assert!(help.contains("扩展名"));
        assert!(help.contains("json"));
    }
}
