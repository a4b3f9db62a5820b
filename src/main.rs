use std::time::Duration;

use anyhow::{Context, Result};
use assignment_consumer_config::{AppConfig, LogFormat, LogLevel};
use assignment_consumer_infrastructure::init_logging;
use clap::{Arg, ArgMatches, Command};
use tokio::signal;
use tracing::{error, info, warn};

mod app;
mod shutdown;

use app::Application;
use shutdown::ShutdownManager;

/// 收到关闭信号后等待在途消息处理完成的最长时间
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("assignment-create-consumer")
        .version(env!("CARGO_PKG_VERSION"))
        .about("作业创建事件消费者")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("配置文件路径"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("日志级别，覆盖配置文件")
                .value_parser(["trace", "debug", "info", "warn", "error"]),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .value_name("FORMAT")
                .help("日志格式，覆盖配置文件")
                .value_parser(["json", "pretty", "compact"]),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config").map(String::as_str);
    let mut config = AppConfig::load(config_path).context("加载配置失败")?;
    apply_cli_overrides(&mut config, &matches)?;

    init_logging(&config.observability)?;

    info!("启动作业创建事件消费者");
    if let Some(path) = config_path {
        info!("配置文件: {path}");
    }

    let app = Application::new(config).await?;

    let shutdown_manager = ShutdownManager::new("consumer");
    let shutdown_rx = shutdown_manager.subscribe().await;
    let mut app_handle = tokio::spawn(app.run(shutdown_rx));

    tokio::select! {
        _ = wait_for_shutdown_signal() => {
            info!("收到关闭信号，开始优雅关闭...");
            shutdown_manager.shutdown().await;

            match tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut app_handle).await {
                Ok(Ok(Ok(()))) => info!("应用已优雅关闭"),
                Ok(Ok(Err(e))) => error!("应用关闭时发生错误: {e:#}"),
                Ok(Err(e)) => error!("应用任务异常退出: {e}"),
                Err(_) => warn!("应用关闭超时，强制退出"),
            }
        }
        result = &mut app_handle => {
            // 投递流在未收到关闭信号时结束，通常是Broker断开了连接
            match result {
                Ok(Ok(())) => warn!("消费循环意外结束"),
                Ok(Err(e)) => error!("应用运行失败: {e:#}"),
                Err(e) => error!("应用任务异常退出: {e}"),
            }
            return Err(anyhow::anyhow!("消费循环意外结束"));
        }
    }

    info!("作业创建事件消费者已退出");
    Ok(())
}

fn apply_cli_overrides(config: &mut AppConfig, matches: &ArgMatches) -> Result<()> {
    if let Some(level) = matches.get_one::<String>("log-level") {
        config.observability.log_level = level.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
    }
    if let Some(format) = matches.get_one::<String>("log-format") {
        config.observability.log_format =
            format.parse::<LogFormat>().map_err(anyhow::Error::msg)?;
    }
    Ok(())
}

/// 等待关闭信号
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("安装Ctrl+C信号处理器失败: {e}");
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
                error!("安装SIGTERM信号处理器失败: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("收到Ctrl+C信号");
        },
        _ = terminate => {
            info!("收到SIGTERM信号");
        },
    }
}
