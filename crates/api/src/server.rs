use anyhow::{Context, Result};
use assignment_consumer_config::HttpServerConfig;
use axum::Router;
use tokio::{net::TcpListener, sync::broadcast};
use tracing::info;

/// 启动HTTP服务，收到关闭信号后优雅退出
pub async fn serve(
    config: &HttpServerConfig,
    router: Router,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<()> {
    let bind_address = config.bind_address();
    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("绑定HTTP服务地址失败: {bind_address}"))?;

    info!("健康检查服务监听: {}", bind_address);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
        })
        .await
        .context("HTTP服务运行失败")?;

    info!("健康检查服务已停止");
    Ok(())
}
