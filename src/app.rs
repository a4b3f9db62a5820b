use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use assignment_consumer_api::{create_routes, serve, AppState};
use assignment_consumer_config::AppConfig;
use assignment_consumer_infrastructure::{
    create_pool, init_metrics, MySqlAssignmentRepository, RabbitMqConnection,
    RabbitMqConsumer, RabbitMqPublisher,
};
use assignment_consumer_worker::{
    AssignmentCreateProcessor, AssignmentDeliveryHandler, ConsumerService,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use crate::shutdown::ShutdownManager;

/// 应用实例
///
/// 持有Broker连接、发布者、消费者和消费循环，负责按顺序启动和关闭它们。
pub struct Application {
    config: AppConfig,
    connection: RabbitMqConnection,
    publisher: RabbitMqPublisher,
    consumer: RabbitMqConsumer,
    service: ConsumerService,
    metrics_handle: Option<PrometheusHandle>,
}

impl Application {
    /// 建立所有外部连接，任一失败即返回错误
    pub async fn new(config: AppConfig) -> Result<Self> {
        let metrics_handle = if config.observability.metrics_enabled {
            Some(init_metrics()?)
        } else {
            None
        };

        let rabbitmq = &config.rabbitmq;
        let connection = RabbitMqConnection::connect(rabbitmq)
            .await
            .context("连接RabbitMQ失败")?;

        let pool = create_pool(&config.database)
            .await
            .context("连接数据库失败")?;
        let repository = Arc::new(MySqlAssignmentRepository::new(pool));
        let processor = Arc::new(AssignmentCreateProcessor::new(repository));

        let publisher = RabbitMqPublisher::new(
            &connection,
            rabbitmq.publish_timeout_seconds.map(Duration::from_secs),
        );
        let handler = Arc::new(AssignmentDeliveryHandler::new(
            processor,
            Arc::new(publisher.clone()),
            rabbitmq.retry_policy(),
            rabbitmq.exchange_names(),
        ));
        let service = ConsumerService::new(handler, rabbitmq.concurrency);

        let consumer = RabbitMqConsumer::start(
            &connection,
            &rabbitmq.assignment_create_queue,
            &rabbitmq.consumer_tag,
        )
        .await
        .context("启动消费者失败")?;

        info!(
            queue = %rabbitmq.assignment_create_queue,
            exchange = %rabbitmq.assignment_exchange,
            dead_letter_exchange = %rabbitmq.dead_letter_exchange,
            max_retry = rabbitmq.max_retry,
            concurrency = rabbitmq.concurrency,
            "应用初始化完成"
        );

        Ok(Self {
            config,
            connection,
            publisher,
            consumer,
            service,
            metrics_handle,
        })
    }

    /// 运行消费循环直到收到关闭信号或投递流结束，然后依次关闭各组件
    pub async fn run(self, shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        let http_shutdown = ShutdownManager::new("http");
        let router = create_routes(AppState {
            metrics: self.metrics_handle.clone(),
        });
        let http_config = self.config.http_server.clone();
        let http_shutdown_rx = http_shutdown.subscribe().await;
        let http_handle = tokio::spawn(async move {
            if let Err(e) = serve(&http_config, router, http_shutdown_rx).await {
                error!("健康检查服务运行失败: {e:#}");
            }
        });

        self.service
            .run(self.consumer.deliveries(), shutdown_rx)
            .await;

        self.shutdown().await;

        http_shutdown.shutdown().await;
        if let Err(e) = http_handle.await {
            warn!("等待健康检查服务退出失败: {e}");
        }

        info!("应用已关闭");
        Ok(())
    }

    /// 关闭顺序：停止消费，关闭发布通道，关闭连接
    async fn shutdown(&self) {
        if let Err(e) = self.consumer.close().await {
            warn!("关闭消费者失败: {e}");
        }
        if let Err(e) = self.publisher.close().await {
            warn!("关闭发布者失败: {e}");
        }
        if let Err(e) = self.connection.close().await {
            warn!("关闭RabbitMQ连接失败: {e}");
        }
    }
}
