use std::time::Duration;

use anyhow::{Context, Result};
use assignment_consumer_config::{LogFormat, ObservabilityConfig};
use assignment_consumer_core::Outcome;
use metrics::{counter, histogram, Counter, Histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 初始化日志系统，`RUST_LOG` 优先于配置中的日志级别
pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init()
            .context("初始化JSON日志格式失败")?,
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()
            .context("初始化Pretty日志格式失败")?,
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init()
            .context("初始化Compact日志格式失败")?,
    }

    info!(
        logging.format = %config.log_format,
        logging.level = %config.log_level,
        "日志系统初始化完成"
    );
    Ok(())
}

/// 安装Prometheus指标记录器，返回用于渲染 `/metrics` 的句柄
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;

    info!("Prometheus指标记录器已安装");
    Ok(handle)
}

/// 消费者指标
#[derive(Clone)]
pub struct ConsumerMetrics {
    deliveries_total: Counter,
    processed_total: Counter,
    requeued_total: Counter,
    dead_lettered_total: Counter,
    routing_failures_total: Counter,
    ack_failures_total: Counter,
    processing_duration: Histogram,
}

impl ConsumerMetrics {
    pub fn new() -> Self {
        Self {
            deliveries_total: counter!("assignment_consumer_deliveries_total"),
            processed_total: counter!("assignment_consumer_processed_total"),
            requeued_total: counter!("assignment_consumer_requeued_total"),
            dead_lettered_total: counter!("assignment_consumer_dead_lettered_total"),
            routing_failures_total: counter!("assignment_consumer_routing_failures_total"),
            ack_failures_total: counter!("assignment_consumer_ack_failures_total"),
            processing_duration: histogram!("assignment_consumer_processing_duration_seconds"),
        }
    }

    pub fn record_outcome(&self, outcome: &Outcome, duration: Duration) {
        self.deliveries_total.increment(1);
        self.processing_duration.record(duration.as_secs_f64());

        match outcome {
            Outcome::Processed => self.processed_total.increment(1),
            Outcome::Requeued { .. } => self.requeued_total.increment(1),
            Outcome::DeadLettered { .. } => self.dead_lettered_total.increment(1),
            Outcome::RoutingFailed { .. } => self.routing_failures_total.increment(1),
        }
    }

    pub fn record_ack_failure(&self) {
        self.ack_failures_total.increment(1);
    }
}

impl Default for ConsumerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assignment_consumer_core::{Headers, RetryDecision};

    #[test]
    fn test_metrics_without_recorder_are_noops() {
        let metrics = ConsumerMetrics::new();

        metrics.record_outcome(&Outcome::Processed, Duration::from_millis(5));
        metrics.record_outcome(&Outcome::Requeued { retry_count: 1 }, Duration::ZERO);
        metrics.record_outcome(
            &Outcome::RoutingFailed {
                decision: RetryDecision::DeadLetter {
                    headers: Headers::new(),
                },
                error: "closed".to_string(),
            },
            Duration::ZERO,
        );
        metrics.record_ack_failure();
    }
}
