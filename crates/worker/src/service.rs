use std::sync::Arc;
use std::time::Instant;

use assignment_consumer_core::{Acknowledger, ConsumerResult, Delivery, Outcome};
use assignment_consumer_infrastructure::ConsumerMetrics;
use futures::{Stream, StreamExt};
use tokio::sync::broadcast;
use tracing::{error, info, info_span, Instrument};

use crate::handler::DeliveryHandler;

/// 处理一条投递并确认，无论结果如何都恰好确认一次
pub async fn resolve<H, A>(
    handler: &H,
    delivery: Delivery,
    acker: A,
    metrics: &ConsumerMetrics,
) -> Outcome
where
    H: DeliveryHandler + ?Sized,
    A: Acknowledger,
{
    let span = info_span!(
        "delivery",
        delivery_tag = delivery.delivery_tag,
        routing_key = %delivery.routing_key,
        redelivered = delivery.redelivered,
    );

    async move {
        info!("开始处理消息");
        let started = Instant::now();

        let outcome = handler.handle(&delivery).await;
        metrics.record_outcome(&outcome, started.elapsed());

        if let Err(e) = acker.ack().await {
            metrics.record_ack_failure();
            error!(error = %e, "确认消息失败");
        }

        info!(outcome = outcome.as_str(), "消息处理结束");
        outcome
    }
    .instrument(span)
    .await
}

/// 消费循环
pub struct ConsumerService {
    handler: Arc<dyn DeliveryHandler>,
    concurrency: usize,
    metrics: ConsumerMetrics,
}

impl ConsumerService {
    pub fn new(handler: Arc<dyn DeliveryHandler>, concurrency: usize) -> Self {
        Self {
            handler,
            concurrency: concurrency.max(1),
            metrics: ConsumerMetrics::new(),
        }
    }

    /// 消费投递流，直到流结束或收到关闭信号
    ///
    /// 收到关闭信号后不再拉取新投递，已开始处理的投递会处理完并确认后才返回。
    pub async fn run<S, A>(&self, deliveries: S, mut shutdown_rx: broadcast::Receiver<()>)
    where
        S: Stream<Item = ConsumerResult<(Delivery, A)>> + Send,
        A: Acknowledger,
    {
        info!(concurrency = self.concurrency, "消费循环启动");

        let shutdown = async move {
            let _ = shutdown_rx.recv().await;
        };

        deliveries
            .take_until(shutdown)
            .for_each_concurrent(self.concurrency, |item| async move {
                match item {
                    Ok((delivery, acker)) => {
                        resolve(self.handler.as_ref(), delivery, acker, &self.metrics).await;
                    }
                    Err(e) => error!(error = %e, "接收消息失败"),
                }
            })
            .await;

        info!("消费循环已停止");
    }
}
