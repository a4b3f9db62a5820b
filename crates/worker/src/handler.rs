use std::sync::Arc;

use assignment_consumer_core::{
    BusinessProcessor, Delivery, ExchangeNames, Outcome, OutgoingMessage, Publisher,
    RetryDecision, RetryPolicy,
};
use async_trait::async_trait;
use tracing::{error, warn};

/// 投递处理接口
///
/// 实现只负责决定结果，不负责确认投递。
#[async_trait]
pub trait DeliveryHandler: Send + Sync {
    async fn handle(&self, delivery: &Delivery) -> Outcome;
}

/// 带重试路由的投递处理器
///
/// 业务处理失败时按照重试策略将原消息重新发布到主交换机，
/// 重试次数耗尽后发布到死信交换机。
pub struct AssignmentDeliveryHandler {
    processor: Arc<dyn BusinessProcessor>,
    publisher: Arc<dyn Publisher>,
    policy: RetryPolicy,
    exchanges: ExchangeNames,
}

impl AssignmentDeliveryHandler {
    pub fn new(
        processor: Arc<dyn BusinessProcessor>,
        publisher: Arc<dyn Publisher>,
        policy: RetryPolicy,
        exchanges: ExchangeNames,
    ) -> Self {
        Self {
            processor,
            publisher,
            policy,
            exchanges,
        }
    }

    async fn route_failure(&self, delivery: &Delivery) -> Outcome {
        let decision = self.policy.decide(&delivery.headers);
        let exchange = self.exchanges.target(&decision);
        let retry_count = decision.retry_count();

        if decision.is_dead_letter() {
            warn!(
                exchange = exchange,
                retry_count = retry_count,
                max_retry = self.policy.max_retry,
                "超过最大重试次数，发布到死信交换机"
            );
        } else {
            warn!(
                exchange = exchange,
                retry_count = retry_count,
                max_retry = self.policy.max_retry,
                "重新发布消息等待重试"
            );
        }

        let message = OutgoingMessage::republish(delivery, decision.headers().clone());
        match self.publisher.publish(exchange, &message).await {
            Ok(()) => match decision {
                RetryDecision::Requeue { .. } => Outcome::Requeued { retry_count },
                RetryDecision::DeadLetter { .. } => Outcome::DeadLettered { retry_count },
            },
            Err(e) => {
                // 原投递仍会被确认，这条消息将丢失
                error!(
                    exchange = exchange,
                    retry_count = retry_count,
                    error = %e,
                    "重新发布消息失败"
                );
                Outcome::RoutingFailed {
                    decision,
                    error: e.to_string(),
                }
            }
        }
    }
}

#[async_trait]
impl DeliveryHandler for AssignmentDeliveryHandler {
    async fn handle(&self, delivery: &Delivery) -> Outcome {
        match self.processor.process(delivery).await {
            Ok(()) => Outcome::Processed,
            Err(e) => {
                warn!(error = %e, "业务处理失败");
                self.route_failure(delivery).await
            }
        }
    }
}
