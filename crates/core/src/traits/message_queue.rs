use async_trait::async_trait;

use crate::{models::OutgoingMessage, ConsumerResult};

/// 消息发布抽象接口
#[async_trait]
pub trait Publisher: Send + Sync {
    /// 发布消息到指定交换机，等待Broker确认后返回
    async fn publish(&self, exchange: &str, message: &OutgoingMessage) -> ConsumerResult<()>;
}

/// 投递确认抽象接口
///
/// 确认是最终且不可撤销的，每条投递只能确认一次。
#[async_trait]
pub trait Acknowledger: Send + Sync {
    async fn ack(&self) -> ConsumerResult<()>;
}
