use async_trait::async_trait;

use crate::{models::Delivery, ConsumerResult};

/// 业务处理器接口
///
/// 处理器不感知重试，任何错误都被消费循环同等对待。
#[async_trait]
pub trait BusinessProcessor: Send + Sync {
    async fn process(&self, delivery: &Delivery) -> ConsumerResult<()>;
}
