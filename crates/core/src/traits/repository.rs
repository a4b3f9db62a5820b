//! 数据仓储层接口定义

use async_trait::async_trait;

use crate::{models::Assignment, ConsumerResult};

/// 作业仓储接口
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// 持久化作业记录，返回新记录的ID
    async fn create(&self, assignment: &Assignment) -> ConsumerResult<u64>;
}
