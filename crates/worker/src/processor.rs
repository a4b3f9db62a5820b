use std::sync::Arc;

use assignment_consumer_core::{
    AssignmentRepository, AssignmentRequest, BusinessProcessor, ConsumerResult, Delivery,
};
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

/// 作业创建处理器
///
/// 解码消息体中的作业创建请求，校验后写入仓储。
pub struct AssignmentCreateProcessor {
    repository: Arc<dyn AssignmentRepository>,
}

impl AssignmentCreateProcessor {
    pub fn new(repository: Arc<dyn AssignmentRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl BusinessProcessor for AssignmentCreateProcessor {
    async fn process(&self, delivery: &Delivery) -> ConsumerResult<()> {
        let request = AssignmentRequest::from_slice(&delivery.body)?;
        debug!(name = %request.name, author = %request.author, "解码作业创建请求");

        let assignment = request.into_assignment(Utc::now())?;
        let id = self.repository.create(&assignment).await?;

        info!(assignment_id = id, name = %assignment.name, "作业创建成功");
        Ok(())
    }
}
