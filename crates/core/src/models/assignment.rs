use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ConsumerError, ConsumerResult};

/// 作业创建请求，即队列消息体的JSON结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub author: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub publish_date: Option<DateTime<Utc>>,
}

/// 待持久化的作业记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub name: String,
    pub description: String,
    pub author: String,
    pub due_date: Option<DateTime<Utc>>,
    pub publish_date: DateTime<Utc>,
}

impl AssignmentRequest {
    pub fn from_slice(body: &[u8]) -> ConsumerResult<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// 校验请求并转换为作业记录，未指定发布时间时使用 `now`
    pub fn into_assignment(self, now: DateTime<Utc>) -> ConsumerResult<Assignment> {
        if self.name.trim().is_empty() {
            return Err(ConsumerError::InvalidPayload("作业名称不能为空".to_string()));
        }
        if self.author.trim().is_empty() {
            return Err(ConsumerError::InvalidPayload("作业作者不能为空".to_string()));
        }

        let publish_date = self.publish_date.unwrap_or(now);
        if let Some(due_date) = self.due_date {
            if due_date < publish_date {
                return Err(ConsumerError::InvalidPayload(format!(
                    "截止时间 {due_date} 早于发布时间 {publish_date}"
                )));
            }
        }

        Ok(Assignment {
            name: self.name.trim().to_string(),
            description: self.description.unwrap_or_default(),
            author: self.author,
            due_date: self.due_date,
            publish_date,
        })
    }
}
