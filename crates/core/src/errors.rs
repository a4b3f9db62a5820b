use thiserror::Error;

/// 消费者错误类型定义
#[derive(Debug, Error)]
pub enum ConsumerError {
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("消息队列错误: {0}")]
    MessageQueue(String),

    #[error("发布到交换机 {exchange} 超时 ({seconds}秒)")]
    PublishTimeout { exchange: String, seconds: u64 },

    #[error("序列化错误: {0}")]
    Serialization(String),

    #[error("无效的消息内容: {0}")]
    InvalidPayload(String),

    #[error("配置错误: {0}")]
    Configuration(String),

    #[error("业务处理错误: {0}")]
    Processing(String),

    #[error("内部错误: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for ConsumerError {
    fn from(err: serde_json::Error) -> Self {
        ConsumerError::Serialization(err.to_string())
    }
}

/// 统一的Result类型
pub type ConsumerResult<T> = std::result::Result<T, ConsumerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_timeout_message_names_exchange() {
        let err = ConsumerError::PublishTimeout {
            exchange: "assignment".to_string(),
            seconds: 5,
        };
        let message = err.to_string();
        assert!(message.contains("assignment"));
        assert!(message.contains('5'));
    }

    #[test]
    fn test_serde_error_maps_to_serialization() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ConsumerError = err.into();
        assert!(matches!(err, ConsumerError::Serialization(_)));
    }
}
