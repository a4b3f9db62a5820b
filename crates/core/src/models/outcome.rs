use crate::models::{Delivery, Headers};
use crate::retry::RetryDecision;

/// 主交换机和死信交换机名称
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeNames {
    pub primary: String,
    pub dead_letter: String,
}

impl ExchangeNames {
    pub fn new(primary: impl Into<String>, dead_letter: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            dead_letter: dead_letter.into(),
        }
    }

    /// 根据重试决策选择目标交换机
    pub fn target(&self, decision: &RetryDecision) -> &str {
        match decision {
            RetryDecision::Requeue { .. } => &self.primary,
            RetryDecision::DeadLetter { .. } => &self.dead_letter,
        }
    }
}

/// 重新发布的消息
///
/// 消息体、路由键和内容类型原样取自原始投递，只有消息头被替换。
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMessage {
    pub body: Vec<u8>,
    pub routing_key: String,
    pub content_type: Option<String>,
    pub headers: Headers,
}

impl OutgoingMessage {
    pub fn republish(delivery: &Delivery, headers: Headers) -> Self {
        Self {
            body: delivery.body.clone(),
            routing_key: delivery.routing_key.clone(),
            content_type: delivery.content_type.clone(),
            headers,
        }
    }
}

/// 一条投递的处理结果
///
/// 所有结果最终都会确认原始投递。
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// 业务处理成功，不发布任何消息
    Processed,
    /// 已重新发布到主交换机
    Requeued { retry_count: u32 },
    /// 重试次数耗尽，已发布到死信交换机
    DeadLettered { retry_count: u32 },
    /// 重新发布失败，消息可能丢失
    RoutingFailed {
        decision: RetryDecision,
        error: String,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Processed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Processed => "processed",
            Outcome::Requeued { .. } => "requeued",
            Outcome::DeadLettered { .. } => "dead_lettered",
            Outcome::RoutingFailed { .. } => "routing_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HeaderValue;
    use crate::retry::RETRY_HEADER;

    #[test]
    fn test_exchange_target() {
        let exchanges = ExchangeNames::new("assignment", "assignment.dlx");
        let requeue = RetryDecision::Requeue {
            headers: Headers::new(),
        };
        let dead_letter = RetryDecision::DeadLetter {
            headers: Headers::new(),
        };

        assert_eq!(exchanges.target(&requeue), "assignment");
        assert_eq!(exchanges.target(&dead_letter), "assignment.dlx");
    }

    #[test]
    fn test_republish_keeps_body_and_routing() {
        let delivery = Delivery::new(b"payload".to_vec(), "assignment.create")
            .with_content_type("application/json")
            .with_header("x-trace", "abc");
        let mut headers = Headers::new();
        headers.insert(RETRY_HEADER.to_string(), HeaderValue::Integer(1));

        let message = OutgoingMessage::republish(&delivery, headers.clone());

        assert_eq!(message.body, b"payload".to_vec());
        assert_eq!(message.routing_key, "assignment.create");
        assert_eq!(message.content_type.as_deref(), Some("application/json"));
        assert_eq!(message.headers, headers);
    }
}
