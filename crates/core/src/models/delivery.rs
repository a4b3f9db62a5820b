use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// 消息头，键为字符串，值为与Broker无关的字段值
pub type Headers = BTreeMap<String, HeaderValue>;

/// 消息头字段值
///
/// 只保留消费者关心的几种类型，其余的AMQP字段类型统一映射为 `Unsupported`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Unsupported,
}

impl From<i64> for HeaderValue {
    fn from(value: i64) -> Self {
        HeaderValue::Integer(value)
    }
}

impl From<u32> for HeaderValue {
    fn from(value: u32) -> Self {
        HeaderValue::Integer(i64::from(value))
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::Text(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::Text(value)
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Integer(v) => write!(f, "{v}"),
            HeaderValue::Float(v) => write!(f, "{v}"),
            HeaderValue::Text(v) => write!(f, "{v}"),
            HeaderValue::Bool(v) => write!(f, "{v}"),
            HeaderValue::Unsupported => write!(f, "<unsupported>"),
        }
    }
}

/// 从队列收到的一条投递
///
/// 投递在被确认之前归Broker客户端所有，消费者从不修改它。
/// 重试通过发布一条带有新消息头的新消息实现。
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub delivery_tag: u64,
    pub body: Vec<u8>,
    pub routing_key: String,
    pub content_type: Option<String>,
    pub headers: Headers,
    pub redelivered: bool,
}

impl Delivery {
    pub fn new(body: impl Into<Vec<u8>>, routing_key: impl Into<String>) -> Self {
        Self {
            delivery_tag: 0,
            body: body.into(),
            routing_key: routing_key.into(),
            content_type: None,
            headers: Headers::new(),
            redelivered: false,
        }
    }

    pub fn with_delivery_tag(mut self, delivery_tag: u64) -> Self {
        self.delivery_tag = delivery_tag;
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<HeaderValue>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    pub fn header(&self, key: &str) -> Option<&HeaderValue> {
        self.headers.get(key)
    }
}
