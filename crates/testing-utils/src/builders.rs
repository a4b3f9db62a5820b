//! Test data builders for deliveries and assignment payloads

use assignment_consumer_core::{Delivery, HeaderValue, RETRY_HEADER};
use chrono::{DateTime, Utc};
use serde_json::json;

pub const TEST_ROUTING_KEY: &str = "assignment.create";
pub const TEST_CONTENT_TYPE: &str = "application/json";

/// Builder for test deliveries
pub struct DeliveryBuilder {
    delivery: Delivery,
}

impl DeliveryBuilder {
    pub fn new() -> Self {
        Self {
            delivery: Delivery::new(AssignmentPayloadBuilder::new().build(), TEST_ROUTING_KEY)
                .with_delivery_tag(1)
                .with_content_type(TEST_CONTENT_TYPE),
        }
    }

    pub fn with_delivery_tag(mut self, delivery_tag: u64) -> Self {
        self.delivery.delivery_tag = delivery_tag;
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.delivery.body = body.into();
        self
    }

    pub fn without_content_type(mut self) -> Self {
        self.delivery.content_type = None;
        self
    }

    pub fn with_retry(mut self, value: impl Into<HeaderValue>) -> Self {
        self.delivery
            .headers
            .insert(RETRY_HEADER.to_string(), value.into());
        self
    }

    pub fn with_header(mut self, key: &str, value: impl Into<HeaderValue>) -> Self {
        self.delivery.headers.insert(key.to_string(), value.into());
        self
    }

    pub fn build(self) -> Delivery {
        self.delivery
    }
}

impl Default for DeliveryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for assignment creation request bodies
pub struct AssignmentPayloadBuilder {
    name: String,
    author: String,
    description: Option<String>,
    due_date: Option<DateTime<Utc>>,
    publish_date: Option<DateTime<Utc>>,
}

impl AssignmentPayloadBuilder {
    pub fn new() -> Self {
        Self {
            name: "Lab 1".to_string(),
            author: "instructor-1".to_string(),
            description: Some("Introduction".to_string()),
            due_date: None,
            publish_date: None,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_author(mut self, author: &str) -> Self {
        self.author = author.to_string();
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_publish_date(mut self, publish_date: DateTime<Utc>) -> Self {
        self.publish_date = Some(publish_date);
        self
    }

    pub fn build(self) -> Vec<u8> {
        json!({
            "name": self.name,
            "author": self.author,
            "description": self.description,
            "due_date": self.due_date,
            "publish_date": self.publish_date,
        })
        .to_string()
        .into_bytes()
    }
}

impl Default for AssignmentPayloadBuilder {
    fn default() -> Self {
        Self::new()
    }
}
