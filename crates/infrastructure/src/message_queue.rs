use std::sync::Arc;
use std::time::Duration;

use assignment_consumer_config::RabbitMqConfig;
use assignment_consumer_core::{
    Acknowledger, ConsumerError, ConsumerResult, Delivery, OutgoingMessage, Publisher,
};
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use lapin::{
    acker::Acker, message::Delivery as AmqpDelivery, options::*,
    publisher_confirm::Confirmation, types::FieldTable, BasicProperties, Channel, Connection,
    ConnectionProperties, Consumer, Queue,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::field_table::{to_field_table, to_headers};

/// 持久化投递模式
const PERSISTENT_DELIVERY_MODE: u8 = 2;

/// RabbitMQ连接
///
/// 消费和发布使用各自独立的通道，发布通道开启了发布确认。
pub struct RabbitMqConnection {
    connection: Arc<Connection>,
    consume_channel: Channel,
    publish_channel: Channel,
}

impl RabbitMqConnection {
    /// 连接RabbitMQ并创建消费、发布通道
    pub async fn connect(config: &RabbitMqConfig) -> ConsumerResult<Self> {
        let connection = Connection::connect(&config.url, ConnectionProperties::default())
            .await
            .map_err(|e| ConsumerError::MessageQueue(format!("连接RabbitMQ失败: {e}")))?;

        let consume_channel = connection
            .create_channel()
            .await
            .map_err(|e| ConsumerError::MessageQueue(format!("创建消费通道失败: {e}")))?;
        consume_channel
            .basic_qos(config.prefetch_count, BasicQosOptions::default())
            .await
            .map_err(|e| ConsumerError::MessageQueue(format!("设置预取数量失败: {e}")))?;

        let publish_channel = open_publish_channel(&connection).await?;

        info!(prefetch_count = config.prefetch_count, "成功连接到RabbitMQ");

        Ok(Self {
            connection: Arc::new(connection),
            consume_channel,
            publish_channel,
        })
    }

    /// 获取连接状态
    pub fn is_connected(&self) -> bool {
        self.connection.status().connected()
    }

    /// 关闭连接
    pub async fn close(&self) -> ConsumerResult<()> {
        self.connection
            .close(200, "正常关闭")
            .await
            .map_err(|e| ConsumerError::MessageQueue(format!("关闭连接失败: {e}")))?;

        info!("RabbitMQ连接已关闭");
        Ok(())
    }
}

/// 创建开启发布确认的通道
async fn open_publish_channel(connection: &Connection) -> ConsumerResult<Channel> {
    let channel = connection
        .create_channel()
        .await
        .map_err(|e| ConsumerError::MessageQueue(format!("创建发布通道失败: {e}")))?;
    channel
        .confirm_select(ConfirmSelectOptions::default())
        .await
        .map_err(|e| ConsumerError::MessageQueue(format!("开启发布确认失败: {e}")))?;
    Ok(channel)
}

/// 基于发布确认的RabbitMQ发布者
///
/// 通道级异常（例如发布到不存在的交换机）会让Broker关闭发布通道，
/// 下一次发布前会在同一连接上重新创建通道。
#[derive(Clone)]
pub struct RabbitMqPublisher {
    connection: Arc<Connection>,
    channel: Arc<Mutex<Channel>>,
    publish_timeout: Option<Duration>,
}

impl RabbitMqPublisher {
    pub fn new(connection: &RabbitMqConnection, publish_timeout: Option<Duration>) -> Self {
        Self {
            connection: Arc::clone(&connection.connection),
            channel: Arc::new(Mutex::new(connection.publish_channel.clone())),
            publish_timeout,
        }
    }

    /// 当前可用的发布通道，已关闭时重新创建
    async fn channel(&self) -> ConsumerResult<Channel> {
        let mut channel = self.channel.lock().await;
        if !channel.status().connected() {
            warn!(channel_id = channel.id(), "发布通道已关闭，重新创建");
            *channel = open_publish_channel(&self.connection).await?;
            info!(channel_id = channel.id(), "发布通道已重新创建");
        }
        Ok(channel.clone())
    }

    async fn publish_confirmed(
        &self,
        exchange: &str,
        message: &OutgoingMessage,
    ) -> ConsumerResult<Confirmation> {
        let mut properties = BasicProperties::default()
            .with_delivery_mode(PERSISTENT_DELIVERY_MODE)
            .with_headers(to_field_table(&message.headers));
        if let Some(content_type) = &message.content_type {
            properties = properties.with_content_type(content_type.clone().into());
        }

        let channel = self.channel().await?;
        let confirm = channel
            .basic_publish(
                exchange,
                &message.routing_key,
                BasicPublishOptions::default(),
                &message.body,
                properties,
            )
            .await
            .map_err(|e| {
                ConsumerError::MessageQueue(format!("发布消息到交换机 {exchange} 失败: {e}"))
            })?;

        confirm
            .await
            .map_err(|e| ConsumerError::MessageQueue(format!("消息发布确认失败: {e}")))
    }

    /// 关闭发布通道
    pub async fn close(&self) -> ConsumerResult<()> {
        let channel = self.channel.lock().await;
        if !channel.status().connected() {
            return Ok(());
        }
        channel
            .close(200, "正常关闭")
            .await
            .map_err(|e| ConsumerError::MessageQueue(format!("关闭发布通道失败: {e}")))?;

        info!("发布通道已关闭");
        Ok(())
    }
}

#[async_trait]
impl Publisher for RabbitMqPublisher {
    async fn publish(&self, exchange: &str, message: &OutgoingMessage) -> ConsumerResult<()> {
        let confirmation = match self.publish_timeout {
            Some(limit) => tokio::time::timeout(limit, self.publish_confirmed(exchange, message))
                .await
                .map_err(|_| ConsumerError::PublishTimeout {
                    exchange: exchange.to_string(),
                    seconds: limit.as_secs(),
                })??,
            None => self.publish_confirmed(exchange, message).await?,
        };

        if let Confirmation::Nack(_) = confirmation {
            return Err(ConsumerError::MessageQueue(format!(
                "交换机 {exchange} 拒绝了消息"
            )));
        }

        debug!(
            exchange = exchange,
            routing_key = %message.routing_key,
            "消息已发布"
        );
        Ok(())
    }
}

/// 基于lapin Acker的投递确认
pub struct AmqpAcknowledger {
    acker: Acker,
}

#[async_trait]
impl Acknowledger for AmqpAcknowledger {
    async fn ack(&self) -> ConsumerResult<()> {
        self.acker
            .ack(BasicAckOptions::default())
            .await
            .map(|_| ())
            .map_err(|e| ConsumerError::MessageQueue(format!("确认消息失败: {e}")))
    }
}

/// RabbitMQ消费者
pub struct RabbitMqConsumer {
    channel: Channel,
    consumer: Consumer,
    consumer_tag: String,
}

impl RabbitMqConsumer {
    /// 声明持久化队列并开始消费
    pub async fn start(
        connection: &RabbitMqConnection,
        queue: &str,
        consumer_tag: &str,
    ) -> ConsumerResult<Self> {
        let channel = connection.consume_channel.clone();
        declare_durable_queue(&channel, queue).await?;

        let consumer = channel
            .basic_consume(
                queue,
                consumer_tag,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await
            .map_err(|e| ConsumerError::MessageQueue(format!("创建消费者失败: {e}")))?;

        info!(queue = queue, consumer_tag = consumer_tag, "开始消费队列");

        Ok(Self {
            channel,
            consumer,
            consumer_tag: consumer_tag.to_string(),
        })
    }

    /// 投递流，每条投递附带其确认句柄
    pub fn deliveries(
        &self,
    ) -> BoxStream<'static, ConsumerResult<(Delivery, AmqpAcknowledger)>> {
        self.consumer
            .clone()
            .map(|result| {
                result
                    .map(split_delivery)
                    .map_err(|e| ConsumerError::MessageQueue(format!("接收消息失败: {e}")))
            })
            .boxed()
    }

    /// 停止消费，Broker不再向该消费者投递新消息
    pub async fn close(&self) -> ConsumerResult<()> {
        self.channel
            .basic_cancel(&self.consumer_tag, BasicCancelOptions::default())
            .await
            .map_err(|e| ConsumerError::MessageQueue(format!("取消消费者失败: {e}")))?;

        info!(consumer_tag = %self.consumer_tag, "消费者已关闭");
        Ok(())
    }
}

async fn declare_durable_queue(channel: &Channel, queue_name: &str) -> ConsumerResult<Queue> {
    let queue = channel
        .queue_declare(
            queue_name,
            QueueDeclareOptions {
                durable: true,
                exclusive: false,
                auto_delete: false,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await
        .map_err(|e| ConsumerError::MessageQueue(format!("声明队列 {queue_name} 失败: {e}")))?;

    debug!("队列 {} 声明成功", queue_name);
    Ok(queue)
}

fn split_delivery(delivery: AmqpDelivery) -> (Delivery, AmqpAcknowledger) {
    let headers = delivery
        .properties
        .headers()
        .as_ref()
        .map(to_headers)
        .unwrap_or_default();
    let content_type = delivery
        .properties
        .content_type()
        .as_ref()
        .map(|content_type| content_type.as_str().to_string());

    let converted = Delivery {
        delivery_tag: delivery.delivery_tag,
        body: delivery.data,
        routing_key: delivery.routing_key.as_str().to_string(),
        content_type,
        headers,
        redelivered: delivery.redelivered,
    };

    (
        converted,
        AmqpAcknowledger {
            acker: delivery.acker,
        },
    )
}
