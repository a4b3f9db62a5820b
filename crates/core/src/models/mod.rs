//! # 数据模型
//!
//! 定义作业消费者的核心数据结构。
//!
//! ### Delivery - 投递
//! 从队列收到的一条不可变消息，包含消息体、路由键、内容类型和消息头。
//! 重试次数以 `x-retry` 消息头的形式随消息一起传递，而不是依赖Broker的重投计数。
//!
//! ### Outcome - 处理结果
//! 消费循环处理一条投递后的结果。无论结果如何，原始投递都会被确认且只确认一次。
//!
//! ### Assignment - 作业
//! 业务处理器从消息体解码并持久化的作业记录。

pub mod assignment;
pub mod delivery;
pub mod outcome;

pub use assignment::{Assignment, AssignmentRequest};
pub use delivery::{Delivery, HeaderValue, Headers};
pub use outcome::{ExchangeNames, Outcome, OutgoingMessage};
