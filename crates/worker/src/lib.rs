//! 作业创建消费者的消费循环
//!
//! - [`handler`]: 单条投递的处理与失败路由
//! - [`service`]: 并发消费循环，保证每条投递恰好确认一次
//! - [`processor`]: 作业创建业务处理器

pub mod handler;
pub mod processor;
pub mod service;

pub use handler::{AssignmentDeliveryHandler, DeliveryHandler};
pub use processor::AssignmentCreateProcessor;
pub use service::{resolve, ConsumerService};
