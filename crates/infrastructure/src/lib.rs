pub mod database;
pub mod field_table;
pub mod message_queue;
pub mod observability;

pub use database::*;
pub use message_queue::*;
pub use observability::*;

#[cfg(test)]
mod message_queue_test;
