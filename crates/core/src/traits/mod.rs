pub mod message_queue;
pub mod processor;
pub mod repository;

pub use message_queue::*;
pub use processor::*;
pub use repository::*;
