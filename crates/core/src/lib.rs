pub mod errors;
pub mod models;
pub mod retry;
pub mod traits;

pub use errors::*;
pub use models::{
    Assignment, AssignmentRequest, Delivery, ExchangeNames, HeaderValue, Headers, Outcome,
    OutgoingMessage,
};
pub use retry::{retry_count, RetryDecision, RetryPolicy, RETRY_HEADER};
pub use traits::{Acknowledger, AssignmentRepository, BusinessProcessor, Publisher};
