//! # Assignment Consumer Testing Utils
//!
//! Shared test doubles for the assignment consumer workspace.
//!
//! - **Mocks**: in-memory publisher, acknowledger, processor and repository
//! - **Builders**: deliveries and assignment request payloads with sensible defaults
//!
//! ```toml
//! [dev-dependencies]
//! assignment-consumer-testing-utils = { path = "../testing-utils" }
//! ```

pub mod builders;
pub mod mocks;

pub use builders::*;
pub use mocks::*;
