pub mod mysql;

pub use mysql::{create_pool, MySqlAssignmentRepository};
