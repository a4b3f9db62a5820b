pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

pub use routes::{create_routes, AppState};
pub use server::serve;
