pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod rate_limiter;
pub mod server;
pub mod upstream;
pub mod validation;

pub use config::Config;
pub use error::ApiError;
pub use handlers::AppState;
pub use server::{create_app, Server};
