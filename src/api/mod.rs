//! HTTP surface of the claim checker

pub mod handlers;
pub mod models;
pub mod routes;

pub use handlers::AppState;
pub use models::{error_codes, ApiError};
pub use routes::build_router;
