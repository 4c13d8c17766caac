//! Inbound HTTP surface (axum).

mod dto;
mod handlers;
mod routes;

pub use handlers::AppState;
pub use routes::api_router;
